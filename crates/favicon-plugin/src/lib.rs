//! Favicon Plugin
//!
//! Build plugin that generates favicons from a single logo and hands them to
//! the host bundler:
//! - Records the logo as a file dependency so watchers rebuild on change
//! - Invokes a [`FaviconGenerator`] once per compilation
//! - Emits every image and file under the output directory
//! - Emits the generator's HTML snippets as one partial for templates to include
//!
//! # Example
//!
//! ```rust,ignore
//! use favicon_host::Compiler;
//! use favicon_plugin::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PluginConfig::new("frontend/logo.svg").with_public_path("/static/assets");
//! let plugin = FaviconsPartialPlugin::new(config, Arc::new(CommandGenerator::new("favicons-cli")))?;
//!
//! let compiler = Compiler::new("/project", "/project/static").with_plugin(&plugin);
//! let compilation = compiler.run().await?;
//! compiler.emit(&compilation).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod command;
pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod plugin;
pub mod state;
pub mod tracker;

// Re-exports for convenience
pub use command::CommandGenerator;
pub use config::{default_generator_options, GeneratorOptions, PluginConfig};
pub use emitter::{AssetEmitter, EmitSummary};
pub use error::{ConfigurationError, GenerationError, PluginError};
pub use generator::{FaviconGenerator, GeneratorAdapter};
pub use plugin::{FaviconsPartialPlugin, PLUGIN_NAME, PLUGIN_STAGE};
pub use state::{RunState, RunStateMachine, StateError};
pub use tracker::DependencyTracker;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for configuring the favicon plugin
    pub use crate::{
        CommandGenerator, FaviconGenerator, FaviconsPartialPlugin, GenerationError,
        GeneratorOptions, PluginConfig, PluginError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
