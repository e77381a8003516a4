//! Favicon Host
//!
//! A minimal module-bundler host exposing the extension points the favicon
//! plugin needs:
//! 1. **Compiler**: Owns context, output root and hooks; plugins tap once
//! 2. **Compilation**: Fresh per run; owns the asset table and file dependencies
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use favicon_host::prelude::*;
//!
//! let mut compiler = Compiler::new("/project", "/project/static");
//! compiler.apply_plugin(&my_plugin);
//!
//! let compilation = compiler.run().await?;
//! compiler.emit(&compilation).await?;
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod assets;
pub mod compilation;
pub mod compiler;
pub mod dependencies;
pub mod error;
pub mod hooks;

// Re-exports
pub use assets::{AssetSource, AssetTable};
pub use compilation::{AbortSignal, Compilation, CompilationId};
pub use compiler::{Compiler, CompilerHooks, CompilerId, Plugin};
pub use dependencies::FileDependencies;
pub use error::{BoxError, CompilationError, EmitError, HookError};
pub use hooks::{ProcessAssetsHook, ProcessAssetsStage, ProcessAssetsTap, TapOptions};

/// Common imports for plugin authors
pub mod prelude {
    pub use crate::{
        AbortSignal, AssetSource, BoxError, Compilation, CompilationError, Compiler, Plugin,
        ProcessAssetsStage, ProcessAssetsTap, TapOptions,
    };
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
