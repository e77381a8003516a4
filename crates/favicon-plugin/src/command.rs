//! Subprocess-backed generator
//!
//! Runs an external favicon generator program. The request is written to the
//! child's stdin as `{ "logo": "<abs path>", "options": { ... } }` and the
//! child answers with a generation result on stdout:
//!
//! ```json
//! {
//!   "images": [{ "name": "icon-32.png", "contents": { "base64": "iVBORw0..." } }],
//!   "files": [{ "name": "manifest.webmanifest", "contents": "{ ... }" }],
//!   "html": ["<link rel=\"icon\" href=\"/static/assets/icon-32.png\">"]
//! }
//! ```

use crate::config::GeneratorOptions;
use crate::error::GenerationError;
use crate::generator::FaviconGenerator;
use favicon_artifact::GenerationResult;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Serialize)]
struct Request<'a> {
    logo: &'a Path,
    options: &'a GeneratorOptions,
}

fn encode_request(logo: &Path, options: &GeneratorOptions) -> Result<Vec<u8>, GenerationError> {
    serde_json::to_vec(&Request { logo, options }).map_err(GenerationError::InvalidRequest)
}

/// Generator backed by an external program
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandGenerator {
    /// Create generator running `program`
    #[inline]
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append an argument
    #[inline]
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the program in `dir`
    #[inline]
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Program name
    #[inline]
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait::async_trait]
impl FaviconGenerator for CommandGenerator {
    async fn generate(
        &self,
        logo: &Path,
        options: &GeneratorOptions,
    ) -> Result<GenerationResult, GenerationError> {
        match tokio::fs::metadata(logo).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(GenerationError::LogoUnreadable {
                    path: logo.to_path_buf(),
                    source: std::io::Error::new(ErrorKind::InvalidInput, "not a regular file"),
                })
            }
            Err(source) => {
                return Err(GenerationError::LogoUnreadable {
                    path: logo.to_path_buf(),
                    source,
                })
            }
        }

        let request = encode_request(logo, options)?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(program = %self.program, args = ?self.args, "spawning generator");
        let mut child = command.spawn().map_err(|source| GenerationError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A generator that ignores its request may exit before reading it
            match stdin.write_all(&request).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(GenerationError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(GenerationResult::from_json(&output.stdout)?)
    }
}
