//! yt-dlp command builder and runner.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Default executable name, resolved through `PATH`.
pub const DEFAULT_YTDLP: &str = "yt-dlp";

/// Builder for yt-dlp invocations.
///
/// The source URL is always passed last.
#[derive(Debug, Clone)]
pub struct YtDlpCommand {
    program: PathBuf,
    args: Vec<String>,
    url: String,
}

impl YtDlpCommand {
    /// Create a new command for `url`.
    pub fn new(program: impl AsRef<Path>, url: impl Into<String>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            url: url.into(),
        }
    }

    /// Add a raw argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple raw arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Print a template instead of downloading.
    pub fn print(self, template: impl Into<String>) -> Self {
        self.arg("--print").arg(template)
    }

    pub fn no_playlist(self) -> Self {
        self.arg("--no-playlist")
    }

    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        self.arg("--user-agent").arg(user_agent)
    }

    pub fn extractor_args(self, extractor_args: impl Into<String>) -> Self {
        self.arg("--extractor-args").arg(extractor_args)
    }

    pub fn cookies_from_browser(self, browser: impl Into<String>) -> Self {
        self.arg("--cookies-from-browser").arg(browser)
    }

    pub fn retries(self, retries: u32) -> Self {
        self.arg("--retries").arg(retries.to_string())
    }

    pub fn fragment_retries(self, retries: u32) -> Self {
        self.arg("--fragment-retries").arg(retries.to_string())
    }

    /// Set output path.
    pub fn output(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_string_lossy().into_owned();
        self.arg("-o").arg(path)
    }

    /// Build the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(self.url.clone());
        args
    }

    /// Run to completion, capturing both output streams.
    pub async fn run(&self) -> MediaResult<ToolOutput> {
        which::which(&self.program)
            .map_err(|_| MediaError::YtDlpNotFound(self.program.display().to_string()))?;

        let args = self.build_args();
        debug!(program = %self.program.display(), "Running yt-dlp: {}", args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Captured result of a finished tool run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// The tool's diagnostic text: stderr, or stdout when stderr is blank,
    /// or the exit status when both are.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        self.status.to_string()
    }
}
