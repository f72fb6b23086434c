//! Opening URLs in the user's default handler

use crate::error::{ProviderError, Result};
use std::io::Write;
use std::process::{Child, Command};
use tracing::debug;

/// Hands a fully formed URL to something that can open it
pub trait UrlLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform opener, or a configured command.
///
/// The child process is not waited on by the caller; a background thread
/// reaps it.
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    command: Option<String>,
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `command <url>` instead of the platform opener
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    fn spawn(&self, url: &str) -> std::io::Result<Child> {
        if let Some(ref command) = self.command {
            return Command::new(command).arg(url).spawn();
        }

        #[cfg(target_os = "windows")]
        {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("open").arg(url).spawn()
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            Command::new("xdg-open").arg(url).spawn()
        }
    }
}

impl UrlLauncher for SystemLauncher {
    fn open(&self, url: &str) -> Result<()> {
        let mut child = self.spawn(url).map_err(|source| ProviderError::Launch {
            url: url.to_string(),
            source,
        })?;
        debug!("Spawned opener for {} (pid {})", url, child.id());

        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Writes URLs to stdout instead of opening them
#[derive(Debug, Default)]
pub struct PrintLauncher;

impl PrintLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl UrlLauncher for PrintLauncher {
    fn open(&self, url: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", url).map_err(|source| ProviderError::Launch {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_reports_launch_error() {
        let launcher = SystemLauncher::with_command("/nonexistent/opener-for-tests");
        let err = launcher.open("https://example.com/").unwrap_err();
        assert!(matches!(err, ProviderError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_command_is_spawned() {
        let launcher = SystemLauncher::with_command("true");
        assert!(launcher.open("https://example.com/").is_ok());
    }

    #[test]
    fn test_print_launcher() {
        assert!(PrintLauncher::new().open("https://example.com/?q=x").is_ok());
    }
}
