//! Opening the server in the user's browser.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};

pub trait Browser {
    /// Ask the platform to show `url`. Does not wait for the browser.
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let mut cmd = opener_command(url);
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {:?}", cmd.get_program()))?;
        // Reap in the background so the opener does not linger as a zombie.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_passes_url_last() {
        let cmd = opener_command("http://127.0.0.1:80");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(
            args.last().and_then(|a| a.to_str()),
            Some("http://127.0.0.1:80")
        );
    }
}
