//! Process-wide state shared by the launcher's components.

use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::docker::CancelToken;

/// Built once at startup and passed by reference to whatever needs it.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// Fired by Ctrl-C, SIGTERM, or a closed terminal.
    pub cancel: CancelToken,
    /// Whether a terminal is attached for the picker and error dialog.
    pub interactive: bool,
}

impl Context {
    pub fn new(config: Config, interactive: bool) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
            interactive,
        }
    }

    /// Route process termination signals to [`Context::cancel`].
    ///
    /// Can only be installed once per process.
    pub fn install_signal_handler(&self) -> Result<()> {
        let cancel = self.cancel.clone();
        ctrlc::set_handler(move || cancel.cancel())
            .context("failed to set Ctrl+C handler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_across_clones() {
        let ctx = Context::new(Config::default(), false);
        let copy = ctx.clone();
        ctx.cancel.cancel();
        assert!(copy.cancel.is_cancelled());
    }
}
