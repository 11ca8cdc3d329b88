use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};

use crate::browser::Browser;
use crate::config::{CleanupPolicy, StaleScope};
use crate::context::Context;
use crate::docker::{ContainerHandle, ContainerStatus, Engine, EngineError, split_output_line};
use crate::error::LaunchError;
use crate::resolve::{PairingRule, resolve};

use super::launch::launch_config;
use super::ready::{Readiness, ReadinessProbe, wait_until_ready};
use super::state::LifecycleState;
use super::teardown::Teardown;

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The container's output closed on its own.
    Finished,
    /// The operator interrupted the run.
    Cancelled,
}

/// Drives one launch from file selection to teardown.
pub struct Controller<'a, E: Engine + ?Sized, B: Browser + ?Sized> {
    ctx: &'a Context,
    engine: &'a E,
    browser: &'a B,
    probe: ReadinessProbe,
    kill_grace: Duration,
    history: Vec<LifecycleState>,
}

impl<'a, E: Engine + ?Sized, B: Browser + ?Sized> Controller<'a, E, B> {
    pub fn new(ctx: &'a Context, engine: &'a E, browser: &'a B) -> Self {
        Self {
            ctx,
            engine,
            browser,
            probe: ReadinessProbe::from_config(&ctx.config),
            kill_grace: ctx.config.kill_grace(),
            history: vec![LifecycleState::Idle],
        }
    }

    pub fn with_probe(mut self, probe: ReadinessProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Pause between stopping one stale container and the next.
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.history
            .last()
            .copied()
            .unwrap_or(LifecycleState::Idle)
    }

    /// Every state visited so far, starting with `Idle`.
    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    /// Run the whole lifecycle for the file the operator picked.
    ///
    /// `None` means the picker was cancelled. Any launched container has
    /// been killed by the time this returns.
    pub fn run(&mut self, selection: Option<&Path>) -> Result<Outcome, LaunchError> {
        let result = self.drive(selection.unwrap_or(Path::new("")));
        match &result {
            Ok(_) => self.enter(LifecycleState::Terminated),
            Err(e) => self.enter(LifecycleState::Error(e.kind())),
        }
        result
    }

    fn enter(&mut self, next: LifecycleState) {
        let current = self.state();
        debug_assert!(
            current.allows(next),
            "illegal transition {current:?} -> {next:?}"
        );
        debug!("state {} -> {}", current.as_str(), next.as_str());
        self.history.push(next);
    }

    fn drive(&mut self, selection: &Path) -> Result<Outcome, LaunchError> {
        let ctx = self.ctx;
        let cfg = &ctx.config;
        let cancel = &ctx.cancel;

        self.enter(LifecycleState::ResolvingInput);
        let pair = resolve(selection, &PairingRule::from_config(cfg))?;
        info!(
            "Using {} and {}",
            pair.primary().display(),
            pair.secondary().display()
        );

        self.enter(LifecycleState::CleaningStale);
        self.engine
            .ping()
            .map_err(|e| LaunchError::EngineUnavailable(e.to_string()))?;
        self.clean_stale()?;
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        self.enter(LifecycleState::EnsuringImage);
        info!("Checking for Docker image {}", cfg.image);
        let pulled = self.engine.pull(&cfg.image);
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        pulled.map_err(|e| LaunchError::ImagePullFailed {
            image: cfg.image.clone(),
            message: e.to_string(),
        })?;

        self.enter(LifecycleState::Launching);
        let launch = launch_config(&pair, cfg)?;
        info!("Launching Docker image");
        debug!("command: {}", shell_words::join(&launch.command));
        let handle = match self.engine.run(&launch) {
            Ok(handle) => handle,
            Err(_) if cancel.is_cancelled() => return Ok(Outcome::Cancelled),
            Err(e) => return Err(LaunchError::LaunchFailed(e.to_string())),
        };
        info!("Started container {}", handle.short_id());
        let mut teardown = Teardown::new(self.engine, handle.clone());
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        self.enter(LifecycleState::WaitingReady);
        info!("Waiting for database to load");
        match wait_until_ready(self.engine, &handle, &self.probe, cancel) {
            Readiness::Ready => {}
            Readiness::Cancelled => return Ok(Outcome::Cancelled),
            Readiness::TimedOut => {
                return Err(LaunchError::ReadyTimeout(self.probe.max_wait.as_secs()));
            }
            Readiness::Vanished => {
                return Err(LaunchError::LaunchFailed(
                    "container exited before the server was ready".into(),
                ));
            }
        }

        self.enter(LifecycleState::Ready);
        if cfg.open_browser {
            let url = cfg.server_url();
            info!("Launching the browser at {url}");
            if let Err(e) = self.browser.open(&url) {
                warn!("Could not open a browser ({e:#}); visit {url} manually");
            }
        }

        self.enter(LifecycleState::Relaying);
        info!("Press Ctrl+C or close this window to shut down the server");
        self.relay(&handle);

        teardown.release();
        if cancel.is_cancelled() {
            Ok(Outcome::Cancelled)
        } else {
            Ok(Outcome::Finished)
        }
    }

    /// Stop running containers left over from earlier launches.
    fn clean_stale(&self) -> Result<(), LaunchError> {
        let cfg = &self.ctx.config;
        let containers = match self.engine.list_containers() {
            Ok(containers) => containers,
            Err(e) => return self.cleanup_problem("(listing)", &e),
        };

        let stale: Vec<_> = containers
            .into_iter()
            .filter(|c| c.status == ContainerStatus::Running)
            .filter(|c| match cfg.stale_containers {
                StaleScope::All => true,
                StaleScope::Image => c.image == cfg.image,
            })
            .collect();

        if stale.is_empty() {
            debug!("no running containers to stop");
            return Ok(());
        }

        for container in stale {
            let handle = ContainerHandle::new(container.id);
            info!(
                "Stopping running container {} ({})",
                handle.short_id(),
                container.image
            );
            if let Err(e) = self.engine.kill(&handle) {
                self.cleanup_problem(&handle.id, &e)?;
                continue;
            }
            if self.ctx.cancel.sleep(self.kill_grace) {
                break;
            }
        }
        Ok(())
    }

    fn cleanup_problem(&self, id: &str, err: &EngineError) -> Result<(), LaunchError> {
        let policy = self.ctx.config.cleanup_policy;
        match policy {
            CleanupPolicy::Continue => {
                warn!(
                    "Cleanup warning: container {id}: {err} (cleanup_policy: {})",
                    policy.as_str()
                );
                Ok(())
            }
            CleanupPolicy::Abort => Err(LaunchError::CleanupFailed {
                id: id.to_string(),
                message: err.to_string(),
            }),
        }
    }

    /// Log the container's output until cancelled or the output closes.
    fn relay(&self, handle: &ContainerHandle) {
        let cancel = &self.ctx.cancel;
        let stream = match self.engine.attach(handle, cancel.clone()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Cannot follow container output: {e}");
                while !cancel.sleep(Duration::from_secs(1)) {}
                return;
            }
        };

        for raw in stream {
            for line in split_output_line(&raw) {
                info!("{line}");
            }
        }

        if cancel.is_cancelled() {
            info!("Shutting down");
        } else {
            info!("Container output closed");
        }
    }
}
