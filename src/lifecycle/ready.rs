use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::Config;
use crate::docker::{CancelToken, ContainerHandle, Engine, EngineError};

/// How to decide that the server inside the container is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessProbe {
    /// Substring of the container log that means "ready".
    pub marker: String,
    pub poll_interval: Duration,
    pub max_wait: Duration,
    /// Extra pause after the marker shows up, before reporting ready.
    pub settle: Duration,
}

impl ReadinessProbe {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            marker: cfg.ready_marker.clone(),
            poll_interval: cfg.poll_interval(),
            max_wait: cfg.max_wait(),
            settle: cfg.settle(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
    Cancelled,
    /// The container disappeared (it exited and was auto-removed).
    Vanished,
}

/// Poll the container log until the marker appears or `max_wait` elapses.
pub fn wait_until_ready<E: Engine + ?Sized>(
    engine: &E,
    handle: &ContainerHandle,
    probe: &ReadinessProbe,
    cancel: &CancelToken,
) -> Readiness {
    let start = Instant::now();
    let mut polls = 0usize;

    while start.elapsed() < probe.max_wait {
        if cancel.is_cancelled() {
            return Readiness::Cancelled;
        }

        polls += 1;
        match engine.logs(handle) {
            Ok(text) if text.contains(&probe.marker) => {
                debug!("readiness marker found after {polls} poll(s)");
                if cancel.sleep(probe.settle) {
                    return Readiness::Cancelled;
                }
                info!("Server is ready");
                return Readiness::Ready;
            }
            Ok(_) => {}
            Err(EngineError::NotFound(_)) => return Readiness::Vanished,
            Err(e) => debug!("log fetch failed, retrying: {e}"),
        }

        if cancel.sleep(probe.poll_interval) {
            return Readiness::Cancelled;
        }
    }

    debug!("readiness marker not seen after {polls} poll(s)");
    Readiness::TimedOut
}
