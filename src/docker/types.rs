use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

const WAIT_SLICE: Duration = Duration::from_millis(100);

/// Cooperative cancellation token backed by an `AtomicBool`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sleep for up to `timeout`, waking early on cancellation.
    /// Returns `true` if the token was cancelled.
    ///
    /// A `timeout` too large to represent as a deadline waits for cancellation only.
    pub fn sleep(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if self.is_cancelled() {
                return true;
            }
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    WAIT_SLICE.min(deadline - now)
                }
                None => WAIT_SLICE,
            };
            std::thread::sleep(slice);
        }
    }
}

/// Errors reported by a container engine call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0}")]
    Unavailable(String),

    #[error("no such container: {0}")]
    NotFound(String),

    #[error("`{op}` failed: {message}")]
    Failed { op: &'static str, message: String },
}

/// Reference to a container started by this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: String,
}

impl ContainerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The 12-character prefix docker shows in `ps`.
    pub fn short_id(&self) -> &str {
        self.id.get(..12).unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    Stopped,
    Removed,
}

impl ContainerStatus {
    /// Map a docker `State` string onto the three states the launcher cares about.
    pub fn from_state(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "running" | "restarting" => ContainerStatus::Running,
            "removing" | "dead" => ContainerStatus::Removed,
            _ => ContainerStatus::Stopped,
        }
    }
}

/// One row of the engine's container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub image: String,
    pub names: Vec<String>,
    pub status: ContainerStatus,
}

/// Publish one container port on a host interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_ip: String,
    pub host_port: u16,
    pub container_port: u16,
}

impl PortMapping {
    /// Render as a `-p` value, e.g. `127.0.0.1:80:8080/tcp`.
    pub fn publish_spec(&self) -> String {
        format!(
            "{}:{}:{}/tcp",
            bracket_ipv6(&self.host_ip),
            self.host_port,
            self.container_port
        )
    }
}

/// IPv6 literals need brackets wherever a port follows them.
pub fn bracket_ipv6(ip: &str) -> String {
    if ip.contains(':') && !ip.starts_with('[') {
        format!("[{ip}]")
    } else {
        ip.to_string()
    }
}

/// Everything needed to start the server container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub image: String,
    pub host_dir: PathBuf,
    pub mount_point: String,
    pub port: PortMapping,
    pub command: Vec<String>,
    pub auto_remove: bool,
    pub detach: bool,
}

impl LaunchConfig {
    /// Arguments for `docker run`, not including the program name.
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        if self.auto_remove {
            args.push("--rm".into());
        }
        if self.detach {
            args.push("--detach".into());
        }
        args.extend([
            "--volume".into(),
            format!("{}:{}:rw", self.host_dir.display(), self.mount_point),
            "--publish".into(),
            self.port.publish_spec(),
            self.image.clone(),
        ]);
        args.extend(self.command.iter().cloned());
        args
    }
}
