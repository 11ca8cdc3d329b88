use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE: &str = "meren/anvio:5.5";

/// Which running containers the stale-container pass stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleScope {
    /// Every running container the engine reports.
    All,
    /// Only containers started from the configured image.
    Image,
}

/// What to do when a stale container cannot be stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    Continue,
    Abort,
}

impl CleanupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupPolicy::Continue => "continue",
            CleanupPolicy::Abort => "abort",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub image: String,
    /// Database to open without showing the picker.
    pub database: Option<String>,
    /// Container client binary.
    pub engine: String,
    pub primary_suffix: String,
    pub secondary_suffix: String,
    pub mount_point: String,
    /// Server command; `{genomes}` and `{pan}` expand to in-container paths.
    pub command_template: String,
    pub ready_marker: String,
    pub container_port: u16,
    pub host_ip: String,
    pub host_port: u16,
    pub poll_interval_secs: u64,
    pub max_wait_secs: u64,
    pub settle_secs: u64,
    pub kill_grace_secs: u64,
    pub stale_containers: StaleScope,
    pub cleanup_policy: CleanupPolicy,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            database: None,
            engine: "docker".to_string(),
            primary_suffix: "-GENOMES.db".to_string(),
            secondary_suffix: "-PAN.db".to_string(),
            mount_point: "/share/".to_string(),
            command_template: "anvi-display-pan -g {genomes} -p {pan}".to_string(),
            ready_marker: "Gene clusters are initialized for all".to_string(),
            container_port: 8080,
            host_ip: "127.0.0.1".to_string(),
            host_port: 80,
            poll_interval_secs: 1,
            max_wait_secs: 600,
            settle_secs: 2,
            kill_grace_secs: 2,
            stale_containers: StaleScope::All,
            cleanup_policy: CleanupPolicy::Continue,
            open_browser: true,
        }
    }
}

impl Config {
    /// Address the server is published on.
    pub fn server_url(&self) -> String {
        format!(
            "http://{}:{}",
            crate::docker::bracket_ipv6(&self.host_ip),
            self.host_port
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn kill_grace(&self) -> Duration {
        Duration::from_secs(self.kill_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_anvio_server() {
        let cfg = Config::default();
        assert_eq!(cfg.image, "meren/anvio:5.5");
        assert_eq!(cfg.server_url(), "http://127.0.0.1:80");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert_eq!(cfg.max_wait(), Duration::from_secs(600));
        assert_eq!(cfg.stale_containers, StaleScope::All);
        assert_eq!(cfg.cleanup_policy, CleanupPolicy::Continue);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: Config =
            serde_yaml::from_str("host_port: 8088\ncleanup_policy: abort\n").unwrap();
        assert_eq!(cfg.host_port, 8088);
        assert_eq!(cfg.cleanup_policy, CleanupPolicy::Abort);
        assert_eq!(cfg.container_port, 8080);
        assert_eq!(cfg.server_url(), "http://127.0.0.1:8088");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("imgae: typo\n");
        assert!(result.is_err());
    }

    #[test]
    fn stale_scope_parses_lowercase() {
        let cfg: Config = serde_yaml::from_str("stale_containers: image\n").unwrap();
        assert_eq!(cfg.stale_containers, StaleScope::Image);
    }
}
