use std::path::Path;

use anyhow::{Context, Result, bail};

use super::types::Config;

pub const CONFIG_FILE: &str = ".anvio-launch.yaml";

/// Load `.anvio-launch.yaml` from `dir`, falling back to defaults when absent.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config in {}", path.display()))?;
    validate(&config).with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}

/// Reject values the launcher cannot work with.
pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.image.trim().is_empty() {
        bail!("image cannot be blank");
    }
    if cfg.engine.trim().is_empty() {
        bail!("engine cannot be blank");
    }
    if cfg.primary_suffix.is_empty() || cfg.secondary_suffix.is_empty() {
        bail!("database suffixes cannot be empty");
    }
    if cfg.primary_suffix == cfg.secondary_suffix {
        bail!("primary_suffix and secondary_suffix must differ");
    }
    if !cfg.mount_point.starts_with('/') {
        bail!("mount_point must be an absolute container path");
    }
    for placeholder in ["{genomes}", "{pan}"] {
        if !cfg.command_template.contains(placeholder) {
            bail!("command_template must contain {placeholder}");
        }
    }
    shell_words::split(&cfg.command_template).context("command_template is not a valid command")?;
    if cfg.ready_marker.is_empty() {
        bail!("ready_marker cannot be empty");
    }
    if cfg.poll_interval_secs == 0 {
        bail!("poll_interval_secs must be a positive integer");
    }
    if cfg.max_wait_secs == 0 {
        bail!("max_wait_secs must be a positive integer");
    }
    if cfg.host_ip.parse::<std::net::IpAddr>().is_err() {
        bail!("host_ip must be an IP address, got {:?}", cfg.host_ip);
    }
    Ok(())
}
