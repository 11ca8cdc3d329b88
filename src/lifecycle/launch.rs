use crate::config::Config;
use crate::docker::{LaunchConfig, PortMapping};
use crate::error::LaunchError;
use crate::resolve::DatabasePair;

/// Build the container launch for `pair`.
///
/// The pair's directory is bound at the mount point and the command
/// template's `{genomes}` / `{pan}` placeholders expand to the files'
/// in-container paths. Splitting happens before substitution so file names
/// containing spaces stay single arguments.
pub fn launch_config(pair: &DatabasePair, cfg: &Config) -> Result<LaunchConfig, LaunchError> {
    let host_dir = std::fs::canonicalize(pair.dir()).map_err(|e| {
        LaunchError::LaunchFailed(format!("cannot resolve {}: {e}", pair.dir().display()))
    })?;

    let genomes = container_path(&cfg.mount_point, &pair.primary_name());
    let pan = container_path(&cfg.mount_point, &pair.secondary_name());

    let template = shell_words::split(&cfg.command_template)
        .map_err(|e| LaunchError::LaunchFailed(format!("invalid command template: {e}")))?;
    let command = template
        .into_iter()
        .map(|arg| arg.replace("{genomes}", &genomes).replace("{pan}", &pan))
        .collect();

    Ok(LaunchConfig {
        image: cfg.image.clone(),
        host_dir,
        mount_point: cfg.mount_point.clone(),
        port: PortMapping {
            host_ip: cfg.host_ip.clone(),
            host_port: cfg.host_port,
            container_port: cfg.container_port,
        },
        command,
        auto_remove: true,
        detach: true,
    })
}

fn container_path(mount_point: &str, file_name: &str) -> String {
    format!("{}/{file_name}", mount_point.trim_end_matches('/'))
}
