use std::io;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::process::{Command, Output, Stdio};

use log::debug;
use serde::Deserialize;

use super::engine::Engine;
use super::stream::LogStream;
use super::types::{
    CancelToken, ContainerHandle, ContainerStatus, ContainerSummary, EngineError, LaunchConfig,
};

/// [`Engine`] backed by the `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    /// Use `program` as the client binary (`docker`, or a compatible one such as `podman`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// A client invocation in its own process group, so a terminal Ctrl-C
    /// reaches only this process and never interrupts a pull or run half-way.
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::null());
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }

    /// Run the client to completion and return its stdout.
    fn exec(&self, op: &'static str, args: &[String]) -> Result<String, EngineError> {
        debug!("{} {}", self.program, shell_words::join(args));
        let output = self
            .command()
            .args(args)
            .output()
            .map_err(|e| self.spawn_error(e))?;
        check_output(op, output)
    }

    fn spawn_error(&self, err: io::Error) -> EngineError {
        if err.kind() == io::ErrorKind::NotFound {
            EngineError::Unavailable(format!(
                "failed to invoke `{}`: is it installed and on PATH?",
                self.program
            ))
        } else {
            EngineError::Unavailable(format!("failed to invoke `{}`: {err}", self.program))
        }
    }
}

impl Engine for DockerCli {
    fn ping(&self) -> Result<(), EngineError> {
        let args = ["version", "--format", "{{.Server.Version}}"].map(String::from);
        match self.exec("version", &args) {
            Ok(version) => {
                debug!("docker server version {}", version.trim());
                Ok(())
            }
            Err(EngineError::Failed { message, .. }) => Err(EngineError::Unavailable(format!(
                "docker daemon is not running: {message}"
            ))),
            Err(e) => Err(e),
        }
    }

    fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError> {
        let args = ["ps", "--all", "--no-trunc", "--format", "{{json .}}"].map(String::from);
        let stdout = self.exec("ps", &args)?;
        parse_container_list(&stdout)
    }

    fn kill(&self, handle: &ContainerHandle) -> Result<(), EngineError> {
        let args = ["kill".to_string(), handle.id.clone()];
        match self.exec("kill", &args) {
            Ok(_) => Ok(()),
            Err(EngineError::NotFound(_)) => Ok(()),
            Err(EngineError::Failed { message, .. }) if message.contains("is not running") => {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn pull(&self, image: &str) -> Result<(), EngineError> {
        let args = ["pull".to_string(), image.to_string()];
        self.exec("pull", &args).map(|_| ())
    }

    fn run(&self, launch: &LaunchConfig) -> Result<ContainerHandle, EngineError> {
        let stdout = self.exec("run", &launch.run_args())?;
        // Pull progress may precede the id when the image is fetched on demand.
        let id = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .ok_or_else(|| EngineError::Failed {
                op: "run",
                message: "no container id in output".into(),
            })?;
        Ok(ContainerHandle::new(id))
    }

    fn logs(&self, handle: &ContainerHandle) -> Result<String, EngineError> {
        let output = self
            .command()
            .args(["logs", &handle.id])
            .output()
            .map_err(|e| self.spawn_error(e))?;
        // The server writes its progress to stderr; search both streams.
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let mut text = check_output("logs", output)?;
        text.push_str(&stderr);
        Ok(text)
    }

    fn attach(
        &self,
        handle: &ContainerHandle,
        cancel: CancelToken,
    ) -> Result<LogStream, EngineError> {
        let mut cmd = self.command();
        cmd.args(["attach", "--no-stdin", "--sig-proxy=false", &handle.id]);
        LogStream::spawn(cmd, cancel).map_err(|e| self.spawn_error(e))
    }
}

fn check_output(op: &'static str, output: Output) -> Result<String, EngineError> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(classify_failure(op, stderr.trim()))
}

/// Turn client stderr into a typed error.
pub(crate) fn classify_failure(op: &'static str, stderr: &str) -> EngineError {
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("no such container") {
        EngineError::NotFound(stderr.to_string())
    } else if lower.contains("cannot connect to the docker daemon")
        || lower.contains("is the docker daemon running")
        || lower.contains("error during connect")
    {
        EngineError::Unavailable(stderr.to_string())
    } else {
        EngineError::Failed {
            op,
            message: stderr.to_string(),
        }
    }
}

/// A `docker ps --format '{{json .}}'` row. Only the fields we read.
#[derive(Debug, Deserialize)]
struct PsRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Image", default)]
    image: String,
    #[serde(rename = "Names", default)]
    names: String,
    #[serde(rename = "State", default)]
    state: String,
}

/// Parse the line-delimited JSON emitted by `docker ps --format '{{json .}}'`.
pub(crate) fn parse_container_list(output: &str) -> Result<Vec<ContainerSummary>, EngineError> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let row: PsRow = serde_json::from_str(line).map_err(|e| EngineError::Failed {
                op: "ps",
                message: format!("failed to parse container list: {e}"),
            })?;
            Ok(ContainerSummary {
                id: row.id,
                image: row.image,
                names: row
                    .names
                    .split(',')
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect(),
                status: ContainerStatus::from_state(&row.state),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_container_list_reads_rows() {
        let out = concat!(
            r#"{"ID":"aaa","Image":"meren/anvio:5.5","Names":"happy_turing","State":"running","Status":"Up 2 minutes"}"#,
            "\n",
            r#"{"ID":"bbb","Image":"redis","Names":"cache,alias","State":"exited","Status":"Exited (0)"}"#,
            "\n\n",
        );
        let rows = parse_container_list(out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "aaa");
        assert_eq!(rows[0].status, ContainerStatus::Running);
        assert_eq!(rows[1].names, vec!["cache", "alias"]);
        assert_eq!(rows[1].status, ContainerStatus::Stopped);
    }

    #[test]
    fn parse_container_list_empty_output() {
        assert!(parse_container_list("  \n").unwrap().is_empty());
    }

    #[test]
    fn parse_container_list_rejects_garbage() {
        let err = parse_container_list("not json").unwrap_err();
        assert!(matches!(err, EngineError::Failed { op: "ps", .. }));
    }

    #[test]
    fn classify_missing_container() {
        let err = classify_failure(
            "kill",
            "Error response from daemon: No such container: 1234abcd",
        );
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn classify_daemon_down() {
        let err = classify_failure(
            "ps",
            "Cannot connect to the Docker daemon at unix:///var/run/docker.sock. Is the docker daemon running?",
        );
        assert!(matches!(err, EngineError::Unavailable(_)));
    }

    #[test]
    fn classify_other_failure_keeps_op() {
        let err = classify_failure("pull", "manifest unknown");
        assert_eq!(
            err,
            EngineError::Failed {
                op: "pull",
                message: "manifest unknown".into()
            }
        );
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let cli = DockerCli::new("definitely-not-a-container-engine-binary");
        assert!(matches!(cli.ping(), Err(EngineError::Unavailable(_))));
    }
}
