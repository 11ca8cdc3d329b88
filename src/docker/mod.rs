// Container engine access: the `Engine` seam, the docker CLI client and live output streaming.

mod cli;
mod engine;
#[cfg(test)]
pub(crate) mod fake;
mod stream;
mod types;

pub use cli::DockerCli;
pub use engine::Engine;
pub use stream::{LogStream, split_output_line};
pub use types::{
    CancelToken, ContainerHandle, ContainerStatus, ContainerSummary, EngineError, LaunchConfig,
    PortMapping, bracket_ipv6,
};
