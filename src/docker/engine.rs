use super::stream::LogStream;
use super::types::{CancelToken, ContainerHandle, ContainerSummary, EngineError, LaunchConfig};

/// The container-engine operations the launcher consumes.
///
/// All calls block until the engine answers.
pub trait Engine {
    /// Verify that the engine is reachable.
    fn ping(&self) -> Result<(), EngineError>;

    /// Every container the engine knows about, running or not.
    fn list_containers(&self) -> Result<Vec<ContainerSummary>, EngineError>;

    /// Kill a container. Succeeds if it is already stopped or removed.
    fn kill(&self, handle: &ContainerHandle) -> Result<(), EngineError>;

    /// Pull `image`, blocking until the pull completes.
    fn pull(&self, image: &str) -> Result<(), EngineError>;

    /// Start a container and return its handle.
    fn run(&self, launch: &LaunchConfig) -> Result<ContainerHandle, EngineError>;

    /// Full log text of the container so far.
    fn logs(&self, handle: &ContainerHandle) -> Result<String, EngineError>;

    /// Attach to the container's live output.
    fn attach(&self, handle: &ContainerHandle, cancel: CancelToken)
    -> Result<LogStream, EngineError>;
}
