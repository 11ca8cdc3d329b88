use log::{info, warn};

use crate::docker::{ContainerHandle, Engine};

/// Owns the launched container and kills it exactly once.
///
/// The kill happens on [`Teardown::release`] or, failing that, on drop, so
/// every exit path out of the controller (including `?` and unwinding)
/// stops the container.
pub struct Teardown<'a, E: Engine + ?Sized> {
    engine: &'a E,
    handle: Option<ContainerHandle>,
}

impl<'a, E: Engine + ?Sized> Teardown<'a, E> {
    pub fn new(engine: &'a E, handle: ContainerHandle) -> Self {
        Self {
            engine,
            handle: Some(handle),
        }
    }

    /// Kill the container if that has not happened yet.
    /// Returns `true` if this call issued the kill.
    pub fn release(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        info!("Stopping container {}", handle.short_id());
        if let Err(e) = self.engine.kill(&handle) {
            warn!("Failed to stop container {}: {e}", handle.short_id());
        }
        true
    }
}

impl<E: Engine + ?Sized> Drop for Teardown<'_, E> {
    fn drop(&mut self) {
        self.release();
    }
}
