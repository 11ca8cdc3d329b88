// Launch lifecycle: stale cleanup, image pull, container start, readiness, log relay and teardown.

mod controller;
mod launch;
mod ready;
mod state;
mod teardown;

pub use controller::{Controller, Outcome};
pub use launch::launch_config;
pub use ready::{Readiness, ReadinessProbe, wait_until_ready};
pub use state::LifecycleState;
pub use teardown::Teardown;
