mod loader;
mod types;

pub use loader::{CONFIG_FILE, load, validate};
pub use types::{CleanupPolicy, Config, DEFAULT_IMAGE, StaleScope};
