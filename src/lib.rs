//! anvio-launch: serve a pair of anvi'o pangenome databases from a container
//! and open the interactive display in the browser.
//!
//! The pieces, in the order a launch uses them:
//!
//! - [`resolve`] turns the picked file into a [`resolve::DatabasePair`].
//! - [`docker`] talks to the container engine through the [`docker::Engine`] trait.
//! - [`lifecycle`] runs cleanup, pull, launch, readiness polling, relay, and teardown.
//! - [`ui`] draws the file picker and the error dialog.

pub mod browser;
pub mod config;
pub mod context;
pub mod docker;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod resolve;
pub mod ui;

pub use context::Context;
pub use error::{ErrorKind, LaunchError, Result};
pub use lifecycle::{Controller, Outcome};
