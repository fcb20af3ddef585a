//! Project scripts
//!
//! Version files may declare scripts that releasy runs around a release:
//! - prereleasy: before the version is bumped
//! - postreleasy: after every other step succeeded

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
