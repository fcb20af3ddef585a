pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod notes;
pub mod pipeline;
pub mod providers;
pub mod release;
pub mod resolver;
pub mod runner;
pub mod ui;

pub use error::{ReleasyError, Result};
pub use release::{releasy, ReleaseOptions, ReleaseOutcome, ReleaseRequest};
