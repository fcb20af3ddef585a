//! Domain logic - pure version rules independent of files and processes

pub mod bump;
pub mod tag;
pub mod version;

pub use bump::{BumpType, IncrementKind};
pub use tag::TagPattern;
pub use version::{Identifier, Version};
