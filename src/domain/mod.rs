//! Domain layer: course records and the ordered catalog tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod course;
pub mod error;

pub use catalog::{CatalogTree, Iter, SHAPE_DEPTH_LIMIT};
pub use course::{CourseRecord, DroppedPrerequisite, MIN_FIELDS};
pub use error::DomainError;
