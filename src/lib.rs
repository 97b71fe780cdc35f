//! Course catalog advisor.
//!
//! Courses are read from a delimited text file into an unbalanced binary
//! search tree keyed by course identifier. After loading, every declared
//! prerequisite is checked against the full set of identifiers and dangling
//! references are removed. The catalog then answers point lookups and
//! sorted listings, interactively or through one-shot commands.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
