//! Catalog service
//!
//! Loads delimited course data into the catalog tree exactly once, runs the
//! prerequisite validation pass, and answers listing and lookup queries.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CatalogTree, CourseRecord, DomainError, DroppedPrerequisite, Iter};
use crate::infrastructure::traits::FileSystem;

/// A source line that could not become a course record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source
    pub line_number: usize,
    /// Why the line was rejected
    pub error: DomainError,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error)
    }
}

/// Outcome of one load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Records inserted into the catalog
    pub loaded: usize,
    /// Malformed lines, in source order
    pub skipped: Vec<SkippedLine>,
    /// Prerequisite references removed by validation
    pub dropped: Vec<DroppedPrerequisite>,
    /// Wall time spent reading, inserting and validating
    pub elapsed: Duration,
}

impl LoadReport {
    /// True when every line parsed and every prerequisite resolved.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.dropped.is_empty()
    }
}

/// Owns the catalog for the lifetime of the process.
///
/// One writer phase (load + validate) precedes any query. The load-once
/// guard is the catalog's emptiness: a load that produced no records can be
/// retried.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    delimiter: char,
    catalog: CatalogTree,
}

impl CatalogService {
    /// Create a new catalog service with an empty catalog.
    pub fn new(fs: Arc<dyn FileSystem>, delimiter: char) -> Self {
        Self {
            fs,
            delimiter,
            catalog: CatalogTree::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.catalog.is_empty()
    }

    /// Read-only access to the underlying tree.
    pub fn catalog(&self) -> &CatalogTree {
        &self.catalog
    }

    /// Load courses from a delimited file and validate prerequisites.
    ///
    /// - Refuses when the catalog already holds data.
    /// - An unreadable source aborts the load and leaves the catalog as it was.
    /// - Blank lines are ignored; malformed lines are reported and skipped.
    /// - Lines are decoded one at a time, so invalid UTF-8 only skips its line.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self, path: &Path) -> ApplicationResult<LoadReport> {
        if self.is_loaded() {
            return Err(ApplicationError::AlreadyLoaded(path.to_path_buf()));
        }

        let started = Instant::now();
        let content = self.fs.read(path).or_unreadable(path)?;
        debug!("load: read {} bytes from {}", content.len(), path.display());

        let mut report = LoadReport::default();
        for (index, raw) in content.split(|byte| *byte == b'\n').enumerate() {
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match CourseRecord::parse_bytes(raw, self.delimiter) {
                Ok(record) => {
                    self.catalog.insert(record);
                    report.loaded += 1;
                }
                Err(error) => {
                    let skipped = SkippedLine {
                        line_number: index + 1,
                        error,
                    };
                    debug!("skipping {}", skipped);
                    report.skipped.push(skipped);
                }
            }
        }

        report.dropped = self.catalog.validate_prerequisites();
        for dropped in &report.dropped {
            debug!("unknown prerequisite removed: {}", dropped);
        }
        report.elapsed = started.elapsed();

        info!(
            "loaded {} courses ({} skipped, {} prerequisites dropped) in {:?}",
            report.loaded,
            report.skipped.len(),
            report.dropped.len(),
            report.elapsed
        );
        Ok(report)
    }

    /// All courses in ascending identifier order.
    pub fn courses(&self) -> ApplicationResult<Iter<'_>> {
        if !self.is_loaded() {
            return Err(ApplicationError::EmptyCatalog);
        }
        Ok(self.catalog.iter())
    }

    /// Look up one course by exact identifier.
    ///
    /// `Ok(None)` is a lookup miss; only an empty catalog is an error.
    pub fn find(&self, identifier: &str) -> ApplicationResult<Option<&CourseRecord>> {
        if !self.is_loaded() {
            return Err(ApplicationError::EmptyCatalog);
        }
        debug!("find: {}", identifier);
        Ok(self.catalog.search(identifier))
    }
}
