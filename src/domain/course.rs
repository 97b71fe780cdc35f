//! Domain entities: course records and prerequisite bookkeeping

use std::fmt;

use crate::domain::error::DomainError;

/// Minimum number of fields on a catalog line: identifier and name.
pub const MIN_FIELDS: usize = 2;

/// One course of the catalog.
///
/// The identifier is the ordering key and is compared as raw text; it is
/// never normalized. Prerequisites keep the order they were declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    /// Course number, e.g. "CSCI200"
    pub identifier: String,
    /// Display name, e.g. "Data Structures"
    pub name: String,
    /// Identifiers of courses that must be taken first
    pub prerequisites: Vec<String>,
}

impl CourseRecord {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        prerequisites: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            prerequisites: prerequisites.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse one delimited catalog line.
    ///
    /// Format: `identifier<d>name[<d>prerequisite]...`
    ///
    /// - A trailing carriage return (CRLF sources) is stripped.
    /// - Fewer than two fields, an empty identifier or an empty name make the
    ///   line malformed.
    /// - Empty prerequisite fields (`CSCI100,Intro,,`) are ignored.
    pub fn parse_line(line: &str, delimiter: char) -> Result<Self, DomainError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut tokens = line.split(delimiter);

        let (identifier, name) = match (tokens.next(), tokens.next()) {
            (Some(identifier), Some(name)) => (identifier, name),
            _ => {
                return Err(DomainError::malformed(
                    line,
                    format!("expected at least {MIN_FIELDS} fields"),
                ))
            }
        };
        if identifier.is_empty() {
            return Err(DomainError::malformed(line, "empty course identifier"));
        }
        if name.is_empty() {
            return Err(DomainError::malformed(line, "empty course name"));
        }

        Ok(Self::new(
            identifier,
            name,
            tokens.filter(|token| !token.is_empty()),
        ))
    }

    /// Decode one raw catalog line and parse it.
    ///
    /// Each line is decoded on its own, so bad bytes only cost their line.
    pub fn parse_bytes(raw: &[u8], delimiter: char) -> Result<Self, DomainError> {
        let line = std::str::from_utf8(raw).map_err(|e| DomainError::InvalidEncoding {
            line: String::from_utf8_lossy(raw).into_owned(),
            valid_up_to: e.valid_up_to(),
        })?;
        Self::parse_line(line, delimiter)
    }

    pub fn has_prerequisites(&self) -> bool {
        !self.prerequisites.is_empty()
    }
}

impl fmt::Display for CourseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identifier, self.name)
    }
}

/// A prerequisite reference removed by validation because no course in the
/// catalog carries that identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedPrerequisite {
    /// Course that declared the reference
    pub course: String,
    /// The identifier that did not resolve
    pub prerequisite: String,
}

impl fmt::Display for DroppedPrerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.course, self.prerequisite)
    }
}
