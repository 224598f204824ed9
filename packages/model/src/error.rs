//! Error types for the document model

use std::fmt;
use thiserror::Error;

/// One broken rule found while validating a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Location inside the document, e.g. `blocks[2].elements[0].props.gap`
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The document violates a structural or type constraint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        summarize(&self.issues)
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
    let noun = if issues.len() == 1 { "issue" } else { "issues" };
    format!("{} validation {}: {}", issues.len(), noun, rendered.join("; "))
}

/// Broken internal invariant.
///
/// These cannot be fixed by retrying or by user action. They indicate a bug
/// in a caller, e.g. an injected id generator that repeats itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Id is reserved for an anchor block: {0}")]
    ReservedId(String),

    #[error("Node id is empty")]
    EmptyId,

    #[error("Anchor block `{0}` cannot enter the dynamic segment")]
    MisplacedAnchor(String),
}

/// A serialized block sequence that does not start with hero and end with menu
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BlockListShapeError(pub(crate) String);

/// Failure to materialize a block from the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown block kind: {0}")]
    UnknownKind(String),

    #[error("Anchor kind `{0}` cannot be inserted as a dynamic block")]
    AnchorKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_summary_lists_every_issue() {
        let err = ValidationError::new(vec![
            ValidationIssue::new("blocks[1].kind", "unknown block kind `poll`"),
            ValidationIssue::new("blocks[2].id", "duplicate id `a-1`"),
        ]);

        assert_eq!(
            err.to_string(),
            "2 validation issues: blocks[1].kind: unknown block kind `poll`; blocks[2].id: duplicate id `a-1`"
        );
    }

    #[test]
    fn test_single_issue_summary() {
        let err = ValidationError::new(vec![ValidationIssue::new("title", "missing")]);
        assert_eq!(err.summary(), "1 validation issue: title: missing");
    }
}
