//! Field-level validation errors.
//!
//! Mirrors the Kubernetes API conventions: every violation names the field
//! path, echoes the rejected value and carries a human readable detail.
//! Violations are collected into an [`ErrorList`] and turned into a single
//! [`AggregateInvalid`] once every check has run.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Dotted path to a field, e.g. `spec.template.spec.memoryGiB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create a path from its first segment.
    pub fn new(root: &str) -> Self {
        Self(vec![root.to_string()])
    }

    /// Path to a child field.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Category of a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorType {
    /// The value is present but not acceptable.
    Invalid,
    /// A required value is missing.
    Required,
}

impl fmt::Display for FieldErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorType::Invalid => write!(f, "Invalid value"),
            FieldErrorType::Required => write!(f, "Required value"),
        }
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Violation category.
    pub error_type: FieldErrorType,
    /// Path of the offending field.
    pub field: String,
    /// Rejected value, as JSON.
    pub bad_value: Value,
    /// Human readable explanation.
    pub detail: String,
}

impl FieldError {
    /// The value at `path` is not acceptable.
    pub fn invalid<T: Serialize + ?Sized>(path: &FieldPath, value: &T, detail: &str) -> Self {
        Self {
            error_type: FieldErrorType::Invalid,
            field: path.to_string(),
            bad_value: serde_json::to_value(value).unwrap_or(Value::Null),
            detail: detail.to_string(),
        }
    }

    /// The value at `path` must be set.
    pub fn required(path: &FieldPath, detail: &str) -> Self {
        Self {
            error_type: FieldErrorType::Required,
            field: path.to_string(),
            bad_value: Value::Null,
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_type {
            FieldErrorType::Invalid => write!(
                f,
                "{}: {}: {}: {}",
                self.field, self.error_type, self.bad_value, self.detail
            ),
            FieldErrorType::Required => {
                write!(f, "{}: {}: {}", self.field, self.error_type, self.detail)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Ordered accumulator of field violations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Whether no violation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Recorded violations in insertion order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Convert into an aggregate for the named resource, or `Ok` when empty.
    pub fn into_result(self, kind: &str, name: &str) -> Result<(), AggregateInvalid> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(AggregateInvalid {
            group: crate::crd::GROUP.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
            errors: self.0,
        })
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// All violations found on one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateInvalid {
    /// API group of the resource.
    pub group: String,
    /// Kind of the resource.
    pub kind: String,
    /// Name of the resource instance.
    pub name: String,
    /// Violations in the order they were found. Never empty.
    pub errors: Vec<FieldError>,
}

impl fmt::Display for AggregateInvalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, group) = (&self.kind, &self.group);
        write!(f, "{kind}.{group} {:?} is invalid: ", self.name)?;
        match self.errors.as_slice() {
            [single] => write!(f, "{single}"),
            errors => {
                let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

impl std::error::Error for AggregateInvalid {}
