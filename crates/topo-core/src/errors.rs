//! Structured error types shared across topograph crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`TopoError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, dimensions, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the topograph engine.
///
/// Only unrecoverable conditions travel through this type. Searches that
/// merely fail to converge report typed outcomes instead and never abort a
/// batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum TopoError {
    /// Potential contract violations (dimension mismatch, degenerate bounds).
    #[error("potential error: {0}")]
    Potential(ErrorInfo),
    /// Transition network structural errors.
    #[error("network error: {0}")]
    Network(ErrorInfo),
    /// Search driver errors (invalid endpoints, empty inputs).
    #[error("search error: {0}")]
    Search(ErrorInfo),
    /// Configuration and plan errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Randomness and seeding errors.
    #[error("rng error: {0}")]
    Rng(ErrorInfo),
    /// Serialization, persistence and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl TopoError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            TopoError::Potential(info)
            | TopoError::Network(info)
            | TopoError::Search(info)
            | TopoError::Config(info)
            | TopoError::Rng(info)
            | TopoError::Serde(info) => info,
        }
    }

    /// Convenience constructor for a dimension mismatch between a point and a domain.
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        TopoError::Potential(
            ErrorInfo::new("dimension-mismatch", "point dimension does not match the domain")
                .with_context("expected", expected.to_string())
                .with_context("found", found.to_string()),
        )
    }
}
