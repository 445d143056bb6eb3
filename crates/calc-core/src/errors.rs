//! Structured error types shared across calc crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message carried by every divide-by-zero failure.
pub const DIVIDE_BY_ZERO_MESSAGE: &str = "cannot divide by zero";

/// Stable code carried by every divide-by-zero failure.
pub const DIVIDE_BY_ZERO_CODE: &str = "calc_core.divide_by_zero";

/// Stable code carried by integer results that do not fit the operand type.
pub const OVERFLOW_CODE: &str = "calc_core.overflow";

/// Structured payload attached to every [`CalcError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (operands, paths, step names).
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

/// Canonical error type for the calc workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CalcError {
    /// An operand outside the domain of the requested operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(ErrorInfo),
    /// Pipeline declaration errors.
    #[error("pipeline error: {0}")]
    Pipeline(ErrorInfo),
    /// Configuration loading errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
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

impl CalcError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            CalcError::InvalidArgument(info)
            | CalcError::Pipeline(info)
            | CalcError::Config(info)
            | CalcError::Serde(info) => info,
        }
    }

    /// Builds the error returned when a division has a zero divisor.
    pub fn divide_by_zero(dividend: impl ToString) -> Self {
        CalcError::InvalidArgument(
            ErrorInfo::new(DIVIDE_BY_ZERO_CODE, DIVIDE_BY_ZERO_MESSAGE)
                .with_context("dividend", dividend.to_string()),
        )
    }

    /// Builds the error returned when an integer result overflows its type.
    pub fn overflow(operation: &str, x: impl ToString, y: impl ToString) -> Self {
        CalcError::InvalidArgument(
            ErrorInfo::new(OVERFLOW_CODE, "arithmetic overflow")
                .with_context("operation", operation)
                .with_context("x", x.to_string())
                .with_context("y", y.to_string()),
        )
    }

    /// Returns true when the error is an integer overflow.
    pub fn is_overflow(&self) -> bool {
        matches!(self, CalcError::InvalidArgument(info) if info.code == OVERFLOW_CODE)
    }

    /// Returns true when the error is the divide-by-zero invalid argument.
    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self, CalcError::InvalidArgument(info) if info.code == DIVIDE_BY_ZERO_CODE)
    }
}
