//! The four arithmetic operations and their enum form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, ErrorInfo};
use crate::number::Number;

/// Returns `x + y`.
///
/// Integer overflow follows operator semantics; [`Operation::apply`] is the
/// checked entry point.
pub fn add<T: Number>(x: T, y: T) -> T {
    x + y
}

/// Returns `x - y`.
pub fn subtract<T: Number>(x: T, y: T) -> T {
    x - y
}

/// Returns `x * y`.
pub fn multiply<T: Number>(x: T, y: T) -> T {
    x * y
}

/// Returns `x / y`, or [`CalcError::InvalidArgument`] when `y` is zero.
///
/// For floats both `0.0` and `-0.0` are rejected. A NaN divisor is not zero
/// and yields NaN. An integer quotient that does not fit the type
/// (`i64::MIN / -1`) is reported as an overflow.
pub fn divide<T: Number>(x: T, y: T) -> Result<T, CalcError> {
    if y.is_zero() {
        debug!(dividend = %x, "rejected division by zero");
        return Err(CalcError::divide_by_zero(x));
    }
    x.checked_div(y).ok_or_else(|| CalcError::overflow(Operation::Divide.name(), x, y))
}

/// Arithmetic operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Addition.
    Add,
    /// Subtraction.
    Subtract,
    /// Multiplication.
    Multiply,
    /// Division; fails on a zero divisor.
    Divide,
}

impl Operation {
    /// Every operation in declaration order.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Applies the operation to the operand pair.
    ///
    /// Integer results that do not fit the operand type fail with
    /// [`CalcError::InvalidArgument`] instead of wrapping or panicking.
    pub fn apply<T: Number>(self, x: T, y: T) -> Result<T, CalcError> {
        let checked = match self {
            Operation::Add => x.checked_add(y),
            Operation::Subtract => x.checked_sub(y),
            Operation::Multiply => x.checked_mul(y),
            Operation::Divide => return divide(x, y),
        };
        checked.ok_or_else(|| {
            debug!(%x, op = self.name(), %y, "rejected overflowing operation");
            CalcError::overflow(self.name(), x, y)
        })
    }

    /// Lowercase name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Infix symbol of the operation.
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
            Operation::Divide => '/',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Operation::ALL
            .into_iter()
            .find(|op| {
                trimmed.eq_ignore_ascii_case(op.name()) || trimmed == op.symbol().to_string()
            })
            .ok_or_else(|| {
                CalcError::InvalidArgument(
                    ErrorInfo::new("calc_core.unknown_operation", "unknown operation")
                        .with_context("operation", trimmed)
                        .with_hint("expected one of add, subtract, multiply, divide or + - * /"),
                )
            })
    }
}
