#![deny(missing_docs)]
#![doc = "Arithmetic operations and the shared error type for the calc workspace."]

pub mod errors;
mod number;
pub mod ops;

pub use errors::{
    CalcError, ErrorInfo, DIVIDE_BY_ZERO_CODE, DIVIDE_BY_ZERO_MESSAGE, OVERFLOW_CODE,
};
pub use number::Number;
pub use ops::{add, divide, multiply, subtract, Operation};
