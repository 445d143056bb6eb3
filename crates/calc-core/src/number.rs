use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Sub};

/// Primitive numeric types accepted by the arithmetic operations.
///
/// Implemented for `i32`, `i64`, `f32` and `f64`. Integer division truncates
/// toward zero. The `checked_*` methods return `None` when an integer result
/// does not fit the type; for floats they always return `Some`.
pub trait Number:
    Copy
    + PartialEq
    + Debug
    + Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity; a divisor equal to this is rejected.
    const ZERO: Self;

    /// Returns true when the value compares equal to [`Number::ZERO`].
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// `self + rhs`, or `None` on overflow.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// `self - rhs`, or `None` on overflow.
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// `self * rhs`, or `None` on overflow.
    fn checked_mul(self, rhs: Self) -> Option<Self>;

    /// `self / rhs`, or `None` on overflow or a zero integer divisor.
    fn checked_div(self, rhs: Self) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Number for $ty {
                const ZERO: Self = 0;

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }

                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_sub(self, rhs)
                }

                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_mul(self, rhs)
                }

                fn checked_div(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_div(self, rhs)
                }
            }
        )*
    };
}

macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Number for $ty {
                const ZERO: Self = 0.0;

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }

                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    Some(self - rhs)
                }

                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    Some(self * rhs)
                }

                fn checked_div(self, rhs: Self) -> Option<Self> {
                    Some(self / rhs)
                }
            }
        )*
    };
}

impl_integer!(i32, i64);
impl_float!(f32, f64);
