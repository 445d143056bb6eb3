pub mod ci;
pub mod eval;
