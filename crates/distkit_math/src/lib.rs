//! `distkit_math` v1:
//! Checked addition over dynamically typed operands.
//!
//! - `add`  : `add` / `add_f64`
//! - `spec` : operand/result models and `TypeError`

pub mod add;
pub mod spec;

pub use add::{add, add_f64};
pub use spec::{EnumNumber, EnumOperand, EnumOperandPosition, TypeError};
