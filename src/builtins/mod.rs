//! Built-in procedures, organized into 4 categories.
//!
//! - **[arithmetic]**: `+ - * / modulo`
//! - **[comparison]**: `= < > <= >=`
//! - **[lists]**: `cons car cdr null? list append`
//! - **[equality]**: `equal?`

use crate::env::Environment;
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod equality;
pub mod lists;

pub use arithmetic::register as register_arithmetic;
pub use comparison::register as register_comparison;
pub use equality::register as register_equality;
pub use lists::register as register_lists;

/// Registers every primitive procedure in `env`.
pub fn register_builtins(env: &Rc<Environment>) {
    register_arithmetic(env);
    register_comparison(env);
    register_lists(env);
    register_equality(env);
}
