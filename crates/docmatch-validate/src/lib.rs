#![deny(unsafe_code)]

//! Value, column and row validation for document schemas.

mod field;
mod rows;
pub mod value;

pub use field::{validate_field_values, validate_single_value};
pub use rows::RowValidator;
pub use value::{check_value, is_blank, similarity};
