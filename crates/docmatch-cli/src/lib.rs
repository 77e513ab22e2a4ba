//! Library side of the docmatch command-line driver.

#![deny(unsafe_code)]

pub mod input;
pub mod logging;
