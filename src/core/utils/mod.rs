//! Utility functions shared by the scanning pipeline.
//!
//! - `glob_matcher`: glob pattern classification and brace expansion

pub mod glob_matcher;

pub use glob_matcher::*;
