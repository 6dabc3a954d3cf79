//! env-guardian - keep `process.env` usage and `.env` files in sync
//!
//! env-guardian is a CLI tool and library that finds every `process.env` key a
//! JavaScript or TypeScript project reads, compares them with the keys defined in
//! its env file, and can append missing keys to a committed template such as
//! `.env.example`.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Usage scanner, file discovery, env file reader, audit and template sync
//! - `issues`: Issue type definitions and the reporting trait

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
