//! modcheck Library
//!
//! This crate provides the core functionality for checking a list of GitHub
//! repositories against compliance rules (labels, files, branches, topics,
//! issue policy) and reporting the results as a table.

pub mod cli;
pub mod compliance;
pub mod config;
pub mod error;
pub mod providers;

pub use error::ModCheckError;
