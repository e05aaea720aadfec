//! Shared utilities, configuration, and error handling for the timesheet service
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration loaded from the environment
//! - Error types and their HTTP mapping
//! - Repository error conversion
//! - Request extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
