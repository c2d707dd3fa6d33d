//! Centralized error handling for the EPG merge pipeline
//!
//! This module unifies the error types used across the application layers
//! and provides consistent error reporting.
//!
//! # Error Categories
//!
//! - **Source Errors**: fetching, decompressing, and parsing a single EPG
//!   source. These are always contained at per-source granularity: the
//!   pipeline logs them and continues with the remaining sources.
//! - **Application Errors**: configuration loading and final output I/O.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
