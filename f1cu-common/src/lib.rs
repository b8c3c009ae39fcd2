//! Common types and utilities for f1cu
//!
//! This crate provides shared types, error definitions and logging helpers
//! used across the f1cu crates.

pub mod error;
pub mod logging;
pub mod octet_string;
pub mod types;

pub use error::Error;
pub use logging::{init_logging, init_logging_with_filter, LogLevel};
pub use octet_string::OctetString;
pub use types::{DuIndex, UeIndex};
