//! Folio Core Library
//!
//! This crate provides the foundational utilities for the Folio backend:
//! - Error handling (`AppError`, `AppResult`, `ErrorKind`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, ConfigOverrides, Secret};
pub use error::{AppError, AppResult, ErrorKind};
