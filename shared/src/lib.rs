//! Shared library for the blog service
//!
//! This library contains the pieces the HTTP service treats as opaque capabilities:
//! - Configuration loading from the environment
//! - Password hashing and JWT issuance/verification
//! - The common error type and its JSON envelope

pub mod auth;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use auth::{AuthService, Claims, UserContext};
pub use config::Config;
pub use error::{AppError, ErrorResponse, Result};
