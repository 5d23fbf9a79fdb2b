//! # CheckCode Core
//!
//! Core domain layer for CheckCode.
//! This crate contains the verification code lifecycle engine, the multi-flow
//! resolver, the storage and sender contracts every backend implements, and the
//! error types shared by the workspace.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
