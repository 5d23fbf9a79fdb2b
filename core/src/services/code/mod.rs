//! Verification code engine module
//!
//! This module provides one send/verify cycle against one storage and one sender:
//! - Send eligibility (receiver support, quota window, cooldown)
//! - Code issuance that never consumes quota when delivery fails
//! - Verification with a sticky wrong-attempt limit and expiry

mod engine;
mod generator;
mod none_sender;
mod traits;


pub use engine::CodeEngine;
pub use generator::{generate_numeric_code, DEFAULT_CODE_LENGTH};
pub use none_sender::NoneSender;
pub use traits::{CodeSender, CodeStorage};
