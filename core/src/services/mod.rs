//! Business services containing the verification code lifecycle.

pub mod code;
pub mod flow;
pub mod formatter;

// Re-export commonly used types
pub use code::{generate_numeric_code, CodeEngine, CodeSender, CodeStorage, NoneSender};
pub use flow::{FlowResolver, SenderRegistry};
pub use formatter::{display_ttl, ContentFormatter, FnFormatter, TemplateFormatter};
