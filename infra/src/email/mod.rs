//! Email Module
//!
//! Delivers codes by email through an [`EmailTransport`].

pub mod email_sender;
pub mod mock_email;
pub mod transport;


pub use email_sender::EmailCodeSender;
pub use mock_email::{MockEmailTransport, SentEmail};
pub use transport::EmailTransport;
