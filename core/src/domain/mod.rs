//! Domain layer containing value objects and result types.

pub mod clock;
pub mod flow_key;
pub mod outcome;
pub mod period_limit;

// Re-export commonly used domain types
pub use clock::{Clock, ManualClock, SystemClock};
pub use flow_key::{FlowKey, FLOW_KEY_DELIMITER};
pub use outcome::{EffectiveCode, SendOutcome, VerifyOutcome};
pub use period_limit::PeriodLimit;
