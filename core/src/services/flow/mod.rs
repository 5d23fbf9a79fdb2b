//! Multi-flow resolution
//!
//! Resolves the sender, quota, code lifetime and error limit of each
//! `(sender identity, business flag)` flow from [`FlowSettings`](cc_shared::config::FlowSettings)
//! and runs the code engine with them.

mod registry;
mod resolver;


pub use registry::SenderRegistry;
pub use resolver::FlowResolver;
