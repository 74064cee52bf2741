//! Application layer
//!
//! Use cases behind the dashboard's form actions. Each one validates input,
//! calls into the domain and shapes the outcome the HTTP layer renders.

pub mod action_result;
pub mod auth;
pub mod invoice;

pub use action_result::{ActionOutcome, ActionResult};
