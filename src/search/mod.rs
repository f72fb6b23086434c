//! Search orchestration module
//!
//! Cancellation tokens, per-query sessions and the controller that drives
//! registered providers through a search.

mod cancellable;
mod controller;
mod session;

pub use cancellable::{Cancellable, HandlerId};
pub use controller::{ProviderRegistry, ProviderResults, SearchController, MAX_RESULTS};
pub use session::{SearchSession, SessionState};
