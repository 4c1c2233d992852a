//! Session persistence contract: one transaction-scoped unit of work per
//! inbound request.

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub use r#trait::{SessionStore, SessionTransaction};

#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockFailure, MockSessionRepository};

#[cfg(test)]
mod tests;
