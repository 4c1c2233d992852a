//! Repository traits and test doubles for session persistence.

pub mod session;

pub use session::{SessionStore, SessionTransaction};

#[cfg(any(test, feature = "mock"))]
pub use session::{MockFailure, MockSessionRepository};
