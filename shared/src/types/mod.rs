//! Common types shared between the API boundary and the core.

pub mod response;

pub use response::{ErrorResponse, MessageResponse};
