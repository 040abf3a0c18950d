//! Shared types and errors for Gembot.

pub mod errors;
pub mod id;

pub use errors::SecretError;
pub use id::{new_id, SessionId};
