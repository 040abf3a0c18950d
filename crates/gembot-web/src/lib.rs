//! Web surface for Gembot: a single-page chat UI plus the JSON/SSE
//! endpoints behind it.

pub mod routes;
pub mod server;
pub mod services;

mod error;
mod events;
mod page;

pub use error::{Result, WebError};
pub use events::ChatEvent;
pub use server::{start_server, WebConfig};
pub use services::ChatService;
