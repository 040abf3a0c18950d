pub mod chat;
pub mod health;

pub use chat::{chat_routes, ChatState};
pub use health::health_routes;
