//! Websocket transport: one actor per connection plus the shared hub.

pub mod hub;
pub mod session;

pub use hub::{ConnectionHub, Deliver};
pub use session::{upgrade, WsSession};
