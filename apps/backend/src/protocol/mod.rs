//! JSON wire protocol shared by the websocket transport and the game core.

pub mod messages;

pub use messages::{ClientMsg, ServerMsg};
