#![allow(dead_code)]

pub mod websocket_client;

pub use fakes::{FirstLegalBot, FlakyStore, RecordingTransport};
pub use harness::{fast_config, Harness};
pub use wait::wait_until;
