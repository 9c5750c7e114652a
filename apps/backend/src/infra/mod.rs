//! Infrastructure layer - store connection and application state assembly.

pub mod db;
pub mod state;
