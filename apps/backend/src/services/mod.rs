//! Stateful services: the session registry, matchmaking, timers, audit
//! writes and the orchestration that ties them together.

pub mod audit;
pub mod game_flow;
pub mod gateways;
pub mod matchmaking;
pub mod registry;
pub mod timers;
pub mod validation;

pub use audit::AuditWriter;
pub use game_flow::GameFlowService;
pub use gateways::{PersistenceGateway, TransportGateway};
pub use matchmaking::{Matchmaker, WaitingEntry};
pub use registry::{SeatRef, SessionHandle, SessionRegistry};
pub use timers::ReconnectTimers;
