use std::sync::Arc;

use crate::services::game_flow::GameFlowService;
use crate::ws::ConnectionHub;

/// Application state shared by every HTTP worker and websocket actor.
#[derive(Clone)]
pub struct AppState {
    game_flow: Arc<GameFlowService>,
    hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(game_flow: Arc<GameFlowService>, hub: Arc<ConnectionHub>) -> Self {
        Self { game_flow, hub }
    }

    pub fn game_flow(&self) -> &Arc<GameFlowService> {
        &self.game_flow
    }

    pub fn hub(&self) -> &Arc<ConnectionHub> {
        &self.hub
    }

    /// Label of the persistence backend, for health output.
    pub fn store_name(&self) -> &'static str {
        self.game_flow.store().backend_name()
    }
}
