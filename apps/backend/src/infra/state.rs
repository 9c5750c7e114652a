use std::sync::Arc;

use crate::adapters::MemoryStore;
use crate::ai::AiPlayer;
use crate::config::db::StoreConfig;
use crate::config::GameConfig;
use crate::error::AppError;
use crate::infra::db::connect_store;
use crate::services::game_flow::GameFlowService;
use crate::services::gateways::{PersistenceGateway, TransportGateway};
use crate::state::app_state::AppState;
use crate::ws::ConnectionHub;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    game_config: GameConfig,
    store_config: Option<StoreConfig>,
    store: Option<Arc<dyn PersistenceGateway>>,
    bot: Option<Arc<dyn AiPlayer>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            game_config: GameConfig::default(),
            store_config: None,
            store: None,
            bot: None,
        }
    }

    pub fn with_game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    /// Connect (and migrate) the store described by `config` at build time.
    pub fn with_store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = Some(config);
        self
    }

    /// Use an already constructed gateway; wins over `with_store_config`.
    pub fn with_store(mut self, store: Arc<dyn PersistenceGateway>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the bot built from the configured difficulty.
    pub fn with_bot(mut self, bot: Arc<dyn AiPlayer>) -> Self {
        self.bot = Some(bot);
        self
    }

    /// Must run inside a tokio runtime.
    pub async fn build(self) -> Result<AppState, AppError> {
        let store: Arc<dyn PersistenceGateway> = match (self.store, self.store_config) {
            (Some(store), _) => store,
            (None, Some(config)) => connect_store(&config).await?,
            (None, None) => Arc::new(MemoryStore::new()),
        };

        let hub = Arc::new(ConnectionHub::new());
        let transport: Arc<dyn TransportGateway> = hub.clone();
        let game_flow = match self.bot {
            Some(bot) => GameFlowService::with_bot(self.game_config, store, transport, bot),
            None => GameFlowService::new(self.game_config, store, transport),
        };
        Ok(AppState::new(game_flow, hub))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
