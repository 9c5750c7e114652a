//! Game flow orchestration: matchmaking, turns, bot moves and reconnects.
//!
//! `GameFlowService` is the handle the transport talks to. Every mutation of
//! a session happens under that session's lock, and every event and audit
//! write for the mutation is issued before the lock is released so clients
//! observe transitions in order. Timers are tokio tasks that re-check the
//! session when they fire.

mod ai_coordinator;
mod matchmaking;
mod player_actions;
mod reconnect;

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::audit::AuditWriter;
use super::gateways::{PersistenceGateway, TransportGateway};
use super::matchmaking::Matchmaker;
use super::registry::SessionRegistry;
use super::timers::ReconnectTimers;
use super::validation;
use crate::ai::{create_ai, AiPlayer};
use crate::config::GameConfig;
use crate::domain::{LeaderboardEntry, Outcome, Session, SessionStatus};
use crate::errors::domain::DomainError;
use crate::protocol::ServerMsg;

pub struct GameFlowService {
    config: GameConfig,
    registry: SessionRegistry,
    matchmaker: Matchmaker,
    timers: ReconnectTimers,
    store: Arc<dyn PersistenceGateway>,
    audit: AuditWriter,
    transport: Arc<dyn TransportGateway>,
    bot: Arc<dyn AiPlayer>,
}

impl GameFlowService {
    /// Must be called inside a tokio runtime (starts the audit writer).
    pub fn new(
        config: GameConfig,
        store: Arc<dyn PersistenceGateway>,
        transport: Arc<dyn TransportGateway>,
    ) -> Arc<Self> {
        let bot: Arc<dyn AiPlayer> = Arc::from(create_ai(config.bot_difficulty, config.bot_seed));
        Self::with_bot(config, store, transport, bot)
    }

    pub fn with_bot(
        config: GameConfig,
        store: Arc<dyn PersistenceGateway>,
        transport: Arc<dyn TransportGateway>,
        bot: Arc<dyn AiPlayer>,
    ) -> Arc<Self> {
        let audit = AuditWriter::spawn(Arc::clone(&store));
        info!(
            difficulty = %config.bot_difficulty,
            store = store.backend_name(),
            "game flow service ready"
        );
        Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
            matchmaker: Matchmaker::new(),
            timers: ReconnectTimers::new(),
            store,
            audit,
            transport,
            bot,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn PersistenceGateway> {
        &self.store
    }

    pub fn waiting_players(&self) -> usize {
        self.matchmaker.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.registry.active_count()
    }

    /// Resolves once every audit write issued so far has been applied.
    pub async fn flush_audit(&self) {
        self.audit.flush().await;
    }

    pub async fn leaderboard(&self, limit: Option<i64>) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let limit = validation::limit(limit)?;
        self.store.leaderboard(limit).await
    }

    /// Remove Finished sessions older than the configured TTL.
    pub fn sweep_finished(&self) -> usize {
        let swept = self
            .registry
            .sweep_finished(self.config.finished_session_ttl, OffsetDateTime::now_utc());
        if !swept.is_empty() {
            info!(count = swept.len(), "swept finished sessions");
        }
        swept.len()
    }

    /// Run [`Self::sweep_finished`] on the configured interval.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::downgrade(self);
        // `interval` panics on a zero period.
        let period = self.config.sweep_interval.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(service) = service.upgrade() else {
                    debug!("service dropped, sweeper exiting");
                    return;
                };
                service.sweep_finished();
            }
        })
    }

    /// Side effects of a session reaching Finished. Call with the session
    /// lock held, right after the transition.
    fn publish_finish(&self, session: &Session, outcome: Outcome) {
        let winner = outcome
            .winner()
            .and_then(|slot| session.slot(slot).identity.player_id());
        self.audit
            .finalize_game(session.id, winner, outcome.kind(), *session.board());
        self.timers.cancel_session(session.id);
        self.transport.broadcast(
            session.id,
            ServerMsg::GameOver {
                outcome,
                grid: *session.board(),
            },
        );
        info!(
            session_id = %session.id,
            outcome = outcome.kind().as_str(),
            winner_slot = outcome.winner().map(|s| s.number()),
            moves = session.move_count(),
            "game over"
        );
    }

    fn snapshot(session: &Session) -> ServerMsg {
        ServerMsg::GameUpdate {
            session_id: session.id,
            grid: *session.board(),
            current_slot: session.current_slot(),
            status: session.status(),
            outcome: match session.status() {
                SessionStatus::Active => None,
                SessionStatus::Finished => session.outcome(),
            },
        }
    }
}
