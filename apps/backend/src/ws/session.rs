use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::ConnectionId;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::protocol::{ClientMsg, ServerMsg};
use crate::services::game_flow::GameFlowService;
use crate::services::validation;
use crate::state::app_state::AppState;
use crate::ws::hub::{ConnectionHub, Deliver};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(
        Uuid::new_v4(),
        Arc::clone(app_state.game_flow()),
        Arc::clone(app_state.hub()),
    );
    ws::start(session, &req, stream)
}

/// One websocket connection. Its id is the transport handle the game core
/// stores in a player's slot.
pub struct WsSession {
    conn_id: ConnectionId,
    game_flow: Arc<GameFlowService>,
    hub: Arc<ConnectionHub>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(
        conn_id: ConnectionId,
        game_flow: Arc<GameFlowService>,
        hub: Arc<ConnectionHub>,
    ) -> Self {
        Self {
            conn_id,
            game_flow,
            hub,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, kind = msg.kind(), "failed to serialize outbound message"),
        }
    }

    /// Report a rejected request to this connection only.
    fn send_failure(&self, ctx: &mut ws::WebsocketContext<Self>, err: &DomainError) {
        if err.is_client_error() {
            warn!(conn_id = %self.conn_id, code = %err.code(), error = %err, "request rejected");
        } else {
            error!(conn_id = %self.conn_id, code = %err.code(), error = %err, "request failed");
        }
        Self::send_json(ctx, &ServerMsg::error(err));
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        let msg = ServerMsg::Error {
            code,
            message: message.into(),
        };
        Self::send_json(ctx, &msg);
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn dispatch(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match cmd {
            ClientMsg::JoinGame { username } | ClientMsg::NewGame { username } => {
                let game_flow = Arc::clone(&self.game_flow);
                let conn_id = self.conn_id;
                ctx.spawn(
                    async move { game_flow.join_game(conn_id, &username).await }
                        .into_actor(self)
                        .map(|res, actor, ctx| {
                            if let Err(err) = res {
                                actor.send_failure(ctx, &err);
                            }
                        }),
                );
            }

            ClientMsg::MakeMove { column } => {
                let res = validation::integer(&column, ValidationKind::Column, "column")
                    .and_then(|column| self.game_flow.make_move(self.conn_id, column));
                if let Err(err) = res {
                    self.send_failure(ctx, &err);
                }
            }

            ClientMsg::ReconnectGame { session_id, slot } => {
                let res = validation::integer(&slot, ValidationKind::Slot, "slot")
                    .and_then(|slot| self.game_flow.reconnect(self.conn_id, session_id, slot));
                if let Err(err) = res {
                    self.send_failure(ctx, &err);
                }
            }

            ClientMsg::GetLeaderboard { limit } => {
                let limit = match limit
                    .map(|v| validation::integer(&v, ValidationKind::Limit, "limit"))
                    .transpose()
                {
                    Ok(limit) => limit,
                    Err(err) => {
                        self.send_failure(ctx, &err);
                        return;
                    }
                };
                let game_flow = Arc::clone(&self.game_flow);
                ctx.spawn(
                    async move { game_flow.leaderboard(limit).await }
                        .into_actor(self)
                        .map(|res, actor, ctx| match res {
                            Ok(leaderboard) => {
                                Self::send_json(ctx, &ServerMsg::LeaderboardData { leaderboard })
                            }
                            Err(err) => actor.send_failure(ctx, &err),
                        }),
                );
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hub
            .register(self.conn_id, ctx.address().recipient::<Deliver>());
        self.start_heartbeat(ctx);
        info!(conn_id = %self.conn_id, "websocket connected");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.game_flow.handle_disconnect(self.conn_id);
        self.hub.unregister(self.conn_id);
        info!(conn_id = %self.conn_id, "websocket disconnected");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.dispatch(cmd, ctx),
                    Err(err) => {
                        warn!(conn_id = %self.conn_id, error = %err, "malformed frame");
                        self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed message");
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Deliver> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}
