//! Connection registry and room fan-out for websocket sessions.

use std::collections::HashSet;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::domain::{ConnectionId, SessionId};
use crate::protocol::ServerMsg;
use crate::services::gateways::TransportGateway;

/// One outbound event for a websocket actor.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerMsg);

#[derive(Default)]
pub struct ConnectionHub {
    connections: DashMap<ConnectionId, Recipient<Deliver>>,
    rooms: DashMap<SessionId, HashSet<ConnectionId>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, conn_id: ConnectionId, recipient: Recipient<Deliver>) {
        self.connections.insert(conn_id, recipient);
        debug!(%conn_id, connections = self.connections.len(), "connection registered");
    }

    /// Forget the connection and drop it from every room.
    pub fn unregister(&self, conn_id: ConnectionId) {
        self.connections.remove(&conn_id);
        self.rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
        debug!(%conn_id, connections = self.connections.len(), "connection unregistered");
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn room_members(&self, session_id: SessionId) -> Vec<ConnectionId> {
        self.rooms
            .get(&session_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    fn deliver(&self, conn_id: ConnectionId, msg: ServerMsg) {
        match self.connections.get(&conn_id) {
            Some(recipient) => {
                trace!(%conn_id, kind = msg.kind(), "deliver");
                recipient.do_send(Deliver(msg));
            }
            None => trace!(%conn_id, kind = msg.kind(), "no such connection, dropping"),
        }
    }
}

impl TransportGateway for ConnectionHub {
    fn send_to(&self, connection: ConnectionId, msg: ServerMsg) {
        self.deliver(connection, msg);
    }

    fn broadcast(&self, session_id: SessionId, msg: ServerMsg) {
        // Copy the member list so no room guard is held while sending.
        for conn_id in self.room_members(session_id) {
            self.deliver(conn_id, msg.clone());
        }
    }

    fn join_room(&self, connection: ConnectionId, session_id: SessionId) {
        self.rooms.entry(session_id).or_default().insert(connection);
    }

    fn leave_room(&self, connection: ConnectionId, session_id: SessionId) {
        if let Some(mut members) = self.rooms.get_mut(&session_id) {
            members.remove(&connection);
        }
        self.rooms.remove_if(&session_id, |_, members| members.is_empty());
    }
}
