pub mod cors;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;

/// Which part of the server a request path belongs to. Recorded on request
/// spans and log lines so websocket upgrades can be told apart from API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Websocket,
    Health,
    Api,
    Other,
}

impl Surface {
    pub fn of(path: &str) -> Self {
        match path {
            "/ws" => Self::Websocket,
            "/health" => Self::Health,
            p if p.starts_with("/api/") => Self::Api,
            _ => Self::Other,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Websocket => "websocket",
            Self::Health => "health",
            Self::Api => "api",
            Self::Other => "other",
        }
    }
}
