//! Message framing shared with the other services on the bus.
//!
//! Events are sent as `{"pattern", "data"}`. Requests arrive as
//! `{"pattern", "data", "id"}` and are answered with
//! `{"id", "response" | "err", "isDisposed": true}`.

use serde::{Deserialize, Serialize};

/// Outgoing event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub pattern: String,
    pub data: T,
}

impl<T> EventEnvelope<T> {
    pub fn new(pattern: impl Into<String>, data: T) -> Self {
        Self {
            pattern: pattern.into(),
            data,
        }
    }
}

/// Incoming request
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope<T> {
    #[serde(default)]
    pub pattern: serde_json::Value,
    pub data: T,
    #[serde(default)]
    pub id: Option<String>,
}

/// Error carried in a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyError {
    pub status: u16,
    pub message: String,
}

/// Outgoing reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ReplyError>,
    pub is_disposed: bool,
}

impl ReplyEnvelope {
    /// Successful reply
    pub fn response(id: Option<String>, response: serde_json::Value) -> Self {
        Self {
            id,
            response: Some(response),
            err: None,
            is_disposed: true,
        }
    }

    /// Failed reply
    pub fn error(id: Option<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            id,
            response: None,
            err: Some(ReplyError {
                status,
                message: message.into(),
            }),
            is_disposed: true,
        }
    }
}
