//! Protocol messages for WebSocket communication

use serde::Serialize;

use crate::presenter::DrawView;

/// Messages sent from client to server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    /// Begin rolling
    Start,
    /// Stop rolling and draw a number
    Stop,
    /// Reshuffle the full pool
    Reset,
    /// Keep-alive
    Ping,
}

impl ClientMessage {
    /// Parse a client message from a text frame
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" => Some(ClientMessage::Start),
            "stop" => Some(ClientMessage::Stop),
            "reset" => Some(ClientMessage::Reset),
            "ping" => Some(ClientMessage::Ping),
            _ => None,
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Full view of the current draw
    View { data: DrawView },
}

impl ServerMessage {
    /// Serialize message to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
