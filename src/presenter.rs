//! View binding - turns engine snapshots into what the page shows

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::broadcast::Broadcaster;
use crate::draw::{EngineState, Snapshot};
use crate::protocol::ServerMessage;

pub const STATUS_READY: &str = "Press Start to begin the draw";
pub const STATUS_ROLLING: &str = "Drawing...";
pub const STATUS_EXHAUSTED: &str = "All numbers have been drawn!";

/// Everything the page renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawView {
    /// Current number, zero-padded to two digits
    pub display: String,
    pub status: String,
    /// Drawn numbers, ascending
    pub drawn: Vec<u8>,
    pub remaining: usize,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    /// Drives the rolling animation style
    pub rolling: bool,
}

impl From<&Snapshot> for DrawView {
    fn from(snapshot: &Snapshot) -> Self {
        let mut drawn = snapshot.drawn.clone();
        drawn.sort_unstable();

        Self {
            display: format!("{:02}", snapshot.display_value),
            status: status_text(snapshot.state, snapshot.last_drawn),
            drawn,
            remaining: snapshot.remaining,
            start_enabled: snapshot.state == EngineState::Idle && snapshot.remaining > 0,
            stop_enabled: snapshot.state == EngineState::Rolling,
            rolling: snapshot.state == EngineState::Rolling,
        }
    }
}

/// Status line for a state and the most recent draw
pub fn status_text(state: EngineState, last_drawn: Option<u8>) -> String {
    match (state, last_drawn) {
        (EngineState::Exhausted, _) => STATUS_EXHAUSTED.to_string(),
        (EngineState::Rolling, _) => STATUS_ROLLING.to_string(),
        (EngineState::Idle, Some(n)) => format!("Congratulations! Number {} was drawn", n),
        (EngineState::Idle, None) => STATUS_READY.to_string(),
    }
}

/// Something that can show a view
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn render(&self, view: DrawView);
}

/// Presenter that pushes every view to all connected pages
pub struct BroadcastPresenter {
    broadcaster: Arc<dyn Broadcaster>,
}

impl BroadcastPresenter {
    pub fn new(broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { broadcaster }
    }
}

#[async_trait]
impl Presenter for BroadcastPresenter {
    async fn render(&self, view: DrawView) {
        self.broadcaster.send(ServerMessage::View { data: view }).await;
    }
}
