//! Roll loop - applies timer ticks to the engine and re-renders

use std::sync::Arc;

use tracing::debug;

use super::timer::TickReceiver;
use crate::presenter::DrawView;
use crate::state::AppState;

/// Spawn the task that drives the rolling animation
pub fn spawn_roll_loop(state: Arc<AppState>, mut ticks: TickReceiver) {
    tokio::spawn(async move {
        while let Some(ticket) = ticks.recv().await {
            let view = {
                let mut engine = state.engine.lock().await;
                if !engine.tick(ticket) {
                    debug!("Dropped stale tick {}", ticket);
                    continue;
                }
                DrawView::from(&engine.snapshot())
            };

            state.presenter.render(view).await;
        }

        debug!("Roll loop stopped");
    });
}
