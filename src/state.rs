//! Application state shared across all handlers

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::broadcast::{Broadcaster, InMemoryBroadcaster};
use crate::draw::{DrawEngine, EngineState, TokioRollTimer};
use crate::event_logger::{DrawEvent, EventLogger};
use crate::presenter::{BroadcastPresenter, DrawView, Presenter};
use crate::protocol::ClientMessage;

/// The engine as run by the server
pub type LiveEngine = DrawEngine<StdRng, TokioRollTimer>;

/// Shared application state
pub struct AppState {
    /// The single draw every page shares
    pub engine: Mutex<LiveEngine>,
    /// Broadcaster pages subscribe to
    pub broadcaster: Arc<dyn Broadcaster>,
    /// Where re-rendered views go
    pub presenter: Arc<dyn Presenter>,
    /// Draw audit log
    pub event_logger: Arc<EventLogger>,
}

impl AppState {
    /// Create state with in-memory broadcasting
    pub fn new(timer: TokioRollTimer, event_logger: EventLogger) -> Self {
        let broadcaster: Arc<dyn Broadcaster> = Arc::new(InMemoryBroadcaster::new());
        let presenter = Arc::new(BroadcastPresenter::new(broadcaster.clone()));
        Self::with_parts(timer, broadcaster, presenter, event_logger)
    }

    /// Create with a custom broadcaster and presenter (for testing)
    pub fn with_parts(
        timer: TokioRollTimer,
        broadcaster: Arc<dyn Broadcaster>,
        presenter: Arc<dyn Presenter>,
        event_logger: EventLogger,
    ) -> Self {
        let engine = DrawEngine::new(StdRng::from_entropy(), timer);
        event_logger.log(DrawEvent::Reset);

        Self {
            engine: Mutex::new(engine),
            broadcaster,
            presenter,
            event_logger: Arc::new(event_logger),
        }
    }

    /// View of the draw as it stands
    pub async fn current_view(&self) -> DrawView {
        DrawView::from(&self.engine.lock().await.snapshot())
    }

    /// Apply a page command and re-render if anything changed
    pub async fn handle_command(&self, msg: ClientMessage) {
        let view = {
            let mut engine = self.engine.lock().await;

            let changed = match msg {
                ClientMessage::Start => {
                    let started = engine.start();
                    if started {
                        self.event_logger.log(DrawEvent::RollStart);
                    }
                    started
                }
                ClientMessage::Stop => match engine.stop() {
                    Some(number) => {
                        self.event_logger.log_draw(number, engine.remaining());
                        if engine.state() == EngineState::Exhausted {
                            self.event_logger.log(DrawEvent::Exhausted {
                                drawn: engine.drawn().to_vec(),
                            });
                        }
                        true
                    }
                    None => false,
                },
                ClientMessage::Reset => {
                    engine.reset();
                    self.event_logger.log(DrawEvent::Reset);
                    true
                }
                ClientMessage::Ping => false,
            };

            if !changed {
                debug!("Command {:?} ignored in state {:?}", msg, engine.state());
                return;
            }

            DrawView::from(&engine.snapshot())
        };

        self.presenter.render(view).await;
    }
}
