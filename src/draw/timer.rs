//! Repeating roll timer
//!
//! The engine owns at most one running timer. Each timer is stamped with a
//! ticket so ticks that were already queued when it was cancelled can be
//! told apart from ticks of the timer that replaced it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Identifies one armed timer
pub type Ticket = u64;

/// Receiver side of the tick channel
pub type TickReceiver = mpsc::UnboundedReceiver<Ticket>;

/// A source of periodic ticks that can be started and cancelled
pub trait RollTimer {
    /// Handle to a running timer
    type Handle;

    /// Start ticking every `period`, stamping each tick with `ticket`
    fn start(&mut self, period: Duration, ticket: Ticket) -> Self::Handle;

    /// Stop a running timer
    fn cancel(&mut self, handle: Self::Handle);
}

/// Roll timer backed by a tokio interval task
pub struct TokioRollTimer {
    tx: mpsc::UnboundedSender<Ticket>,
}

impl TokioRollTimer {
    /// Create a timer and the receiver its ticks arrive on
    pub fn channel() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RollTimer for TokioRollTimer {
    type Handle = JoinHandle<()>;

    fn start(&mut self, period: Duration, ticket: Ticket) -> Self::Handle {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut roll_interval = interval(period);
            roll_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately
            roll_interval.tick().await;

            loop {
                roll_interval.tick().await;
                if tx.send(ticket).is_err() {
                    break;
                }
            }
        })
    }

    fn cancel(&mut self, handle: Self::Handle) {
        handle.abort();
    }
}
