//! Draw module

pub mod engine;
pub mod pool;
pub mod roll_loop;
pub mod timer;

pub use engine::{DrawEngine, EngineState, Snapshot};
pub use pool::Pool;
pub use timer::{RollTimer, Ticket, TickReceiver, TokioRollTimer};
