//! Draw engine - the Idle/Rolling/Exhausted state machine

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::pool::Pool;
use super::timer::{RollTimer, Ticket};
use crate::config::{POOL_SIZE, ROLL_TICK_MS};

/// Draw lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// Waiting for start
    #[default]
    Idle,
    /// Animation running, waiting for stop
    Rolling,
    /// Pool is empty, only reset does anything
    Exhausted,
}

/// Point-in-time copy of everything the view needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state: EngineState,
    pub display_value: u8,
    /// Drawn numbers in draw order
    pub drawn: Vec<u8>,
    pub remaining: usize,
    /// Result of the most recent stop since reset
    pub last_drawn: Option<u8>,
}

/// Lottery draw engine
///
/// Holds the pre-shuffled pool and owns the roll timer. All invalid calls
/// are silent no-ops.
pub struct DrawEngine<R, T: RollTimer> {
    rng: R,
    timer: T,
    pool: Pool,
    state: EngineState,
    display_value: u8,
    last_drawn: Option<u8>,
    /// The running timer, if any, with the ticket it stamps on its ticks
    active: Option<(Ticket, T::Handle)>,
    next_ticket: Ticket,
}

impl<R: Rng, T: RollTimer> DrawEngine<R, T> {
    /// Create an engine with a freshly shuffled pool
    pub fn new(mut rng: R, timer: T) -> Self {
        let pool = Pool::shuffled(&mut rng);

        Self {
            rng,
            timer,
            pool,
            state: EngineState::Idle,
            display_value: 0,
            last_drawn: None,
            active: None,
            next_ticket: 1,
        }
    }

    /// Cancel any roll, reshuffle the full pool and clear the drawn list
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.pool = Pool::shuffled(&mut self.rng);
        self.state = EngineState::Idle;
        self.display_value = 0;
        self.last_drawn = None;
        info!("Pool reset ({} numbers)", self.pool.remaining());
    }

    /// Begin rolling. Returns false when not Idle or nothing is left to draw.
    pub fn start(&mut self) -> bool {
        if self.state != EngineState::Idle || self.pool.is_exhausted() {
            return false;
        }

        // Idle should never hold a timer
        self.cancel_timer();

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let handle = self
            .timer
            .start(Duration::from_millis(ROLL_TICK_MS), ticket);
        self.active = Some((ticket, handle));
        self.state = EngineState::Rolling;

        debug!("Rolling started (ticket {})", ticket);
        true
    }

    /// Stop rolling and draw one number. Returns `None` when not Rolling.
    pub fn stop(&mut self) -> Option<u8> {
        if self.state != EngineState::Rolling {
            return None;
        }

        self.cancel_timer();

        let Some(number) = self.pool.draw() else {
            self.state = EngineState::Exhausted;
            return None;
        };

        self.display_value = number;
        self.last_drawn = Some(number);
        self.state = if self.pool.is_exhausted() {
            EngineState::Exhausted
        } else {
            EngineState::Idle
        };

        info!("Drew {} ({} remaining)", number, self.pool.remaining());
        Some(number)
    }

    /// Apply one timer tick. Ticks from a cancelled timer are ignored.
    pub fn tick(&mut self, ticket: Ticket) -> bool {
        match &self.active {
            Some((current, _)) if *current == ticket && self.state == EngineState::Rolling => {
                self.display_value = self.rng.gen_range(1..=POOL_SIZE);
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn display_value(&self) -> u8 {
        self.display_value
    }

    /// Drawn numbers in draw order
    pub fn drawn(&self) -> &[u8] {
        self.pool.drawn()
    }

    pub fn remaining(&self) -> usize {
        self.pool.remaining()
    }

    pub fn last_drawn(&self) -> Option<u8> {
        self.last_drawn
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn is_timer_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            display_value: self.display_value,
            drawn: self.pool.drawn().to_vec(),
            remaining: self.pool.remaining(),
            last_drawn: self.last_drawn,
        }
    }

    fn cancel_timer(&mut self) {
        if let Some((ticket, handle)) = self.active.take() {
            self.timer.cancel(handle);
            debug!("Rolling timer {} cancelled", ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::timer::testing::ManualTimer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn engine(seed: u64) -> DrawEngine<StdRng, ManualTimer> {
        DrawEngine::new(StdRng::seed_from_u64(seed), ManualTimer::default())
    }

    fn assert_partition(engine: &DrawEngine<StdRng, ManualTimer>) {
        let drawn: HashSet<u8> = engine.drawn().iter().copied().collect();
        assert_eq!(drawn.len(), engine.drawn().len(), "duplicate in drawn list");

        for n in 1..=POOL_SIZE {
            let in_pool = engine.pool().contains(n);
            let in_drawn = drawn.contains(&n);
            assert!(in_pool != in_drawn, "number {} must be in exactly one place", n);
        }
        assert_eq!(engine.remaining() + engine.drawn().len(), POOL_SIZE as usize);
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = engine(1);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.display_value(), 0);
        assert_eq!(engine.remaining(), 36);
        assert!(engine.drawn().is_empty());
        assert!(!engine.is_timer_active());
        assert_partition(&engine);
    }

    #[test]
    fn test_reset_restores_full_pool() {
        let mut engine = engine(2);
        for _ in 0..10 {
            engine.start();
            engine.stop();
        }

        for _ in 0..5 {
            engine.reset();
            assert_eq!(engine.state(), EngineState::Idle);
            assert_eq!(engine.remaining(), 36);
            assert!(engine.drawn().is_empty());
            assert_eq!(engine.display_value(), 0);
            assert_eq!(engine.last_drawn(), None);
            assert_partition(&engine);
        }
    }

    #[test]
    fn test_draw_counts_after_k_stops() {
        let mut engine = engine(3);

        for k in 1..=36usize {
            assert!(engine.start());
            assert!(engine.stop().is_some());

            assert_eq!(engine.drawn().len(), k);
            assert_eq!(engine.remaining(), 36 - k);
            assert!(engine.drawn().iter().all(|n| (1..=36).contains(n)));
            assert_partition(&engine);
        }
    }

    #[test]
    fn test_stop_while_idle_is_noop() {
        let mut engine = engine(4);
        let before = engine.snapshot();

        assert_eq!(engine.stop(), None);
        assert_eq!(engine.snapshot(), before);
        assert!(engine.timer().cancelled.is_empty());
    }

    #[test]
    fn test_start_while_rolling_is_noop() {
        let mut engine = engine(5);

        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.timer().started.len(), 1);
        assert_eq!(engine.timer().running(), 1);

        let drawn = engine.stop();
        assert!(drawn.is_some());
        assert_eq!(engine.drawn().len(), 1);
        assert_eq!(engine.remaining(), 35);
        assert_eq!(engine.timer().running(), 0);

        // A second stop does not pop again
        assert_eq!(engine.stop(), None);
        assert_eq!(engine.remaining(), 35);
    }

    #[test]
    fn test_exhausted_after_all_draws() {
        let mut engine = engine(6);
        for _ in 0..36 {
            engine.start();
            engine.stop();
        }

        assert_eq!(engine.state(), EngineState::Exhausted);
        assert_eq!(engine.remaining(), 0);

        let started = engine.timer().started.len();
        assert!(!engine.start());
        assert_eq!(engine.state(), EngineState::Exhausted);
        assert_eq!(engine.timer().started.len(), started);

        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.start());
    }

    #[test]
    fn test_single_draw_scenario() {
        let mut engine = engine(7);
        engine.reset();
        engine.start();
        let number = engine.stop().unwrap();

        assert_eq!(engine.drawn(), &[number]);
        assert_eq!(engine.remaining(), 35);
        assert_eq!(engine.display_value(), number);
        assert_eq!(engine.last_drawn(), Some(number));
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_full_draw_scenario() {
        let mut engine = engine(8);
        engine.reset();
        for _ in 0..36 {
            engine.start();
            engine.stop();
        }

        let mut sorted = engine.drawn().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=36).collect::<Vec<u8>>());
        assert_eq!(engine.remaining(), 0);
        assert_eq!(engine.state(), EngineState::Exhausted);
    }

    #[test]
    fn test_tick_only_while_rolling() {
        let mut engine = engine(9);
        assert!(!engine.tick(1));
        assert_eq!(engine.display_value(), 0);

        engine.start();
        let ticket = engine.timer().started[0];
        for _ in 0..50 {
            assert!(engine.tick(ticket));
            assert!((1..=36).contains(&engine.display_value()));
        }
        // Ticks never touch the pool
        assert_eq!(engine.remaining(), 36);
        assert!(engine.drawn().is_empty());
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut engine = engine(10);
        engine.start();
        let first = engine.timer().started[0];
        let number = engine.stop().unwrap();

        // Tick from the cancelled timer arriving late
        assert!(!engine.tick(first));
        assert_eq!(engine.display_value(), number);

        engine.start();
        let second = engine.timer().started[1];
        assert_ne!(first, second);
        assert!(!engine.tick(first));
        assert!(engine.tick(second));
    }

    #[test]
    fn test_reset_while_rolling_cancels_timer() {
        let mut engine = engine(11);
        engine.start();
        let ticket = engine.timer().started[0];

        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.is_timer_active());
        assert_eq!(engine.timer().cancelled, vec![ticket]);
        assert!(!engine.tick(ticket));
        assert_eq!(engine.display_value(), 0);
    }

    #[test]
    fn test_at_most_one_timer_running() {
        let mut engine = engine(12);
        for round in 0..20 {
            engine.start();
            engine.start();
            assert!(engine.timer().running() <= 1);
            if round % 3 == 0 {
                engine.reset();
            } else {
                engine.stop();
            }
            assert_eq!(engine.timer().running(), 0);
        }
    }

    #[test]
    fn test_single_draw_distribution() {
        // Chi-square goodness of fit against uniform over 1..=36, 35 dof
        const TRIALS: usize = 36_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 37];

        for _ in 0..TRIALS {
            let mut engine = DrawEngine::new(&mut rng, ManualTimer::default());
            engine.reset();
            engine.start();
            let number = engine.stop().unwrap();
            counts[number as usize] += 1;
        }

        assert_eq!(counts[0], 0);
        let expected = TRIALS as f64 / 36.0;
        let chi_square: f64 = counts[1..]
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // p < 0.0002 at 72 for 35 degrees of freedom
        assert!(chi_square < 72.0, "chi-square too large: {}", chi_square);
    }
}
