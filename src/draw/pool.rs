//! Number pool - pre-shuffled so every draw is a single pop

use rand::Rng;

use crate::config::POOL_SIZE;

/// Not-yet-drawn numbers plus the numbers already drawn, in draw order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    /// Remaining numbers; the next draw is the last element
    remaining: Vec<u8>,
    /// Drawn numbers in draw order
    drawn: Vec<u8>,
}

impl Pool {
    /// Create a full pool of 1..=POOL_SIZE in uniformly random order
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut remaining: Vec<u8> = (1..=POOL_SIZE).collect();
        shuffle(&mut remaining, rng);

        Self {
            remaining,
            drawn: Vec::with_capacity(POOL_SIZE as usize),
        }
    }

    /// Move the next number from the pool into the drawn list
    pub fn draw(&mut self) -> Option<u8> {
        let number = self.remaining.pop()?;
        self.drawn.push(number);
        Some(number)
    }

    /// Numbers drawn so far, in draw order
    pub fn drawn(&self) -> &[u8] {
        &self.drawn
    }

    /// Count of numbers still in the pool
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Check whether a number is still waiting to be drawn
    pub fn contains(&self, number: u8) -> bool {
        self.remaining.contains(&number)
    }
}

/// Fisher-Yates shuffle
///
/// Walks from the back, swapping each slot with a uniformly chosen slot at
/// or before it. Every permutation is equally likely given an unbiased `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
