//! Clamped resource components used by the player ship.

use serde::{Deserialize, Serialize};

/// A resource bounded to `0..=max` (hull, shield, fuel).
///
/// Every mutation clamps, so `current <= max` holds after any call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gauge {
    current: u32,
    max: u32,
}

impl Gauge {
    /// A full gauge.
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// A gauge at `current`, clamped to `max`.
    pub fn with_current(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Add `amount`, stopping at `max`.
    pub fn fill(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Remove `amount`, stopping at zero. Returns the part of `amount` the
    /// gauge could not absorb.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let overflow = amount.saturating_sub(self.current);
        self.current = self.current.saturating_sub(amount);
        overflow
    }

    /// Set the current value, clamped to `max`.
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    /// Change the maximum. The current value is clamped down if needed.
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.current = self.current.min(max);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    pub fn percentage(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_stops_at_max() {
        let mut g = Gauge::with_current(40, 50);
        g.fill(u32::MAX);
        assert_eq!(g.current(), 50);
        assert!(g.is_full());
    }

    #[test]
    fn drain_reports_overflow() {
        let mut g = Gauge::with_current(50, 50);
        assert_eq!(g.drain(30), 0);
        assert_eq!(g.current(), 20);
        assert_eq!(g.drain(35), 15);
        assert!(g.is_empty());
    }

    #[test]
    fn set_max_clamps_current() {
        let mut g = Gauge::new(300);
        g.set_max(100);
        assert_eq!(g.current(), 100);
        g.set(250);
        assert_eq!(g.current(), 100);
    }

    #[test]
    fn zero_max_percentage() {
        assert_eq!(Gauge::new(0).percentage(), 0.0);
        assert!((Gauge::with_current(25, 100).percentage() - 0.25).abs() < f32::EPSILON);
    }
}
