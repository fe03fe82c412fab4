//! Rotating affirmation banner state
//!
//! The dashboard shows one short encouragement at a time and swaps it
//! every so often. The rotator owns the pick; the frontend ticks it.

use std::time::Duration;

/// How long one affirmation stays on screen
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(20);

const AFFIRMATIONS: &[&str] = &[
    "Small steps every day add up.",
    "Done is better than perfect.",
    "Your future self is watching you study.",
    "One session at a time.",
    "Breaks are part of the work.",
    "You've shown up. That's the hard part.",
    "Consistency beats intensity.",
    "Every review makes recall easier.",
    "Hard now, easy at the exam.",
    "Focus is a muscle. You're training it.",
    "Progress, not perfection.",
    "The streak grows one day at a time.",
];

#[derive(Debug, Clone)]
pub struct AffirmationRotator {
    current: usize,
    since_rotation: Duration,
}

impl AffirmationRotator {
    /// Start on a random affirmation so the banner doesn't always open
    /// with the same line.
    pub fn new() -> Self {
        Self {
            current: rand::random::<u32>() as usize % AFFIRMATIONS.len(),
            since_rotation: Duration::ZERO,
        }
    }

    pub fn current(&self) -> &'static str {
        AFFIRMATIONS[self.current]
    }

    /// Advance the banner clock. Returns true when the affirmation
    /// rotated on this tick.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.since_rotation += elapsed;
        if self.since_rotation < ROTATION_INTERVAL {
            return false;
        }
        self.advance();
        true
    }

    /// Swap in a different affirmation immediately.
    pub fn advance(&mut self) {
        let mut next = rand::random::<u32>() as usize % AFFIRMATIONS.len();
        if next == self.current {
            next = (next + 1) % AFFIRMATIONS.len();
        }
        self.current = next;
        self.since_rotation = Duration::ZERO;
    }
}

impl Default for AffirmationRotator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_always_from_the_list() {
        let rotator = AffirmationRotator::new();
        assert!(AFFIRMATIONS.contains(&rotator.current()));
    }

    #[test]
    fn does_not_rotate_before_the_interval() {
        let mut rotator = AffirmationRotator::new();
        let before = rotator.current();
        assert!(!rotator.tick(ROTATION_INTERVAL / 2));
        assert_eq!(rotator.current(), before);
    }

    #[test]
    fn rotates_once_the_interval_elapses() {
        let mut rotator = AffirmationRotator::new();
        let before = rotator.current();
        assert!(!rotator.tick(ROTATION_INTERVAL / 2));
        assert!(rotator.tick(ROTATION_INTERVAL));
        assert_ne!(rotator.current(), before);
    }

    #[test]
    fn advance_never_repeats_the_current_line() {
        let mut rotator = AffirmationRotator::new();
        for _ in 0..50 {
            let before = rotator.current();
            rotator.advance();
            assert_ne!(rotator.current(), before);
        }
    }
}
