//! Press classification
//!
//! A press is the time between a key going down and the next key coming up.
//! The tracker is a two-state machine driven by timestamps supplied by the
//! caller, so it never reads the clock itself.

use embassy_time::{Duration, Instant};

/// Presses held at least this long are long presses
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// Classification of a completed press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyPress {
    /// Released before the long press threshold
    Short,
    /// Held for at least the long press threshold
    Long,
}

impl KeyPress {
    /// Classify a press by how long the key was held
    pub fn classify(held: Duration, threshold: Duration) -> Self {
        if held >= threshold {
            KeyPress::Long
        } else {
            KeyPress::Short
        }
    }

    /// Check if this is a long press
    pub fn is_long(&self) -> bool {
        matches!(self, KeyPress::Long)
    }
}

/// Tracker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    /// No key down outstanding
    Idle,
    /// A key went down and has not come up yet
    KeyHeld {
        /// Key that went down last
        slot: u8,
        /// When it went down
        since: Instant,
    },
}

/// Matches key-ups to the preceding key-down
///
/// Only one key-down is outstanding at a time: a second key-down before any
/// key-up restarts the press, and the next key-up is measured from it. A
/// key-up with no key-down outstanding (e.g. a key already held when the
/// deck started) is an orphan and produces no press.
#[derive(Debug, Clone)]
pub struct PressTracker {
    state: PressState,
    threshold: Duration,
}

impl Default for PressTracker {
    fn default() -> Self {
        Self::new(LONG_PRESS_THRESHOLD)
    }
}

impl PressTracker {
    /// Create a tracker with the given long press threshold
    pub fn new(threshold: Duration) -> Self {
        Self {
            state: PressState::Idle,
            threshold,
        }
    }

    /// Current state
    pub fn state(&self) -> PressState {
        self.state
    }

    /// Long press threshold
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Record a key-down at `now`
    pub fn key_down(&mut self, slot: u8, now: Instant) {
        self.state = PressState::KeyHeld { slot, since: now };
    }

    /// Record a key-up at `now`
    ///
    /// Returns the classified press, or `None` for an orphan key-up. The
    /// tracker is idle afterwards either way.
    pub fn key_up(&mut self, now: Instant) -> Option<KeyPress> {
        let state = core::mem::replace(&mut self.state, PressState::Idle);
        match state {
            PressState::Idle => None,
            PressState::KeyHeld { since, .. } => {
                // A clock that stepped backwards counts as an instant release
                let held = now
                    .checked_duration_since(since)
                    .unwrap_or(Duration::from_ticks(0));
                Some(KeyPress::classify(held, self.threshold))
            }
        }
    }
}
