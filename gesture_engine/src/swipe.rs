//! Swipe debouncer: one directional event per fast wrist flick, then a
//! cooldown.
//!
//! Displacement is measured frame-to-frame, not from an anchor, so a slow
//! drift never fires no matter how far the wrist travels.

use std::time::Instant;

use tracing::debug;

use crate::config::GestureConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Left  => "left",
            SwipeDirection::Right => "right",
        }
    }
}

/// Remembers when the last swipe fired.
///
/// Starts with no previous event, so the very first qualifying motion of a
/// session is never blocked by the cooldown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwipeDebouncer {
    last_event: Option<Instant>,
}

impl SwipeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_event(&self) -> Option<Instant> {
        self.last_event
    }

    /// Test one frame of wrist motion.
    ///
    /// `previous_x` is the wrist x of the previous tracked frame; `None`
    /// means this frame only establishes a baseline. Fires when
    /// `|dx| > swipe_threshold` and more than `swipe_cooldown` has passed
    /// since the last firing.
    pub fn check(
        &mut self,
        previous_x: Option<f32>,
        current_x:  f32,
        now:        Instant,
        config:     &GestureConfig,
    ) -> Option<SwipeDirection> {
        let dx = current_x - previous_x?;
        if dx.abs() <= config.swipe_threshold {
            return None;
        }
        if let Some(last) = self.last_event {
            if now.saturating_duration_since(last) <= config.cooldown() {
                debug!("swipe dx={:.1} suppressed by cooldown", dx);
                return None;
            }
        }
        self.last_event = Some(now);
        Some(if dx > 0.0 { SwipeDirection::Right } else { SwipeDirection::Left })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
