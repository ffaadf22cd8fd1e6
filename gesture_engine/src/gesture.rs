//! Gesture vocabulary and the posture classifier.

use std::fmt;

use crate::config::GestureConfig;
use crate::landmarks::HandPosture;
use crate::swipe::SwipeDirection;

// ════════════════════════════════════════════════════════════════════════════
// GestureEvent
// ════════════════════════════════════════════════════════════════════════════

/// The one symbol produced for every processed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    /// No hand, hand not yet stable, or an unrecognised finger configuration.
    #[default]
    None,
    OpenPalm,
    Fist,
    Pinch,
    IndexPoint,
    /// Index point with a fast wrist motion to the left.
    SwipeLeft,
    /// Index point with a fast wrist motion to the right.
    SwipeRight,
}

impl GestureEvent {
    pub const ALL: [GestureEvent; 7] = [
        GestureEvent::None,
        GestureEvent::OpenPalm,
        GestureEvent::Fist,
        GestureEvent::Pinch,
        GestureEvent::IndexPoint,
        GestureEvent::SwipeLeft,
        GestureEvent::SwipeRight,
    ];

    /// Upper-snake label shown in the HUD and logs.
    pub fn label(self) -> &'static str {
        match self {
            GestureEvent::None       => "NONE",
            GestureEvent::OpenPalm   => "OPEN_PALM",
            GestureEvent::Fist       => "FIST",
            GestureEvent::Pinch      => "PINCH",
            GestureEvent::IndexPoint => "INDEX_POINT",
            GestureEvent::SwipeLeft  => "SWIPE_LEFT",
            GestureEvent::SwipeRight => "SWIPE_RIGHT",
        }
    }

    /// What the presenter sees the gesture do.
    pub fn action(self) -> Option<&'static str> {
        match self {
            GestureEvent::None       => None,
            GestureEvent::OpenPalm   => Some("PAUSE"),
            GestureEvent::Fist       => Some("ERASE"),
            GestureEvent::Pinch      => Some("ZOOM"),
            GestureEvent::IndexPoint => Some("DRAW"),
            GestureEvent::SwipeLeft  => Some("PREVIOUS SLIDE"),
            GestureEvent::SwipeRight => Some("NEXT SLIDE"),
        }
    }

    /// Overlay colour as RGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            GestureEvent::None       => [255, 255, 255],
            GestureEvent::OpenPalm   => [255, 255, 0],
            GestureEvent::Fist       => [255, 0, 0],
            GestureEvent::Pinch      => [255, 0, 255],
            GestureEvent::IndexPoint => [0, 255, 255],
            GestureEvent::SwipeLeft  => [255, 165, 0],
            GestureEvent::SwipeRight => [0, 255, 0],
        }
    }

    pub fn swipe(self) -> Option<SwipeDirection> {
        match self {
            GestureEvent::SwipeLeft  => Some(SwipeDirection::Left),
            GestureEvent::SwipeRight => Some(SwipeDirection::Right),
            _ => None,
        }
    }

    /// True for the shapes that lay ink on the whiteboard (pen or eraser).
    pub fn is_stroke(self) -> bool {
        matches!(self, GestureEvent::Fist | GestureEvent::IndexPoint)
    }

    /// True when the pen is down, including an index point upgraded to a swipe.
    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            GestureEvent::IndexPoint | GestureEvent::SwipeLeft | GestureEvent::SwipeRight
        )
    }
}

impl From<SwipeDirection> for GestureEvent {
    fn from(dir: SwipeDirection) -> Self {
        match dir {
            SwipeDirection::Left  => GestureEvent::SwipeLeft,
            SwipeDirection::Right => GestureEvent::SwipeRight,
        }
    }
}

impl fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify_posture
// ════════════════════════════════════════════════════════════════════════════

/// Map a stable posture to a shape. First match wins:
///
/// 1. five digits up → `OpenPalm`
/// 2. no digit up → `Fist`
/// 3. tips closer than `pinch_threshold` → `Pinch`
/// 4. exactly the index finger up → `IndexPoint`
/// 5. anything else → `None`
///
/// Never returns a swipe; swipes are a motion layered on `IndexPoint` by
/// the session.
pub fn classify_posture(posture: &HandPosture, config: &GestureConfig) -> GestureEvent {
    if posture.fingers_up == 5 {
        GestureEvent::OpenPalm
    } else if posture.fingers_up == 0 {
        GestureEvent::Fist
    } else if posture.pinch_distance < config.pinch_threshold {
        GestureEvent::Pinch
    } else if posture.fingers_up == 1 && posture.index_extended() {
        GestureEvent::IndexPoint
    } else {
        GestureEvent::None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
