//! Slide control: turn swipe events into arrow-key presses.
//!
//! | Event | Key | Action |
//! |---|---|---|
//! | `SwipeRight` | → | NEXT SLIDE |
//! | `SwipeLeft` | ← | PREVIOUS SLIDE |
//!
//! Key presses are fire-and-forget. A backend that fails to inject a key
//! logs a warning and carries on.

use gesture_engine::{GestureEvent, SwipeDirection};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideKey {
    Left,
    Right,
}

impl SlideKey {
    pub fn name(self) -> &'static str {
        match self {
            SlideKey::Left  => "Left",
            SlideKey::Right => "Right",
        }
    }
}

impl From<SwipeDirection> for SlideKey {
    fn from(d: SwipeDirection) -> Self {
        match d {
            SwipeDirection::Left  => SlideKey::Left,
            SwipeDirection::Right => SlideKey::Right,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// KeyPresser backends
// ════════════════════════════════════════════════════════════════════════════

pub trait KeyPresser {
    fn name(&self) -> &'static str;
    fn press(&mut self, key: SlideKey);
}

/// Default backend: records and logs the key, touches nothing outside the
/// process.
#[derive(Debug, Default)]
pub struct LogPresser {
    pressed: Vec<SlideKey>,
}

impl LogPresser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressed(&self) -> &[SlideKey] {
        &self.pressed
    }
}

impl KeyPresser for LogPresser {
    fn name(&self) -> &'static str {
        "log only"
    }

    fn press(&mut self, key: SlideKey) {
        info!("key press (dry run): {}", key.name());
        self.pressed.push(key);
    }
}

/// Injects real arrow-key presses through the OS input layer.
#[cfg(feature = "keys")]
pub struct EnigoPresser {
    enigo: enigo::Enigo,
}

#[cfg(feature = "keys")]
impl EnigoPresser {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())
            .map_err(|e| anyhow::anyhow!("cannot open OS input connection: {:?}", e))?;
        Ok(EnigoPresser { enigo })
    }
}

#[cfg(feature = "keys")]
impl KeyPresser for EnigoPresser {
    fn name(&self) -> &'static str {
        "OS keyboard"
    }

    fn press(&mut self, key: SlideKey) {
        use enigo::{Direction, Key, Keyboard};
        let k = match key {
            SlideKey::Left  => Key::LeftArrow,
            SlideKey::Right => Key::RightArrow,
        };
        if let Err(e) = self.enigo.key(k, Direction::Click) {
            tracing::warn!("failed to press {}: {:?}", key.name(), e);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// dispatch
// ════════════════════════════════════════════════════════════════════════════

/// Press the slide key for `event`, if it is a swipe.
pub fn dispatch(event: GestureEvent, presser: &mut dyn KeyPresser) -> Option<SlideKey> {
    let direction = event.swipe()?;
    let key = SlideKey::from(direction);
    info!(
        "[ACTION {}] {} (swipe {})",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        event.action().unwrap_or(event.label()),
        direction.as_str(),
    );
    presser.press(key);
    Some(key)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipes_map_to_arrow_keys() {
        let mut p = LogPresser::new();
        assert_eq!(dispatch(GestureEvent::SwipeRight, &mut p), Some(SlideKey::Right));
        assert_eq!(dispatch(GestureEvent::SwipeLeft,  &mut p), Some(SlideKey::Left));
        assert_eq!(p.pressed(), &[SlideKey::Right, SlideKey::Left]);
    }

    #[test]
    fn non_swipes_press_nothing() {
        let mut p = LogPresser::new();
        for g in GestureEvent::ALL {
            if g.swipe().is_none() {
                assert_eq!(dispatch(g, &mut p), None, "{:?}", g);
            }
        }
        assert!(p.pressed().is_empty());
    }
}
