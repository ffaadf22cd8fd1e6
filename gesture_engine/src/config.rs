//! Tunable thresholds shared by every stage of the engine.
//!
//! The config is owned by the caller and passed by reference into
//! [`SessionState::step`](crate::SessionState::step) each frame, so an edit
//! from the calibration panel is seen on the very next frame.
//!
//! On disk it is a flat JSON object:
//!
//! ```json
//! {
//!   "swipe_threshold": 100.0,
//!   "swipe_cooldown": 0.8,
//!   "pinch_threshold": 45.0,
//!   "min_tracking_frames": 3,
//!   "brush_size": 5,
//!   "brush_color": [255, 255, 0]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

/// Default profile file name, relative to the working directory.
pub const PROFILE_FILE: &str = "user_profile.json";

pub const MAX_TRACKING_FRAMES: u32 = 300;
pub const MAX_BRUSH_SIZE:      u32 = 100;
/// Seconds. Well above the calibration slider's 3 s.
pub const MAX_SWIPE_COOLDOWN:  f32 = 60.0;
/// Pixels of wrist travel in one frame.
pub const MAX_SWIPE_THRESHOLD: f32 = 2000.0;
/// Pixels between index and thumb tips.
pub const MAX_PINCH_THRESHOLD: f32 = 500.0;

// ════════════════════════════════════════════════════════════════════════════
// GestureConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Minimum one-frame wrist displacement (pixels) that counts as a swipe.
    pub swipe_threshold:     f32,
    /// Minimum time (seconds) between two swipe events.
    pub swipe_cooldown:      f32,
    /// Index-to-thumb tip distance (pixels) below which the hand is pinching.
    pub pinch_threshold:     f32,
    /// Frames a hand must be tracked before it is classified at all.
    pub min_tracking_frames: u32,
    /// Whiteboard pen width in pixels; the eraser is three times wider.
    pub brush_size:          u32,
    /// Whiteboard pen colour as RGB.
    pub brush_color:         [u8; 3],
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            swipe_threshold:     100.0,
            swipe_cooldown:      0.8,
            pinch_threshold:     45.0,
            min_tracking_frames: 3,
            brush_size:          5,
            brush_color:         [255, 255, 0],
        }
    }
}

impl GestureConfig {
    /// The swipe cooldown as a [`Duration`]. Invalid values collapse to zero.
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f32(self.swipe_cooldown).unwrap_or(Duration::ZERO)
    }

    /// Reject values that would make a threshold comparison always or never
    /// fire.
    pub fn validate(&self) -> ConfigResult<()> {
        let swipe = self.swipe_threshold;
        if !(swipe > 0.0 && swipe <= MAX_SWIPE_THRESHOLD) {
            return Err(out_of_range("swipe_threshold", swipe, "> 0 and <= 2000"));
        }
        if !(0.0..=MAX_SWIPE_COOLDOWN).contains(&self.swipe_cooldown) {
            return Err(out_of_range("swipe_cooldown", self.swipe_cooldown, "0..=60"));
        }
        if !(0.0..=MAX_PINCH_THRESHOLD).contains(&self.pinch_threshold) {
            return Err(out_of_range("pinch_threshold", self.pinch_threshold, "0..=500"));
        }
        if self.min_tracking_frames > MAX_TRACKING_FRAMES {
            return Err(out_of_range("min_tracking_frames", self.min_tracking_frames, "0..=300"));
        }
        if self.brush_size == 0 || self.brush_size > MAX_BRUSH_SIZE {
            return Err(out_of_range("brush_size", self.brush_size, "1..=100"));
        }
        Ok(())
    }

    /// Load a profile from `path`.
    ///
    /// A missing file is not an error: defaults are returned. A file that
    /// exists but does not parse or validate is.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("no profile at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content)?;
        info!("loaded profile from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a profile from a JSON string.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: GestureConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn out_of_range(field: &'static str, value: impl ToString, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange { field, value: value.to_string(), expected }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_profile(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gesture_engine_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn defaults_match_reference_profile() {
        let c = GestureConfig::default();
        assert_eq!(c.swipe_threshold, 100.0);
        assert_eq!(c.swipe_cooldown, 0.8);
        assert_eq!(c.pinch_threshold, 45.0);
        assert_eq!(c.min_tracking_frames, 3);
        assert_eq!(c.brush_size, 5);
        assert_eq!(c.brush_color, [255, 255, 0]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn save_then_load_preserves_every_field() {
        let path = temp_profile("roundtrip");
        let original = GestureConfig {
            swipe_threshold:     135.0,
            swipe_cooldown:      1.3,
            pinch_threshold:     27.5,
            min_tracking_frames: 7,
            brush_size:          12,
            brush_color:         [0, 128, 255],
        };
        original.save(&path).unwrap();
        let loaded = GestureConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_profile("definitely_missing");
        std::fs::remove_file(&path).ok();
        assert_eq!(GestureConfig::load(&path).unwrap(), GestureConfig::default());
    }

    #[test]
    fn reads_integer_thresholds_from_legacy_profiles() {
        let json = r#"{
            "swipe_threshold": 100,
            "swipe_cooldown": 0.8,
            "pinch_threshold": 45,
            "min_tracking_frames": 3,
            "brush_size": 5,
            "brush_color": [255, 255, 0]
        }"#;
        assert_eq!(GestureConfig::from_json(json).unwrap(), GestureConfig::default());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let mut c = GestureConfig::default();
        c.pinch_threshold = -1.0;
        let json = serde_json::to_string(&c).unwrap();
        match GestureConfig::from_json(&json) {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, "pinch_threshold"),
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn zero_swipe_threshold_is_rejected() {
        let c = GestureConfig { swipe_threshold: 0.0, ..GestureConfig::default() };
        assert!(matches!(c.validate(), Err(ConfigError::OutOfRange { field: "swipe_threshold", .. })));
    }

    #[test]
    fn zero_brush_is_rejected() {
        let c = GestureConfig { brush_size: 0, ..GestureConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn color_component_above_255_fails_to_parse() {
        let json = r#"{"swipe_threshold":100,"swipe_cooldown":0.8,"pinch_threshold":45,
                       "min_tracking_frames":3,"brush_size":5,"brush_color":[256,0,0]}"#;
        assert!(matches!(GestureConfig::from_json(json), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn huge_cooldown_is_rejected_before_it_can_wrap_to_zero() {
        let mut c = GestureConfig::default();
        c.swipe_cooldown = 1e20;
        let json = serde_json::to_string(&c).unwrap();
        assert!(matches!(
            GestureConfig::from_json(&json),
            Err(ConfigError::OutOfRange { field: "swipe_cooldown", .. })
        ));
        c.swipe_cooldown = MAX_SWIPE_COOLDOWN;
        assert!(c.validate().is_ok());
        assert_eq!(c.cooldown(), Duration::from_secs(60));
    }

    #[test]
    fn huge_pinch_threshold_is_rejected() {
        let c = GestureConfig { pinch_threshold: 1e9, ..GestureConfig::default() };
        assert!(matches!(c.validate(), Err(ConfigError::OutOfRange { field: "pinch_threshold", .. })));
        let edge = GestureConfig { pinch_threshold: MAX_PINCH_THRESHOLD, ..GestureConfig::default() };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn huge_swipe_threshold_is_rejected() {
        let c = GestureConfig { swipe_threshold: 1e9, ..GestureConfig::default() };
        assert!(matches!(c.validate(), Err(ConfigError::OutOfRange { field: "swipe_threshold", .. })));
        let nan = GestureConfig { swipe_threshold: f32::NAN, ..GestureConfig::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn cooldown_converts_to_duration() {
        let c = GestureConfig::default();
        assert_eq!(c.cooldown(), Duration::from_secs_f32(0.8));
        let bad = GestureConfig { swipe_cooldown: f32::NAN, ..c };
        assert_eq!(bad.cooldown(), Duration::ZERO);
    }
}
