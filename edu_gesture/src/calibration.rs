//! Live calibration panel.
//!
//! Keyboard-driven sliders over the five tunable [`GestureConfig`] fields.
//! Every edit lands in the live config, so the next frame already uses it.

use gesture_engine::GestureConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationField {
    SwipeThreshold,
    SwipeCooldown,
    PinchThreshold,
    MinTrackingFrames,
    BrushSize,
}

impl CalibrationField {
    pub const ALL: [CalibrationField; 5] = [
        CalibrationField::SwipeThreshold,
        CalibrationField::SwipeCooldown,
        CalibrationField::PinchThreshold,
        CalibrationField::MinTrackingFrames,
        CalibrationField::BrushSize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CalibrationField::SwipeThreshold    => "Swipe threshold",
            CalibrationField::SwipeCooldown     => "Swipe cooldown",
            CalibrationField::PinchThreshold    => "Pinch threshold",
            CalibrationField::MinTrackingFrames => "Min tracking frames",
            CalibrationField::BrushSize         => "Brush size",
        }
    }

    /// `(min, max, step)`.
    pub fn range(self) -> (f32, f32, f32) {
        match self {
            CalibrationField::SwipeThreshold    => (5.0, 300.0, 5.0),
            CalibrationField::SwipeCooldown     => (0.0, 3.0,   0.1),
            CalibrationField::PinchThreshold    => (0.0, 100.0, 1.0),
            CalibrationField::MinTrackingFrames => (0.0, 30.0,  1.0),
            CalibrationField::BrushSize         => (1.0, 20.0,  1.0),
        }
    }

    pub fn get(self, cfg: &GestureConfig) -> f32 {
        match self {
            CalibrationField::SwipeThreshold    => cfg.swipe_threshold,
            CalibrationField::SwipeCooldown     => cfg.swipe_cooldown,
            CalibrationField::PinchThreshold    => cfg.pinch_threshold,
            CalibrationField::MinTrackingFrames => cfg.min_tracking_frames as f32,
            CalibrationField::BrushSize         => cfg.brush_size as f32,
        }
    }

    /// Store `value`, clamped to the field's range and snapped to its step.
    pub fn set(self, cfg: &mut GestureConfig, value: f32) {
        let (min, max, step) = self.range();
        let value = if value.is_finite() { value } else { min };
        let snapped = ((value.clamp(min, max) / step).round() * step).clamp(min, max);
        match self {
            CalibrationField::SwipeThreshold    => cfg.swipe_threshold = snapped,
            CalibrationField::SwipeCooldown     => cfg.swipe_cooldown = snapped,
            CalibrationField::PinchThreshold    => cfg.pinch_threshold = snapped,
            CalibrationField::MinTrackingFrames => cfg.min_tracking_frames = snapped as u32,
            CalibrationField::BrushSize         => cfg.brush_size = snapped as u32,
        }
    }

    pub fn format(self, cfg: &GestureConfig) -> String {
        match self {
            CalibrationField::SwipeThreshold    => format!("{:.0} px", cfg.swipe_threshold),
            CalibrationField::SwipeCooldown     => format!("{:.1} s", cfg.swipe_cooldown),
            CalibrationField::PinchThreshold    => format!("{:.0} px", cfg.pinch_threshold),
            CalibrationField::MinTrackingFrames => format!("{}", cfg.min_tracking_frames),
            CalibrationField::BrushSize         => format!("{} px", cfg.brush_size),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CalibrationPanel
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct CalibrationPanel {
    visible:  bool,
    selected: usize,
}

impl CalibrationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool { self.visible }
    pub fn toggle(&mut self)         { self.visible = !self.visible; }
    pub fn hide(&mut self)           { self.visible = false; }

    pub fn selected(&self) -> CalibrationField {
        CalibrationField::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % CalibrationField::ALL.len();
    }

    pub fn select_prev(&mut self) {
        let n = CalibrationField::ALL.len();
        self.selected = (self.selected + n - 1) % n;
    }

    /// Move the selected field by `steps` increments. Returns the field that
    /// changed.
    pub fn adjust(&mut self, cfg: &mut GestureConfig, steps: i32) -> CalibrationField {
        let field = self.selected();
        let (_, _, step) = field.range();
        field.set(cfg, field.get(cfg) + step * steps as f32);
        field
    }

    /// One line per field; the selected one is marked with `>`.
    pub fn lines(&self, cfg: &GestureConfig) -> Vec<String> {
        CalibrationField::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let mark = if i == self.selected { '>' } else { ' ' };
                format!("{} {}: {}", mark, f.label(), f.format(cfg))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_moves_by_step() {
        let mut cfg = GestureConfig::default();
        let mut panel = CalibrationPanel::new();
        panel.adjust(&mut cfg, 2);
        assert_eq!(cfg.swipe_threshold, 110.0);

        panel.select_next();
        panel.adjust(&mut cfg, -3);
        assert!((cfg.swipe_cooldown - 0.5).abs() < 1e-6);
    }

    #[test]
    fn values_clamp_to_range() {
        let mut cfg = GestureConfig::default();
        let mut panel = CalibrationPanel::new();
        panel.adjust(&mut cfg, -1000);
        assert_eq!(cfg.swipe_threshold, 5.0);
        assert!(cfg.validate().is_ok());

        panel.select_prev(); // wraps to brush size
        assert_eq!(panel.selected(), CalibrationField::BrushSize);
        panel.adjust(&mut cfg, 100);
        assert_eq!(cfg.brush_size, 20);
        panel.adjust(&mut cfg, -100);
        assert_eq!(cfg.brush_size, 1);
    }

    #[test]
    fn every_edit_keeps_config_valid() {
        let mut cfg = GestureConfig::default();
        let mut panel = CalibrationPanel::new();
        for _ in 0..CalibrationField::ALL.len() {
            for steps in [-500, 7, 500, -3] {
                panel.adjust(&mut cfg, steps);
                assert!(cfg.validate().is_ok(), "{:?} {:?}", panel.selected(), cfg);
            }
            panel.select_next();
        }
    }

    #[test]
    fn lines_mark_selection() {
        let cfg = GestureConfig::default();
        let mut panel = CalibrationPanel::new();
        panel.select_next();
        let lines = panel.lines(&cfg);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  Swipe threshold: 100 px");
        assert_eq!(lines[1], "> Swipe cooldown: 0.8 s");
    }

    #[test]
    fn toggle_and_hide() {
        let mut panel = CalibrationPanel::new();
        assert!(!panel.is_visible());
        panel.toggle();
        assert!(panel.is_visible());
        panel.hide();
        assert!(!panel.is_visible());
    }
}
