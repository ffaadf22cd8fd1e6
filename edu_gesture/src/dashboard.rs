//! Running frame statistics for the HUD.

use std::time::Instant;

#[derive(Clone, Debug)]
pub struct Dashboard {
    started:  Instant,
    latest:   Instant,
    frames:   u64,
    detected: u64,
}

impl Dashboard {
    pub fn new(now: Instant) -> Self {
        Dashboard { started: now, latest: now, frames: 0, detected: 0 }
    }

    /// Count one processed frame.
    pub fn update(&mut self, hand_detected: bool, now: Instant) {
        self.frames += 1;
        if hand_detected {
            self.detected += 1;
        }
        if now > self.latest {
            self.latest = now;
        }
    }

    pub fn frames(&self) -> u64   { self.frames }
    pub fn detected(&self) -> u64 { self.detected }

    /// Frames per second since the dashboard started; 0 before any time has
    /// passed.
    pub fn fps(&self) -> f64 {
        let secs = self.latest.duration_since(self.started).as_secs_f64();
        if secs > 0.0 { self.frames as f64 / secs } else { 0.0 }
    }

    /// Percentage of frames with a hand, 0–100.
    pub fn detection_rate(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.detected as f64 / self.frames as f64 * 100.0
    }

    pub fn lines(&self) -> [String; 4] {
        [
            format!("FPS: {:.1}", self.fps()),
            format!("Detection: {:.1}%", self.detection_rate()),
            format!("Frames: {}", self.frames),
            format!("Detected: {}", self.detected),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_dashboard_reports_zeros() {
        let d = Dashboard::new(Instant::now());
        assert_eq!(d.fps(), 0.0);
        assert_eq!(d.detection_rate(), 0.0);
    }

    #[test]
    fn rates_follow_counts() {
        let t0 = Instant::now();
        let mut d = Dashboard::new(t0);
        for i in 1..=30u64 {
            d.update(i % 3 != 0, t0 + Duration::from_millis(i * 100));
        }
        assert_eq!(d.frames(), 30);
        assert_eq!(d.detected(), 20);
        assert!((d.fps() - 10.0).abs() < 1e-9);
        assert!((d.detection_rate() - 66.666).abs() < 0.01);
        assert_eq!(d.lines()[2], "Frames: 30");
    }
}
