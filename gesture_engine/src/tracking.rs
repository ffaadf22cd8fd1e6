//! Stability gate: trust a hand only after it has been tracked for a while.

/// Consecutive-frame counter plus the wrist position seen on the previous
/// tracked frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StabilityGate {
    consecutive_frames: u32,
    last_wrist_x:       Option<f32>,
}

impl StabilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame with a hand. Returns the new run length (1 on the first
    /// frame after a loss).
    pub fn observe(&mut self) -> u32 {
        self.consecutive_frames = self.consecutive_frames.saturating_add(1);
        self.consecutive_frames
    }

    /// Record a frame without a hand.
    pub fn lose(&mut self) {
        self.consecutive_frames = 0;
        self.last_wrist_x = None;
    }

    /// True once the run is strictly longer than `min_frames`.
    pub fn is_stable(&self, min_frames: u32) -> bool {
        self.consecutive_frames > min_frames
    }

    pub fn consecutive_frames(&self) -> u32 {
        self.consecutive_frames
    }

    pub fn last_wrist_x(&self) -> Option<f32> {
        self.last_wrist_x
    }

    /// Remember this frame's wrist for the next frame's swipe test.
    pub fn set_wrist(&mut self, wrist_x: f32) {
        self.last_wrist_x = Some(wrist_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_starts_at_one() {
        let mut g = StabilityGate::new();
        assert_eq!(g.observe(), 1);
        assert_eq!(g.observe(), 2);
    }

    #[test]
    fn stable_only_after_more_than_min_frames() {
        let mut g = StabilityGate::new();
        for _ in 0..3 {
            g.observe();
            assert!(!g.is_stable(3));
        }
        g.observe();
        assert!(g.is_stable(3));
    }

    #[test]
    fn zero_min_frames_is_stable_from_the_first_frame() {
        let mut g = StabilityGate::new();
        g.observe();
        assert!(g.is_stable(0));
    }

    #[test]
    fn loss_resets_everything() {
        let mut g = StabilityGate::new();
        g.observe();
        g.observe();
        g.set_wrist(120.0);
        g.lose();
        assert_eq!(g.consecutive_frames(), 0);
        assert_eq!(g.last_wrist_x(), None);
        assert_eq!(g.observe(), 1);
    }
}
