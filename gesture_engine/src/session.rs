//! Per-session state machine tying the gate, classifier, stroke tracker and
//! swipe debouncer together.
//!
//! All mutable tracking state lives in one owned [`SessionState`] that the
//! caller threads through [`SessionState::step`] once per video frame. Feeding
//! it a synthetic sequence of frames is all a test needs.

use std::time::Instant;

use tracing::debug;

use crate::config::GestureConfig;
use crate::gesture::{classify_posture, GestureEvent};
use crate::landmarks::{HandPosture, LandmarkFrame};
use crate::stroke::{StrokeSegment, StrokeTracker};
use crate::swipe::SwipeDebouncer;
use crate::tracking::StabilityGate;

/// Everything one frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// The event for this frame; a swipe overrides the `IndexPoint` shape.
    pub gesture:        GestureEvent,
    /// The finger-configuration label before any swipe upgrade.
    pub shape:          GestureEvent,
    /// Measurements, present whenever a hand was in the frame.
    pub posture:        Option<HandPosture>,
    /// Ink to lay on the whiteboard.
    pub segment:        Option<StrokeSegment>,
    /// Length of the current tracking run.
    pub tracked_frames: u32,
}

impl FrameReport {
    pub fn hand_detected(&self) -> bool {
        self.posture.is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SessionState {
    gate:   StabilityGate,
    swipe:  SwipeDebouncer,
    stroke: StrokeTracker,
    last_gesture: GestureEvent,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all tracking history, including the swipe cooldown.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn gate(&self) -> &StabilityGate     { &self.gate }
    pub fn swipe(&self) -> &SwipeDebouncer   { &self.swipe }
    pub fn stroke(&self) -> &StrokeTracker   { &self.stroke }
    pub fn last_gesture(&self) -> GestureEvent { self.last_gesture }

    /// Process one frame. `hand` is the first detected hand, if any.
    ///
    /// `config` is read fresh on every call, so live calibration edits take
    /// effect on the next frame.
    pub fn step(
        &mut self,
        hand:   Option<&LandmarkFrame>,
        now:    Instant,
        config: &GestureConfig,
    ) -> FrameReport {
        let report = match hand {
            None        => self.lose_hand(),
            Some(frame) => self.track_hand(frame, now, config),
        };
        if report.gesture != self.last_gesture {
            debug!("gesture {} -> {}", self.last_gesture, report.gesture);
            self.last_gesture = report.gesture;
        }
        report
    }

    fn lose_hand(&mut self) -> FrameReport {
        self.gate.lose();
        self.stroke.release();
        FrameReport::default()
    }

    fn track_hand(
        &mut self,
        frame:  &LandmarkFrame,
        now:    Instant,
        config: &GestureConfig,
    ) -> FrameReport {
        let posture = HandPosture::from_frame(frame);
        let tracked_frames = self.gate.observe();

        if !self.gate.is_stable(config.min_tracking_frames) {
            // Keep the baseline fresh so reaching stability is not itself a jump.
            self.gate.set_wrist(posture.wrist_x);
            self.stroke.release();
            return FrameReport {
                posture: Some(posture),
                tracked_frames,
                ..FrameReport::default()
            };
        }

        let shape = classify_posture(&posture, config);
        let segment = self.stroke.advance(shape, posture.index_tip);

        let gesture = match shape {
            GestureEvent::IndexPoint => self
                .swipe
                .check(self.gate.last_wrist_x(), posture.wrist_x, now, config)
                .map(GestureEvent::from)
                .unwrap_or(shape),
            _ => shape,
        };
        self.gate.set_wrist(posture.wrist_x);

        FrameReport {
            gesture,
            shape,
            posture: Some(posture),
            segment,
            tracked_frames,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
