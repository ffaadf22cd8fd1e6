//! # gesture_engine
//!
//! Turns per-frame hand landmarks into stable, debounced gesture events.
//!
//! ## Pipeline
//!
//! ```text
//! RawHand ──► LandmarkFrame ──► HandPosture ──► StabilityGate ──► classify_posture
//!                                                                    │
//!                                        StrokeTracker ◄─────────────┤
//!                                        SwipeDebouncer ◄────────────┘
//! ```
//!
//! [`SessionState::step`] runs the whole chain for one frame and returns a
//! [`FrameReport`]: exactly one [`GestureEvent`], plus an optional
//! [`StrokeSegment`] for the whiteboard.
//!
//! ## Gesture vocabulary
//!
//! | Event | Posture | Consumer action |
//! |---|---|---|
//! | `OpenPalm` | all five digits extended | pause, lift the pen |
//! | `Fist` | no digit extended | erase along the index tip path |
//! | `Pinch` | index tip close to thumb tip | zoom, lift the pen |
//! | `IndexPoint` | only the index finger extended | draw along the index tip path |
//! | `SwipeRight` | index point + fast wrist motion right | next slide |
//! | `SwipeLeft` | index point + fast wrist motion left | previous slide |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use gesture_engine::{GestureConfig, LandmarkFrame, RawHand, SessionState};
//!
//! let config  = GestureConfig::default();
//! let mut session = SessionState::new();
//!
//! # let raw = RawHand::default();
//! let frame  = LandmarkFrame::from_normalized(&raw, 1280, 720);
//! let report = session.step(Some(&frame), Instant::now(), &config);
//! println!("{}", report.gesture);
//! ```

pub mod config;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod session;
pub mod stroke;
pub mod swipe;
pub mod tracking;

pub use config::GestureConfig;
pub use error::ConfigError;
pub use gesture::{classify_posture, GestureEvent};
pub use landmarks::{HandPosture, LandmarkFrame, Point, RawHand, LANDMARK_COUNT};
pub use session::{FrameReport, SessionState};
pub use stroke::{Canvas, StrokeKind, StrokeSegment, StrokeTracker};
pub use swipe::{SwipeDebouncer, SwipeDirection};
pub use tracking::StabilityGate;
