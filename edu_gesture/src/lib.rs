//! # edu_gesture
//!
//! Hand-gesture presentation control with a virtual whiteboard. Landmarks
//! from a hand detector (or the built-in mouse simulator, or a recorded
//! replay) drive slide changes and freehand drawing.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Fingers | Action |
//! |---|---|---|
//! | Swipe right (fast wrist flick) | Index only | Right arrow, NEXT SLIDE |
//! | Swipe left | Index only | Left arrow, PREVIOUS SLIDE |
//! | Index point | Index only | Draw on the whiteboard |
//! | Fist | None | Erase (3× brush width) |
//! | Open palm | All five | Pause: lifts the pen |
//! | Pinch | Thumb tip near index tip | Zoom (shown only) |
//!
//! A hand must be tracked for more than `min_tracking_frames` consecutive
//! frames before any gesture is reported. Swipes are followed by a cooldown.
//!
//! ## Feature flags
//!
//! * (default): swipes are logged; no key events reach the OS.
//! * `keys`: real arrow-key presses through `enigo`.
//!
//! ### Window keys
//!
//! | Key | Command |
//! |---|---|
//! | `Q` | Quit (profile is saved) |
//! | `C` | Clear whiteboard |
//! | `S` | Save whiteboard PNG |
//! | `P` / `L` | Save / reload profile |
//! | `K` / `H` | Toggle / hide calibration panel |
//! | `↑` `↓` | Select calibration field |
//! | `←` `→` | Adjust calibration field |
//!
//! ### Simulator keys
//!
//! | Key | Hand |
//! |---|---|
//! | mouse | Index fingertip position |
//! | `1` | Index point |
//! | `2` | Fist |
//! | `3` | Open palm |
//! | `4` | Pinch |
//! | `5` | Two fingers (no gesture) |
//! | `0` | Show / hide the hand |

pub mod actions;
pub mod app;
pub mod calibration;
pub mod dashboard;
pub mod source;
pub mod visualizer;
