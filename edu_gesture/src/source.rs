//! Hand landmark sources: a keyboard/mouse simulator and a recorded replay.
//!
//! The public interface is [`HandSource`]. The application doesn't need to
//! know whether landmarks came from a live detector, the simulator, or a file.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use gesture_engine::{LandmarkFrame, Point, RawHand, LANDMARK_COUNT};
use serde::Deserialize;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Detection / SourceError
// ════════════════════════════════════════════════════════════════════════════

/// What a detector saw in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detection {
    /// Capture time relative to the start of the source.
    pub at:    Duration,
    /// Zero or more hands; only the first one is used.
    pub hands: Vec<RawHand>,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot open landmark source {path}: {source}")]
    Open {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Landmark source read failed: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed landmark record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The source ran out of frames. Not a failure.
    #[error("Landmark source exhausted")]
    Exhausted,

    #[error("Landmark source disconnected")]
    Disconnected,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait: unified interface for sim and replay
// ════════════════════════════════════════════════════════════════════════════

pub trait HandSource {
    fn name(&self) -> String;

    /// Pixel size of the image the normalized landmarks refer to.
    fn frame_size(&self) -> (u32, u32);

    /// Block until the next frame is available and return what was detected.
    fn next_frame(&mut self) -> Result<Detection, SourceError>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Finger configurations the simulator can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPosture {
    IndexPoint,   // 1
    Fist,         // 2
    OpenPalm,     // 3
    Pinch,        // 4
    TwoFingers,   // 5
}

impl SimPosture {
    pub fn name(self) -> &'static str {
        match self {
            SimPosture::IndexPoint => "index point",
            SimPosture::Fist       => "fist",
            SimPosture::OpenPalm   => "open palm",
            SimPosture::Pinch      => "pinch",
            SimPosture::TwoFingers => "two fingers",
        }
    }

    /// Thumb, index, middle, ring, pinky.
    fn extended(self) -> [bool; 5] {
        match self {
            SimPosture::IndexPoint => [false, true,  false, false, false],
            SimPosture::Fist       => [false; 5],
            SimPosture::OpenPalm   => [true; 5],
            SimPosture::Pinch      => [false, true,  true,  true,  true ],
            SimPosture::TwoFingers => [false, true,  true,  false, false],
        }
    }
}

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position in window pixels; `None` when outside the window.
    Pointer(Option<(f32, f32)>),
    Posture(SimPosture),
    /// Show or hide the hand (simulates losing detection).
    ToggleHand,
}

/// Synthesizes a right hand, seen through a mirrored camera, whose index
/// fingertip follows the mouse.
///
/// The visualizer sends [`SimInput`] events over a channel; they are drained
/// at the start of every [`next_frame`](HandSource::next_frame).
pub struct SimHandSource {
    rx:      Receiver<SimInput>,
    width:   u32,
    height:  u32,
    pointer: Option<Point>,
    posture: SimPosture,
    visible: bool,
    started: Instant,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>, width: u32, height: u32) -> Self {
        SimHandSource {
            rx,
            width,
            height,
            pointer: None,
            posture: SimPosture::IndexPoint,
            visible: true,
            started: Instant::now(),
        }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer(p)  => self.pointer = p.map(|(x, y)| Point::new(x, y)),
            SimInput::Posture(p)  => self.posture = p,
            SimInput::ToggleHand  => self.visible = !self.visible,
        }
    }
}

impl HandSource for SimHandSource {
    fn name(&self) -> String {
        let shown = if self.visible { "" } else { ", hidden" };
        format!("Simulated hand ({}{})", self.posture.name(), shown)
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Detection, SourceError> {
        loop {
            match self.rx.try_recv() {
                Ok(input)                       => self.apply(input),
                Err(TryRecvError::Empty)        => break,
                Err(TryRecvError::Disconnected) => return Err(SourceError::Disconnected),
            }
        }

        let hands = match (self.visible, self.pointer) {
            (true, Some(tip)) => {
                let frame = synthesize_hand(self.posture, tip);
                vec![frame.to_normalized(self.width, self.height)]
            }
            _ => Vec::new(),
        };
        Ok(Detection { at: self.started.elapsed(), hands })
    }
}

/// Build a pixel-space hand in `posture` with the index fingertip at `tip`.
///
/// Geometry (offsets from the wrist, y up is negative): finger MCPs at −90,
/// PIPs at −130, extended tips at −180, curled tips at −100. The thumb tip
/// sits left of its IP joint when extended.
pub fn synthesize_hand(posture: SimPosture, tip: Point) -> LandmarkFrame {
    const FINGER_X: [f32; 4] = [-20.0, 0.0, 20.0, 38.0];
    let ext = posture.extended();

    let index_tip_dy = if ext[1] { -180.0 } else { -100.0 };
    let wx = tip.x - FINGER_X[0];
    let wy = tip.y - index_tip_dy;
    let at = |dx: f32, dy: f32| Point::new(wx + dx, wy + dy);

    let mut pts = [at(0.0, 0.0); LANDMARK_COUNT];
    pts[1] = at(-30.0, -20.0);
    pts[2] = at(-50.0, -45.0);
    pts[3] = at(-65.0, -65.0);
    pts[4] = match posture {
        SimPosture::Pinch => Point::new(tip.x + 6.0, tip.y + 8.0),
        _ if ext[0]       => at(-85.0, -80.0),
        _                 => at(-25.0, -60.0),
    };
    for (f, &fx) in FINGER_X.iter().enumerate() {
        let base = 5 + f * 4;
        pts[base]     = at(fx, -90.0);
        pts[base + 1] = at(fx, -130.0);
        if ext[f + 1] {
            pts[base + 2] = at(fx, -155.0);
            pts[base + 3] = at(fx, -180.0);
        } else {
            pts[base + 2] = at(fx, -115.0);
            pts[base + 3] = at(fx, -100.0);
        }
    }
    LandmarkFrame::new(pts)
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource: recorded landmarks, one JSON object per line
// ════════════════════════════════════════════════════════════════════════════

/// One line of a replay file:
///
/// ```json
/// {"t": 0.033, "hands": [[[0.51, 0.80], [0.48, 0.77], ...21 points]]}
/// ```
///
/// `hands` may be empty or omitted for frames without a detection.
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    t:     f64,
    #[serde(default)]
    hands: Vec<RawHand>,
}

pub struct ReplaySource<R> {
    reader: R,
    label:  String,
    line:   usize,
    width:  u32,
    height: u32,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut replay = Self::from_reader(BufReader::new(file), width, height);
        replay.label = format!("Replay {}", path.display());
        Ok(replay)
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R, width: u32, height: u32) -> Self {
        ReplaySource { reader, label: "Replay".to_string(), line: 0, width, height }
    }
}

impl<R: BufRead> HandSource for ReplaySource<R> {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frame(&mut self) -> Result<Detection, SourceError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(SourceError::Exhausted);
            }
            self.line += 1;
            if !buf.trim().is_empty() {
                break;
            }
        }

        let line = self.line;
        let record: ReplayRecord = serde_json::from_str(buf.trim())
            .map_err(|e| SourceError::Malformed { line, reason: e.to_string() })?;
        let at = Duration::try_from_secs_f64(record.t)
            .map_err(|e| SourceError::Malformed { line, reason: format!("bad timestamp: {}", e) })?;
        Ok(Detection { at, hands: record.hands })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
