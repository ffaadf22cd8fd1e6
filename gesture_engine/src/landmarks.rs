//! Landmark geometry: raw detector output → pixel-space frame → posture.
//!
//! Landmark indices follow the 21-point hand model used by common hand
//! landmark detectors (wrist = 0, fingertips = 4, 8, 12, 16, 20).

use serde::{Deserialize, Serialize};

/// Number of keypoints in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Fixed anatomical landmark indices.
pub mod idx {
    pub const WRIST:      usize = 0;
    pub const THUMB_IP:   usize = 2;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP:   usize = 14;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_TIP:  usize = 20;
}

/// (tip, pip) pairs for the four non-thumb fingers, index first.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (idx::INDEX_TIP,  idx::INDEX_PIP),
    (idx::MIDDLE_TIP, idx::MIDDLE_PIP),
    (idx::RING_TIP,   idx::RING_PIP),
    (idx::PINKY_TIP,  idx::PINKY_PIP),
];

/// Bone connections for drawing a hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// A 2-D position. Pixel space unless stated otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f32; 2]> for Point {
    fn from(p: [f32; 2]) -> Self {
        Point { x: p[0], y: p[1] }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RawHand: detector output, normalized to [0, 1]
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand as delivered by a detector: 21 points normalized to
/// image width and height.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawHand {
    pub points: [[f32; 2]; LANDMARK_COUNT],
}

impl RawHand {
    pub fn new(points: [[f32; 2]; LANDMARK_COUNT]) -> Self {
        RawHand { points }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame: pixel-space hand for one video frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Point; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        LandmarkFrame { points }
    }

    /// Scale normalized detector output to a `width` × `height` image.
    pub fn from_normalized(raw: &RawHand, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let points = raw.points.map(|[x, y]| Point::new(x * w, y * h));
        LandmarkFrame { points }
    }

    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Point     { self.points[idx::WRIST] }
    pub fn index_tip(&self) -> Point { self.points[idx::INDEX_TIP] }
    pub fn thumb_tip(&self) -> Point { self.points[idx::THUMB_TIP] }

    /// Back to normalized coordinates, e.g. for recording.
    pub fn to_normalized(&self, width: u32, height: u32) -> RawHand {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        RawHand { points: self.points.map(|p| [p.x / w, p.y / h]) }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandPosture: derived measurements
// ════════════════════════════════════════════════════════════════════════════

/// Per-frame measurements the classifier works from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPosture {
    /// Extended digits, 0–5.
    pub fingers_up:     u8,
    /// Thumb, index, middle, ring, pinky.
    pub extended:       [bool; 5],
    /// Index tip ↔ thumb tip, pixels.
    pub pinch_distance: f32,
    pub wrist_x:        f32,
    pub index_tip:      Point,
}

impl HandPosture {
    /// Measure a frame.
    ///
    /// A finger counts as extended when its tip is above (smaller y than) its
    /// PIP joint. The thumb counts as extended when its tip is left of its IP
    /// joint, which holds for a right hand seen through a mirrored camera; a
    /// left hand or an unmirrored feed reads the thumb backwards.
    pub fn from_frame(frame: &LandmarkFrame) -> Self {
        let thumb = frame.point(idx::THUMB_TIP).x < frame.point(idx::THUMB_IP).x;
        let mut extended = [thumb, false, false, false, false];
        for (i, &(tip, pip)) in FINGER_JOINTS.iter().enumerate() {
            extended[i + 1] = frame.point(tip).y < frame.point(pip).y;
        }
        let fingers_up = extended.iter().filter(|&&e| e).count() as u8;

        HandPosture {
            fingers_up,
            extended,
            pinch_distance: frame.index_tip().distance(frame.thumb_tip()),
            wrist_x:        frame.wrist().x,
            index_tip:      frame.index_tip(),
        }
    }

    pub fn thumb_extended(&self) -> bool { self.extended[0] }
    pub fn index_extended(&self) -> bool { self.extended[1] }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a pixel-space hand with the wrist at (`wx`, 400).
    ///
    /// `ext` = thumb, index, middle, ring, pinky.
    pub(crate) fn hand(wx: f32, ext: [bool; 5]) -> LandmarkFrame {
        let wy = 400.0;
        let mut pts = [Point::new(wx, wy); LANDMARK_COUNT];
        pts[1] = Point::new(wx - 30.0, wy - 20.0);
        pts[2] = Point::new(wx - 50.0, wy - 45.0);
        pts[3] = Point::new(wx - 65.0, wy - 65.0);
        pts[4] = if ext[0] {
            Point::new(wx - 85.0, wy - 80.0)
        } else {
            Point::new(wx - 25.0, wy - 60.0)
        };
        let xs = [-20.0, 0.0, 20.0, 38.0];
        for f in 0..4 {
            let base = 5 + f * 4;
            let x = wx + xs[f];
            pts[base]     = Point::new(x, wy - 90.0);
            pts[base + 1] = Point::new(x, wy - 130.0);
            if ext[f + 1] {
                pts[base + 2] = Point::new(x, wy - 155.0);
                pts[base + 3] = Point::new(x, wy - 180.0);
            } else {
                pts[base + 2] = Point::new(x, wy - 115.0);
                pts[base + 3] = Point::new(x, wy - 100.0);
            }
        }
        LandmarkFrame::new(pts)
    }

    #[test]
    fn open_hand_counts_five() {
        let p = HandPosture::from_frame(&hand(300.0, [true; 5]));
        assert_eq!(p.fingers_up, 5);
        assert!(p.thumb_extended());
    }

    #[test]
    fn closed_hand_counts_zero() {
        let p = HandPosture::from_frame(&hand(300.0, [false; 5]));
        assert_eq!(p.fingers_up, 0);
    }

    #[test]
    fn index_only() {
        let p = HandPosture::from_frame(&hand(300.0, [false, true, false, false, false]));
        assert_eq!(p.fingers_up, 1);
        assert!(p.index_extended());
        assert_eq!(p.index_tip, Point::new(280.0, 220.0));
    }

    #[test]
    fn pinky_only_is_one_finger_but_not_index() {
        let p = HandPosture::from_frame(&hand(300.0, [false, false, false, false, true]));
        assert_eq!(p.fingers_up, 1);
        assert!(!p.index_extended());
    }

    #[test]
    fn thumb_test_is_mirror_sensitive() {
        let mut f = hand(300.0, [false; 5]);
        // Thumb tip strictly left of the IP joint reads as extended.
        f.points[idx::THUMB_TIP] = Point::new(f.points[idx::THUMB_IP].x - 1.0, 340.0);
        assert!(HandPosture::from_frame(&f).thumb_extended());
        f.points[idx::THUMB_TIP] = Point::new(f.points[idx::THUMB_IP].x + 1.0, 340.0);
        assert!(!HandPosture::from_frame(&f).thumb_extended());
    }

    #[test]
    fn pinch_distance_is_euclidean() {
        let mut f = hand(300.0, [false; 5]);
        f.points[idx::INDEX_TIP] = Point::new(0.0, 0.0);
        f.points[idx::THUMB_TIP] = Point::new(3.0, 4.0);
        assert_eq!(HandPosture::from_frame(&f).pinch_distance, 5.0);
    }

    #[test]
    fn normalized_scales_to_pixels() {
        let mut raw = RawHand::default();
        raw.points[idx::WRIST] = [0.5, 0.25];
        let f = LandmarkFrame::from_normalized(&raw, 1280, 720);
        assert_eq!(f.wrist(), Point::new(640.0, 180.0));
        assert_eq!(f.to_normalized(1280, 720).points[idx::WRIST], [0.5, 0.25]);
    }

    #[test]
    fn raw_hand_serializes_as_bare_array() {
        let raw = RawHand::default();
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.starts_with("[[0.0,0.0],"));
        let back: RawHand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, raw);
    }
}
