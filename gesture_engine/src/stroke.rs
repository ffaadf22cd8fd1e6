//! Stroke continuity: join per-frame index tip samples into line segments.
//!
//! Consecutive pen (or eraser) frames are connected with a straight segment
//! from the previous tip to the current one. Fast motion therefore cuts
//! corners; that is accepted.

use crate::gesture::GestureEvent;
use crate::landmarks::Point;

/// Anything strokes can be applied to.
pub trait Canvas {
    fn draw_line(&mut self, from: Point, to: Point);
    fn erase_line(&mut self, from: Point, to: Point);
    fn clear(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeKind {
    Draw,
    Erase,
}

/// One segment to lay down between two consecutive frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeSegment {
    pub kind: StrokeKind,
    pub from: Point,
    pub to:   Point,
}

impl StrokeSegment {
    pub fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self.kind {
            StrokeKind::Draw  => canvas.draw_line(self.from, self.to),
            StrokeKind::Erase => canvas.erase_line(self.from, self.to),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StrokeTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeTracker {
    last_contact: Option<Point>,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_contact(&self) -> Option<Point> {
        self.last_contact
    }

    /// Feed one classified shape.
    ///
    /// `Fist` and `IndexPoint` emit a segment from the previous contact (if
    /// any) and then move the contact to `tip`; every other shape lifts the
    /// pen.
    pub fn advance(&mut self, shape: GestureEvent, tip: Point) -> Option<StrokeSegment> {
        let kind = match shape {
            GestureEvent::Fist       => StrokeKind::Erase,
            GestureEvent::IndexPoint => StrokeKind::Draw,
            _ => {
                self.release();
                return None;
            }
        };
        let segment = self.last_contact.map(|from| StrokeSegment { kind, from, to: tip });
        self.last_contact = Some(tip);
        segment
    }

    /// Lift the pen; the next stroke frame starts fresh.
    pub fn release(&mut self) {
        self.last_contact = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every call instead of rasterising.
    #[derive(Default, Debug)]
    pub(crate) struct RecordingCanvas {
        pub drawn:   Vec<(Point, Point)>,
        pub erased:  Vec<(Point, Point)>,
        pub clears:  usize,
    }

    impl Canvas for RecordingCanvas {
        fn draw_line(&mut self, from: Point, to: Point)  { self.drawn.push((from, to)); }
        fn erase_line(&mut self, from: Point, to: Point) { self.erased.push((from, to)); }
        fn clear(&mut self)                              { self.clears += 1; }
    }

    const A: Point = Point::new(10.0, 10.0);
    const B: Point = Point::new(20.0, 15.0);
    const C: Point = Point::new(30.0, 40.0);

    #[test]
    fn first_stroke_frame_only_sets_contact() {
        let mut t = StrokeTracker::new();
        assert_eq!(t.advance(GestureEvent::IndexPoint, A), None);
        assert_eq!(t.last_contact(), Some(A));
    }

    #[test]
    fn two_fists_erase_once() {
        let mut t = StrokeTracker::new();
        let mut canvas = RecordingCanvas::default();
        for (shape, tip) in [(GestureEvent::Fist, A), (GestureEvent::Fist, B)] {
            if let Some(seg) = t.advance(shape, tip) {
                seg.apply(&mut canvas);
            }
        }
        assert_eq!(canvas.erased, vec![(A, B)]);
        assert!(canvas.drawn.is_empty());
    }

    #[test]
    fn open_palm_breaks_the_stroke() {
        let mut t = StrokeTracker::new();
        t.advance(GestureEvent::Fist, A);
        assert_eq!(t.advance(GestureEvent::OpenPalm, B), None);
        assert_eq!(t.last_contact(), None);
        assert_eq!(t.advance(GestureEvent::Fist, C), None);
    }

    #[test]
    fn switching_pen_to_eraser_connects_with_the_new_kind() {
        let mut t = StrokeTracker::new();
        t.advance(GestureEvent::IndexPoint, A);
        let seg = t.advance(GestureEvent::Fist, B).unwrap();
        assert_eq!(seg, StrokeSegment { kind: StrokeKind::Erase, from: A, to: B });
    }

    #[test]
    fn draw_segments_chain() {
        let mut t = StrokeTracker::new();
        let segs: Vec<_> = [A, B, C]
            .into_iter()
            .filter_map(|p| t.advance(GestureEvent::IndexPoint, p))
            .collect();
        assert_eq!(segs.len(), 2);
        assert_eq!((segs[0].from, segs[0].to), (A, B));
        assert_eq!((segs[1].from, segs[1].to), (B, C));
    }
}
