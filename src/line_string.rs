//! Open polylines.

use std::sync::Arc;

use crate::env;
use crate::index::IndexStyle;
use crate::point::Point;
use crate::rect::Rect;
use crate::ring::RingData;
use crate::segment::{Segment, SegmentIntersection};

/// A series of contiguous line segments.
///
/// Structurally a [`Ring`](crate::Ring) that is not closed: it shares
/// the single-pass builder and the natural index, but has no area, no
/// closure point, and never carries a y-stripes index.
///
/// ```
/// use flatgeom::{LineString, Point};
///
/// let line = LineString::new(vec![
///     Point::new(0., 0.),
///     Point::new(5., 5.),
///     Point::new(10., 0.),
/// ]);
/// assert_eq!(line.num_segments(), 2);
/// assert!(line.covers_point(Point::new(2.5, 2.5)));
/// ```
#[derive(Clone, Debug)]
pub struct LineString(pub(crate) Arc<RingData>);

impl LineString {
    /// Builds a line with the process-default index style and spread.
    pub fn new(points: Vec<Point>) -> LineString {
        LineString::with_index(points, env::default_index())
    }

    /// Builds a line with an explicit index style. `YStripes` is not
    /// available for open lines and falls back to `Natural`.
    pub fn with_index(points: Vec<Point>, style: IndexStyle) -> LineString {
        LineString::with_index_and_spread(points, style, env::default_index_spread())
    }

    pub fn with_index_and_spread(points: Vec<Point>, style: IndexStyle, spread: usize) -> LineString {
        LineString(Arc::new(RingData::build(points, false, style, spread)))
    }

    pub fn points(&self) -> &[Point] {
        &self.0.points
    }

    pub fn num_segments(&self) -> usize {
        self.0.nsegs
    }

    pub fn segment(&self, i: usize) -> Option<Segment> {
        (i < self.0.nsegs).then(|| self.0.segment_at(i))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.0.nsegs).map(|i| self.0.segment_at(i))
    }

    pub fn rect(&self) -> Rect {
        self.0.rect
    }

    /// A line with fewer than two points is empty.
    pub fn is_empty(&self) -> bool {
        self.0.empty
    }

    pub fn length(&self) -> f64 {
        self.segments()
            .map(|s| {
                let d = s.b - s.a;
                (d.x * d.x + d.y * d.y).sqrt()
            })
            .sum()
    }

    /// Visits `(segment, index)` pairs whose rect intersects `qrect`.
    pub fn search(&self, qrect: Rect, mut visit: impl FnMut(Segment, usize) -> bool) -> bool {
        self.0
            .search_segments(&qrect, &mut |i| visit(self.0.segment_at(i), i))
    }

    /// True when `p` lies on the line.
    pub fn covers_point(&self, p: Point) -> bool {
        if self.0.empty || !self.0.rect.covers_point(p) {
            return false;
        }
        let mut on = false;
        self.0.search_segments(&p.rect(), &mut |i| {
            if self.0.segment_at(i).covers_point(p) {
                on = true;
                return false;
            }
            true
        });
        on
    }

    /// True when `p` lies on the line but is not one of its two terminal
    /// points (a line's boundary).
    pub fn contains_point(&self, p: Point) -> bool {
        if !self.covers_point(p) {
            return false;
        }
        !(p.coincident(self.0.first()) || p.coincident(self.0.last()))
    }

    pub(crate) fn terminal(&self, p: Point) -> bool {
        p.coincident(self.0.first()) || p.coincident(self.0.last())
    }

    /// True when any segment of `self` meets any segment of `other`.
    /// With `allow_on_edge` false, only contact between the two lines'
    /// interiors counts: meeting solely at terminal points does not.
    pub fn intersects_line(&self, other: &LineString, allow_on_edge: bool) -> bool {
        if self.0.empty || other.0.empty {
            return false;
        }
        if !self.0.rect.intersects(&other.0.rect) {
            return false;
        }
        // drive the shorter line over the longer one's index
        let swap = self.0.nsegs > other.0.nsegs;
        let (small, big) = if swap { (other, self) } else { (self, other) };
        let mut hit = false;
        for i in 0..small.0.nsegs {
            let gs = small.0.segment_at(i);
            let done = big.0.search_segments(&gs.rect(), &mut |j| {
                let gb = big.0.segment_at(j);
                if allow_on_edge {
                    if gs.intersects(&gb) {
                        hit = true;
                        return false;
                    }
                    return true;
                }
                match gs.intersection(&gb) {
                    Some(SegmentIntersection::Overlap(..)) => {
                        // a positive-length collinear run is interior
                        // contact no matter where it sits
                        hit = true;
                        false
                    }
                    Some(SegmentIntersection::Point(p)) => {
                        // a single contact point is interior contact only
                        // when it is a terminal of neither line
                        if !small.terminal(p) && !big.terminal(p) {
                            hit = true;
                            return false;
                        }
                        true
                    }
                    None => true,
                }
            });
            if !done {
                break;
            }
        }
        hit
    }

    /// True when every point of `other` lies on `self`.
    ///
    /// Collinear overlaps are merged per segment of `other`: a segment
    /// is covered when the pieces of `self` collinear with it join up to
    /// its full parameter range.
    pub fn covers_line(&self, other: &LineString) -> bool {
        if self.0.empty || other.0.empty {
            return false;
        }
        if !self.0.rect.covers(&other.0.rect) {
            return false;
        }
        for i in 0..other.0.nsegs {
            if !self.covers_segment(other.0.segment_at(i)) {
                return false;
            }
        }
        true
    }

    /// True when the whole of `s` lies on this line.
    pub fn covers_segment(&self, s: Segment) -> bool {
        if self.0.empty || !self.0.rect.covers(&s.rect()) {
            return false;
        }
        let d = s.b - s.a;
        let len2 = d.x * d.x + d.y * d.y;
        if len2 == 0.0 {
            return self.covers_point(s.a);
        }
        // collect the [0,1] parameter intervals of s covered by collinear
        // pieces of self, then check the union reaches from 0 to 1
        let mut spans: Vec<(f64, f64)> = Vec::new();
        self.0.search_segments(&s.rect(), &mut |i| {
            let g = self.0.segment_at(i);
            if let Some(SegmentIntersection::Overlap(p0, p1)) = s.intersection(&g) {
                let t0 = ((p0 - s.a).x * d.x + (p0 - s.a).y * d.y) / len2;
                let t1 = ((p1 - s.a).x * d.x + (p1 - s.a).y * d.y) / len2;
                spans.push(if t0 <= t1 { (t0, t1) } else { (t1, t0) });
            }
            true
        });
        if spans.is_empty() {
            return false;
        }
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut reach = 0.0;
        for (t0, t1) in spans {
            if t0 > reach {
                return false;
            }
            reach = reach.max(t1);
            if reach >= 1.0 {
                return true;
            }
        }
        false
    }
}
