//! Closed rings and the shared ring/line core.
//!
//! [`Ring`] and [`LineString`](crate::LineString) are the same structure
//! underneath: a point sequence scanned once at construction to produce
//! the bounding rect, winding, convexity, area, and (usually) a natural
//! index over the segments. A ring is closed, with its stored points
//! always ending in a copy of the first point; a line is open.

use std::sync::Arc;

use crate::env;
use crate::index::natural::{IndexRect, NaturalIndex};
use crate::index::ystripes::YStripes;
use crate::index::{clamp_spread, IndexStyle};
use crate::point::Point;
use crate::rect::Rect;
use crate::segment::{collinear, RaySide, Segment};

/// Result of a ring point-containment query.
///
/// When the point lies exactly on the ring's boundary, `edge` carries
/// the index of the segment it was found on and `hit` reports whether
/// the query treated the boundary as inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointLocation {
    pub hit: bool,
    pub edge: Option<usize>,
}

impl PointLocation {
    const MISS: PointLocation = PointLocation {
        hit: false,
        edge: None,
    };
}

/// The shared ring/line representation. Public types wrap this in an
/// `Arc`, so cloning any geometry is a reference-count bump.
#[derive(Debug)]
pub(crate) struct RingData {
    pub(crate) points: Box<[Point]>,
    pub(crate) closed: bool,
    pub(crate) nsegs: usize,
    pub(crate) rect: Rect,
    pub(crate) convex: bool,
    pub(crate) clockwise: bool,
    pub(crate) area: f64,
    pub(crate) empty: bool,
    pub(crate) index: Option<NaturalIndex>,
    pub(crate) ystripes: Option<YStripes>,
}

fn orient_sign(a: Point, b: Point, c: Point) -> i8 {
    let v = robust::orient2d(
        robust::Coord { x: a.x, y: a.y },
        robust::Coord { x: b.x, y: b.y },
        robust::Coord { x: c.x, y: c.y },
    );
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

impl RingData {
    /// The single-pass builder behind every ring and line constructor.
    ///
    /// One walk over the points computes the bounding rect, the
    /// clockwise accumulator, the convexity test, the area, and the
    /// natural index's leaf rects. Upper index levels are grouped
    /// bottom-up afterwards.
    pub fn build(points: Vec<Point>, closed: bool, style: IndexStyle, spread: usize) -> RingData {
        let mut points = points;
        if closed {
            match (points.first().copied(), points.last().copied()) {
                (Some(first), Some(last)) if !first.coincident(last) => points.push(first),
                _ => {}
            }
        }
        let nsegs = points.len().saturating_sub(1);
        let empty = if closed {
            nsegs < 3
        } else {
            points.len() < 2
        };
        let spread = clamp_spread(spread);
        let index_wanted = style != IndexStyle::None && !empty && nsegs >= spread * 2;
        let stripes_wanted = style == IndexStyle::YStripes && closed && !empty;

        let mut rect = points.first().copied().unwrap_or_default().rect();
        let mut cwc = 0.0;
        let mut convex = true;
        let mut dir: i8 = 0;
        let mut leaf: Vec<IndexRect> = if index_wanted {
            Vec::with_capacity(nsegs.div_ceil(spread))
        } else {
            Vec::new()
        };
        let mut group = Rect::default();

        for i in 0..nsegs {
            let a = points[i];
            let b = points[i + 1];
            if index_wanted {
                if i % spread == 0 {
                    if i > 0 {
                        leaf.push(IndexRect::from_rect(&group));
                    }
                    group = Segment { a, b }.rect();
                } else {
                    group.expand_point(a);
                    group.expand_point(b);
                }
            }
            rect.expand_point(b);
            cwc += (b.x - a.x) * (b.y + a.y);
            if convex {
                // next vertex, wrapping through the closure point
                let c = if closed {
                    let k = i + 2;
                    points[if k > nsegs { k - nsegs } else { k }]
                } else if i + 2 <= nsegs {
                    points[i + 2]
                } else {
                    continue;
                };
                let sign = orient_sign(a, b, c);
                if sign != 0 {
                    if dir == 0 {
                        dir = sign;
                    } else if sign != dir {
                        convex = false;
                    }
                }
            }
        }
        if index_wanted {
            leaf.push(IndexRect::from_rect(&group));
        }

        let clockwise = cwc > 0.0;
        let area = if closed { cwc.abs() / 2.0 } else { 0.0 };
        let index = if index_wanted {
            log::trace!(
                "natural index: nsegs={} spread={} leaves={}",
                nsegs,
                spread,
                leaf.len()
            );
            Some(NaturalIndex::from_leaf_rects(nsegs, spread, leaf))
        } else {
            None
        };
        let ystripes =
            stripes_wanted.then(|| YStripes::new(&points, nsegs, &rect, area));

        RingData {
            points: points.into_boxed_slice(),
            closed,
            nsegs,
            rect,
            convex,
            clockwise,
            area,
            empty,
            index,
            ystripes,
        }
    }

    #[inline]
    pub fn segment_at(&self, i: usize) -> Segment {
        Segment {
            a: self.points[i],
            b: self.points[i + 1],
        }
    }

    /// First point, used as the containment probe for whole-geometry
    /// tests.
    pub fn first(&self) -> Point {
        self.points.first().copied().unwrap_or_default()
    }

    pub fn last(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    /// Yields indices of segments whose rect intersects `qrect`, through
    /// the natural index when one exists. The visitor returns `false` to
    /// stop; the function reports whether the traversal completed.
    pub fn search_segments(&self, qrect: &Rect, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        if let Some(ix) = &self.index {
            ix.search(qrect, &mut |i| {
                if self.segment_at(i).rect().intersects(qrect) {
                    visit(i)
                } else {
                    true
                }
            })
        } else {
            for i in 0..self.nsegs {
                if self.segment_at(i).rect().intersects(qrect) && !visit(i) {
                    return false;
                }
            }
            true
        }
    }

    /// Point-in-polygon. Only meaningful for closed rings.
    ///
    /// Accelerator preference: y-stripes, then the natural index, then a
    /// sequential scan.
    pub fn contains_point(&self, p: Point, allow_on_edge: bool) -> PointLocation {
        debug_assert!(self.closed);
        if self.empty || !self.rect.covers_point(p) {
            return PointLocation::MISS;
        }
        let mut inside = false;
        let mut edge = None;
        let mut classify = |i: usize| -> bool {
            match self.segment_at(i).raycast(p) {
                RaySide::On => {
                    edge = Some(i);
                    false
                }
                RaySide::In => {
                    inside = !inside;
                    true
                }
                RaySide::Out => true,
            }
        };
        if let Some(ys) = &self.ystripes {
            for &i in ys.candidates(p.y) {
                if !classify(i as usize) {
                    break;
                }
            }
        } else if let Some(ix) = &self.index {
            ix.pip_candidates(p, &mut classify);
        } else {
            for i in 0..self.nsegs {
                if !classify(i) {
                    break;
                }
            }
        }
        match edge {
            Some(i) => PointLocation {
                hit: allow_on_edge,
                edge: Some(i),
            },
            None => PointLocation {
                hit: inside,
                edge: None,
            },
        }
    }

    /// True when the whole chord `s` stays inside the ring.
    pub fn contains_segment(&self, s: Segment, allow_on_edge: bool) -> bool {
        debug_assert!(self.closed);
        if self.empty || !self.rect.covers(&s.rect()) {
            return false;
        }
        let ra = self.contains_point(s.a, true);
        if !ra.hit {
            return false;
        }
        let rb = self.contains_point(s.b, true);
        if !rb.hit {
            return false;
        }
        if !allow_on_edge && (ra.edge.is_some() || rb.edge.is_some()) {
            return false;
        }
        if self.convex {
            return true;
        }
        if allow_on_edge {
            if let (Some(i), Some(j)) = (ra.edge, rb.edge) {
                if i == j {
                    return true;
                }
                let (i, j) = if i < j { (i, j) } else { (j, i) };
                let gi = self.segment_at(i);
                let gj = self.segment_at(j);
                // Both endpoints can sit on one edge even when they were
                // reported against different (vertex-sharing) segments.
                if gi.covers_point(s.b) || gj.covers_point(s.a) {
                    return true;
                }
                // A quad stitched from the two host edges, in ring
                // order, winds with the ring exactly when the chord runs
                // through the interior.
                let quad = [gi.a, gi.b, gj.a, gj.b];
                let mut cwc = 0.0;
                for k in 0..4 {
                    let a = quad[k];
                    let b = quad[(k + 1) % 4];
                    cwc += (b.x - a.x) * (b.y + a.y);
                }
                if (cwc > 0.0) != self.clockwise {
                    return false;
                }
            }
        }
        // The chord may not cross any other ring segment.
        let mut crossed = false;
        self.search_segments(&s.rect(), &mut |k| {
            if Some(k) == ra.edge || Some(k) == rb.edge {
                return true;
            }
            let g = self.segment_at(k);
            if !g.intersects(&s) {
                return true;
            }
            if allow_on_edge
                && (g.a.coincident(s.a)
                    || g.a.coincident(s.b)
                    || g.b.coincident(s.a)
                    || g.b.coincident(s.b))
            {
                return true;
            }
            crossed = true;
            false
        });
        !crossed
    }

    /// True when `s` meets the ring's closure (`allow_on_edge`) or its
    /// interior (`!allow_on_edge`).
    pub fn intersects_segment(&self, s: Segment, allow_on_edge: bool) -> bool {
        debug_assert!(self.closed);
        if self.empty || !self.rect.intersects(&s.rect()) {
            return false;
        }
        if self.contains_point(s.a, allow_on_edge).hit
            || self.contains_point(s.b, allow_on_edge).hit
        {
            return true;
        }
        let mut hit = false;
        let mut crossings = 0;
        self.search_segments(&s.rect(), &mut |k| {
            let g = self.segment_at(k);
            if !g.intersects(&s) {
                return true;
            }
            if allow_on_edge {
                hit = true;
                return false;
            }
            // Strict mode only counts transversal crossings. Collinear
            // contact, and contact pinned to either segment's endpoint
            // (a ring vertex on the chord, or a chord endpoint on the
            // ring), are boundary touches.
            if collinear(g.a, g.b, s.a) && collinear(g.a, g.b, s.b) {
                return true;
            }
            if s.covers_point(g.a)
                || s.covers_point(g.b)
                || g.covers_point(s.a)
                || g.covers_point(s.b)
            {
                return true;
            }
            crossings += 1;
            if crossings >= 2 {
                hit = true;
                return false;
            }
            true
        });
        if !allow_on_edge && !hit {
            // A chord that only grazes the boundary at its endpoints can
            // still run through the interior.
            let mid = Point::new((s.a.x + s.b.x) / 2.0, (s.a.y + s.b.y) / 2.0);
            hit = self.contains_point(mid, false).hit;
        }
        hit
    }

    /// Ring-in-ring containment. Both rings must be closed.
    pub fn contains_ring(&self, other: &RingData, allow_on_edge: bool) -> bool {
        debug_assert!(self.closed && other.closed);
        if self.empty || other.empty {
            return false;
        }
        if !self.rect.covers(&other.rect) {
            return false;
        }
        if self.convex {
            for i in 0..other.nsegs {
                if !self.contains_point(other.points[i], allow_on_edge).hit {
                    return false;
                }
            }
            return true;
        }
        for i in 0..other.nsegs {
            if !self.contains_segment(other.segment_at(i), allow_on_edge) {
                return false;
            }
        }
        true
    }

    /// Ring-ring intersection. The smaller ring's segments are driven
    /// against the larger ring's index.
    pub fn intersects_ring(&self, other: &RingData, allow_on_edge: bool) -> bool {
        debug_assert!(self.closed && other.closed);
        if self.empty || other.empty {
            return false;
        }
        if !self.rect.intersects(&other.rect) {
            return false;
        }
        let (small, big) = if self.area <= other.area {
            (self, other)
        } else {
            (other, self)
        };
        if allow_on_edge {
            if boundaries_meet(small, big) {
                return true;
            }
            // No boundary contact: either disjoint or one ring encloses
            // the other.
            return big.contains_point(small.first(), true).hit
                || small.contains_point(big.first(), true).hit;
        }
        for i in 0..small.nsegs {
            if big.intersects_segment(small.segment_at(i), false) {
                return true;
            }
        }
        // Enclosure with boundary-only contact still intersects
        // interiors: a region of positive area inside the closure of
        // another ring must overlap its interior.
        small.contains_ring(big, true) || big.contains_ring(small, true)
    }

    /// True when every segment of the open path `line` stays inside this
    /// ring.
    pub fn contains_line(&self, line: &RingData, allow_on_edge: bool) -> bool {
        debug_assert!(self.closed);
        if self.empty || line.empty {
            return false;
        }
        if !self.rect.covers(&line.rect) {
            return false;
        }
        for i in 0..line.nsegs {
            if !self.contains_segment(line.segment_at(i), allow_on_edge) {
                return false;
            }
        }
        true
    }

    /// True when any segment of the open path `line` meets this ring.
    pub fn intersects_line(&self, line: &RingData, allow_on_edge: bool) -> bool {
        debug_assert!(self.closed);
        if self.empty || line.empty {
            return false;
        }
        if !self.rect.intersects(&line.rect) {
            return false;
        }
        for i in 0..line.nsegs {
            if self.intersects_segment(line.segment_at(i), allow_on_edge) {
                return true;
            }
        }
        false
    }
}

/// Any segment-pair contact between two closed rings, found through the
/// dual index descent when both sides carry one.
fn boundaries_meet(a: &RingData, b: &RingData) -> bool {
    let mut found = false;
    match (&a.index, &b.index) {
        (Some(ia), Some(ib)) => {
            crate::index::natural::search_pair(
                ia,
                &|i| a.segment_at(i).rect(),
                ib,
                &|j| b.segment_at(j).rect(),
                &mut |i, j| {
                    if a.segment_at(i).intersects(&b.segment_at(j)) {
                        found = true;
                        return false;
                    }
                    true
                },
            );
        }
        _ => {
            for i in 0..a.nsegs {
                let ga = a.segment_at(i);
                let done = b.search_segments(&ga.rect(), &mut |j| {
                    if ga.intersects(&b.segment_at(j)) {
                        found = true;
                        return false;
                    }
                    true
                });
                if !done {
                    break;
                }
            }
        }
    }
    found
}

/// A closed, non-self-intersecting sequence of points.
///
/// The stored point sequence always ends with a copy of the first point;
/// segment `i` joins points `i` and `i + 1` without any wrap-around
/// check. Construction computes the bounding rect, winding order,
/// convexity, area, and index in a single pass over the points.
///
/// ```
/// use flatgeom::{Point, Ring};
///
/// let ring = Ring::new(vec![
///     Point::new(0., 0.),
///     Point::new(10., 0.),
///     Point::new(10., 10.),
///     Point::new(0., 10.),
/// ]);
/// assert_eq!(ring.num_segments(), 4);
/// assert_eq!(ring.area(), 100.);
/// assert!(ring.is_convex());
/// assert!(!ring.is_clockwise());
/// assert!(ring.contains_point(Point::new(5., 5.), true).hit);
/// ```
#[derive(Clone, Debug)]
pub struct Ring(pub(crate) Arc<RingData>);

impl Ring {
    /// Builds a closed ring with the process-default index style and
    /// spread.
    pub fn new(points: Vec<Point>) -> Ring {
        Ring::with_index(points, env::default_index())
    }

    /// Builds a closed ring with an explicit index style.
    pub fn with_index(points: Vec<Point>, style: IndexStyle) -> Ring {
        Ring::with_index_and_spread(points, style, env::default_index_spread())
    }

    /// Builds a closed ring with an explicit index style and fan-out.
    /// The spread is clamped to `2..=4096`.
    pub fn with_index_and_spread(points: Vec<Point>, style: IndexStyle, spread: usize) -> Ring {
        Ring(Arc::new(RingData::build(points, true, style, spread)))
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

    /// The unsigned shoelace area.
    pub fn area(&self) -> f64 {
        self.0.area
    }

    pub fn perimeter(&self) -> f64 {
        self.segments()
            .map(|s| {
                let d = s.b - s.a;
                (d.x * d.x + d.y * d.y).sqrt()
            })
            .sum()
    }

    /// The Polsby-Popper compactness score `4πA/P²`: 1 for a circle,
    /// toward 0 for spiky shapes. This is the heuristic that sizes the
    /// y-stripes index.
    pub fn polsby_popper(&self) -> f64 {
        crate::index::ystripes::polsby_popper(self.area(), self.perimeter())
    }

    pub fn is_convex(&self) -> bool {
        self.0.convex
    }

    pub fn is_clockwise(&self) -> bool {
        self.0.clockwise
    }

    /// A ring with fewer than three distinct points is empty and all
    /// predicates over it are false.
    pub fn is_empty(&self) -> bool {
        self.0.empty
    }

    /// Locates `p` relative to the ring: inside, outside, or on an
    /// edge.
    pub fn contains_point(&self, p: Point, allow_on_edge: bool) -> PointLocation {
        self.0.contains_point(p, allow_on_edge)
    }

    pub fn contains_segment(&self, s: Segment, allow_on_edge: bool) -> bool {
        self.0.contains_segment(s, allow_on_edge)
    }

    pub fn intersects_segment(&self, s: Segment, allow_on_edge: bool) -> bool {
        self.0.intersects_segment(s, allow_on_edge)
    }

    pub fn contains_ring(&self, other: &Ring, allow_on_edge: bool) -> bool {
        self.0.contains_ring(&other.0, allow_on_edge)
    }

    pub fn intersects_ring(&self, other: &Ring, allow_on_edge: bool) -> bool {
        self.0.intersects_ring(&other.0, allow_on_edge)
    }

    /// Visits `(segment, index)` pairs whose rect intersects `qrect`.
    /// Return `false` from the visitor to stop early; the call reports
    /// whether the traversal ran to completion.
    pub fn search(&self, qrect: Rect, mut visit: impl FnMut(Segment, usize) -> bool) -> bool {
        self.0
            .search_segments(&qrect, &mut |i| visit(self.0.segment_at(i), i))
    }
}
