//! Segment buckets striped by y-coordinate.
//!
//! For very concave closed rings the natural index can descend into many
//! branches that all straddle the query's y. Striping trades that for a
//! single bucket lookup: every segment is registered in each stripe its
//! y-span touches, and a point-in-polygon query only ever scans one
//! stripe's list.

use std::f64::consts::PI;

use crate::point::Point;
use crate::rect::Rect;

#[derive(Clone, Copy, Debug)]
struct StripeRange {
    start: u32,
    end: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct YStripes {
    min_y: f64,
    scale: f64,
    stripes: Box<[StripeRange]>,
    /// Segment indices for every stripe, packed back to back in stripe
    /// order.
    entries: Box<[u32]>,
}

/// `4πA/P²`: 1 for a circle, approaching 0 for spiky shapes.
pub(crate) fn polsby_popper(area: f64, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }
    4.0 * PI * area / (perimeter * perimeter)
}

impl YStripes {
    /// Builds stripes over a closed ring's segments. `points` includes
    /// the closure point, so segment `i` is `(points[i], points[i+1])`
    /// for `i < nsegs`.
    pub fn new(points: &[Point], nsegs: usize, rect: &Rect, area: f64) -> YStripes {
        let mut perimeter = 0.0;
        for i in 0..nsegs {
            let d = points[i + 1] - points[i];
            perimeter += (d.x * d.x + d.y * d.y).sqrt();
        }
        let score = polsby_popper(area, perimeter);
        let nstripes = ((nsegs as f64 * score) as usize).max(32);
        log::trace!(
            "ystripes: nsegs={} score={:.3} nstripes={}",
            nsegs,
            score,
            nstripes
        );

        let height = rect.max.y - rect.min.y;
        let scale = if height > 0.0 {
            nstripes as f64 / height
        } else {
            0.0
        };
        let stripe_of = |y: f64| -> usize {
            let s = ((y - rect.min.y) * scale) as isize;
            s.clamp(0, nstripes as isize - 1) as usize
        };

        // Two passes: count memberships per stripe, then fill.
        let mut counts = vec![0u32; nstripes];
        let mut total = 0usize;
        for i in 0..nsegs {
            let (a, b) = (points[i], points[i + 1]);
            let s0 = stripe_of(a.y.min(b.y));
            let s1 = stripe_of(a.y.max(b.y));
            for s in s0..=s1 {
                counts[s] += 1;
            }
            total += s1 - s0 + 1;
        }
        let mut stripes = Vec::with_capacity(nstripes);
        let mut at = 0u32;
        for &c in &counts {
            stripes.push(StripeRange {
                start: at,
                end: at,
            });
            at += c;
        }
        debug_assert_eq!(at as usize, total);
        let mut entries = vec![0u32; total];
        for i in 0..nsegs {
            let (a, b) = (points[i], points[i + 1]);
            let s0 = stripe_of(a.y.min(b.y));
            let s1 = stripe_of(a.y.max(b.y));
            for s in s0..=s1 {
                let range = &mut stripes[s];
                entries[range.end as usize] = i as u32;
                range.end += 1;
            }
        }
        YStripes {
            min_y: rect.min.y,
            scale,
            stripes: stripes.into_boxed_slice(),
            entries: entries.into_boxed_slice(),
        }
    }

    /// The segment indices whose y-span touches the stripe containing
    /// `y`, in ring order.
    pub fn candidates(&self, y: f64) -> &[u32] {
        let s = ((y - self.min_y) * self.scale) as isize;
        let s = s.clamp(0, self.stripes.len() as isize - 1) as usize;
        let range = self.stripes[s];
        &self.entries[range.start as usize..range.end as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn polsby_popper_score() {
        // a square: 4πA/P² = 4π·100/1600 = π/4
        let score = polsby_popper(100.0, 40.0);
        assert!((score - PI / 4.0).abs() < 1e-12);
        assert_eq!(polsby_popper(10.0, 0.0), 0.0);
    }

    #[test]
    fn stripes_cover_all_segments() {
        // a zig-zag "comb" ring, deliberately spiky
        let mut pts = vec![Point::new(0.0, 0.0)];
        for i in 0..20 {
            let x = i as f64;
            pts.push(Point::new(x + 0.5, 10.0));
            pts.push(Point::new(x + 1.0, 0.0));
        }
        pts.push(Point::new(20.0, -5.0));
        pts.push(Point::new(0.0, -5.0));
        pts.push(Point::new(0.0, 0.0));
        let nsegs = pts.len() - 1;
        let mut rect = pts[0].rect();
        for p in &pts {
            rect.expand_point(*p);
        }
        let ys = YStripes::new(&pts, nsegs, &rect, 100.0);
        // every segment appears in the stripe of its own midpoint
        for i in 0..nsegs {
            let mid_y = (pts[i].y + pts[i + 1].y) / 2.0;
            assert!(
                ys.candidates(mid_y).contains(&(i as u32)),
                "segment {} missing from its stripe",
                i
            );
        }
    }

    #[test]
    fn flat_ring_single_stripe() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(9.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let rect = Rect::new(Point::new(0.0, 0.0), Point::new(9.0, 0.0));
        let ys = YStripes::new(&pts, 3, &rect, 0.0);
        assert_eq!(ys.candidates(0.0).len(), 3);
    }
}
