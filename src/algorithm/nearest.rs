//! Nearest-segment traversal.
//!
//! A best-first walk of the natural index: a min-heap is seeded with the
//! root-level index rects, branches are expanded in distance order, and
//! segments come out strictly non-decreasing in the caller's distance
//! metric. Both distance callbacks get a `more` flag they can set to ask
//! for the entry to be re-queued with a refreshed distance, which lets a
//! caller start from a cheap lower bound and refine lazily.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::line_string::LineString;
use crate::rect::Rect;
use crate::ring::{Ring, RingData};
use crate::segment::Segment;

enum Kind {
    Branch { lvl: usize, j: usize },
    Seg(usize),
}

struct Entry {
    dist: f64,
    more: bool,
    kind: Kind,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Entry) -> bool {
        self.dist.total_cmp(&other.dist) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Entry) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Entry) -> Ordering {
        self.dist.total_cmp(&other.dist)
    }
}

impl RingData {
    pub(crate) fn nearest_segments(
        &self,
        rect_dist: &mut dyn FnMut(&Rect, &mut bool) -> f64,
        seg_dist: &mut dyn FnMut(&Segment, usize, &mut bool) -> f64,
        visit: &mut dyn FnMut(&Segment, usize, f64) -> bool,
    ) -> bool {
        if self.empty {
            return true;
        }
        let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();
        let mut push_seg = |heap: &mut BinaryHeap<Reverse<Entry>>, i: usize| {
            let seg = self.segment_at(i);
            let mut more = false;
            let dist = seg_dist(&seg, i, &mut more);
            heap.push(Reverse(Entry {
                dist,
                more,
                kind: Kind::Seg(i),
            }));
        };
        match &self.index {
            Some(ix) => {
                for j in 0..ix.level_len(0) {
                    let rect = ix.rect_at(0, j).to_rect();
                    let mut more = false;
                    let dist = rect_dist(&rect, &mut more);
                    heap.push(Reverse(Entry {
                        dist,
                        more,
                        kind: Kind::Branch { lvl: 0, j },
                    }));
                }
            }
            None => {
                for i in 0..self.nsegs {
                    push_seg(&mut heap, i);
                }
            }
        }
        while let Some(Reverse(entry)) = heap.pop() {
            match entry.kind {
                Kind::Branch { lvl, j } => {
                    let ix = match &self.index {
                        Some(ix) => ix,
                        None => continue,
                    };
                    let rect = ix.rect_at(lvl, j).to_rect();
                    if entry.more {
                        let mut more = false;
                        let dist = rect_dist(&rect, &mut more);
                        heap.push(Reverse(Entry {
                            dist,
                            more,
                            kind: Kind::Branch { lvl, j },
                        }));
                        continue;
                    }
                    let start = j * ix.spread();
                    if lvl == ix.num_levels() - 1 {
                        let end = (start + ix.spread()).min(ix.num_items());
                        for i in start..end {
                            push_seg(&mut heap, i);
                        }
                    } else {
                        let child = lvl + 1;
                        let end = (start + ix.spread()).min(ix.level_len(child));
                        for cj in start..end {
                            let rect = ix.rect_at(child, cj).to_rect();
                            let mut more = false;
                            let dist = rect_dist(&rect, &mut more);
                            heap.push(Reverse(Entry {
                                dist,
                                more,
                                kind: Kind::Branch { lvl: child, j: cj },
                            }));
                        }
                    }
                }
                Kind::Seg(i) => {
                    if entry.more {
                        push_seg(&mut heap, i);
                        continue;
                    }
                    if !visit(&self.segment_at(i), i, entry.dist) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

macro_rules! nearest_impl {
    ($ty:ty) => {
        impl $ty {
            /// Yields segments in order of non-decreasing caller-defined
            /// distance.
            ///
            /// `rect_dist` scores an index rectangle (a lower bound for
            /// everything beneath it), `seg_dist` scores a single
            /// segment; either may set its `more` flag to be called
            /// again later with the entry re-queued. `visit` returns
            /// `false` to stop; the call reports whether the traversal
            /// drained completely.
            pub fn nearest_segments<R, S, V>(
                &self,
                mut rect_dist: R,
                mut seg_dist: S,
                mut visit: V,
            ) -> bool
            where
                R: FnMut(&Rect, &mut bool) -> f64,
                S: FnMut(&Segment, usize, &mut bool) -> f64,
                V: FnMut(&Segment, usize, f64) -> bool,
            {
                self.0
                    .nearest_segments(&mut rect_dist, &mut seg_dist, &mut visit)
            }
        }
    };
}

nearest_impl!(Ring);
nearest_impl!(LineString);
