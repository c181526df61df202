//! The natural index: a flat, bottom-up tree of bounding rectangles over
//! a sequence of items (ring segments, or the children of a multi
//! geometry).
//!
//! The bottom level holds one rectangle per `spread` consecutive items;
//! each level above holds one rectangle per `spread` rectangles below it,
//! until a level fits in `spread` rectangles and becomes the root. All
//! rectangles for all levels live in one contiguous buffer, addressed
//! through a small per-level offset table.

use crate::point::Point;
use crate::rect::Rect;

/// Index rectangles are stored at `f32` precision to halve the buffer
/// size. Conversion from `f64` always rounds outward by a one-ULP
/// multiplier so a query can never be falsely rejected.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IndexRect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

const INFLATE: f64 = 1.0 / 8_388_608.0; // 2^-23, one f32 ULP step

#[inline]
fn fup(x: f64) -> f32 {
    let m = if x < 0.0 { 1.0 - INFLATE } else { 1.0 + INFLATE };
    (x * m) as f32
}

#[inline]
fn fdown(x: f64) -> f32 {
    let m = if x < 0.0 { 1.0 + INFLATE } else { 1.0 - INFLATE };
    (x * m) as f32
}

impl IndexRect {
    pub fn from_rect(r: &Rect) -> IndexRect {
        IndexRect {
            min_x: fdown(r.min.x),
            min_y: fdown(r.min.y),
            max_x: fup(r.max.x),
            max_y: fup(r.max.y),
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            Point::new(self.min_x as f64, self.min_y as f64),
            Point::new(self.max_x as f64, self.max_y as f64),
        )
    }

    fn union(self, other: IndexRect) -> IndexRect {
        IndexRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn intersects_rect(&self, r: &Rect) -> bool {
        !(r.min.x > self.max_x as f64
            || r.max.x < self.min_x as f64
            || r.min.y > self.max_y as f64
            || r.max.y < self.min_y as f64)
    }

    /// The branch filter for point-in-polygon descent. A branch may be
    /// pruned only when no segment under it could be crossed by the
    /// horizontal ray from `p` toward +∞, or be carrying `p` itself:
    /// the point must sit inside the y-span and not beyond the right
    /// edge.
    pub fn maybe_in(&self, p: Point) -> bool {
        p.y >= self.min_y as f64 && p.y <= self.max_y as f64 && p.x <= self.max_x as f64
    }
}

#[derive(Clone, Copy, Debug)]
struct LevelRange {
    start: usize,
    len: usize,
}

/// See the module docs. `levels[0]` is the root level; the last entry is
/// the level whose rectangles each cover `spread` items.
#[derive(Clone, Debug)]
pub(crate) struct NaturalIndex {
    spread: usize,
    nitems: usize,
    levels: Box<[LevelRange]>,
    boxes: Box<[IndexRect]>,
}

impl NaturalIndex {
    /// Builds the upper levels over leaf rectangles the caller has
    /// already grouped (one rect per `spread` consecutive items).
    pub fn from_leaf_rects(nitems: usize, spread: usize, leaf: Vec<IndexRect>) -> NaturalIndex {
        debug_assert_eq!(leaf.len(), nitems.div_ceil(spread));
        let mut stacked: Vec<Vec<IndexRect>> = Vec::new();
        let mut current = leaf;
        while current.len() > spread {
            let mut above = Vec::with_capacity(current.len().div_ceil(spread));
            for group in current.chunks(spread) {
                let mut rect = group[0];
                for r in &group[1..] {
                    rect = rect.union(*r);
                }
                above.push(rect);
            }
            stacked.push(current);
            current = above;
        }
        stacked.push(current);
        // Flatten root-first.
        let mut levels = Vec::with_capacity(stacked.len());
        let mut boxes = Vec::new();
        for level in stacked.iter().rev() {
            levels.push(LevelRange {
                start: boxes.len(),
                len: level.len(),
            });
            boxes.extend_from_slice(level);
        }
        NaturalIndex {
            spread,
            nitems,
            levels: levels.into_boxed_slice(),
            boxes: boxes.into_boxed_slice(),
        }
    }

    pub fn spread(&self) -> usize {
        self.spread
    }

    pub fn num_items(&self) -> usize {
        self.nitems
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level_len(&self, lvl: usize) -> usize {
        self.levels[lvl].len
    }

    pub fn rect_at(&self, lvl: usize, j: usize) -> IndexRect {
        let range = self.levels[lvl];
        debug_assert!(j < range.len);
        self.boxes[range.start + j]
    }

    /// Yields every item index under branches accepted by `filter`.
    /// `visit` returns `false` to stop the whole traversal; the return
    /// value reports whether the traversal ran to completion.
    pub fn visit_items(
        &self,
        filter: &dyn Fn(&IndexRect) -> bool,
        visit: &mut dyn FnMut(usize) -> bool,
    ) -> bool {
        for j in 0..self.levels[0].len {
            let rect = self.rect_at(0, j);
            if filter(&rect) && !self.visit_down(0, j, filter, visit) {
                return false;
            }
        }
        true
    }

    fn visit_down(
        &self,
        lvl: usize,
        j: usize,
        filter: &dyn Fn(&IndexRect) -> bool,
        visit: &mut dyn FnMut(usize) -> bool,
    ) -> bool {
        if lvl == self.levels.len() - 1 {
            let start = j * self.spread;
            let end = (start + self.spread).min(self.nitems);
            for i in start..end {
                if !visit(i) {
                    return false;
                }
            }
            return true;
        }
        let child = lvl + 1;
        let start = j * self.spread;
        let end = (start + self.spread).min(self.levels[child].len);
        for cj in start..end {
            let rect = self.rect_at(child, cj);
            if filter(&rect) && !self.visit_down(child, cj, filter, visit) {
                return false;
            }
        }
        true
    }

    /// Rect-query traversal over item indices.
    pub fn search(&self, qrect: &Rect, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        self.visit_items(&|r| r.intersects_rect(qrect), visit)
    }

    /// Point-in-polygon traversal: candidate segments for the raycast.
    pub fn pip_candidates(&self, p: Point, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        self.visit_items(&|r| r.maybe_in(p), visit)
    }
}

/// One side of the pairwise descent.
#[derive(Clone, Copy)]
enum DualNode {
    Branch { lvl: usize, j: usize },
    Item(usize),
}

/// Symmetric dual descent over two indexed segment sequences, yielding
/// item pairs whose rectangles intersect. When one side bottoms out at an
/// item, the other side keeps descending filtered by that item's rect.
pub(crate) fn search_pair(
    a: &NaturalIndex,
    a_item_rect: &dyn Fn(usize) -> Rect,
    b: &NaturalIndex,
    b_item_rect: &dyn Fn(usize) -> Rect,
    visit: &mut dyn FnMut(usize, usize) -> bool,
) -> bool {
    for aj in 0..a.level_len(0) {
        for bj in 0..b.level_len(0) {
            if !pair_descend(
                a,
                a_item_rect,
                b,
                b_item_rect,
                DualNode::Branch { lvl: 0, j: aj },
                DualNode::Branch { lvl: 0, j: bj },
                visit,
            ) {
                return false;
            }
        }
    }
    true
}

fn node_rect(ix: &NaturalIndex, item_rect: &dyn Fn(usize) -> Rect, node: DualNode) -> Rect {
    match node {
        DualNode::Branch { lvl, j } => ix.rect_at(lvl, j).to_rect(),
        DualNode::Item(i) => item_rect(i),
    }
}

#[allow(clippy::too_many_arguments)]
fn pair_descend(
    a: &NaturalIndex,
    a_item_rect: &dyn Fn(usize) -> Rect,
    b: &NaturalIndex,
    b_item_rect: &dyn Fn(usize) -> Rect,
    na: DualNode,
    nb: DualNode,
    visit: &mut dyn FnMut(usize, usize) -> bool,
) -> bool {
    let ra = node_rect(a, a_item_rect, na);
    let rb = node_rect(b, b_item_rect, nb);
    if !ra.intersects(&rb) {
        return true;
    }
    match (na, nb) {
        (DualNode::Item(i), DualNode::Item(j)) => visit(i, j),
        (DualNode::Branch { lvl, j }, DualNode::Item(_)) => {
            for child in children(a, lvl, j) {
                if !pair_descend(a, a_item_rect, b, b_item_rect, child, nb, visit) {
                    return false;
                }
            }
            true
        }
        (DualNode::Item(_), DualNode::Branch { lvl, j }) => {
            for child in children(b, lvl, j) {
                if !pair_descend(a, a_item_rect, b, b_item_rect, na, child, visit) {
                    return false;
                }
            }
            true
        }
        (DualNode::Branch { lvl: la, j: ja }, DualNode::Branch { lvl: lb, j: jb }) => {
            for ca in children(a, la, ja) {
                for cb in children(b, lb, jb) {
                    if !pair_descend(a, a_item_rect, b, b_item_rect, ca, cb, visit) {
                        return false;
                    }
                }
            }
            true
        }
    }
}

fn children(ix: &NaturalIndex, lvl: usize, j: usize) -> impl Iterator<Item = DualNode> {
    let start = j * ix.spread;
    if lvl == ix.levels.len() - 1 {
        let end = (start + ix.spread).min(ix.nitems);
        (start..end).map(DualNode::Item).collect::<Vec<_>>()
    } else {
        let child = lvl + 1;
        let end = (start + ix.spread).min(ix.levels[child].len);
        (start..end)
            .map(move |cj| DualNode::Branch { lvl: child, j: cj })
            .collect::<Vec<_>>()
    }
    .into_iter()
}
