//! Multi-geometry containers and their shared index.
//!
//! Every `Multi*` container (and `GeometryCollection`) owns clones of
//! its children, caches the union of their bounding rects, and, once it
//! holds enough children to be worth it, builds the same flat rect tree
//! the rings use, over children sorted into Hilbert curve order.

use std::sync::Arc;

use crate::geometry::Geom;
use crate::index::hilbert::hilbert_code;
use crate::index::natural::{IndexRect, NaturalIndex};
use crate::index::MULTI_SPREAD;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::rect::Rect;

/// Implemented by anything that can live in a multi container.
pub(crate) trait MultiChild {
    /// `None` when the child is empty and contributes nothing to the
    /// union rect.
    fn child_rect(&self) -> Option<Rect>;
}

impl MultiChild for Point {
    fn child_rect(&self) -> Option<Rect> {
        Some(self.rect())
    }
}

impl MultiChild for LineString {
    fn child_rect(&self) -> Option<Rect> {
        (!self.is_empty()).then(|| self.rect())
    }
}

impl MultiChild for Polygon {
    fn child_rect(&self) -> Option<Rect> {
        (!self.is_empty()).then(|| self.rect())
    }
}

impl MultiChild for Geom {
    fn child_rect(&self) -> Option<Rect> {
        self.rect()
    }
}

#[derive(Debug)]
pub(crate) struct MultiData<T> {
    pub(crate) children: Box<[T]>,
    pub(crate) rect: Rect,
    pub(crate) empty: bool,
    index: Option<NaturalIndex>,
    /// Hilbert permutation: position in the index maps through this to a
    /// child slot. Empty when no index was built.
    order: Box<[u32]>,
}

impl<T: MultiChild> MultiData<T> {
    pub fn build(children: Vec<T>) -> MultiData<T> {
        let mut union: Option<Rect> = None;
        for child in &children {
            if let Some(r) = child.child_rect() {
                union = Some(match union {
                    Some(u) => u.union(&r),
                    None => r,
                });
            }
        }
        let empty = union.is_none();
        let rect = union.unwrap_or_default();
        let n = children.len();
        let (index, order) = if n >= MULTI_SPREAD * 2 {
            let codes: Vec<u32> = children
                .iter()
                .map(|c| {
                    let center = c
                        .child_rect()
                        .map(|r| r.center())
                        .unwrap_or(rect.min);
                    hilbert_code(center, &rect)
                })
                .collect();
            let mut order: Vec<u32> = (0..n as u32).collect();
            order.sort_by_key(|&i| codes[i as usize]);
            let mut leaves = Vec::with_capacity(n.div_ceil(MULTI_SPREAD));
            for chunk in order.chunks(MULTI_SPREAD) {
                let mut group: Option<Rect> = None;
                for &i in chunk {
                    if let Some(r) = children[i as usize].child_rect() {
                        group = Some(match group {
                            Some(g) => g.union(&r),
                            None => r,
                        });
                    }
                }
                leaves.push(IndexRect::from_rect(
                    &group.unwrap_or(Rect::new(rect.min, rect.min)),
                ));
            }
            log::trace!("multi index: children={} leaves={}", n, leaves.len());
            (
                Some(NaturalIndex::from_leaf_rects(n, MULTI_SPREAD, leaves)),
                order.into_boxed_slice(),
            )
        } else {
            (None, Box::default())
        };
        MultiData {
            children: children.into_boxed_slice(),
            rect,
            empty,
            index,
            order,
        }
    }

    /// Visits the slot of every child whose leaf group may overlap
    /// `qrect`. The visitor is responsible for the exact child-rect
    /// test; it returns `false` to stop early.
    pub fn search(&self, qrect: &Rect, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        if let Some(ix) = &self.index {
            ix.search(qrect, &mut |pos| visit(self.order[pos] as usize))
        } else {
            for i in 0..self.children.len() {
                if !visit(i) {
                    return false;
                }
            }
            true
        }
    }
}

macro_rules! multi_geometry {
    ($(#[$outer:meta])* $name:ident, $child:ty, $childname:literal) => {
        $(#[$outer])*
        #[derive(Clone, Debug)]
        pub struct $name(pub(crate) Arc<MultiData<$child>>);

        impl $name {
            pub fn new(children: Vec<$child>) -> $name {
                $name(Arc::new(MultiData::build(children)))
            }

            #[doc = concat!("The contained ", $childname, "s, in construction order.")]
            pub fn children(&self) -> &[$child] {
                &self.0.children
            }

            pub fn len(&self) -> usize {
                self.0.children.len()
            }

            pub fn get(&self, i: usize) -> Option<&$child> {
                self.0.children.get(i)
            }

            /// Union of the children's bounding rects.
            pub fn rect(&self) -> Rect {
                self.0.rect
            }

            /// True when there are no children, or none of them has any
            /// points.
            pub fn is_empty(&self) -> bool {
                self.0.empty
            }
        }

        impl From<Vec<$child>> for $name {
            fn from(children: Vec<$child>) -> $name {
                $name::new(children)
            }
        }
    };
}

multi_geometry!(
    /// A collection of [`Point`]s.
    MultiPoint,
    Point,
    "point"
);
multi_geometry!(
    /// A collection of [`LineString`]s.
    MultiLineString,
    LineString,
    "line"
);
multi_geometry!(
    /// A collection of [`Polygon`]s.
    MultiPolygon,
    Polygon,
    "polygon"
);
multi_geometry!(
    /// A heterogeneous collection of geometries, possibly nested.
    GeometryCollection,
    Geom,
    "geometry"
);
