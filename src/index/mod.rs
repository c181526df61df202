pub(crate) mod hilbert;
pub(crate) mod natural;
pub(crate) mod ystripes;

/// Which acceleration index a ring or line is built with.
///
/// The index is chosen once at construction and never changes. `Natural`
/// is the general-purpose choice; `YStripes` can beat it for
/// point-in-polygon tests on highly concave closed rings, at the price of
/// a second allocation next to the natural index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexStyle {
    /// Never build an index; every search degrades to a linear scan.
    None,
    /// Hierarchical bounding rectangles over the segments, grouped by
    /// [`spread`](crate::env::default_index_spread).
    #[default]
    Natural,
    /// Segment buckets striped by y-coordinate, for closed rings only.
    /// Lines asked for `YStripes` fall back to `Natural`.
    YStripes,
}

/// Fan-out bounds for the natural index.
pub(crate) const MIN_SPREAD: usize = 2;
pub(crate) const MAX_SPREAD: usize = 4096;
pub(crate) const DEFAULT_SPREAD: usize = 16;

/// Multi-geometry containers always use this fan-out.
pub(crate) const MULTI_SPREAD: usize = 32;

pub(crate) fn clamp_spread(spread: usize) -> usize {
    spread.clamp(MIN_SPREAD, MAX_SPREAD)
}
