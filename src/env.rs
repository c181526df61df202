//! Process-wide defaults.
//!
//! These knobs feed every constructor that is not given an explicit
//! index choice. They are meant to be set once at program start, before
//! any geometry is built; changing them concurrently with geometry
//! construction is not supported and will give inconsistent (though
//! never unsafe) index choices.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::index::{clamp_spread, IndexStyle, DEFAULT_SPREAD};

const STYLE_NONE: u8 = 0;
const STYLE_NATURAL: u8 = 1;
const STYLE_YSTRIPES: u8 = 2;

static DEFAULT_INDEX: AtomicU8 = AtomicU8::new(STYLE_NATURAL);
static DEFAULT_INDEX_SPREAD: AtomicUsize = AtomicUsize::new(DEFAULT_SPREAD);

/// Sets the index style used by constructors that don't pick one.
pub fn set_default_index(style: IndexStyle) {
    let code = match style {
        IndexStyle::None => STYLE_NONE,
        IndexStyle::Natural => STYLE_NATURAL,
        IndexStyle::YStripes => STYLE_YSTRIPES,
    };
    DEFAULT_INDEX.store(code, Ordering::Relaxed);
}

pub fn default_index() -> IndexStyle {
    match DEFAULT_INDEX.load(Ordering::Relaxed) {
        STYLE_NONE => IndexStyle::None,
        STYLE_YSTRIPES => IndexStyle::YStripes,
        _ => IndexStyle::Natural,
    }
}

/// Sets the default natural-index fan-out. Values are clamped to the
/// legal `2..=4096` range.
pub fn set_default_index_spread(spread: usize) {
    DEFAULT_INDEX_SPREAD.store(clamp_spread(spread), Ordering::Relaxed);
}

pub fn default_index_spread() -> usize {
    DEFAULT_INDEX_SPREAD.load(Ordering::Relaxed)
}
