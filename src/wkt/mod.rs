//! Well-Known Text reading and writing.
//!
//! Supports the seven OGC geometry types with the `Z`, `M`, `ZM` and
//! `EMPTY` modifiers, and both `MULTIPOINT (1 2, 3 4)` and
//! `MULTIPOINT ((1 2), (3 4))` spellings. Keywords are matched
//! case-insensitively.
//!
//! ```
//! use flatgeom::Geom;
//!
//! let g = Geom::from_wkt("POINT Z (1 2 3)").unwrap();
//! assert_eq!(g.dims(), 3);
//! assert_eq!(g.z(), Some(3.));
//! assert_eq!(g.to_wkt(), "POINT Z (1 2 3)");
//! ```

mod reader;
mod writer;

use crate::geometry::Geom;

pub use reader::parse;
pub use writer::write;

/// Maximum nesting depth accepted from the parser (collections within
/// collections).
pub(crate) const MAX_DEPTH: usize = 1024;

/// Errors produced by the WKT parser.
#[derive(Debug, thiserror::Error)]
pub enum WktError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected {expected} at byte {pos}")]
    Expected { expected: &'static str, pos: usize },
    #[error("unknown geometry type `{word}` at byte {pos}")]
    UnknownType { word: String, pos: usize },
    #[error("invalid number at byte {pos}")]
    InvalidNumber { pos: usize },
    #[error("inconsistent coordinate dimensions at byte {pos}")]
    DimensionMismatch { pos: usize },
    #[error("trailing characters at byte {pos}")]
    TrailingInput { pos: usize },
    #[error("geometry nesting exceeds {MAX_DEPTH} levels")]
    TooDeep,
}

impl Geom {
    /// Parses a WKT string.
    pub fn from_wkt(src: &str) -> Result<Geom, WktError> {
        parse(src)
    }

    /// Writes this geometry as WKT.
    pub fn to_wkt(&self) -> String {
        write(self)
    }
}
