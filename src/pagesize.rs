//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.
//! Configuration files refer to them by name, see [`by_name`].
//!
//! ```
//! use pdf_mixer::pagesize::{self, PageOrientation};
//!
//! let letter = pagesize::by_name("Letter").expect("letter is known");
//! assert_eq!(letter, pagesize::LETTER);
//! let landscape = pagesize::A4.landscape();
//! assert!(landscape.0 > landscape.1);
//! ```

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

// north american sizes
pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const HALF_LETTER: PageSize = (Pt(5.5 * 72.0), Pt(8.5 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(13.0 * 72.0));
pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

// iso a-series (converted from mm to points)
pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));

/// Look a page size up by its (case-insensitive) name, e.g. `"letter"` or `"a4"`
pub fn by_name(name: &str) -> Option<PageSize> {
    let size = match name.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
        "letter" => LETTER,
        "halfletter" => HALF_LETTER,
        "legal" => LEGAL,
        "tabloid" => TABLOID,
        "a3" => A3,
        "a4" => A4,
        "a5" => A5,
        _ => return None,
    };
    Some(size)
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_forgiving() {
        assert_eq!(by_name("Half-Letter"), Some(HALF_LETTER));
        assert_eq!(by_name("A4"), Some(A4));
        assert_eq!(by_name("b5"), None);
    }
}
