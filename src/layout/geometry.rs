use super::Margins;
use crate::pagesize::{self, PageSize};
use crate::units::{In, Pt};

/// The page the renderer lays text out on. Coordinates handed out by the layout are
/// measured from the top-left corner of the page, with `y` growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub size: PageSize,
    pub margins: Margins,
}

impl Default for PageGeometry {
    /// US Letter with one inch margins
    fn default() -> Self {
        PageGeometry {
            size: pagesize::LETTER,
            margins: Margins::all(In(1.0)),
        }
    }
}

/// A position on a given page, in top-down page coordinates
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub x: Pt,
    pub y: Pt,
}

impl PageGeometry {
    pub fn new(size: PageSize, margins: Margins) -> PageGeometry {
        PageGeometry { size, margins }
    }

    pub fn width(&self) -> Pt {
        self.size.0
    }

    pub fn height(&self) -> Pt {
        self.size.1
    }

    /// Where every line starts
    pub fn left(&self) -> Pt {
        self.margins.left
    }

    /// Lines wrap once text passes this x
    pub fn right(&self) -> Pt {
        self.size.0 - self.margins.right
    }

    /// The first line of a page starts here
    pub fn top(&self) -> Pt {
        self.margins.top
    }

    /// No line box should extend past this y
    pub fn bottom(&self) -> Pt {
        self.size.1 - self.margins.bottom
    }

    /// The top-left corner of the content area on the first page
    pub fn text_start(&self) -> Cursor {
        Cursor {
            page: 0,
            x: self.left(),
            y: self.top(),
        }
    }
}
