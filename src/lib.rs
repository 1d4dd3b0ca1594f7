//! Hides a payload text inside a PDF.
//!
//! The payload is cut into small fragments and interleaved with fragments of one or more
//! cover texts ([mix]). The payload's fragments are laid out as ordinary visible text, the
//! cover fragments as near-invisible glyphs placed at exact character positions along the
//! same running cursor ([layout]). A [Document] then embeds the fonts and writes the pages.
//!
//! [MixRequest] and [TextRequest] run the whole pipeline for one document.

mod appendix;
pub use appendix::*;

mod colour;
pub use colour::*;

pub mod config;

mod content;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod info;
pub use info::*;

/// Utility functions and structures to lay text out on pages
pub mod layout;

mod markdown;
pub use markdown::*;

pub mod mix;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod request;
pub use request::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
