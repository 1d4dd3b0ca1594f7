//! Positioning of text on pages.
//!
//! The [Renderer] walks a sequence of mixed fragments (or any other text) and turns it into
//! [Placement]s: visible text as flowing runs that wrap at the right margin, hidden text as
//! individually positioned glyphs. Positions are worked out against a [PageGeometry] using
//! whatever [Measure] is at hand, so a layout can be computed (and tested) without loading a
//! font. The [Document](crate::Document) later turns the placements into PDF content.
//!
//! # Example
//!
//! ```
//! use pdf_mixer::layout::{FixedAdvance, Margins, PageGeometry, Placement, Renderer, Style};
//! use pdf_mixer::{pagesize, Pt};
//!
//! let metrics = FixedAdvance::default();
//! let geometry = PageGeometry::new(pagesize::A4, Margins::all(Pt(72.0)));
//! let mut renderer = Renderer::new(&metrics, geometry);
//! renderer.write_visible("Hello,\nworld!", Style::BODY).expect("can measure");
//! renderer.write_hidden("unseen").expect("can measure");
//!
//! let layout = renderer.finish();
//! let runs = layout
//!     .placements
//!     .iter()
//!     .filter(|p| matches!(p, Placement::Run { .. }))
//!     .count();
//! assert_eq!(runs, 2);
//! assert_eq!(layout.placements.len(), 2 + "unseen".len());
//! ```

mod geometry;
mod margins;
mod measure;
mod render;
mod style;
mod text;

pub use geometry::*;
pub use margins::*;
pub use measure::*;
pub use render::*;
pub use style::*;
pub use text::*;
