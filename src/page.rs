use crate::colour::Colour;
use crate::content::render_spans;
use crate::font::Font;
use crate::layout::{Margins, PageGeometry};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::PDFError;
use id_arena::Arena;
use pdf_writer::{Filter, Finish, Name, Pdf};

/// Which font a span is set in, and at what size
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    /// Index of the font within the document
    pub index: usize,
    pub size: Pt,
}

/// A single line of text positioned on a page
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    /// The glyph id of every character of `text`, in the span's font
    pub glyphs: Vec<u16>,
    pub font: SpanFont,
    pub colour: Colour,
    /// Fill opacity, 1.0 being opaque
    pub opacity: f32,
    /// Start of the baseline, in PDF coordinates (origin at the bottom left of the page)
    pub coords: (Pt, Pt),
}

impl SpanLayout {
    /// Whether two spans can be drawn within the same text object without changing any state
    pub(crate) fn same_style(&self, other: &SpanLayout) -> bool {
        self.font == other.font && self.colour == other.colour && self.opacity == other.opacity
    }
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// The laid out text, in drawing order
    pub spans: Vec<SpanLayout>,
}

impl Page {
    /// Create a new page with the given size and margins
    pub fn new(size: PageSize, margins: Option<Margins>) -> Page {
        let margins = margins.unwrap_or_default();
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: size.0,
                y2: size.1,
            },
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: size.0 - margins.right,
                y2: size.1 - margins.top,
            },
            spans: Vec::default(),
        }
    }

    /// A blank page matching the geometry text was laid out against
    pub fn from_geometry(geometry: &PageGeometry) -> Page {
        Page::new(geometry.size, Some(geometry.margins.clone()))
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.spans.push(span);
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        opacities: &[f32],
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let id = refs.get(RefType::Page(page_index)).ok_or(PDFError::PageMissing)?;
        let page_tree = refs.get_or_gen(RefType::PageTree);
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(page_tree);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            let i = font_id.index();
            resource_fonts.pair(
                Name(format!("F{i}").as_bytes()),
                refs.get_or_gen(RefType::Font(i)),
            );
        }
        resource_fonts.finish();
        let mut states = resources.ext_g_states();
        for i in 0..opacities.len() {
            states.pair(
                Name(format!("GS{i}").as_bytes()),
                refs.get_or_gen(RefType::ExtGState(i)),
            );
        }
        states.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_spans(&self.spans, opacities)?;
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            &rendered,
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(content_id, &compressed)
            .filter(Filter::FlateDecode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn boxes_follow_the_margins() {
        let page = Page::new(pagesize::LETTER, Some(Margins::all(Pt(72.0))));
        assert_eq!(page.media_box.width(), Pt(612.0));
        assert_eq!(page.media_box.height(), Pt(792.0));
        assert_eq!(page.content_box.x1, Pt(72.0));
        assert_eq!(page.content_box.y1, Pt(72.0));
        assert_eq!(page.content_box.x2, Pt(540.0));
        assert_eq!(page.content_box.y2, Pt(720.0));

        let bare = Page::new(pagesize::A4, None);
        assert_eq!(bare.content_box, bare.media_box);
    }
}
