use crate::{
    content::collect_opacities,
    font::Font,
    info::Info,
    layout::{FontRole, Layout, Measure, PageGeometry, Placement, Style},
    page::{Page, SpanFont, SpanLayout},
    refs::{ObjectReferences, RefType},
    ConfigError, PDFError, Pt,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::{collections::HashMap, io::Write};

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
///
/// Fonts are assigned to [FontRole]s; a role without a font of its own is set in the
/// [FontRole::Regular] font. The document is also the [Measure] a
/// [Renderer](crate::layout::Renderer) uses, so text is laid out with the same metrics it is
/// later drawn with.
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<Font>,
    roles: HashMap<FontRole, Id<Font>>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Get the page Id of a page at the given index. Returns [None] if
    /// `page_index >= self.page_order.len()`.
    pub fn id_of_page_index(&self, page_index: usize) -> Option<Id<Page>> {
        self.page_order.get(page_index).copied()
    }

    /// Add a font to the document structure. Note that fonts are stored "globally" within
    /// the document, such that any page can access it by referring to it by its index /
    /// reference. The first font added becomes the [FontRole::Regular] font.
    pub fn add_font(&mut self, font: Font) -> Id<Font> {
        let id = self.fonts.alloc(font);
        self.roles.entry(FontRole::Regular).or_insert(id);
        id
    }

    /// Add a font and set text of the given role in it
    pub fn add_font_for(&mut self, role: FontRole, font: Font) -> Id<Font> {
        let id = self.add_font(font);
        self.roles.insert(role, id);
        id
    }

    /// The font text of the given role is set in
    pub fn font_for(&self, role: FontRole) -> Result<(Id<Font>, &Font), PDFError> {
        let id = self
            .roles
            .get(&role)
            .or_else(|| self.roles.get(&FontRole::Regular))
            .copied()
            .ok_or(ConfigError::MissingFont)?;
        Ok((id, &self.fonts[id]))
    }

    /// Turn laid out text into pages. One page is appended for every page the layout spans,
    /// even if nothing was placed on it.
    pub fn place(&mut self, layout: &Layout, geometry: &PageGeometry) -> Result<(), PDFError> {
        let mut pages: Vec<Page> = (0..layout.page_count())
            .map(|_| Page::from_geometry(geometry))
            .collect();

        for placement in layout.placements.iter() {
            let span = match placement {
                Placement::Run {
                    text,
                    style,
                    origin,
                    ..
                } => self.span(text.clone(), style, *origin, geometry)?,
                Placement::Glyph {
                    ch, style, origin, ..
                } => self.span(ch.to_string(), style, *origin, geometry)?,
            };
            pages
                .get_mut(placement.page())
                .ok_or(PDFError::PageMissing)?
                .add_span(span);
        }

        let spans: usize = pages.iter().map(|p| p.spans.len()).sum();
        tracing::debug!(pages = pages.len(), spans, "placed layout");
        for page in pages {
            self.add_page(page);
        }
        Ok(())
    }

    fn span(
        &self,
        text: String,
        style: &Style,
        origin: (Pt, Pt),
        geometry: &PageGeometry,
    ) -> Result<SpanLayout, PDFError> {
        let (id, font) = self.font_for(style.font)?;
        let glyphs = text
            .chars()
            .map(|ch| font.glyph_or_replacement(ch))
            .collect::<Result<Vec<u16>, PDFError>>()?;
        Ok(SpanLayout {
            text,
            glyphs,
            font: SpanFont {
                index: id.index(),
                size: style.size,
            },
            colour: style.colour,
            opacity: style.opacity,
            coords: baseline(geometry, origin, font.ascent(style.size)),
        })
    }

    /// Write the entire document to the writer. Note: although this can write to arbitrary
    /// streams, the entire document is "rendered" in memory first. If you have a very large
    /// document, this could allocate a significant amount of memory. This limitation is due
    /// to the underlying pdf-writer implementation.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), PDFError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            ..
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = page_order
            .iter()
            .enumerate()
            .map(|(i, _id)| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in fonts.iter() {
            font.write(&mut refs, i, &mut writer);
        }

        let opacities = collect_opacities(
            page_order
                .iter()
                .filter_map(|id| pages.get(*id))
                .flat_map(|page| page.spans.iter()),
        );
        for (i, &opacity) in opacities.iter().enumerate() {
            writer
                .ext_graphics(refs.gen(RefType::ExtGState(i)))
                .non_stroking_alpha(opacity)
                .stroking_alpha(opacity);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(PDFError::PageMissing)?;
            page.write(&mut refs, page_index, &fonts, &opacities, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        tracing::debug!(
            pages = page_order.len(),
            fonts = fonts.len(),
            graphics_states = opacities.len(),
            "writing document"
        );
        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }

    /// [Document::write] into a fresh buffer
    pub fn to_bytes(self) -> Result<Vec<u8>, PDFError> {
        let mut bytes: Vec<u8> = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }
}

impl Measure for Document {
    fn width_of(&self, text: &str, style: &Style) -> Result<Pt, PDFError> {
        self.font_for(style.font)?.1.width_of(text, style.size)
    }

    fn line_height(&self, style: &Style) -> Result<Pt, PDFError> {
        Ok(self.font_for(style.font)?.1.line_height(style.size))
    }
}

/// Converts a top-down layout origin (top of the line box) into the PDF baseline position:
/// PDF coordinates grow upwards from the bottom of the page, and text sits `ascent` below
/// the top of its line.
pub(crate) fn baseline(geometry: &PageGeometry, origin: (Pt, Pt), ascent: Pt) -> (Pt, Pt) {
    (origin.0, geometry.height() - origin.1 - ascent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Cursor, Margins};
    use crate::pagesize;

    #[test]
    fn baselines_are_measured_from_the_bottom() {
        let geometry = PageGeometry::new(pagesize::LETTER, Margins::all(Pt(72.0)));
        assert_eq!(
            baseline(&geometry, (Pt(72.0), Pt(72.0)), Pt(9.0)),
            (Pt(72.0), Pt(711.0))
        );
    }

    #[test]
    fn measuring_without_fonts_is_a_configuration_error() {
        let doc = Document::default();
        let result = doc.width_of("abc", &Style::BODY);
        assert!(matches!(
            result,
            Err(PDFError::Config(ConfigError::MissingFont))
        ));
    }

    #[test]
    fn empty_layouts_still_get_their_pages() {
        let mut doc = Document::default();
        let layout = Layout {
            placements: Vec::new(),
            cursor: Cursor {
                page: 1,
                x: Pt(72.0),
                y: Pt(72.0),
            },
        };
        doc.place(&layout, &PageGeometry::default())
            .expect("nothing needs a font");
        assert_eq!(doc.page_order.len(), 2);
        assert!(doc.id_of_page_index(1).is_some());
    }
}
