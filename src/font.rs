use crate::{
    refs::{ObjectReferences, RefType},
    PDFError, Pt,
};
use id_arena::Id;
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;

/// A parsed TrueType / OpenType font. Fonts are embedded in their entirety in the generated
/// PDF, so large fonts will dramatically increase the size of the output.
///
/// Besides embedding, a font is what the layout measures text with: every advance the
/// renderer computes comes from [Font::width_of] and [Font::line_height].
pub struct Font {
    pub face: OwnedFace,
}

/// Per-glyph data needed to describe the font to PDF readers
struct GlyphInfo {
    ch: char,
    advance: u16,
    height: i16,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face().units_per_em() as f32
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, or a generic name if the face doesn't carry one
    pub fn name(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
            .unwrap_or_else(|| "Embedded".to_string())
    }

    /// The family name of the font, falling back to [Font::name]
    pub fn family(&self) -> String {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
            .unwrap_or_else(|| self.name())
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face().ascender() as f32
    }

    /// Distance from the baseline to the bottom of the font at the given size. Usually
    /// negative.
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face().descender() as f32
    }

    /// How far to move down from one line of text to the next at the given size
    pub fn line_height(&self, size: Pt) -> Pt {
        let face = self.face();
        self.scaling(size) * (face.line_gap() as f32 + face.ascender() as f32 - face.descender() as f32)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    /// The glyph used to draw `ch`, substituting U+FFFD or `?` when the font lacks it
    pub fn glyph_or_replacement(&self, ch: char) -> Result<u16, PDFError> {
        if let Some(gid) = self.glyph_id(ch) {
            return Ok(gid);
        }
        let replacement = self
            .glyph_id('\u{FFFD}')
            .or_else(|| self.glyph_id('?'))
            .ok_or(PDFError::MissingGlyph(ch))?;
        tracing::warn!(?ch, "font has no glyph for character, substituting");
        Ok(replacement)
    }

    /// Horizontal advance of `text` at the given size. Line breaks have no width; characters
    /// missing from the font are measured as their replacement glyph.
    pub fn width_of(&self, text: &str, size: Pt) -> Result<Pt, PDFError> {
        let scaling = self.scaling(size);
        let mut units = 0.0f32;
        for ch in text.chars().filter(|&ch| ch != '\n') {
            let gid = self.glyph_or_replacement(ch)?;
            units += self.face().glyph_hor_advance(GlyphId(gid)).unwrap_or_default() as f32;
        }
        Ok(scaling * units)
    }

    /// Every glyph reachable from a unicode cmap subtable, keyed by glyph id
    fn glyphs(&self) -> BTreeMap<u16, GlyphInfo> {
        let face = self.face();
        let mut glyphs: BTreeMap<u16, GlyphInfo> = BTreeMap::new();

        let Some(cmap) = face.tables().cmap else {
            return glyphs;
        };
        for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
            subtable.codepoints(|codepoint: u32| {
                let Ok(ch) = char::try_from(codepoint) else {
                    return;
                };
                let Some(gid) = subtable.glyph_index(codepoint).filter(|g| g.0 > 0) else {
                    return;
                };
                if glyphs.contains_key(&gid.0) {
                    return;
                }
                if let Some(advance) = face.glyph_hor_advance(gid) {
                    let height = face
                        .glyph_bounding_box(gid)
                        .map(|bbox| bbox.y_max - bbox.y_min - face.descender())
                        .unwrap_or(1000);
                    glyphs.insert(gid.0, GlyphInfo { ch, advance, height });
                }
            });
        }
        glyphs
    }

    fn write_cid(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, GlyphInfo>,
        writer: &mut Pdf,
    ) -> Ref {
        let descriptor_id = self.write_descriptor(refs, font_index, glyphs, writer);
        let id = refs.gen(RefType::CidFont(font_index));
        let scaling = 1000.0 / self.face().units_per_em() as f32;

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);

        // the most common advance becomes the default width
        let mut advance_counts: BTreeMap<u16, usize> = BTreeMap::new();
        for glyph in glyphs.values() {
            *advance_counts.entry(glyph.advance).or_insert(0) += 1;
        }
        let default_width = advance_counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&advance, _)| advance as f32 * scaling)
            .unwrap_or(1000.0);

        // glyphs are sorted by id; emit one block per run of consecutive ids
        let mut widths = cid_font.widths();
        let mut block: Option<(u16, Vec<f32>)> = None;
        for (&gid, glyph) in glyphs.iter() {
            let width = glyph.advance as f32 * scaling;
            match block.as_mut() {
                Some((start, run)) if *start as usize + run.len() == gid as usize => run.push(width),
                _ => {
                    if let Some((start, run)) = block.take() {
                        widths.consecutive(start, run);
                    }
                    block = Some((gid, vec![width]));
                }
            }
        }
        if let Some((start, run)) = block {
            widths.consecutive(start, run);
        }
        widths.finish();

        cid_font.default_width(default_width);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, GlyphInfo>,
        writer: &mut Pdf,
    ) -> Ref {
        let face = self.face();

        let data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let max_width = glyphs.values().map(|g| g.advance).max().unwrap_or_default();
        let max_height = glyphs.values().map(|g| g.height).max().unwrap_or_default();
        let sum_width: f32 = glyphs.values().map(|g| g.advance as f32).sum();
        let avg_width = if glyphs.is_empty() {
            0.0
        } else {
            sum_width / glyphs.len() as f32
        };
        let scaling = 1000.0 / face.units_per_em() as f32;

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let mut descriptor = writer.font_descriptor(id);
        descriptor.name(Name(self.name().as_bytes()));
        descriptor.family(Str(self.family().as_bytes()));
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::empty();
        flags.set(FontFlags::FIXED_PITCH, face.is_monospaced());
        flags.set(FontFlags::ITALIC, face.is_italic());
        flags.set(FontFlags::NON_SYMBOLIC, true);
        descriptor.flags(flags);

        let bbox = face.global_bounding_box();
        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: (bbox.y_max.max(max_height)) as f32 * scaling,
        });
        descriptor.italic_angle(face.italic_angle());
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        let cap_height = face.capital_height().unwrap_or(face.ascender());
        descriptor.cap_height(cap_height as f32 * scaling);
        descriptor.x_height(face.x_height().unwrap_or(cap_height) as f32 * scaling);
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width * scaling);
        descriptor.max_width(max_width as f32 * scaling);
        descriptor.missing_width(max_width as f32 * scaling);
        descriptor.font_file2(data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, GlyphInfo>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        // bfchar blocks hold at most 100 entries sharing a high byte
        let entries: Vec<(u16, char)> = glyphs.iter().map(|(&gid, g)| (gid, g.ch)).collect();
        for block in entries.chunk_by(|a, b| a.0 >> 8 == b.0 >> 8) {
            for block in block.chunks(100) {
                cmap.push_str(&format!("{} beginbfchar\n", block.len()));
                for (gid, ch) in block {
                    let mut utf16 = [0u16; 2];
                    let hex: String = ch
                        .encode_utf16(&mut utf16)
                        .iter()
                        .map(|unit| format!("{unit:04x}"))
                        .collect();
                    cmap.push_str(&format!("<{gid:04x}> <{hex}>\n"));
                }
                cmap.push_str("endbfchar\n");
            }
        }
        cmap.push_str("endcmap CMapName currentdict /CMap defineresource pop end end\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            cmap.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }

    /// Embed the font as a Type0 font backed by a CIDFontType2 descendant
    pub(crate) fn write(&self, refs: &mut ObjectReferences, id: Id<Font>, writer: &mut Pdf) {
        let font_index = id.index();
        let font_id = refs.gen(RefType::Font(font_index));
        let glyphs = self.glyphs();
        let cid_font_id = self.write_cid(refs, font_index, &glyphs, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, &glyphs, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }
}
