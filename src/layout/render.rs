use super::{collapse_whitespace, normalize_visible, Cursor, Measure, PageGeometry, Style};
use crate::mix::{Fragment, Visibility};
use crate::units::Pt;
use crate::PDFError;

/// One drawing instruction produced by the [Renderer]. Origins are top-down page
/// coordinates: `x` from the left edge of the page, `y` from its top edge to the top of the
/// line the text sits on.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// A run of visible text laid out on a single line
    Run {
        text: String,
        style: Style,
        page: usize,
        origin: (Pt, Pt),
        /// Whether the line carries on after this run, i.e. the run did not end because of
        /// a line break or wrap
        continued: bool,
    },
    /// A single character, positioned on its own
    Glyph {
        ch: char,
        style: Style,
        page: usize,
        origin: (Pt, Pt),
    },
}

impl Placement {
    pub fn page(&self) -> usize {
        match self {
            Placement::Run { page, .. } | Placement::Glyph { page, .. } => *page,
        }
    }

    pub fn origin(&self) -> (Pt, Pt) {
        match self {
            Placement::Run { origin, .. } | Placement::Glyph { origin, .. } => *origin,
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Placement::Run { style, .. } | Placement::Glyph { style, .. } => style,
        }
    }
}

/// The finished output of a [Renderer]
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    /// Where the next piece of text would have gone
    pub cursor: Cursor,
}

impl Layout {
    /// Number of pages the placements span (at least one)
    pub fn page_count(&self) -> usize {
        self.cursor.page + 1
    }
}

/// Lays text out on pages, one shared cursor at a time.
///
/// Visible text flows like an ordinary paragraph: it is emitted as [Placement::Run]s, one per
/// line, wrapping character by character at the right margin and breaking lines at `\n`.
/// Hidden text is emitted one [Placement::Glyph] per character at the exact cursor position,
/// advancing the cursor by each glyph's width, so that the hidden characters occupy real,
/// individually addressable positions in the content stream.
///
/// Both kinds of text move the same cursor; the cursor only ever returns to the left margin
/// together with a move down to the next line (or the top of a new page).
pub struct Renderer<'m, M: Measure + ?Sized> {
    metrics: &'m M,
    geometry: PageGeometry,
    cursor: Cursor,
    style: Style,
    placements: Vec<Placement>,
}

impl<'m, M: Measure + ?Sized> Renderer<'m, M> {
    /// A renderer with its cursor at the top-left of the first page's content area
    pub fn new(metrics: &'m M, geometry: PageGeometry) -> Renderer<'m, M> {
        let cursor = geometry.text_start();
        Renderer {
            metrics,
            geometry,
            cursor,
            style: Style::NEUTRAL,
            placements: Vec::new(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The style the last piece of text was set in
    pub fn style(&self) -> Style {
        self.style
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Lay out a mixed sequence: visible fragments in [Style::BODY], invisible ones in
    /// [Style::HIDDEN]. Afterwards the style is back to [Style::NEUTRAL].
    pub fn render_fragments(&mut self, fragments: &[Fragment]) -> Result<(), PDFError> {
        for fragment in fragments {
            tracing::trace!(
                source = %fragment.source,
                index = fragment.sequence_index,
                visibility = ?fragment.visibility,
                "placing fragment"
            );
            match fragment.visibility {
                Visibility::Visible => self.write_visible(&fragment.text, Style::BODY)?,
                Visibility::Invisible => self.write_hidden(&fragment.text)?,
            }
        }
        self.reset_style();
        tracing::debug!(
            fragments = fragments.len(),
            placements = self.placements.len(),
            pages = self.cursor.page + 1,
            "laid out mixed sequence"
        );
        Ok(())
    }

    /// Lay out flowing visible text. Line breaks are kept; lines wrap at the right margin.
    pub fn write_visible(&mut self, text: &str, style: Style) -> Result<(), PDFError> {
        self.style = style;
        let text = normalize_visible(text);
        if text.is_empty() {
            return Ok(());
        }

        let line_height = self.metrics.line_height(&style)?;
        let mut run = String::new();
        let mut start = self.cursor;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            if ch == '\n' {
                self.flush_run(&mut run, start, style, false);
                self.advance_line(line_height);
                start = self.cursor;
                continue;
            }

            let advance = self.metrics.width_of(ch.encode_utf8(&mut buf), &style)?;
            if self.cursor.x + advance > self.geometry.right() && self.cursor.x > self.geometry.left() {
                self.flush_run(&mut run, start, style, false);
                self.advance_line(line_height);
                start = self.cursor;
            }
            run.push(ch);
            self.cursor.x += advance;
        }
        self.flush_run(&mut run, start, style, true);
        Ok(())
    }

    /// Lay out hidden text in [Style::HIDDEN], one glyph at a time. Whitespace runs collapse
    /// to single spaces first.
    pub fn write_hidden(&mut self, text: &str) -> Result<(), PDFError> {
        self.write_glyphs(&collapse_whitespace(text), Style::HIDDEN)
    }

    /// Place every character of `text` individually, starting at the cursor. After each
    /// glyph the cursor advances by its width and wraps once it is past the right margin.
    pub fn write_glyphs(&mut self, text: &str, style: Style) -> Result<(), PDFError> {
        self.style = style;
        if text.is_empty() {
            return Ok(());
        }

        let line_height = self.metrics.line_height(&style)?;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            if ch == '\n' {
                self.advance_line(line_height);
                continue;
            }

            self.placements.push(Placement::Glyph {
                ch,
                style,
                page: self.cursor.page,
                origin: (self.cursor.x, self.cursor.y),
            });
            self.cursor.x += self.metrics.width_of(ch.encode_utf8(&mut buf), &style)?;
            if self.cursor.x > self.geometry.right() {
                self.advance_line(line_height);
            }
        }
        Ok(())
    }

    /// End the current line, moving down by the line height of the current style
    pub fn new_line(&mut self) -> Result<(), PDFError> {
        let line_height = self.metrics.line_height(&self.style)?;
        self.advance_line(line_height);
        Ok(())
    }

    /// Move down by `lines` lines of the current style, back at the left margin
    pub fn move_down(&mut self, lines: f32) -> Result<(), PDFError> {
        let line_height = self.metrics.line_height(&self.style)?;
        self.advance_line(line_height * lines.max(0.0));
        Ok(())
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Return to [Style::NEUTRAL] so whatever comes next is unaffected by what came before
    pub fn reset_style(&mut self) {
        self.style = Style::NEUTRAL;
    }

    pub fn finish(self) -> Layout {
        Layout {
            placements: self.placements,
            cursor: self.cursor,
        }
    }

    fn flush_run(&mut self, run: &mut String, start: Cursor, style: Style, continued: bool) {
        if run.is_empty() {
            return;
        }
        self.placements.push(Placement::Run {
            text: std::mem::take(run),
            style,
            page: start.page,
            origin: (start.x, start.y),
            continued,
        });
    }

    fn advance_line(&mut self, line_height: Pt) {
        self.cursor.x = self.geometry.left();
        self.cursor.y += line_height;
        if self.cursor.y + line_height > self.geometry.bottom() {
            self.cursor.page += 1;
            self.cursor.y = self.geometry.top();
        }
    }
}
