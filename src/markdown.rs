//! Lays markdown out as visible text.
//!
//! Markdown is parsed with `pulldown-cmark` and every event is written straight to a
//! [Renderer]: block structure becomes line breaks and vertical gaps, inline formatting
//! becomes a change of font role or size. Nothing is hidden on this path.

use crate::layout::{FontRole, Measure, Renderer, Style};
use crate::units::Pt;
use crate::PDFError;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const BULLET: &str = "• ";
const CODE_BLOCK_SIZE: Pt = Pt(10.0);

/// Lay out `text` as markdown, starting at the renderer's cursor. The style is back to
/// [Style::NEUTRAL] afterwards.
pub fn write_markdown<M: Measure + ?Sized>(
    renderer: &mut Renderer<'_, M>,
    text: &str,
) -> Result<(), PDFError> {
    let mut writer = MarkdownWriter::new(renderer);
    for event in Parser::new_ext(text, Options::empty()) {
        writer.process_event(event)?;
    }
    writer.finish()
}

fn heading_size(level: HeadingLevel) -> Pt {
    match level {
        HeadingLevel::H1 => Pt(24.0),
        HeadingLevel::H2 => Pt(20.0),
        HeadingLevel::H3 => Pt(16.0),
        HeadingLevel::H4 => Pt(14.0),
        HeadingLevel::H5 => Pt(12.0),
        HeadingLevel::H6 => Pt(11.0),
    }
}

struct MarkdownWriter<'r, 'm, M: Measure + ?Sized> {
    renderer: &'r mut Renderer<'m, M>,
    /// Nested inline and block styles; the bottom entry is never popped
    style_stack: Vec<Style>,
    /// Whether text has been written since the last line break
    line_open: bool,
    /// Whether any block has been written yet
    started: bool,
    list_depth: usize,
}

impl<'r, 'm, M: Measure + ?Sized> MarkdownWriter<'r, 'm, M> {
    fn new(renderer: &'r mut Renderer<'m, M>) -> Self {
        MarkdownWriter {
            renderer,
            style_stack: vec![Style::NEUTRAL],
            line_open: false,
            started: false,
            list_depth: 0,
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack.last().copied().unwrap_or(Style::NEUTRAL)
    }

    fn push_style(&mut self, style: Style) {
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn write(&mut self, text: &str) -> Result<(), PDFError> {
        if text.is_empty() {
            return Ok(());
        }
        self.renderer.write_visible(text, self.current_style())?;
        self.line_open = !text.ends_with('\n');
        self.started = true;
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), PDFError> {
        if self.line_open {
            self.renderer.new_line()?;
            self.line_open = false;
        }
        Ok(())
    }

    /// Close the current line, then leave `lines` blank lines (only once something has
    /// been written)
    fn gap(&mut self, lines: f32) -> Result<(), PDFError> {
        self.end_line()?;
        if self.started {
            self.renderer.set_style(self.current_style());
            self.renderer.move_down(lines)?;
        }
        Ok(())
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), PDFError> {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.write(&text),
            Event::Code(code) => {
                let style = self.current_style().with_font(FontRole::Monospace);
                self.push_style(style);
                let written = self.write(&code);
                self.pop_style();
                written
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.write(&math),
            Event::SoftBreak => self.write(" "),
            Event::HardBreak => self.end_line(),
            Event::Rule => self.gap(1.0),
            Event::TaskListMarker(checked) => self.write(if checked { "[x] " } else { "[ ] " }),
            Event::Html(_) | Event::InlineHtml(_) | Event::FootnoteReference(_) => Ok(()),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> Result<(), PDFError> {
        match tag {
            Tag::Heading { level, .. } => {
                self.gap(1.0)?;
                self.push_style(
                    Style::NEUTRAL
                        .with_font(FontRole::Bold)
                        .with_size(heading_size(level)),
                );
            }
            Tag::Paragraph => {
                if self.list_depth == 0 {
                    self.end_line()?;
                }
            }
            Tag::CodeBlock(_) => {
                self.gap(0.5)?;
                self.push_style(
                    Style::NEUTRAL
                        .with_font(FontRole::Monospace)
                        .with_size(CODE_BLOCK_SIZE),
                );
            }
            Tag::BlockQuote(_) => {
                self.gap(0.5)?;
                let style = self.current_style().with_font(FontRole::Italic);
                self.push_style(style);
            }
            Tag::List(_) => {
                if self.list_depth == 0 {
                    self.gap(0.5)?;
                } else {
                    self.end_line()?;
                }
                self.list_depth += 1;
            }
            Tag::Item => {
                self.end_line()?;
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.write(&format!("{indent}{BULLET}"))?;
            }
            Tag::Emphasis => {
                let style = self.current_style().with_font(FontRole::Italic);
                self.push_style(style);
            }
            Tag::Strong => {
                let style = self.current_style().with_font(FontRole::Bold);
                self.push_style(style);
            }
            // links, images, tables and the rest render as their text
            _ => {}
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), PDFError> {
        match tag {
            TagEnd::Heading(_) => {
                self.end_line()?;
                self.pop_style();
            }
            TagEnd::Paragraph => {
                if self.list_depth == 0 {
                    self.gap(0.5)?;
                } else {
                    self.end_line()?;
                }
            }
            TagEnd::CodeBlock | TagEnd::BlockQuote(_) => {
                self.pop_style();
                self.gap(0.5)?;
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.gap(0.5)?;
                }
            }
            TagEnd::Item => self.end_line()?,
            TagEnd::Emphasis | TagEnd::Strong => self.pop_style(),
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<(), PDFError> {
        let MarkdownWriter {
            renderer,
            line_open,
            ..
        } = self;
        if line_open {
            renderer.new_line()?;
        }
        renderer.reset_style();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FixedAdvance, Layout, PageGeometry, Placement};

    fn render(text: &str) -> Layout {
        let metrics = FixedAdvance::default();
        let mut renderer = Renderer::new(&metrics, PageGeometry::default());
        write_markdown(&mut renderer, text).expect("can lay out");
        assert_eq!(renderer.style(), Style::NEUTRAL);
        renderer.finish()
    }

    fn runs(layout: &Layout) -> Vec<(String, Style, Pt)> {
        layout
            .placements
            .iter()
            .filter_map(|p| match p {
                Placement::Run {
                    text,
                    style,
                    origin,
                    ..
                } => Some((text.clone(), *style, origin.1)),
                Placement::Glyph { .. } => None,
            })
            .collect()
    }

    #[test]
    fn headings_and_inline_styles() {
        let layout = render("# Title\n\nSome *emph* and **bold** text.");
        let runs = runs(&layout);
        let texts: Vec<&str> = runs.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(texts, ["Title", "Some ", "emph", " and ", "bold", " text."]);

        assert_eq!(runs[0].1.font, FontRole::Bold);
        assert_eq!(runs[0].1.size, Pt(24.0));
        assert_eq!(runs[1].1, Style::NEUTRAL);
        assert_eq!(runs[2].1.font, FontRole::Italic);
        assert_eq!(runs[4].1.font, FontRole::Bold);
        assert_eq!(runs[4].1.size, Pt(12.0));

        // the heading starts at the top of the page, the paragraph below it
        assert_eq!(runs[0].2, PageGeometry::default().top());
        assert!(runs[1].2 > runs[0].2);
        assert!(runs[1..].iter().all(|(_, _, y)| *y == runs[1].2));
        assert!(layout.placements.iter().all(|p| matches!(p, Placement::Run { .. })));
    }

    #[test]
    fn list_items_get_bullets_on_their_own_lines() {
        let layout = render("- one\n- two");
        let runs = runs(&layout);
        let texts: Vec<&str> = runs.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(texts, ["• ", "one", "• ", "two"]);
        assert_eq!(runs[1].2, runs[0].2);
        assert!(runs[2].2 > runs[0].2);
        assert_eq!(layout.placements[2].origin().0, PageGeometry::default().left());
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let layout = render("```\nlet x = 1;\nlet y = 2;\n```");
        let runs = runs(&layout);
        let texts: Vec<&str> = runs.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(texts, ["let x = 1;", "let y = 2;"]);
        assert!(runs
            .iter()
            .all(|(_, style, _)| style.font == FontRole::Monospace && style.size == Pt(10.0)));
        let spacing = runs[1].2 - runs[0].2;
        assert!((spacing.0 - 12.0).abs() < 1e-4, "{spacing}");
    }

    #[test]
    fn soft_and_hard_breaks() {
        let soft = runs(&render("a\nb"));
        let texts: Vec<&str> = soft.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(texts, ["a", " ", "b"]);
        assert!(soft.iter().all(|(_, _, y)| *y == soft[0].2));

        let hard = runs(&render("a  \nb"));
        assert_eq!(hard.len(), 2);
        assert!(hard[1].2 > hard[0].2);
    }

    #[test]
    fn inline_code_is_monospaced() {
        let runs = runs(&render("call `mix` now"));
        assert_eq!(runs[1].0, "mix");
        assert_eq!(runs[1].1.font, FontRole::Monospace);
        assert_eq!(runs[2].1.font, FontRole::Regular);
    }
}
