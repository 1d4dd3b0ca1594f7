use super::Style;
use crate::units::Pt;
use crate::PDFError;

/// The font metrics the [Renderer](super::Renderer) needs. [Document](crate::Document)
/// implements this with its embedded fonts; [FixedAdvance] approximates it without any font
/// at all.
pub trait Measure {
    /// Horizontal advance of `text` set in `style`. Line breaks have no width.
    fn width_of(&self, text: &str, style: &Style) -> Result<Pt, PDFError>;

    /// How far apart consecutive lines set in `style` are
    fn line_height(&self, style: &Style) -> Result<Pt, PDFError>;
}

/// Metrics for a notional monospaced font where every character advances `advance` ems and
/// lines are `line_spacing` ems apart. Useful for dry runs, where only the shape of the
/// layout matters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedAdvance {
    pub advance: f32,
    pub line_spacing: f32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        FixedAdvance {
            advance: 0.5,
            line_spacing: 1.2,
        }
    }
}

impl Measure for FixedAdvance {
    fn width_of(&self, text: &str, style: &Style) -> Result<Pt, PDFError> {
        let count = text.chars().filter(|&ch| ch != '\n').count();
        Ok(style.size * (self.advance * count as f32))
    }

    fn line_height(&self, style: &Style) -> Result<Pt, PDFError> {
        Ok(style.size * self.line_spacing)
    }
}
