use crate::colour::{colours, Colour};
use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// Which of the document's fonts a piece of text is set in. Roles a document has no font
/// for fall back to [FontRole::Regular].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    #[default]
    Regular,
    Bold,
    Italic,
    Monospace,
}

/// How a run or glyph is drawn
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Style {
    pub font: FontRole,
    pub size: Pt,
    pub colour: Colour,
    /// Fill opacity, from 0.0 (transparent) to 1.0 (opaque)
    pub opacity: f32,
}

impl Style {
    /// Ordinary visible text: opaque black, 10pt
    pub const BODY: Style = Style {
        font: FontRole::Regular,
        size: Pt(10.0),
        colour: colours::BLACK,
        opacity: 1.0,
    };

    /// Text that is present in the content stream but not perceptible: white, 1% opacity,
    /// 0.1pt
    pub const HIDDEN: Style = Style {
        font: FontRole::Regular,
        size: Pt(0.1),
        colour: colours::WHITE,
        opacity: 0.01,
    };

    /// What the renderer returns to once a mixed sequence is done: opaque black, 12pt
    pub const NEUTRAL: Style = Style {
        font: FontRole::Regular,
        size: Pt(12.0),
        colour: colours::BLACK,
        opacity: 1.0,
    };

    pub fn with_font(self, font: FontRole) -> Style {
        Style { font, ..self }
    }

    pub fn with_size(self, size: Pt) -> Style {
        Style { size, ..self }
    }

    pub fn with_colour(self, colour: Colour) -> Style {
        Style { colour, ..self }
    }

    pub fn with_opacity(self, opacity: f32) -> Style {
        Style { opacity, ..self }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::NEUTRAL
    }
}
