//! Whole-document requests: what to render, validated up front, turned into PDF bytes in
//! one go.
//!
//! Both request types deserialize from the camelCase JSON bodies the service historically
//! accepted, e.g.
//!
//! ```
//! use pdf_mixer::MixRequest;
//!
//! let request = MixRequest::from_json(r#"{
//!     "originalText": "meet at noon",
//!     "mainArticle": "The quick brown fox jumps over the lazy dog",
//!     "otherArticles": ["lorem ipsum"],
//!     "originalChunkSize": { "min": 2, "max": 4 },
//!     "includeStatistics": true
//! }"#).expect("valid request");
//! assert_eq!(request.other_articles.len(), 1);
//! assert!(request.validate().is_ok());
//! ```

use crate::appendix::{write_special_sequences, write_statistics};
use crate::config::{ChunkDefaults, Config};
use crate::document::Document;
use crate::info::Info;
use crate::layout::{Layout, Measure, PageGeometry, Renderer, Style};
use crate::markdown::write_markdown;
use crate::mix::{mix, ChunkRange, MixOptions, RandomSource, Statistics};
use crate::{ConfigError, PDFError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hide `original_text` among the article texts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixRequest {
    /// The payload
    #[serde(default)]
    pub original_text: String,
    /// The primary cover
    #[serde(default)]
    pub main_article: String,
    /// Secondary covers, pooled in order
    #[serde(default)]
    pub other_articles: Vec<String>,
    pub original_chunk_size: Option<ChunkRange>,
    pub main_article_chunk_size: Option<ChunkRange>,
    pub other_article_chunk_size: Option<ChunkRange>,
    #[serde(default)]
    pub include_statistics: bool,
    #[serde(default)]
    pub include_special_sequences: bool,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// How the text of a [TextRequest] is interpreted
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Flowing text, line breaks kept
    #[default]
    #[serde(alias = "plain")]
    Text,
    Markdown,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(Mode::Text),
            "markdown" | "md" => Ok(Mode::Markdown),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Render a single text, with nothing hidden in it apart from the optional special
/// sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
    pub mode: Mode,
    #[serde(default)]
    pub include_special_sequences: bool,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl MixRequest {
    pub fn from_json(json: &str) -> Result<MixRequest, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check everything that can be checked without doing any work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.original_text.is_empty() {
            return Err(ConfigError::EmptyText {
                field: "originalText",
            });
        }
        if self.main_article.is_empty() {
            return Err(ConfigError::EmptyText {
                field: "mainArticle",
            });
        }
        let ranges = [
            ("payload chunks", self.original_chunk_size),
            ("primary cover chunks", self.main_article_chunk_size),
            ("secondary cover chunks", self.other_article_chunk_size),
        ];
        for (category, range) in ranges {
            if let Some(range) = range {
                range.validate(category)?;
            }
        }
        Ok(())
    }

    /// Mixer options for this request, falling back to `defaults` for missing chunk ranges
    pub fn options(&self, defaults: &ChunkDefaults) -> MixOptions<'_> {
        MixOptions::new(&self.original_text, &self.main_article)
            .with_secondary_covers(self.other_articles.iter().map(String::as_str).collect())
            .with_chunk_ranges(
                self.original_chunk_size.unwrap_or(defaults.payload),
                self.main_article_chunk_size.unwrap_or(defaults.main_article),
                self.other_article_chunk_size.unwrap_or(defaults.other_articles),
            )
    }

    /// Mix and lay out the request, appending the requested blocks. Returns the layout and
    /// the statistics of the mixed sequence.
    pub fn layout<M, R>(
        &self,
        metrics: &M,
        geometry: PageGeometry,
        defaults: &ChunkDefaults,
        rng: &mut R,
    ) -> Result<(Layout, Statistics), PDFError>
    where
        M: Measure + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.validate()?;
        let fragments = mix(&self.options(defaults), rng)?;
        let stats = Statistics::of(&fragments);

        let mut renderer = Renderer::new(metrics, geometry);
        renderer.render_fragments(&fragments)?;
        if self.include_statistics {
            write_statistics(&mut renderer, &stats)?;
        }
        if self.include_special_sequences {
            write_special_sequences(&mut renderer, rng)?;
        }
        Ok((renderer.finish(), stats))
    }

    /// Produce the finished PDF. Either the whole document is returned or nothing is.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        config: &Config,
        rng: &mut R,
    ) -> Result<Vec<u8>, PDFError> {
        self.validate()?;
        let geometry = config.geometry()?;
        let mut doc = Document::default();
        config.fonts.load_into(&mut doc)?;

        let (layout, stats) = self.layout(&doc, geometry.clone(), &config.chunks, rng)?;
        tracing::info!(
            total = stats.total,
            visible = stats.visible,
            invisible = stats.invisible,
            ratio = stats.visibility_ratio(),
            pages = layout.page_count(),
            "mixed document laid out"
        );

        doc.place(&layout, &geometry)?;
        doc.set_info(Info::titled(
            self.title.as_deref().or(config.title.as_deref()),
            self.author.as_deref().or(config.author.as_deref()),
        ));
        doc.to_bytes()
    }
}

impl TextRequest {
    pub fn from_json(json: &str) -> Result<TextRequest, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text.is_empty() {
            return Err(ConfigError::EmptyText { field: "text" });
        }
        Ok(())
    }

    /// Lay out the text according to its mode, then the special sequences if requested
    pub fn layout<M, R>(
        &self,
        metrics: &M,
        geometry: PageGeometry,
        rng: &mut R,
    ) -> Result<Layout, PDFError>
    where
        M: Measure + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.validate()?;
        let mut renderer = Renderer::new(metrics, geometry);
        match self.mode {
            Mode::Text => {
                renderer.write_visible(&self.text, Style::NEUTRAL)?;
                renderer.new_line()?;
                renderer.reset_style();
            }
            Mode::Markdown => write_markdown(&mut renderer, &self.text)?,
        }
        if self.include_special_sequences {
            write_special_sequences(&mut renderer, rng)?;
        }
        Ok(renderer.finish())
    }

    /// Produce the finished PDF. Either the whole document is returned or nothing is.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        config: &Config,
        rng: &mut R,
    ) -> Result<Vec<u8>, PDFError> {
        self.validate()?;
        let geometry = config.geometry()?;
        let mut doc = Document::default();
        config.fonts.load_into(&mut doc)?;

        let layout = self.layout(&doc, geometry.clone(), rng)?;
        tracing::info!(mode = ?self.mode, pages = layout.page_count(), "text laid out");

        doc.place(&layout, &geometry)?;
        doc.set_info(Info::titled(
            self.title.as_deref().or(config.title.as_deref()),
            self.author.as_deref().or(config.author.as_deref()),
        ));
        doc.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FixedAdvance, Placement};
    use crate::mix::tests::Scripted;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn hello() -> MixRequest {
        MixRequest {
            original_text: "HELLO".into(),
            main_article: "The quick brown fox".into(),
            original_chunk_size: Some(ChunkRange { min: 1, max: 1 }),
            main_article_chunk_size: Some(ChunkRange { min: 5, max: 5 }),
            ..MixRequest::default()
        }
    }

    #[test]
    fn json_bodies_deserialize() {
        let request = MixRequest::from_json(
            r#"{"originalText": "a", "mainArticle": "b", "includeSpecialSequences": true,
                "mainArticleChunkSize": {"min": 4, "max": 9}, "title": "T"}"#,
        )
        .expect("valid json");
        assert_eq!(request.original_text, "a");
        assert!(request.other_articles.is_empty());
        assert!(request.include_special_sequences);
        assert!(!request.include_statistics);
        assert_eq!(
            request.main_article_chunk_size,
            Some(ChunkRange { min: 4, max: 9 })
        );
        assert_eq!(request.title.as_deref(), Some("T"));

        let text = TextRequest::from_json(r#"{"text": "hi", "mode": "markdown"}"#)
            .expect("valid json");
        assert_eq!(text.mode, Mode::Markdown);
        let plain = TextRequest::from_json(r#"{"text": "hi", "mode": "plain"}"#)
            .expect("valid json");
        assert_eq!(plain.mode, Mode::Text);
    }

    #[test]
    fn malformed_bodies_are_request_errors() {
        assert!(matches!(
            MixRequest::from_json(r#"{"originalText": "a", "mainArticle": "b", "otherArticles": "c"}"#),
            Err(ConfigError::Request(_))
        ));
        assert!(matches!(
            TextRequest::from_json(r#"{"text": "hi", "mode": "pdf"}"#),
            Err(ConfigError::Request(_))
        ));
        assert!(matches!(
            "html".parse::<Mode>(),
            Err(ConfigError::UnknownMode(mode)) if mode == "html"
        ));
        assert_eq!("Markdown".parse::<Mode>().ok(), Some(Mode::Markdown));
    }

    #[test]
    fn empty_texts_are_rejected_by_field() {
        let request = MixRequest {
            original_text: String::new(),
            ..hello()
        };
        assert!(matches!(
            request.validate(),
            Err(ConfigError::EmptyText {
                field: "originalText"
            })
        ));
        let request = MixRequest {
            main_article: String::new(),
            ..hello()
        };
        assert!(matches!(
            request.validate(),
            Err(ConfigError::EmptyText {
                field: "mainArticle"
            })
        ));
        assert!(matches!(
            TextRequest::default().validate(),
            Err(ConfigError::EmptyText { field: "text" })
        ));
    }

    #[test]
    fn invalid_chunk_ranges_fail_before_anything_else() {
        let request = MixRequest {
            other_article_chunk_size: Some(ChunkRange { min: 5, max: 2 }),
            ..hello()
        };
        // no fonts are configured either, but the range is reported first
        let result = request.generate(&Config::default(), &mut Scripted::new(&[0.1]));
        assert!(matches!(
            result,
            Err(PDFError::Config(ConfigError::InvalidChunkRange {
                category: "secondary cover chunks",
                ..
            }))
        ));
    }

    #[test]
    fn generating_without_a_font_is_a_configuration_error() {
        let result = hello().generate(&Config::default(), &mut Scripted::new(&[0.1]));
        assert!(matches!(
            result,
            Err(PDFError::Config(ConfigError::MissingFont))
        ));
    }

    #[test]
    fn request_ranges_override_the_defaults() {
        let request = MixRequest {
            other_articles: vec!["x".into(), "y".into()],
            ..hello()
        };
        let options = request.options(&ChunkDefaults::default());
        assert_eq!(options.payload_chunks, ChunkRange { min: 1, max: 1 });
        assert_eq!(options.primary_chunks, ChunkRange { min: 5, max: 5 });
        assert_eq!(options.secondary_chunks, ChunkRange::SECONDARY_COVER);
        assert_eq!(options.secondary_covers, ["x", "y"]);
    }

    #[test]
    fn hello_lays_out_five_visible_runs() {
        let metrics = FixedAdvance::default();
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let (layout, stats) = hello()
            .layout(&metrics, PageGeometry::default(), &ChunkDefaults::default(), &mut rng)
            .expect("can lay out");

        assert_eq!(stats.visible, 5);
        let visible: String = layout
            .placements
            .iter()
            .filter_map(|p| match p {
                Placement::Run { text, .. } => Some(text.as_str()),
                Placement::Glyph { .. } => None,
            })
            .collect();
        assert_eq!(visible, "HELLO");
        let hidden = layout
            .placements
            .iter()
            .filter(|p| matches!(p, Placement::Glyph { .. }))
            .count();
        // cover chunks are at most five characters long
        assert!(hidden <= stats.invisible * 5);
        assert_eq!(hidden == 0, stats.invisible == 0);
    }

    #[test]
    fn statistics_are_appended_on_request() {
        let metrics = FixedAdvance::default();
        let request = MixRequest {
            include_statistics: true,
            ..hello()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let (layout, _) = request
            .layout(&metrics, PageGeometry::default(), &ChunkDefaults::default(), &mut rng)
            .expect("can lay out");
        assert!(layout.placements.iter().any(|p| matches!(
            p,
            Placement::Run { text, .. } if text == "Mix statistics"
        )));
    }

    #[test]
    fn plain_text_keeps_its_lines() {
        let metrics = FixedAdvance::default();
        let request = TextRequest {
            text: "first\nsecond".into(),
            ..TextRequest::default()
        };
        let layout = request
            .layout(&metrics, PageGeometry::default(), &mut Scripted::new(&[0.5]))
            .expect("can lay out");
        assert_eq!(layout.placements.len(), 2);
        assert!(layout.placements[1].origin().1 > layout.placements[0].origin().1);
        assert!(layout
            .placements
            .iter()
            .all(|p| *p.style() == Style::NEUTRAL));
    }
}
