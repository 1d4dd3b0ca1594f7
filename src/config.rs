//! Settings shared by every document a run produces.
//!
//! Configuration comes from an optional TOML file; anything the file leaves out keeps its
//! default. Command line flags are applied on top by the binary.
//!
//! ```toml
//! page_size = "a4"
//! title = "Quarterly notes"
//!
//! [margins]
//! top = 72.0
//! right = 54.0
//! bottom = 72.0
//! left = 54.0
//!
//! [fonts]
//! regular = "fonts/NotoSans-Regular.ttf"
//! bold = "fonts/NotoSans-Bold.ttf"
//!
//! [chunks]
//! payload = { min = 3, max = 7 }
//! main_article = { min = 20, max = 100 }
//! other_articles = { min = 3, max = 7 }
//! ```

use crate::document::Document;
use crate::font::Font;
use crate::layout::{FontRole, Margins, PageGeometry};
use crate::mix::ChunkRange;
use crate::units::In;
use crate::{pagesize, ConfigError, PDFError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the page size, see [pagesize::by_name]
    pub page_size: String,

    pub margins: Margins,

    /// Title used when a request doesn't carry one
    pub title: Option<String>,

    /// Author used when a request doesn't carry one
    pub author: Option<String>,

    pub fonts: FontPaths,

    /// Chunk ranges used when a request doesn't carry its own
    pub chunks: ChunkDefaults,
}

/// Font files to embed, one per role. Only `regular` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
    pub monospace: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkDefaults {
    pub payload: ChunkRange,
    pub main_article: ChunkRange,
    pub other_articles: ChunkRange,
}

impl Default for ChunkDefaults {
    fn default() -> Self {
        ChunkDefaults {
            payload: ChunkRange::PAYLOAD,
            main_article: ChunkRange::PRIMARY_COVER,
            other_articles: ChunkRange::SECONDARY_COVER,
        }
    }
}

impl Default for Config {
    /// US Letter with one inch margins, no fonts
    fn default() -> Self {
        Config {
            page_size: Config::DEFAULT_PAGE_SIZE.to_string(),
            margins: Margins::all(In(1.0)),
            title: None,
            author: None,
            fonts: FontPaths::default(),
            chunks: ChunkDefaults::default(),
        }
    }
}

impl Config {
    const DEFAULT_PAGE_SIZE: &'static str = "letter";

    /// Parses a configuration file's contents, checking its page size and chunk ranges
    pub fn from_toml(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry()?;
        self.chunks.payload.validate("payload chunks")?;
        self.chunks.main_article.validate("primary cover chunks")?;
        self.chunks.other_articles.validate("secondary cover chunks")?;
        Ok(())
    }

    /// The page text is laid out on
    pub fn geometry(&self) -> Result<PageGeometry, ConfigError> {
        let size = pagesize::by_name(&self.page_size)
            .ok_or_else(|| ConfigError::UnknownPageSize(self.page_size.clone()))?;
        Ok(PageGeometry::new(size, self.margins.clone()))
    }
}

impl FontPaths {
    /// Every configured font file, paired with its role
    pub fn roles(&self) -> impl Iterator<Item = (FontRole, &PathBuf)> {
        [
            (FontRole::Regular, &self.regular),
            (FontRole::Bold, &self.bold),
            (FontRole::Italic, &self.italic),
            (FontRole::Monospace, &self.monospace),
        ]
        .into_iter()
        .filter_map(|(role, path)| path.as_ref().map(|p| (role, p)))
    }

    /// Read and parse every configured font and add it to `doc` under its role.
    ///
    /// Fails with [ConfigError::MissingFont] if no regular font is configured, before any
    /// file is read.
    pub fn load_into(&self, doc: &mut Document) -> Result<(), PDFError> {
        if self.regular.is_none() {
            return Err(ConfigError::MissingFont.into());
        }
        for (role, path) in self.roles() {
            let bytes = std::fs::read(path)?;
            let font = Font::load(bytes)?;
            tracing::debug!(?role, path = %path.display(), name = %font.name(), "loaded font");
            doc.add_font_for(role, font);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Pt;

    #[test]
    fn empty_files_give_the_defaults() {
        let config = Config::from_toml("").expect("valid config");
        assert_eq!(config, Config::default());
        assert_eq!(
            config.geometry().expect("known page size"),
            PageGeometry::default()
        );
    }

    #[test]
    fn partial_files_keep_the_other_defaults() {
        let config = Config::from_toml(
            r#"
            page_size = "A4"
            author = "Someone"

            [fonts]
            regular = "Regular.ttf"

            [chunks]
            payload = { min = 1, max = 2 }
            "#,
        )
        .expect("valid config");

        assert_eq!(config.geometry().expect("known").size, pagesize::A4);
        assert_eq!(config.author.as_deref(), Some("Someone"));
        assert_eq!(config.chunks.payload, ChunkRange { min: 1, max: 2 });
        assert_eq!(config.chunks.main_article, ChunkRange::PRIMARY_COVER);
        assert_eq!(config.margins.left, Pt(72.0));
        let roles: Vec<FontRole> = config.fonts.roles().map(|(role, _)| role).collect();
        assert_eq!(roles, [FontRole::Regular]);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Config::from_toml(r#"page_size = "postcard""#),
            Err(ConfigError::UnknownPageSize(name)) if name == "postcard"
        ));
        assert!(matches!(
            Config::from_toml("[chunks]\nmain_article = { min = 0, max = 3 }"),
            Err(ConfigError::InvalidChunkRange { min: 0, max: 3, .. })
        ));
        assert!(matches!(
            Config::from_toml("page_size = 12"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn a_regular_font_is_required() {
        let mut doc = Document::default();
        let fonts = FontPaths {
            bold: Some(PathBuf::from("Bold.ttf")),
            ..FontPaths::default()
        };
        assert!(matches!(
            fonts.load_into(&mut doc),
            Err(PDFError::Config(ConfigError::MissingFont))
        ));
    }

    #[test]
    fn unreadable_fonts_are_io_errors() {
        let dir = tempfile::tempdir().expect("can create a temporary directory");
        let mut doc = Document::default();
        let fonts = FontPaths {
            regular: Some(dir.path().join("missing.ttf")),
            ..FontPaths::default()
        };
        assert!(matches!(fonts.load_into(&mut doc), Err(PDFError::Io(_))));

        let garbage = dir.path().join("garbage.ttf");
        std::fs::write(&garbage, b"not a font").expect("can write");
        let fonts = FontPaths {
            regular: Some(garbage),
            ..FontPaths::default()
        };
        assert!(matches!(
            fonts.load_into(&mut doc),
            Err(PDFError::FaceParsingError(_))
        ));
    }
}
