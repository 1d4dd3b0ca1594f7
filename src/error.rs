use thiserror::Error;

/// Problems with what the caller asked for. These are always reported before any mixing or
/// layout work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`{field}` must be a non-empty string")]
    /// A required text was missing or empty
    EmptyText { field: &'static str },

    #[error("the payload needs cover material, but the primary cover is empty")]
    /// There is nothing to interleave the payload with
    EmptyCover,

    #[error("invalid chunk size range for {category}: min {min}, max {max} (need 1 <= min <= max)")]
    /// A chunk size range is empty or starts at zero
    InvalidChunkRange {
        category: &'static str,
        min: usize,
        max: usize,
    },

    #[error("unknown page size `{0}`")]
    /// The configured page size isn't one of [crate::pagesize::by_name]'s names
    UnknownPageSize(String),

    #[error("unknown mode `{0}`, expected `text` or `markdown`")]
    /// A text request asked for a rendering mode that doesn't exist
    UnknownMode(String),

    #[error("no font configured; a regular font face is required to measure and embed text")]
    /// No regular font face was given
    MissingFont,

    #[error("malformed request: {0}")]
    /// The JSON request could not be decoded, e.g. `otherArticles` was not an array
    Request(#[from] serde_json::Error),

    #[error("malformed configuration file: {0}")]
    /// The TOML configuration could not be decoded
    Toml(#[from] toml::de::Error),
}

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// The request or configuration was invalid
    Config(#[from] ConfigError),

    #[error("font has no glyph for {0:?} and no replacement glyph")]
    /// A character could not be measured or drawn with the selected font
    MissingGlyph(char),

    #[error("a placement refers to a page that was never created")]
    /// A page referenced during writing doesn't exist in the document
    PageMissing,
}
