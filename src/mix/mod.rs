//! Interleaving of a payload text with cover texts.
//!
//! Every source text is cut into chunks of random length (see [split_into_chunks]). The
//! payload's chunks are labelled [Visibility::Visible] and every cover chunk
//! [Visibility::Invisible]. The mixer then walks the payload chunks in order, and before each
//! one it may emit any number of cover chunks:
//!
//! - 30% of draws emit the next payload chunk,
//! - 50% emit the next primary cover chunk,
//! - 20% emit the next secondary cover chunk (or a primary one if there are no secondary
//!   covers).
//!
//! Cover chunk lists restart from their first chunk when they run out, so a short cover can
//! hide an arbitrarily long payload. Mixing stops as soon as the last payload chunk has been
//! emitted, and filtering the result on [Visibility::Visible] always gives back the payload
//! verbatim.
//!
//! ```
//! use pdf_mixer::mix::{mix, reconstruct, ChunkRange, MixOptions, Visibility};
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(42);
//! let options = MixOptions::new("meet at noon", "The quick brown fox jumps over the lazy dog")
//!     .with_secondary_covers(vec!["lorem ipsum dolor"]);
//! let fragments = mix(&options, &mut rng).expect("valid options");
//! assert_eq!(reconstruct(&fragments, Some(Visibility::Visible)), "meet at noon");
//! ```

mod chunk;
mod random;
mod stats;

pub use chunk::split_into_chunks;
pub use random::*;
pub use stats::*;

use crate::error::ConfigError;
use chunk::SourceStream;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a fragment is meant to be rendered
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Invisible,
}

/// Which text a fragment was cut from
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// The payload
    Original,
    /// The primary cover
    MainArticle,
    /// The n-th secondary cover, counting from 1
    OtherArticle(usize),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Original => write!(f, "original"),
            Source::MainArticle => write!(f, "main-article"),
            Source::OtherArticle(n) => write!(f, "other-article-{n}"),
        }
    }
}

/// One labelled piece of a source text
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub visibility: Visibility,
    pub source: Source,
    /// Position of this chunk within its source's chunk list. Cover chunks that are emitted
    /// again after a wraparound keep their original index.
    pub sequence_index: usize,
}

/// An inclusive range of chunk lengths, in characters
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRange {
    pub min: usize,
    pub max: usize,
}

impl ChunkRange {
    /// Default range for payload chunks
    pub const PAYLOAD: ChunkRange = ChunkRange { min: 3, max: 7 };
    /// Default range for primary cover chunks
    pub const PRIMARY_COVER: ChunkRange = ChunkRange { min: 20, max: 100 };
    /// Default range for secondary cover chunks
    pub const SECONDARY_COVER: ChunkRange = ChunkRange { min: 3, max: 7 };

    /// Create a range, rejecting `min == 0` and `min > max`. `category` names the range in
    /// the error.
    pub fn new(category: &'static str, min: usize, max: usize) -> Result<ChunkRange, ConfigError> {
        let range = ChunkRange { min, max };
        range.validate(category)?;
        Ok(range)
    }

    pub fn validate(&self, category: &'static str) -> Result<(), ConfigError> {
        if self.min == 0 || self.min > self.max {
            return Err(ConfigError::InvalidChunkRange {
                category,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Everything the mixer needs apart from randomness
#[derive(Debug, Clone)]
pub struct MixOptions<'a> {
    /// The text that ends up as visible fragments
    pub payload: &'a str,
    pub primary_cover: &'a str,
    pub secondary_covers: Vec<&'a str>,
    pub payload_chunks: ChunkRange,
    pub primary_chunks: ChunkRange,
    pub secondary_chunks: ChunkRange,
}

impl<'a> MixOptions<'a> {
    /// Options with no secondary covers and the default chunk ranges
    pub fn new(payload: &'a str, primary_cover: &'a str) -> MixOptions<'a> {
        MixOptions {
            payload,
            primary_cover,
            secondary_covers: Vec::new(),
            payload_chunks: ChunkRange::PAYLOAD,
            primary_chunks: ChunkRange::PRIMARY_COVER,
            secondary_chunks: ChunkRange::SECONDARY_COVER,
        }
    }

    pub fn with_secondary_covers(mut self, covers: Vec<&'a str>) -> Self {
        self.secondary_covers = covers;
        self
    }

    /// Override the payload, primary cover, and secondary cover chunk ranges
    pub fn with_chunk_ranges(
        mut self,
        payload: ChunkRange,
        primary: ChunkRange,
        secondary: ChunkRange,
    ) -> Self {
        self.payload_chunks = payload;
        self.primary_chunks = primary;
        self.secondary_chunks = secondary;
        self
    }

    /// Check the ranges, and that a non-empty payload has a cover to hide in
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.payload_chunks.validate("payload chunks")?;
        self.primary_chunks.validate("primary cover chunks")?;
        self.secondary_chunks.validate("secondary cover chunks")?;
        if !self.payload.is_empty() && self.primary_cover.is_empty() {
            return Err(ConfigError::EmptyCover);
        }
        Ok(())
    }
}

// upper bounds of the branch draws: 30% payload, 50% primary cover, 20% secondary cover
const PAYLOAD_BELOW: f64 = 0.30;
const PRIMARY_BELOW: f64 = 0.80;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Draw {
    Payload,
    Primary,
    Secondary,
}

impl Draw {
    fn from_unit(r: f64) -> Draw {
        if r < PAYLOAD_BELOW {
            Draw::Payload
        } else if r < PRIMARY_BELOW {
            Draw::Primary
        } else {
            Draw::Secondary
        }
    }
}

/// Interleave the payload with the covers. See the [module documentation](self) for the
/// algorithm.
///
/// An empty payload yields an empty sequence. A non-empty payload with an empty primary
/// cover, or any invalid chunk range, is rejected before anything is drawn from `rng`.
pub fn mix<R: RandomSource + ?Sized>(
    options: &MixOptions<'_>,
    rng: &mut R,
) -> Result<Vec<Fragment>, ConfigError> {
    options.validate()?;
    if options.payload.is_empty() {
        return Ok(Vec::new());
    }

    let mut payload = SourceStream::new(split_into_chunks(
        options.payload,
        options.payload_chunks,
        Source::Original,
        Visibility::Visible,
        rng,
    ));
    let mut primary = SourceStream::new(split_into_chunks(
        options.primary_cover,
        options.primary_chunks,
        Source::MainArticle,
        Visibility::Invisible,
        rng,
    ));
    let mut secondary = SourceStream::new(
        options
            .secondary_covers
            .iter()
            .enumerate()
            .flat_map(|(i, cover)| {
                split_into_chunks(
                    cover,
                    options.secondary_chunks,
                    Source::OtherArticle(i + 1),
                    Visibility::Invisible,
                    rng,
                )
            })
            .collect(),
    );

    let mut mixed: Vec<Fragment> = Vec::new();
    while !payload.is_exhausted() {
        let chunk = match Draw::from_unit(rng.unit()) {
            Draw::Payload => payload.next_once(),
            Draw::Secondary if !secondary.is_empty() => secondary.next_wrapping(),
            Draw::Primary | Draw::Secondary => primary.next_wrapping(),
        };
        // validate() guarantees the primary stream is non-empty here
        if let Some(chunk) = chunk {
            mixed.push(chunk.clone());
        }
    }

    tracing::debug!(
        fragments = mixed.len(),
        payload_chars = options.payload.chars().count(),
        secondary_covers = options.secondary_covers.len(),
        "mixed payload into cover texts"
    );
    Ok(mixed)
}
