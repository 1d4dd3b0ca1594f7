use super::{ChunkRange, Fragment, RandomSource, Source, Visibility};

/// Splits `text` into consecutive chunks whose lengths (in characters) are drawn uniformly
/// from `range`. The last chunk is whatever remains, so it may be shorter than `range.min`.
/// Chunks are verbatim substrings: concatenating them gives back `text`.
///
/// A range that starts at zero is treated as starting at one, so splitting always makes
/// progress.
pub fn split_into_chunks<R: RandomSource + ?Sized>(
    text: &str,
    range: ChunkRange,
    source: Source,
    visibility: Visibility,
    rng: &mut R,
) -> Vec<Fragment> {
    let min = range.min.max(1);
    let max = range.max.max(min);

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let length = rng.between(min, max);
        let rest = &text[start..];
        let end = rest
            .char_indices()
            .nth(length)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());

        chunks.push(Fragment {
            text: text[start..end].to_string(),
            visibility,
            source,
            sequence_index: chunks.len(),
        });
        start = end;
    }
    chunks
}

/// A cursor over one source's chunk list
#[derive(Debug)]
pub(crate) struct SourceStream {
    chunks: Vec<Fragment>,
    position: usize,
}

impl SourceStream {
    pub(crate) fn new(chunks: Vec<Fragment>) -> SourceStream {
        SourceStream {
            chunks,
            position: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.position >= self.chunks.len()
    }

    /// The next chunk, or [None] once every chunk has been handed out
    pub(crate) fn next_once(&mut self) -> Option<&Fragment> {
        let chunk = self.chunks.get(self.position)?;
        self.position += 1;
        Some(chunk)
    }

    /// The next chunk, restarting from the first one when the list is exhausted. Only
    /// returns [None] for an empty stream.
    pub(crate) fn next_wrapping(&mut self) -> Option<&Fragment> {
        if self.chunks.is_empty() {
            return None;
        }
        if self.is_exhausted() {
            tracing::trace!(
                chunks = self.chunks.len(),
                "cover stream exhausted, restarting"
            );
            self.position = 0;
        }
        self.next_once()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn range(min: usize, max: usize) -> ChunkRange {
        ChunkRange { min, max }
    }

    #[test]
    fn chunks_concatenate_to_the_source() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let text = lipsum::lipsum(120);
        let chunks = split_into_chunks(
            &text,
            range(20, 100),
            Source::MainArticle,
            Visibility::Invisible,
            &mut rng,
        );

        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined, text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i);
            assert!(!chunk.text.is_empty());
        }
        // every chunk but the last respects the range
        for chunk in &chunks[..chunks.len() - 1] {
            let n = chunk.text.chars().count();
            assert!((20..=100).contains(&n), "chunk of {n} characters");
        }
    }

    #[test]
    fn splits_on_character_boundaries() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let text = "Frankfurter Würstchen, jalapeños — 热狗 🌭";
        let chunks = split_into_chunks(
            text,
            range(1, 3),
            Source::Original,
            Visibility::Visible,
            &mut rng,
        );
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined, text);
        assert!(chunks.iter().all(|c| (1..=3).contains(&c.text.chars().count())));
    }

    #[test]
    fn zero_length_range_still_progresses() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let chunks = split_into_chunks(
            "abc",
            range(0, 0),
            Source::Original,
            Visibility::Visible,
            &mut rng,
        );
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let chunks = split_into_chunks(
            "",
            range(3, 7),
            Source::Original,
            Visibility::Visible,
            &mut rng,
        );
        assert!(chunks.is_empty());
    }

    #[test]
    fn wrapping_restarts_at_the_first_chunk() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let chunks = split_into_chunks(
            "The quick brown fox",
            range(5, 5),
            Source::MainArticle,
            Visibility::Invisible,
            &mut rng,
        );
        assert_eq!(chunks.len(), 4);

        let mut stream = SourceStream::new(chunks);
        let drawn: Vec<usize> = (0..10)
            .map(|_| stream.next_wrapping().expect("not empty").sequence_index)
            .collect();
        assert_eq!(drawn, [0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn next_once_does_not_wrap() {
        let mut stream = SourceStream::new(vec![Fragment {
            text: "x".into(),
            visibility: Visibility::Visible,
            source: Source::Original,
            sequence_index: 0,
        }]);
        assert!(stream.next_once().is_some());
        assert!(stream.is_exhausted());
        assert!(stream.next_once().is_none());

        let mut empty = SourceStream::new(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.next_wrapping().is_none());
    }
}
