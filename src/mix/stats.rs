use super::{Fragment, Source, Visibility};
use std::collections::BTreeMap;

/// Counts describing a mixed sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub visible: usize,
    pub invisible: usize,
    /// Number of fragments emitted per source; wrapped-around cover chunks count every time
    /// they are emitted
    pub by_source: BTreeMap<Source, usize>,
}

impl Statistics {
    pub fn of(fragments: &[Fragment]) -> Statistics {
        let mut stats = Statistics {
            total: fragments.len(),
            ..Statistics::default()
        };
        for fragment in fragments {
            match fragment.visibility {
                Visibility::Visible => stats.visible += 1,
                Visibility::Invisible => stats.invisible += 1,
            }
            *stats.by_source.entry(fragment.source).or_insert(0) += 1;
        }
        stats
    }

    /// Share of visible fragments, as a percentage. Zero for an empty sequence.
    pub fn visibility_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.visible as f64 / self.total as f64 * 100.0
    }
}

/// Shorthand for [Statistics::of]
pub fn statistics(fragments: &[Fragment]) -> Statistics {
    Statistics::of(fragments)
}

/// Concatenates fragment texts in order, keeping only those with the given visibility (or
/// all of them when `filter` is [None]). Filtering on [Visibility::Visible] recovers the
/// payload.
pub fn reconstruct(fragments: &[Fragment], filter: Option<Visibility>) -> String {
    fragments
        .iter()
        .filter(|f| filter.map_or(true, |v| f.visibility == v))
        .map(|f| f.text.as_str())
        .collect()
}
