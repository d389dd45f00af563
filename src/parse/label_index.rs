//! Hashed label lookup used to align a table with an external label order.

use foldhash::{HashMap, HashMapExt};
use rayon::prelude::*;

/// Position of every label of a selection.
///
/// The map is built from per-worker partial maps that are merged once; after
/// construction it is only read, so lookups can run concurrently.
#[derive(Debug, Clone)]
pub struct LabelIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> LabelIndex<'a> {
    /// Index `selected`. For duplicate labels the first position wins.
    pub fn new(selected: &'a [String]) -> Self {
        let positions = selected
            .par_iter()
            .enumerate()
            .fold(
                || HashMap::new(),
                |mut partial: HashMap<&'a str, usize>, (position, label)| {
                    partial.entry(label.as_str()).or_insert(position);
                    partial
                },
            )
            .reduce(
                || HashMap::new(),
                |mut merged, partial| {
                    for (label, position) in partial {
                        merged
                            .entry(label)
                            .and_modify(|p| *p = (*p).min(position))
                            .or_insert(position);
                    }
                    merged
                },
            );
        Self { positions }
    }

    /// Position of `label` in the selection.
    #[inline]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Number of distinct selected labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if nothing was selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Map every label to its position in the selection, `None` if absent.
    pub fn lookup(&self, labels: &[String]) -> Vec<Option<usize>> {
        labels.par_iter().map(|l| self.position(l)).collect()
    }
}

/// Map each entry of `labels` to its position in `selected`.
pub fn build_index(labels: &[String], selected: &[String]) -> Vec<Option<usize>> {
    LabelIndex::new(selected).lookup(labels)
}
