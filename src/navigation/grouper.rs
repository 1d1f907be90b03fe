//! Partitioning of hit locations by file.

use std::collections::BTreeMap;

use crate::lsp::SourceLocation;

/// Hit locations grouped by normalized file identifier.
///
/// Files iterate in ascending byte order of their identifier. Within a file,
/// hits are ordered by start line, then start column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitSet {
    files: BTreeMap<String, Vec<SourceLocation>>,
}

impl HitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group a flat list of locations. Exact duplicates keep their first occurrence.
    pub fn group<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = SourceLocation>,
    {
        let mut set = Self::new();
        set.extend(locations);
        set
    }

    /// Add more locations, keeping every file's hits sorted and deduplicated.
    pub fn extend<I>(&mut self, locations: I)
    where
        I: IntoIterator<Item = SourceLocation>,
    {
        for location in locations {
            let hits = self.files.entry(location.file_id()).or_default();
            if !hits.contains(&location) {
                hits.push(location);
            }
        }

        for hits in self.files.values_mut() {
            hits.sort_by_key(|loc| loc.range.start);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of distinct files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total hits across all files.
    pub fn hit_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Files in deterministic order with their hits.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SourceLocation])> {
        self.files
            .iter()
            .map(|(file, hits)| (file.as_str(), hits.as_slice()))
    }
}
