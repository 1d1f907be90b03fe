//! Filtering of fuzzy workspace-symbol results down to genuine matches.
//!
//! Indexers disagree on how they name methods: some report `Type.method` or
//! `Type::method`, others only `method` with the type as container. The
//! matcher accepts both shapes so callers never need to know which one the
//! server uses.

use crate::lsp::SymbolCandidate;

/// Separators tried when a method name is reported in qualified form.
pub fn default_separators() -> Vec<String> {
    vec![".".to_string(), "::".to_string()]
}

/// Name/kind aware candidate filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatcher {
    separators: Vec<String>,
}

impl Default for SymbolMatcher {
    fn default() -> Self {
        Self::new(default_separators())
    }
}

impl SymbolMatcher {
    /// Create a matcher with custom method separators. Empty separators are ignored.
    pub fn new(separators: Vec<String>) -> Self {
        Self {
            separators: separators.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Whether a single candidate satisfies the query.
    pub fn is_match(&self, query: &str, candidate: &SymbolCandidate) -> bool {
        let name = candidate.name.as_str();

        if let Some((_, method_name)) = query.rsplit_once('.') {
            return name == query || name == method_name;
        }

        if name == query {
            return true;
        }

        candidate.is_method()
            && name
                .strip_suffix(query)
                .is_some_and(|prefix| self.separators.iter().any(|sep| prefix.ends_with(sep.as_str())))
    }

    /// Candidates matching the query, in their original order.
    pub fn matches(&self, query: &str, candidates: Vec<SymbolCandidate>) -> Vec<SymbolCandidate> {
        candidates
            .into_iter()
            .filter(|candidate| self.is_match(query, candidate))
            .collect()
    }

    /// Like [`matches`](Self::matches), with an extra pass for method candidates.
    ///
    /// For a qualified query such as `Server.start`, a method reported only as
    /// `start` is kept when its container agrees with `Server` or when the
    /// server gave no container at all.
    pub fn matches_definition(&self, query: &str, candidates: Vec<SymbolCandidate>) -> Vec<SymbolCandidate> {
        let qualifier = query
            .rsplit_once('.')
            .map(|(head, _)| self.last_segment(head).to_string());

        candidates
            .into_iter()
            .filter(|candidate| self.is_match(query, candidate))
            .filter(|candidate| match (&qualifier, &candidate.container) {
                (Some(qualifier), Some(container)) if candidate.is_method() && candidate.name != query => {
                    self.last_segment(container) == qualifier
                }
                _ => true,
            })
            .collect()
    }

    /// Text after the last separator in `name`.
    fn last_segment<'a>(&self, name: &'a str) -> &'a str {
        let start = self
            .separators
            .iter()
            .filter_map(|sep| name.rfind(sep.as_str()).map(|i| i + sep.len()))
            .max()
            .unwrap_or(0);
        &name[start..]
    }
}
