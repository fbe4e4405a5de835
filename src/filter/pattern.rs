use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use super::extended::ExtendedGlob;
use super::FilterType;
use crate::error::TraverseError;

/// A compiled name pattern, shared by node, child and sample predicates.
#[derive(Debug, Clone)]
pub(crate) enum Pattern {
    Glob(GlobMatcher),
    Regex(Regex),
    ExtendedGlob(ExtendedGlob),
}

impl Pattern {
    /// Compile `pattern` in the given dialect. Only the name dialects are
    /// accepted here; `Custom` and `Poly` are composed by the callers.
    pub(crate) fn compile(filter_type: FilterType, pattern: &str) -> Result<Self, TraverseError> {
        match filter_type {
            FilterType::Glob => compile_glob(pattern, false).map(Pattern::Glob),
            FilterType::Regex => Regex::new(pattern)
                .map(Pattern::Regex)
                .map_err(|source| TraverseError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                }),
            FilterType::ExtendedGlob => ExtendedGlob::parse(pattern).map(Pattern::ExtendedGlob),
            FilterType::Undefined => Err(TraverseError::MissingFilterType),
            other => Err(TraverseError::UnsupportedChildFilter(other)),
        }
    }

    /// Match a leaf name. `parent` is only consulted by extended globs.
    pub(crate) fn is_match(&self, name: &str, parent: impl FnOnce() -> Option<String>) -> bool {
        match self {
            Pattern::Glob(glob) => glob.is_match(name),
            Pattern::Regex(regex) => regex.is_match(name),
            Pattern::ExtendedGlob(ext) => ext.is_match(parent().as_deref().unwrap_or(""), name),
        }
    }
}

pub(crate) fn compile_glob(pattern: &str, case_insensitive: bool) -> Result<GlobMatcher, TraverseError> {
    GlobBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| TraverseError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}
