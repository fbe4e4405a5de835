use super::pattern::Pattern;
use super::{FilterSpec, FilterType};
use crate::entry::Entry;
use crate::error::TraverseError;
use crate::node::Scope;

/// Narrows the listing a sampling window is taken from.
///
/// Only entries within the predicate's scope are filtered; the rest bypass it
/// and are always retained.
#[derive(Debug, Clone)]
pub struct SampleMatchPredicate {
    description: String,
    source: String,
    scope: Scope,
    negate: bool,
    pattern: Pattern,
}

impl SampleMatchPredicate {
    pub fn build(spec: &FilterSpec) -> Result<Self, TraverseError> {
        if matches!(spec.filter_type, FilterType::Custom | FilterType::Poly) {
            return Err(TraverseError::UnsupportedChildFilter(spec.filter_type));
        }
        let pattern = Pattern::compile(spec.filter_type, &spec.pattern)?;
        let description = if spec.description.is_empty() {
            format!("sample filter: '{}'", spec.pattern)
        } else {
            spec.description.clone()
        };

        Ok(Self {
            description,
            source: spec.pattern.clone(),
            scope: spec.scope.or_all(),
            negate: spec.negate,
            pattern,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_filterable(&self, entry: &Entry) -> bool {
        self.scope.intersects(entry.scope())
    }

    pub fn is_match(&self, entry: &Entry) -> bool {
        self.pattern.is_match(&entry.name, || entry.parent_name()) != self.negate
    }

    /// Matching filterable entries in their original order, followed by every
    /// bypass entry.
    pub fn matching(&self, entries: Vec<Entry>) -> Vec<Entry> {
        let (filterable, bypass): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| self.is_filterable(e));

        let mut kept: Vec<Entry> = filterable.into_iter().filter(|e| self.is_match(e)).collect();
        kept.extend(bypass);
        kept
    }
}
