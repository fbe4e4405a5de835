use super::pattern::Pattern;
use super::{FilterSpec, FilterType};
use crate::entry::Entry;
use crate::error::TraverseError;

/// Filters a directory's raw child entries before nodes exist for them.
///
/// Used by the directories-with-files subscription to narrow the files
/// attached to each directory node. Only the name dialects are meaningful
/// here: custom and poly filters are rejected.
#[derive(Debug, Clone)]
pub struct ChildMatchPredicate {
    description: String,
    source: String,
    negate: bool,
    pattern: Pattern,
}

impl ChildMatchPredicate {
    pub fn build(spec: &FilterSpec) -> Result<Self, TraverseError> {
        if matches!(spec.filter_type, FilterType::Custom | FilterType::Poly) {
            return Err(TraverseError::UnsupportedChildFilter(spec.filter_type));
        }
        let pattern = Pattern::compile(spec.filter_type, &spec.pattern)?;
        let description = if spec.description.is_empty() {
            format!("child filter: '{}'", spec.pattern)
        } else {
            spec.description.clone()
        };

        Ok(Self {
            description,
            source: spec.pattern.clone(),
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

    pub fn is_match(&self, entry: &Entry) -> bool {
        self.pattern.is_match(&entry.name, || entry.parent_name()) != self.negate
    }

    /// The matching entries, in their original order.
    pub fn matching(&self, entries: Vec<Entry>) -> Vec<Entry> {
        entries.into_iter().filter(|e| self.is_match(e)).collect()
    }
}
