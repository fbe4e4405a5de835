//! Filter specs and the predicates built from them.
//!
//! A [`FilterSpec`] is declarative. Building it into a [`MatchPredicate`],
//! [`ChildMatchPredicate`] or [`SampleMatchPredicate`] compiles the pattern,
//! which is where malformed patterns are rejected.

use std::sync::Arc;

use crate::entry::Inspection;
use crate::error::TraverseError;
use crate::node::{Node, Scope};
use crate::roles::Role;
use crate::traits::{Link, NodePredicate};

mod child;
mod extended;
mod pattern;
mod poly;
mod predicate;
mod sample;

pub use child::ChildMatchPredicate;
pub use extended::{ExtendedGlob, SuffixToken};
pub use poly::{PolyPredicate, POLY_SEPARATOR};
pub use predicate::{MatchPredicate, PatternPredicate};
pub use sample::SampleMatchPredicate;

/// Pattern dialect of a filter spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    #[default]
    Undefined,
    Glob,
    Regex,
    ExtendedGlob,
    Custom,
    Poly,
}

/// What a filter answers for nodes outside its scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IfNotApplicable {
    /// Use the default of whoever builds the predicate (`true` for client
    /// filters, `false` for hibernation conditions).
    #[default]
    Unset,
    True,
    False,
}

impl IfNotApplicable {
    pub fn resolve(self, default: bool) -> bool {
        match self {
            IfNotApplicable::Unset => default,
            IfNotApplicable::True => true,
            IfNotApplicable::False => false,
        }
    }
}

impl From<bool> for IfNotApplicable {
    fn from(value: bool) -> Self {
        if value {
            IfNotApplicable::True
        } else {
            IfNotApplicable::False
        }
    }
}

/// Declarative description of a filter.
///
/// # Example
///
/// ```rust
/// use treeward::{FilterSpec, Scope};
///
/// let flac = FilterSpec::glob("*.flac").with_scope(Scope::FILE);
/// let not_covers = FilterSpec::regex("^cover").negated();
/// let lossless = FilterSpec::extended_glob("*|flac,wav");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    pub filter_type: FilterType,
    /// Falls back to a generated description when empty.
    pub description: String,
    pub pattern: String,
    /// Empty means undefined, which resolves to [`Scope::ALL`].
    pub scope: Scope,
    pub negate: bool,
    pub if_not_applicable: IfNotApplicable,
    /// Constituents, only for [`FilterType::Poly`].
    pub poly: Option<Box<PolySpec>>,
}

/// The two constituents of a poly filter.
#[derive(Debug, Clone, Default)]
pub struct PolySpec {
    pub file: FilterSpec,
    pub directory: FilterSpec,
}

impl FilterSpec {
    pub fn new(filter_type: FilterType, pattern: impl Into<String>) -> Self {
        Self {
            filter_type,
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::Glob, pattern)
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::Regex, pattern)
    }

    /// `DIRGLOB[/DIREXCLUDE]|SUFFIX,SUFFIX,...`
    pub fn extended_glob(pattern: impl Into<String>) -> Self {
        Self::new(FilterType::ExtendedGlob, pattern)
    }

    /// The implementation is supplied separately, see
    /// [`FilterOptions::custom`].
    pub fn custom(description: impl Into<String>) -> Self {
        Self {
            filter_type: FilterType::Custom,
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn poly(file: FilterSpec, directory: FilterSpec) -> Self {
        Self {
            filter_type: FilterType::Poly,
            poly: Some(Box::new(PolySpec { file, directory })),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn if_not_applicable(mut self, value: bool) -> Self {
        self.if_not_applicable = value.into();
        self
    }
}

/// Every filter a session can be configured with.
#[derive(Default, Clone)]
pub struct FilterOptions {
    /// Decides whether the callback fires for a node.
    pub node: Option<FilterSpec>,
    /// Narrows the files attached to directory nodes.
    pub child: Option<FilterSpec>,
    /// Narrows the listing sampling windows are taken from.
    pub sample: Option<FilterSpec>,
    /// Implementation behind a [`FilterType::Custom`] node spec.
    pub custom: Option<Arc<dyn NodePredicate>>,
}

// ---------------------------------------------------------------------------
// ClientFilter link
// ---------------------------------------------------------------------------

/// Vetoes nodes that do not satisfy the client's node filter.
pub struct ClientFilter {
    predicate: MatchPredicate,
}

impl ClientFilter {
    pub fn new(predicate: MatchPredicate) -> Self {
        Self { predicate }
    }

    pub fn build(options: &FilterOptions) -> Result<Option<Self>, TraverseError> {
        options
            .node
            .as_ref()
            .map(|spec| MatchPredicate::build(spec, options.custom.as_ref()).map(Self::new))
            .transpose()
    }

    pub fn predicate(&self) -> &MatchPredicate {
        &self.predicate
    }
}

impl Link for ClientFilter {
    fn role(&self) -> Role {
        Role::ClientFilter
    }

    fn next(&mut self, node: &Node, _inspection: &Inspection<'_>) -> Result<bool, TraverseError> {
        let matched = self.predicate.is_match(node);
        tracing::trace!(path = %node.path().display(), matched, "client filter");
        Ok(matched)
    }
}
