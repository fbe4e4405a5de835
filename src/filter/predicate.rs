use std::fmt;
use std::sync::Arc;

use super::pattern::Pattern;
use super::poly::PolyPredicate;
use super::{FilterSpec, FilterType};
use crate::error::TraverseError;
use crate::node::{Node, Scope};
use crate::traits::NodePredicate;

/// Scope, negation and applicability shared by every built-in dialect.
#[derive(Debug, Clone)]
pub(crate) struct Facets {
    pub description: String,
    pub source: String,
    pub scope: Scope,
    pub negate: bool,
    pub if_not_applicable: bool,
}

impl Facets {
    pub(crate) fn from_spec(spec: &FilterSpec, dialect: &str, if_not_applicable: bool) -> Self {
        let description = if spec.description.is_empty() {
            format!("{dialect} filter: '{}'", spec.pattern)
        } else {
            spec.description.clone()
        };
        Self {
            description,
            source: spec.pattern.clone(),
            scope: spec.scope.or_all(),
            negate: spec.negate,
            if_not_applicable: spec.if_not_applicable.resolve(if_not_applicable),
        }
    }

    pub(crate) fn is_applicable(&self, node: &Node) -> bool {
        self.scope.intersects(node.scope())
    }

    /// Out-of-scope nodes get the inapplicability answer; negation is applied
    /// last, to in-scope answers only.
    pub(crate) fn decide(&self, node: &Node, matched: impl FnOnce() -> bool) -> bool {
        if !self.is_applicable(node) {
            return self.if_not_applicable;
        }
        matched() != self.negate
    }
}

/// A glob, regex or extended-glob filter over a node's leaf name.
#[derive(Debug, Clone)]
pub struct PatternPredicate {
    facets: Facets,
    pattern: Pattern,
}

impl PatternPredicate {
    fn build(spec: &FilterSpec, dialect: &str, if_not_applicable: bool) -> Result<Self, TraverseError> {
        let mut facets = Facets::from_spec(spec, dialect, if_not_applicable);
        if spec.filter_type == FilterType::ExtendedGlob {
            facets.scope = Scope::FILE;
        }
        let pattern = Pattern::compile(spec.filter_type, &spec.pattern)?;
        Ok(Self { facets, pattern })
    }

    pub fn is_match(&self, node: &Node) -> bool {
        self.facets
            .decide(node, || self.pattern.is_match(node.name(), || parent_name(node)))
    }
}

/// The containing directory's name: from the parent node while it is alive,
/// otherwise from the path.
fn parent_name(node: &Node) -> Option<String> {
    node.parent().map(|p| p.name().to_string()).or_else(|| {
        node.path()
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    })
}

// ---------------------------------------------------------------------------
// MatchPredicate
// ---------------------------------------------------------------------------

/// A validated node filter, one variant per dialect.
#[derive(Clone)]
pub enum MatchPredicate {
    Glob(PatternPredicate),
    Regex(PatternPredicate),
    ExtendedGlob(PatternPredicate),
    Poly(PolyPredicate),
    /// A client implementation. `negate` comes from the spec and is applied
    /// to the implementation's answer.
    Custom {
        predicate: Arc<dyn NodePredicate>,
        negate: bool,
    },
    /// Matches everything.
    Permissive,
    /// Matches nothing.
    Prohibitive,
}

impl MatchPredicate {
    /// Build and validate a client filter. Nodes outside the filter's scope
    /// pass unless it says otherwise.
    pub fn build(
        spec: &FilterSpec,
        custom: Option<&Arc<dyn NodePredicate>>,
    ) -> Result<Self, TraverseError> {
        Self::build_with_default(spec, custom, true)
    }

    /// As [`build`](Self::build), with `if_not_applicable` deciding what an
    /// unset [`IfNotApplicable`](super::IfNotApplicable) resolves to.
    pub fn build_with_default(
        spec: &FilterSpec,
        custom: Option<&Arc<dyn NodePredicate>>,
        if_not_applicable: bool,
    ) -> Result<Self, TraverseError> {
        let predicate = match spec.filter_type {
            FilterType::Undefined => return Err(TraverseError::MissingFilterType),
            FilterType::Glob => Self::Glob(PatternPredicate::build(spec, "glob", if_not_applicable)?),
            FilterType::Regex => Self::Regex(PatternPredicate::build(spec, "regex", if_not_applicable)?),
            FilterType::ExtendedGlob => Self::ExtendedGlob(PatternPredicate::build(
                spec,
                "extended glob",
                if_not_applicable,
            )?),
            FilterType::Poly => Self::Poly(PolyPredicate::build(spec, custom, if_not_applicable)?),
            FilterType::Custom => {
                let custom = custom.ok_or(TraverseError::MissingCustomFilter)?;
                custom.validate()?;
                Self::Custom {
                    predicate: Arc::clone(custom),
                    negate: spec.negate,
                }
            }
        };

        tracing::debug!(filter = %predicate.description(), "built node filter");
        Ok(predicate)
    }
}

impl NodePredicate for MatchPredicate {
    fn description(&self) -> String {
        match self {
            Self::Glob(p) | Self::Regex(p) | Self::ExtendedGlob(p) => p.facets.description.clone(),
            Self::Poly(p) => p.description(),
            Self::Custom { predicate, .. } => predicate.description(),
            Self::Permissive => "permissive".to_string(),
            Self::Prohibitive => "prohibitive".to_string(),
        }
    }

    fn source(&self) -> String {
        match self {
            Self::Glob(p) | Self::Regex(p) | Self::ExtendedGlob(p) => p.facets.source.clone(),
            Self::Poly(p) => p.source(),
            Self::Custom { predicate, .. } => predicate.source(),
            Self::Permissive | Self::Prohibitive => String::new(),
        }
    }

    fn scope(&self) -> Scope {
        match self {
            Self::Glob(p) | Self::Regex(p) | Self::ExtendedGlob(p) => p.facets.scope,
            Self::Poly(p) => p.scope(),
            Self::Custom { predicate, .. } => predicate.scope(),
            Self::Permissive | Self::Prohibitive => Scope::ALL,
        }
    }

    fn validate(&self) -> Result<(), TraverseError> {
        match self {
            Self::Poly(p) => p.validate(),
            Self::Custom { predicate, .. } => predicate.validate(),
            _ => Ok(()),
        }
    }

    fn is_applicable(&self, node: &Node) -> bool {
        match self {
            Self::Glob(p) | Self::Regex(p) | Self::ExtendedGlob(p) => p.facets.is_applicable(node),
            Self::Poly(p) => p.is_applicable(node),
            Self::Custom { predicate, .. } => predicate.is_applicable(node),
            Self::Permissive | Self::Prohibitive => true,
        }
    }

    fn is_match(&self, node: &Node) -> bool {
        match self {
            Self::Glob(p) | Self::Regex(p) | Self::ExtendedGlob(p) => p.is_match(node),
            Self::Poly(p) => p.is_match(node),
            Self::Custom { predicate, negate } => predicate.is_match(node) != *negate,
            Self::Permissive => true,
            Self::Prohibitive => false,
        }
    }
}

impl fmt::Debug for MatchPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MatchPredicate")
            .field(&self.description())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{directories, file_in};
    use super::*;
    use crate::filter::IfNotApplicable;

    fn build(spec: FilterSpec) -> MatchPredicate {
        MatchPredicate::build(&spec, None).unwrap()
    }

    #[test]
    fn glob_matches_leaf_name() {
        let chain = directories("/music", &["Chromatics", "Night Drive"]);
        let flac = file_in(&chain[2], "01 - Night Drive.flac");
        let glob = build(FilterSpec::glob("*.flac"));

        assert!(glob.is_match(&flac));
        assert!(!glob.is_match(&chain[2]));
        assert_eq!(glob.source(), "*.flac");
        assert_eq!(glob.description(), "glob filter: '*.flac'");
    }

    #[test]
    fn regex_matches_leaf_name() {
        let chain = directories("/music", &["College"]);
        let regex = build(FilterSpec::regex(r"^\d{2} - "));

        assert!(regex.is_match(&file_in(&chain[1], "01 - Teenage Color.flac")));
        assert!(!regex.is_match(&file_in(&chain[1], "cover.jpg")));
    }

    #[test]
    fn negation_is_involutive_for_name_dialects() {
        let chain = directories("/music", &["Night Drive"]);
        let nodes = [
            file_in(&chain[1], "cherry.flac"),
            file_in(&chain[1], "cover.jpg"),
            file_in(&chain[1], "LICENSE"),
        ];
        let specs = [
            FilterSpec::glob("*.flac"),
            FilterSpec::regex("^c"),
            FilterSpec::extended_glob("night*|flac"),
        ];

        for spec in specs {
            let plain = build(spec.clone());
            let negated = build(spec.negated());
            for node in &nodes {
                assert_eq!(negated.is_match(node), !plain.is_match(node), "{}", node.name());
            }
        }
    }

    #[test]
    fn inapplicable_nodes_pass_by_default() {
        let chain = directories("/music", &["Chromatics"]);
        let spec = FilterSpec::glob("*.flac").with_scope(Scope::FILE);

        assert!(build(spec.clone()).is_match(&chain[1]));
        assert!(build(spec.clone().negated()).is_match(&chain[1]));
        assert!(!build(spec.if_not_applicable(false)).is_match(&chain[1]));
    }

    #[test]
    fn scope_bits_decide_applicability() {
        let chain = directories("/music", &["College", "Northern Council"]);
        let top_only = build(FilterSpec::glob("C*").with_scope(Scope::TOP));

        assert!(top_only.is_applicable(&chain[1]));
        assert!(!top_only.is_applicable(&chain[2]));
        assert!(!top_only.is_applicable(&chain[0]));
    }

    #[test]
    fn hibernation_style_default_rejects_inapplicable() {
        let chain = directories("/music", &["Chromatics"]);
        let file = file_in(&chain[1], "Night Drive");
        let spec = FilterSpec::glob("Night Drive").with_scope(Scope::DIRECTORY);

        let wake = MatchPredicate::build_with_default(&spec, None, false).unwrap();
        assert!(!wake.is_match(&file));

        let explicit = FilterSpec {
            if_not_applicable: IfNotApplicable::True,
            ..spec
        };
        let wake = MatchPredicate::build_with_default(&explicit, None, false).unwrap();
        assert!(wake.is_match(&file));
    }

    #[test]
    fn extended_glob_forces_file_scope() {
        let chain = directories("/music", &["Night Drive"]);
        let ext = build(
            FilterSpec::extended_glob("night*|flac")
                .with_scope(Scope::DIRECTORY)
                .if_not_applicable(false),
        );

        assert_eq!(ext.scope(), Scope::FILE);
        assert!(!ext.is_match(&chain[1]));
        assert!(ext.is_match(&file_in(&chain[1], "cherry.flac")));
    }

    #[test]
    fn extended_glob_uses_parent_directory() {
        let chain = directories("/music", &["College", "Teenage Color"]);
        let ext = build(FilterSpec::extended_glob("teenage*/*council|*.!jpg"));

        assert!(ext.is_match(&file_in(&chain[2], "tell-me.flac")));
        assert!(!ext.is_match(&file_in(&chain[2], "cover.jpg")));
        assert!(!ext.is_match(&file_in(&chain[1], "tell-me.flac")));
    }

    #[test]
    fn undefined_type_is_a_configuration_error() {
        let err = MatchPredicate::build(&FilterSpec::default(), None).unwrap_err();
        assert!(matches!(err, TraverseError::MissingFilterType));
    }

    #[test]
    fn custom_requires_implementation() {
        let err = MatchPredicate::build(&FilterSpec::custom("mine"), None).unwrap_err();
        assert!(matches!(err, TraverseError::MissingCustomFilter));
    }

    struct Shorter {
        max: usize,
        negate: bool,
    }

    impl NodePredicate for Shorter {
        fn description(&self) -> String {
            format!("names shorter than {}", self.max)
        }
        fn source(&self) -> String {
            self.max.to_string()
        }
        fn scope(&self) -> Scope {
            Scope::ALL
        }
        fn is_match(&self, node: &Node) -> bool {
            (node.name().len() < self.max) != self.negate
        }
    }

    #[test]
    fn custom_is_used_verbatim() {
        let chain = directories("/music", &["College"]);
        let custom: Arc<dyn NodePredicate> = Arc::new(Shorter { max: 8, negate: false });
        let negated: Arc<dyn NodePredicate> = Arc::new(Shorter { max: 8, negate: true });

        let spec = FilterSpec::custom("short names");
        let plain = MatchPredicate::build(&spec, Some(&custom)).unwrap();
        let inverse = MatchPredicate::build(&spec, Some(&negated)).unwrap();

        assert!(plain.is_match(&chain[1]));
        assert!(!inverse.is_match(&chain[1]));
        assert_eq!(plain.description(), "names shorter than 8");
        assert_eq!(plain.source(), "8");
    }

    #[test]
    fn negated_custom_spec_inverts_the_implementation() {
        let chain = directories("/music", &["College", "Northern Council"]);
        let nodes = [
            Arc::clone(&chain[1]),
            Arc::clone(&chain[2]),
            Arc::new(file_in(&chain[2], "02 - The Energy Is Love.flac")),
        ];
        let custom: Arc<dyn NodePredicate> = Arc::new(Shorter { max: 8, negate: false });

        let spec = FilterSpec::custom("short names");
        let plain = MatchPredicate::build(&spec, Some(&custom)).unwrap();
        let negated = MatchPredicate::build(&spec.negated(), Some(&custom)).unwrap();

        for node in &nodes {
            assert_eq!(negated.is_match(node), !plain.is_match(node), "{}", node.name());
        }
    }

    #[test]
    fn constants() {
        let chain = directories("/music", &[]);
        assert!(MatchPredicate::Permissive.is_match(&chain[0]));
        assert!(!MatchPredicate::Prohibitive.is_match(&chain[0]));
        assert!(MatchPredicate::Prohibitive.is_applicable(&chain[0]));
    }
}
