use std::sync::Arc;

use super::predicate::MatchPredicate;
use super::{FilterSpec, FilterType};
use crate::error::TraverseError;
use crate::node::{Node, Scope};
use crate::traits::NodePredicate;

/// Joins the file and directory sources in [`PolyPredicate::source`].
pub const POLY_SEPARATOR: &str = "##";

/// Pairs a file filter with a filter on the file's directory.
///
/// Directories are never excluded by a poly filter, only the files inside
/// them: a file matches when it satisfies the file constituent and its parent
/// directory satisfies the directory constituent.
#[derive(Debug, Clone)]
pub struct PolyPredicate {
    file: Box<MatchPredicate>,
    directory: Box<MatchPredicate>,
    negate: bool,
}

impl PolyPredicate {
    pub(crate) fn build(
        spec: &FilterSpec,
        custom: Option<&Arc<dyn NodePredicate>>,
        if_not_applicable: bool,
    ) -> Result<Self, TraverseError> {
        let poly = spec
            .poly
            .as_deref()
            .ok_or(TraverseError::MissingPolyConstituents)?;

        if poly.file.filter_type == FilterType::Poly || poly.directory.filter_type == FilterType::Poly {
            return Err(TraverseError::NestedPoly);
        }

        let file = FilterSpec {
            scope: Scope::FILE,
            ..poly.file.clone()
        };
        let directory = FilterSpec {
            scope: Scope::DIRECTORY,
            ..poly.directory.clone()
        };

        Ok(Self {
            file: Box::new(MatchPredicate::build_with_default(&file, custom, if_not_applicable)?),
            directory: Box::new(MatchPredicate::build_with_default(
                &directory,
                custom,
                if_not_applicable,
            )?),
            negate: spec.negate,
        })
    }

    pub fn file(&self) -> &MatchPredicate {
        &self.file
    }

    pub fn directory(&self) -> &MatchPredicate {
        &self.directory
    }
}

impl NodePredicate for PolyPredicate {
    fn description(&self) -> String {
        format!(
            "poly - FILE: [{}], DIRECTORY: [{}]",
            self.file.description(),
            self.directory.description()
        )
    }

    fn source(&self) -> String {
        format!(
            "{}{POLY_SEPARATOR}{}",
            self.file.source(),
            self.directory.source()
        )
    }

    fn scope(&self) -> Scope {
        Scope::ALL
    }

    fn validate(&self) -> Result<(), TraverseError> {
        self.file.validate()?;
        self.directory.validate()
    }

    /// Only files: directories are never excluded.
    fn is_applicable(&self, node: &Node) -> bool {
        self.file.is_applicable(node)
    }

    fn is_match(&self, node: &Node) -> bool {
        if node.is_dir() {
            return true;
        }

        let file = self.file.is_match(node);
        let directory = node
            .parent()
            .is_some_and(|parent| self.directory.is_match(&parent));

        (file && directory) != self.negate
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{directories, file_in};
    use super::*;

    fn poly(file: FilterSpec, directory: FilterSpec) -> MatchPredicate {
        MatchPredicate::build(&FilterSpec::poly(file, directory), None).unwrap()
    }

    #[test]
    fn file_needs_both_constituents() {
        let chain = directories("/music", &["College", "Teenage Color"]);
        let filter = poly(FilterSpec::glob("*.flac"), FilterSpec::glob("Teenage*"));

        assert!(filter.is_match(&file_in(&chain[2], "tell-me.flac")));
        assert!(!filter.is_match(&file_in(&chain[2], "cover.jpg")));
        assert!(!filter.is_match(&file_in(&chain[1], "tell-me.flac")));
    }

    #[test]
    fn directories_always_match_and_are_never_applicable() {
        let chain = directories("/music", &["College", "Teenage Color"]);
        let filters = [
            poly(FilterSpec::glob("*.flac"), FilterSpec::glob("Teenage*")),
            poly(FilterSpec::glob("nothing"), FilterSpec::glob("nothing")),
            MatchPredicate::build(
                &FilterSpec::poly(FilterSpec::glob("*.flac"), FilterSpec::glob("x")).negated(),
                None,
            )
            .unwrap(),
        ];

        for filter in &filters {
            for dir in &chain {
                assert!(filter.is_match(dir));
                assert!(!filter.is_applicable(dir));
            }
        }
    }

    #[test]
    fn negation_flips_file_answers() {
        let chain = directories("/music", &["Teenage Color"]);
        let spec = FilterSpec::poly(FilterSpec::glob("*.flac"), FilterSpec::glob("Teenage*"));
        let plain = MatchPredicate::build(&spec, None).unwrap();
        let negated = MatchPredicate::build(&spec.negated(), None).unwrap();

        for name in ["a.flac", "b.jpg"] {
            let file = file_in(&chain[1], name);
            assert_eq!(negated.is_match(&file), !plain.is_match(&file));
        }
    }

    #[test]
    fn constituent_scopes_are_enforced() {
        let filter = PolyPredicate::build(
            &FilterSpec::poly(
                FilterSpec::glob("*.flac").with_scope(Scope::DIRECTORY),
                FilterSpec::glob("*").with_scope(Scope::FILE),
            ),
            None,
            true,
        )
        .unwrap();

        assert_eq!(filter.file().scope(), Scope::FILE);
        assert_eq!(filter.directory().scope(), Scope::DIRECTORY);
    }

    #[test]
    fn nested_poly_is_rejected() {
        let inner = FilterSpec::poly(FilterSpec::glob("*"), FilterSpec::glob("*"));
        let err = MatchPredicate::build(&FilterSpec::poly(inner, FilterSpec::glob("*")), None)
            .unwrap_err();
        assert!(matches!(err, TraverseError::NestedPoly));
    }

    #[test]
    fn missing_constituents_are_rejected() {
        let spec = FilterSpec::new(FilterType::Poly, "");
        let err = MatchPredicate::build(&spec, None).unwrap_err();
        assert!(matches!(err, TraverseError::MissingPolyConstituents));
    }

    #[test]
    fn source_and_description_recurse() {
        let filter = poly(FilterSpec::glob("*.flac"), FilterSpec::regex("^Night"));
        assert_eq!(filter.source(), "*.flac##^Night");
        assert_eq!(
            filter.description(),
            "poly - FILE: [glob filter: '*.flac'], DIRECTORY: [regex filter: '^Night']"
        );
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn orphaned_file_fails_the_directory_side() {
        let file = crate::Node::root("/music/a.flac", crate::EntryKind::File, true);
        let filter = poly(FilterSpec::glob("*.flac"), FilterSpec::glob("*"));
        assert!(!filter.is_match(&file));
    }
}
