use crate::entry::Inspection;
use crate::error::TraverseError;
use crate::node::{Node, Scope};
use crate::roles::Role;

/// The capability contract every node filter satisfies.
///
/// Built-in dialects are exposed through
/// [`MatchPredicate`](crate::filter::MatchPredicate). Implement this trait to
/// plug custom logic in through a `Custom` filter spec. Applicability is the
/// implementation's own business; a negated spec inverts its answer.
///
/// # Thread Safety
///
/// `Send + Sync` are required: a predicate may be shared between the filter
/// link and the caller through an `Arc`.
///
/// # Example
///
/// ```rust
/// use treeward::{Node, NodePredicate, Scope};
///
/// struct Hidden;
///
/// impl NodePredicate for Hidden {
///     fn description(&self) -> String { "hidden entries".into() }
///     fn source(&self) -> String { ".*".into() }
///     fn scope(&self) -> Scope { Scope::ALL }
///     fn is_match(&self, node: &Node) -> bool { node.name().starts_with('.') }
/// }
/// ```
pub trait NodePredicate: Send + Sync {
    /// Human readable description of the filter.
    fn description(&self) -> String;

    /// The raw pattern this predicate was built from.
    fn source(&self) -> String;

    /// Which nodes the predicate applies to.
    fn scope(&self) -> Scope;

    /// Called once when the predicate is plugged into a session.
    fn validate(&self) -> Result<(), TraverseError> {
        Ok(())
    }

    fn is_applicable(&self, node: &Node) -> bool {
        self.scope().intersects(node.scope())
    }

    fn is_match(&self, node: &Node) -> bool;
}

/// One stage of the guardian's chain, with the power to veto the callback.
///
/// `Ok(true)` passes the node on, `Ok(false)` silently drops it, and `Err`
/// stops the chain and is handed back to the walker unchanged, including the
/// `SkipDir` / `SkipAll` control signals.
pub trait Link: Send {
    fn role(&self) -> Role;

    fn next(&mut self, node: &Node, inspection: &Inspection<'_>) -> Result<bool, TraverseError>;

    /// Called once when the walk ends, whether it completed or was halted.
    fn finish(&mut self) {}
}

/// Decides whether the role on top of the chain forbids further decoration.
pub trait Sealer: Send {
    fn is_sealed(&self, top: Role) -> bool;
}
