//! # treeward
//!
//! Directory traversal where every callback is guarded by a chain of links.
//!
//! treeward walks a file tree in pre-order and hands each node to a
//! [`Guardian`]. The guardian runs the active links in a fixed canonical
//! order (sampling, hibernation, client filtering, resume fast-forward)
//! and only then lets the anchor call the client. Any link may drop a node,
//! prune its directory, or stop the walk altogether.
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//! use std::sync::{Arc, Mutex};
//!
//! use treeward::{FilterSpec, Scope, Subscription};
//!
//! let tmp = tempfile::tempdir().unwrap();
//! fs::create_dir(tmp.path().join("Night Drive")).unwrap();
//! fs::write(tmp.path().join("Night Drive").join("01 - Night Drive.flac"), "").unwrap();
//! fs::write(tmp.path().join("Night Drive").join("cover.jpg"), "").unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let results = treeward::walk(tmp.path())
//!     .subscribe(Subscription::Files)
//!     .filter(FilterSpec::glob("*.flac").with_scope(Scope::FILE))
//!     .callback(move |node| {
//!         sink.lock().unwrap().push(node.name().to_string());
//!         Ok(())
//!     })
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(results.invoked.files, 1);
//! assert_eq!(*seen.lock().unwrap(), ["01 - Night Drive.flac"]);
//! ```
//!
//! # Filters
//!
//! A [`FilterSpec`] names a dialect (glob, regex, extended glob, custom or
//! poly), a pattern, the [`Scope`] it applies to and whether its answer is
//! negated. Implement [`NodePredicate`] for logic no dialect covers:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use treeward::{FilterSpec, Node, NodePredicate, Scope};
//!
//! struct Deep(usize);
//!
//! impl NodePredicate for Deep {
//!     fn description(&self) -> String { format!("deeper than {}", self.0) }
//!     fn source(&self) -> String { self.0.to_string() }
//!     fn scope(&self) -> Scope { Scope::ALL }
//!     fn is_match(&self, node: &Node) -> bool { node.depth() > self.0 }
//! }
//!
//! let builder = treeward::walk(".")
//!     .filter(FilterSpec::custom("deep nodes"))
//!     .custom_filter(Arc::new(Deep(2)))
//!     .callback(|_| Ok(()));
//! assert!(builder.build().is_ok());
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod filter;

mod builder;
mod entry;
mod error;
mod fastward;
mod guardian;
mod hibernate;
mod node;
mod results;
mod roles;
mod sampler;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::TraverseBuilder;
pub use engine::{Session, Subscription};
pub use entry::{Contents, Entry, EntryKind, Inspection};
pub use error::TraverseError;
pub use fastward::Fastward;
pub use filter::{FilterOptions, FilterSpec, FilterType, IfNotApplicable, MatchPredicate};
pub use guardian::{Anchor, Callback, FastwardSealer, Guardian, Unsealed};
pub use hibernate::{HiberState, HibernateOptions, HibernationController, Notify};
pub use node::{Extension, Node, Scope};
pub use results::{Invocations, Metrics, Results, WalkStats};
pub use roles::{OrderedRoleSet, Role};
pub use sampler::{SampleKind, Sampler, SamplingOptions};
pub use traits::{Link, NodePredicate, Sealer};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`TraverseBuilder`] rooted at `root`.
///
/// # Example
///
/// ```rust
/// use treeward::{Subscription, TraverseError};
///
/// let err = treeward::walk("/definitely/not/here")
///     .subscribe(Subscription::Directories)
///     .callback(|_| Ok(()))
///     .run()
///     .unwrap_err();
///
/// assert!(matches!(err, TraverseError::NotFound(_)));
/// ```
pub fn walk(root: impl Into<std::path::PathBuf>) -> TraverseBuilder {
    TraverseBuilder::new(root)
}
