use std::path::PathBuf;
use thiserror::Error;

use crate::filter::FilterType;
use crate::roles::Role;

#[derive(Error, Debug)]
pub enum TraverseError {
    // Validation
    #[error("invalid glob pattern '{pattern}'")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid regex pattern '{pattern}'")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid extended glob pattern '{pattern}': {reason}")]
    InvalidExtendedGlob {
        pattern: String,
        reason: &'static str,
    },

    #[error("poly filter constituent may not itself be a poly filter")]
    NestedPoly,

    // Config
    #[error("filter type is undefined")]
    MissingFilterType,

    #[error("custom filter requested without an implementation")]
    MissingCustomFilter,

    #[error("poly filter requires both file and directory constituents")]
    MissingPolyConstituents,

    #[error("{0:?} filters are not supported for child or sample filtering")]
    UnsupportedChildFilter(FilterType),

    #[error("hibernation requires a wake or a sleep condition")]
    MissingHibernationFilter,

    #[error("sampling requires a file or directory quantity")]
    InvalidSampling,

    #[error("no callback provided")]
    MissingCallback,

    // Chain
    #[error("cannot decorate {role}: chain is sealed by {top}")]
    SealedDecoration { role: Role, top: Role },

    #[error("the anchor cannot be decorated")]
    AnchorDecoration,

    // Control signals
    #[error("skip directory")]
    SkipDir,

    #[error("skip all")]
    SkipAll,

    // Traversal
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(String),

    // Client callback
    #[error("client error")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TraverseError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the walk can continue past this error.
    ///
    /// Recoverable errors (permission denied, symlink loops, IO) can be
    /// collected and surfaced after the walk completes. Everything else
    /// halts the walk.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::SymlinkLoop(_) | Self::Io { .. }
        )
    }

    /// `SkipDir` and `SkipAll` steer the walker; they are not failures.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::SkipDir | Self::SkipAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_signals_are_neither_recoverable_nor_paths() {
        assert!(TraverseError::SkipAll.is_control());
        assert!(TraverseError::SkipDir.is_control());
        assert!(!TraverseError::SkipAll.is_recoverable());
        assert!(TraverseError::SkipDir.path().is_none());
    }

    #[test]
    fn io_errors_carry_their_path() {
        let err = TraverseError::Io {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.path(), Some(&PathBuf::from("/tmp/x")));
    }

    #[test]
    fn sealed_decoration_names_both_roles() {
        let err = TraverseError::SealedDecoration {
            role: Role::ClientFilter,
            top: Role::Fastward,
        };
        assert_eq!(err.to_string(), "cannot decorate client-filter: chain is sealed by fastward");
    }
}
