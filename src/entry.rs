use std::path::{Path, PathBuf};

use crate::node::Scope;

/// A raw directory entry, read before any [`Node`](crate::Node) exists for it.
///
/// Child and sample predicates operate on these, so a directory's listing can
/// be narrowed before the walker builds nodes from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// The entry's file name.
    pub name: String,

    /// What kind of entry this is.
    pub kind: EntryKind,
}

/// The kind of a directory entry.
///
/// Anything that is not a directory is treated as a file for splitting and
/// scope purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link (not followed).
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl Entry {
    /// Build an entry from a path, taking the name from its last component.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = file_name_of(&path);
        Self { path, name, kind }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// `FILE` or `DIRECTORY`, used by sample predicates to partition entries.
    pub fn scope(&self) -> Scope {
        if self.is_dir() {
            Scope::DIRECTORY
        } else {
            Scope::FILE
        }
    }

    /// Name of the directory containing this entry, if any.
    pub fn parent_name(&self) -> Option<String> {
        self.path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// A directory listing split into files and directories, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contents {
    pub files: Vec<Entry>,
    pub directories: Vec<Entry>,
}

impl Contents {
    pub fn new(entries: impl IntoIterator<Item = Entry>) -> Self {
        let (mut directories, mut files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(Entry::is_dir);
        files.sort_by(|a, b| a.name.cmp(&b.name));
        directories.sort_by(|a, b| a.name.cmp(&b.name));
        Self { files, directories }
    }

    /// Files first, then directories.
    pub fn all(&self) -> impl Iterator<Item = &Entry> {
        self.files.iter().chain(self.directories.iter())
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the walker knows about a node's surroundings at invocation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inspection<'a> {
    /// The parent directory's full listing. `None` for the root.
    pub siblings: Option<&'a Contents>,

    /// The node's own listing when it is a directory.
    pub contents: Option<&'a Contents>,
}

impl<'a> Inspection<'a> {
    pub fn new(siblings: Option<&'a Contents>, contents: Option<&'a Contents>) -> Self {
        Self { siblings, contents }
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
