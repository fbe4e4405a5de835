use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::entry::{file_name_of, Entry, EntryKind};

bitflags! {
    /// Structural position and kind of a node.
    ///
    /// The positional bits (`ROOT`, `TOP`, `INTERMEDIATE`, `LEAF`) combine with
    /// exactly one of `FILE` / `DIRECTORY`; a root file is `ROOT | LEAF | FILE`.
    /// An empty scope on a filter means "undefined" and resolves to [`Scope::ALL`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Scope: u16 {
        const ROOT         = 1 << 0;
        const TOP          = 1 << 1;
        const INTERMEDIATE = 1 << 2;
        const LEAF         = 1 << 3;
        const FILE         = 1 << 4;
        const DIRECTORY    = 1 << 5;

        const TREE = Self::ROOT.bits()
            | Self::TOP.bits()
            | Self::INTERMEDIATE.bits()
            | Self::LEAF.bits();
        const ALL = Self::FILE.bits() | Self::DIRECTORY.bits();
    }
}

impl Scope {
    /// Classify a node from its depth, leaf status and kind.
    pub fn classify(depth: usize, is_leaf: bool, is_dir: bool) -> Self {
        let mut scope = match depth {
            0 => Scope::ROOT,
            1 => Scope::TOP,
            _ if is_leaf => Scope::empty(),
            _ => Scope::INTERMEDIATE,
        };
        if is_leaf {
            scope |= Scope::LEAF;
        }
        scope | if is_dir { Scope::DIRECTORY } else { Scope::FILE }
    }

    /// An undefined (empty) scope resolves to `ALL`.
    pub fn or_all(self) -> Self {
        if self.is_empty() {
            Scope::ALL
        } else {
            self
        }
    }
}

/// Per-visit metadata, computed once when the node is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// Root = 0.
    pub depth: usize,
    pub name: String,
    /// A directory with no subdirectories, a file inside one, or a root file.
    pub is_leaf: bool,
    pub scope: Scope,
}

/// One visited file-tree entity.
///
/// The parent reference is non-owning: the walker keeps ancestors alive on
/// its recursion stack for as long as their descendants are being visited.
#[derive(Debug)]
pub struct Node {
    path: PathBuf,
    kind: EntryKind,
    parent: Weak<Node>,
    children: Vec<Entry>,
    extension: Extension,
}

impl Node {
    /// The node the walk starts from.
    pub fn root(path: impl Into<PathBuf>, kind: EntryKind, is_leaf: bool) -> Self {
        let path = path.into();
        let is_leaf = is_leaf || kind != EntryKind::Dir;
        let extension = Extension {
            depth: 0,
            name: file_name_of(&path),
            is_leaf,
            scope: Scope::classify(0, is_leaf, kind == EntryKind::Dir),
        };
        Self {
            path,
            kind,
            parent: Weak::new(),
            children: Vec::new(),
            extension,
        }
    }

    /// A node for `entry`, one level below `parent`.
    pub fn child(parent: &Arc<Node>, entry: &Entry, is_leaf: bool) -> Self {
        let depth = parent.depth() + 1;
        let extension = Extension {
            depth,
            name: entry.name.clone(),
            is_leaf,
            scope: Scope::classify(depth, is_leaf, entry.is_dir()),
        };
        Self {
            path: entry.path.clone(),
            kind: entry.kind,
            parent: Arc::downgrade(parent),
            children: Vec::new(),
            extension,
        }
    }

    /// Attach a (possibly filtered) child listing.
    pub fn with_children(mut self, children: Vec<Entry>) -> Self {
        self.children = children;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// The containing directory's node, while the walker still holds it.
    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.upgrade()
    }

    pub fn children(&self) -> &[Entry] {
        &self.children
    }

    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    pub fn name(&self) -> &str {
        &self.extension.name
    }

    pub fn depth(&self) -> usize {
        self.extension.depth
    }

    pub fn is_leaf(&self) -> bool {
        self.extension.is_leaf
    }

    pub fn scope(&self) -> Scope {
        self.extension.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_file_is_root_leaf_file() {
        let node = Node::root("/music/track.flac", EntryKind::File, false);
        assert_eq!(node.scope(), Scope::ROOT | Scope::LEAF | Scope::FILE);
        assert_eq!(node.name(), "track.flac");
        assert!(node.parent().is_none());
    }

    #[test]
    fn classification_by_depth_and_leaf() {
        assert_eq!(Scope::classify(0, false, true), Scope::ROOT | Scope::DIRECTORY);
        assert_eq!(
            Scope::classify(1, true, true),
            Scope::TOP | Scope::LEAF | Scope::DIRECTORY
        );
        assert_eq!(
            Scope::classify(3, false, true),
            Scope::INTERMEDIATE | Scope::DIRECTORY
        );
        assert_eq!(Scope::classify(3, true, false), Scope::LEAF | Scope::FILE);
    }

    #[test]
    fn child_tracks_parent_while_it_lives() {
        let root = Arc::new(Node::root("/music", EntryKind::Dir, false));
        let entry = Entry::new("/music/Chromatics", EntryKind::Dir);
        let child = Node::child(&root, &entry, true);

        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent().map(|p| p.name().to_string()).as_deref(), Some("music"));

        drop(root);
        assert!(child.parent().is_none());
    }

    #[test]
    fn undefined_scope_resolves_to_all() {
        assert_eq!(Scope::empty().or_all(), Scope::ALL);
        assert_eq!(Scope::FILE.or_all(), Scope::FILE);
        assert!(Scope::TREE.contains(Scope::LEAF));
    }
}
