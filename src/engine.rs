use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use ignore::WalkBuilder;

use crate::entry::{Contents, Entry, EntryKind, Inspection};
use crate::error::TraverseError;
use crate::filter::ChildMatchPredicate;
use crate::guardian::Guardian;
use crate::node::Node;
use crate::results::{Metrics, Results, WalkStats};

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Which nodes reach the client callback.
///
/// Every node is still walked and passed through the chain, so hibernation
/// and sampling see the whole tree whatever the subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Subscription {
    Files,
    Directories,
    /// Directories only, each carrying its (child-filtered) files.
    DirectoriesWithFiles,
    #[default]
    Universal,
}

impl Subscription {
    pub fn accepts(self, node: &Node) -> bool {
        match self {
            Subscription::Files => !node.is_dir(),
            Subscription::Directories | Subscription::DirectoriesWithFiles => node.is_dir(),
            Subscription::Universal => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A configured walk, ready to run. Created by
/// [`TraverseBuilder::build`](crate::TraverseBuilder::build).
pub struct Session {
    pub(crate) root:            PathBuf,
    pub(crate) subscription:    Subscription,
    pub(crate) guardian:        Guardian,
    pub(crate) child_filter:    Option<ChildMatchPredicate>,
    pub(crate) metrics:         Arc<Metrics>,
    pub(crate) collect_errors:  bool,
}

impl Session {
    /// The chain, for decorating or unwinding links before the walk starts.
    pub fn guardian_mut(&mut self) -> &mut Guardian {
        &mut self.guardian
    }

    /// Shared invocation counters.
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Walk the tree.
    ///
    /// # Errors
    ///
    /// A missing root, an unreadable root directory, any error returned by a
    /// link or the callback other than a skip signal, and unrecoverable read
    /// errors below the root. Recoverable read errors are collected into
    /// [`Results::errors`] when error collection is enabled.
    pub fn run(self) -> Result<Results, TraverseError> {
        let start = Instant::now();
        let mut walker = Walker {
            subscription:    self.subscription,
            guardian:        self.guardian,
            child_filter:    self.child_filter,
            collect_errors:  self.collect_errors,
            files:           0,
            directories:     0,
            errors:          Vec::new(),
        };

        tracing::debug!(root = %self.root.display(), chain = ?walker.guardian.roles().listing(), "walk started");
        let halted = match walker.walk(&self.root) {
            Ok(()) => false,
            Err(TraverseError::SkipAll) => true,
            Err(e) => return Err(e),
        };
        walker.guardian.finish();
        tracing::debug!(halted, files = walker.files, directories = walker.directories, "walk finished");

        Ok(Results {
            invoked: self.metrics.snapshot(),
            stats: WalkStats {
                files:        walker.files,
                directories:  walker.directories,
                duration:     start.elapsed(),
            },
            errors: walker.errors,
            halted,
        })
    }
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Sequential pre-order walk: a directory, then its files, then its
/// subdirectories, each in name order.
struct Walker {
    subscription:    Subscription,
    guardian:        Guardian,
    child_filter:    Option<ChildMatchPredicate>,
    collect_errors:  bool,
    files:           usize,
    directories:     usize,
    errors:          Vec<TraverseError>,
}

impl Walker {
    fn walk(&mut self, root: &Path) -> Result<(), TraverseError> {
        let metadata = std::fs::metadata(root).map_err(|e| map_io_error(root, e))?;

        if !metadata.is_dir() {
            self.files += 1;
            let node = Node::root(root, EntryKind::File, true);
            return skip_dir_ends_here(self.guardian.invoke(&node, &Inspection::default()));
        }

        let contents = read_directory(root)?;
        let node = Node::root(root, EntryKind::Dir, contents.directories.is_empty());
        self.visit_directory(node, None, contents)
    }

    fn descend(&mut self, parent: &Arc<Node>, entry: &Entry, siblings: &Contents) -> Result<(), TraverseError> {
        let contents = match read_directory(&entry.path) {
            Ok(contents) => contents,
            Err(e) if self.collect_errors && e.is_recoverable() => {
                tracing::debug!(path = %entry.path.display(), error = %e, "skipping unreadable directory");
                self.errors.push(e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let node = Node::child(parent, entry, contents.directories.is_empty());
        self.visit_directory(node, Some(siblings), contents)
    }

    fn visit_directory(
        &mut self,
        node: Node,
        siblings: Option<&Contents>,
        contents: Contents,
    ) -> Result<(), TraverseError> {
        self.directories += 1;

        let node = if self.subscription == Subscription::DirectoriesWithFiles {
            let files = contents.files.clone();
            let children = match &self.child_filter {
                Some(filter) => filter.matching(files),
                None => files,
            };
            node.with_children(children)
        } else {
            node
        };
        let node = Arc::new(node);

        match self.guardian.invoke(&node, &Inspection::new(siblings, Some(&contents))) {
            Err(TraverseError::SkipDir) => return Ok(()),
            other => other?,
        }

        for entry in &contents.files {
            self.files += 1;
            let file = Node::child(&node, entry, node.is_leaf());
            match self.guardian.invoke(&file, &Inspection::new(Some(&contents), None)) {
                Err(TraverseError::SkipDir) => return Ok(()),
                other => other?,
            }
        }

        for entry in &contents.directories {
            self.descend(&node, entry, &contents)?;
        }
        Ok(())
    }
}

fn skip_dir_ends_here(result: Result<(), TraverseError>) -> Result<(), TraverseError> {
    match result {
        Err(TraverseError::SkipDir) => Ok(()),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Directory listing
// ---------------------------------------------------------------------------

/// Read one directory's entries, unfiltered, split and sorted by name.
fn read_directory(path: &Path) -> Result<Contents, TraverseError> {
    let mut builder = WalkBuilder::new(path);
    builder
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(false)
        .same_file_system(false)
        .max_depth(Some(1));

    let mut entries = Vec::new();
    for result in builder.build() {
        let entry = result.map_err(map_ignore_error)?;

        // Skip the directory itself
        if entry.depth() == 0 {
            continue;
        }

        let kind = match entry.file_type() {
            Some(ft) if ft.is_dir() => EntryKind::Dir,
            Some(ft) if ft.is_file() => EntryKind::File,
            Some(ft) if ft.is_symlink() => EntryKind::Symlink,
            _ => EntryKind::Other,
        };

        entries.push(Entry {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }

    Ok(Contents::new(entries))
}

// ---------------------------------------------------------------------------
// Map ignore::Error / io::Error to TraverseError
// ---------------------------------------------------------------------------

fn map_io_error(path: &Path, err: std::io::Error) -> TraverseError {
    match err.kind() {
        std::io::ErrorKind::NotFound => TraverseError::NotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => TraverseError::PermissionDenied(path.to_path_buf()),
        _ => TraverseError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

fn map_ignore_error(e: ignore::Error) -> TraverseError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => map_io_error(&path, io_err),
            other => TraverseError::Walk(format!("{}: {}", path.display(), other)),
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Loop { child, .. } => TraverseError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => TraverseError::Io {
            path: PathBuf::new(),
            source: io_err,
        },
        other => TraverseError::Walk(other.to_string()),
    }
}
