use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::entry::{Contents, Entry, Inspection};
use crate::error::TraverseError;
use crate::filter::SampleMatchPredicate;
use crate::node::Node;
use crate::roles::Role;
use crate::traits::Link;

/// Which end of a directory listing a sample is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleKind {
    #[default]
    First,
    Last,
}

/// How many entries of each kind to keep per directory. `None` keeps all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingOptions {
    pub kind: SampleKind,
    pub files: Option<usize>,
    pub directories: Option<usize>,
}

impl SamplingOptions {
    pub fn first(files: Option<usize>, directories: Option<usize>) -> Self {
        Self {
            kind: SampleKind::First,
            files,
            directories,
        }
    }

    pub fn last(files: Option<usize>, directories: Option<usize>) -> Self {
        Self {
            kind: SampleKind::Last,
            files,
            directories,
        }
    }

    /// The window of `entries`, which are already sorted by name.
    fn window<'a>(&self, entries: &'a [Entry], quantity: Option<usize>) -> &'a [Entry] {
        let n = quantity.unwrap_or(entries.len()).min(entries.len());
        match self.kind {
            SampleKind::First => &entries[..n],
            SampleKind::Last => &entries[entries.len() - n..],
        }
    }
}

/// Passes only the first/last N files and directories of every directory.
///
/// Directories outside the window answer `SkipDir`, pruning their subtree.
///
/// Windows are cached for the directories on the current walk path only; a
/// window is dropped as soon as the walk leaves its directory.
pub struct Sampler {
    options: SamplingOptions,
    filter: Option<SampleMatchPredicate>,
    windows: Vec<(PathBuf, HashSet<String>)>,
}

impl Sampler {
    pub fn new(options: SamplingOptions, filter: Option<SampleMatchPredicate>) -> Result<Self, TraverseError> {
        if options.files.is_none() && options.directories.is_none() {
            return Err(TraverseError::InvalidSampling);
        }
        Ok(Self {
            options,
            filter,
            windows: Vec::new(),
        })
    }

    /// The sampled subset of a directory listing.
    pub fn sample(&self, siblings: &Contents) -> Contents {
        let candidates = match &self.filter {
            Some(filter) => Contents::new(filter.matching(siblings.all().cloned().collect())),
            None => siblings.clone(),
        };

        Contents {
            files: self
                .options
                .window(&candidates.files, self.options.files)
                .to_vec(),
            directories: self
                .options
                .window(&candidates.directories, self.options.directories)
                .to_vec(),
        }
    }

    fn window_for(&mut self, parent: &Path, siblings: &Contents) -> &HashSet<String> {
        while self
            .windows
            .last()
            .is_some_and(|(dir, _)| !parent.starts_with(dir))
        {
            self.windows.pop();
        }

        if self.windows.last().map(|(dir, _)| dir.as_path()) != Some(parent) {
            let names = self.sample(siblings).all().map(|e| e.name.clone()).collect();
            self.windows.push((parent.to_path_buf(), names));
        }
        &self.windows[self.windows.len() - 1].1
    }
}

impl Link for Sampler {
    fn role(&self) -> Role {
        Role::Sampler
    }

    fn next(&mut self, node: &Node, inspection: &Inspection<'_>) -> Result<bool, TraverseError> {
        let (Some(siblings), Some(parent)) = (inspection.siblings, node.path().parent()) else {
            return Ok(true);
        };

        if self.window_for(parent, siblings).contains(node.name()) {
            return Ok(true);
        }

        tracing::trace!(path = %node.path().display(), "outside sample");
        if node.is_dir() {
            Err(TraverseError::SkipDir)
        } else {
            Ok(false)
        }
    }
}
