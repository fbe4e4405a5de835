use std::path::PathBuf;

use crate::entry::Inspection;
use crate::error::TraverseError;
use crate::node::Node;
use crate::roles::Role;
use crate::traits::Link;

/// Resume support: fast-forwards past everything up to and including the
/// node an interrupted walk last reached.
///
/// Sits on top of the chain and, with [`FastwardSealer`](crate::FastwardSealer),
/// seals it. The target must be a node the same chain lets through to this
/// link: a target that is missing, or refused by the sampler, hibernation or
/// client filter, is never reached and nothing is delivered. Such a walk
/// still succeeds; a warning is logged when it ends.
#[derive(Debug)]
pub struct Fastward {
    target: PathBuf,
    reached: bool,
}

impl Fastward {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            reached: false,
        }
    }

    pub fn reached(&self) -> bool {
        self.reached
    }
}

impl Link for Fastward {
    fn role(&self) -> Role {
        Role::Fastward
    }

    fn next(&mut self, node: &Node, _inspection: &Inspection<'_>) -> Result<bool, TraverseError> {
        if self.reached {
            return Ok(true);
        }
        if node.path() == self.target.as_path() {
            tracing::debug!(path = %node.path().display(), "fast-forward complete");
            self.reached = true;
        }
        Ok(false)
    }

    fn finish(&mut self) {
        if !self.reached {
            tracing::warn!(
                target_path = %self.target.display(),
                "walk ended before the resume target was reached; nothing was delivered"
            );
        }
    }
}
