//! Hibernation: suppress the callback until a wake condition is met, and stop
//! the walk once a sleep condition is met.
//!
//! ```text
//!   Pending ──wake──▶ Active ──sleep──▶ Retired
//!   (drop)            (pass)            (skip all)
//! ```

use std::fmt;
use std::sync::Arc;

use crate::entry::Inspection;
use crate::error::TraverseError;
use crate::filter::{FilterSpec, MatchPredicate};
use crate::node::Node;
use crate::roles::Role;
use crate::traits::{Link, NodePredicate};

/// Called with the node that woke or put the walk to sleep.
pub type Notify = Box<dyn FnMut(&Node) + Send>;

/// Wake/sleep conditions for a walk.
#[derive(Debug, Clone)]
pub struct HibernateOptions {
    pub wake_at: Option<FilterSpec>,
    pub sleep_at: Option<FilterSpec>,
    /// Whether the waking node itself is passed on.
    pub inclusive_wake: bool,
    /// Whether the node that puts the walk to sleep is passed on.
    pub inclusive_sleep: bool,
}

impl Default for HibernateOptions {
    fn default() -> Self {
        Self {
            wake_at: None,
            sleep_at: None,
            inclusive_wake: true,
            inclusive_sleep: false,
        }
    }
}

impl HibernateOptions {
    pub fn wake_at(mut self, spec: FilterSpec) -> Self {
        self.wake_at = Some(spec);
        self
    }

    pub fn sleep_at(mut self, spec: FilterSpec) -> Self {
        self.sleep_at = Some(spec);
        self
    }

    pub fn inclusive_wake(mut self, yes: bool) -> Self {
        self.inclusive_wake = yes;
        self
    }

    pub fn inclusive_sleep(mut self, yes: bool) -> Self {
        self.inclusive_sleep = yes;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HiberState {
    /// Waiting for the wake condition.
    Pending,
    /// Awake: nodes pass until the sleep condition.
    Active,
    /// Asleep for good: the walk is over.
    Retired,
}

impl fmt::Display for HiberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HiberState::Pending => "pending",
            HiberState::Active => "active",
            HiberState::Retired => "retired",
        };
        f.write_str(name)
    }
}

pub struct HibernationController {
    state: HiberState,
    wake: MatchPredicate,
    sleep: MatchPredicate,
    inclusive_wake: bool,
    inclusive_sleep: bool,
    on_wake: Option<Notify>,
    on_sleep: Option<Notify>,
}

impl HibernationController {
    /// Build the controller from its options.
    ///
    /// A missing wake condition is permissive and the walk starts awake; a
    /// missing sleep condition is prohibitive and the walk never sleeps.
    /// Unset inapplicability resolves to `false`, so a directory-scoped
    /// condition cannot fire on a file.
    pub fn new(options: &HibernateOptions) -> Result<Self, TraverseError> {
        Self::with_custom(options, None)
    }

    /// As [`new`](Self::new), with the implementation used by any
    /// [`FilterSpec::custom`] wake or sleep condition.
    pub fn with_custom(
        options: &HibernateOptions,
        custom: Option<&Arc<dyn NodePredicate>>,
    ) -> Result<Self, TraverseError> {
        if options.wake_at.is_none() && options.sleep_at.is_none() {
            return Err(TraverseError::MissingHibernationFilter);
        }

        let condition = |spec: Option<&FilterSpec>, fallback: MatchPredicate| {
            spec.map(|s| MatchPredicate::build_with_default(s, custom, false))
                .unwrap_or(Ok(fallback))
        };
        let wake = condition(options.wake_at.as_ref(), MatchPredicate::Permissive)?;
        let sleep = condition(options.sleep_at.as_ref(), MatchPredicate::Prohibitive)?;

        let state = if options.wake_at.is_some() {
            HiberState::Pending
        } else {
            HiberState::Active
        };

        Ok(Self {
            state,
            wake,
            sleep,
            inclusive_wake: options.inclusive_wake,
            inclusive_sleep: options.inclusive_sleep,
            on_wake: None,
            on_sleep: None,
        })
    }

    pub fn on_wake(mut self, notify: Notify) -> Self {
        self.on_wake = Some(notify);
        self
    }

    pub fn on_sleep(mut self, notify: Notify) -> Self {
        self.on_sleep = Some(notify);
        self
    }

    pub fn state(&self) -> HiberState {
        self.state
    }

    /// Advance the state machine for `node` and decide whether it passes.
    pub fn decide(&mut self, node: &Node) -> Result<bool, TraverseError> {
        match self.state {
            HiberState::Pending => {
                if !self.wake.is_match(node) {
                    return Ok(false);
                }
                tracing::debug!(path = %node.path().display(), "hibernation: wake");
                if let Some(notify) = self.on_wake.as_mut() {
                    notify(node);
                }
                self.state = HiberState::Active;
                Ok(self.inclusive_wake)
            }
            HiberState::Active => {
                if !self.sleep.is_match(node) {
                    return Ok(true);
                }
                tracing::debug!(path = %node.path().display(), "hibernation: sleep");
                if let Some(notify) = self.on_sleep.as_mut() {
                    notify(node);
                }
                self.state = HiberState::Retired;
                Ok(self.inclusive_sleep)
            }
            HiberState::Retired => Err(TraverseError::SkipAll),
        }
    }
}

impl Link for HibernationController {
    fn role(&self) -> Role {
        Role::Hibernate
    }

    fn next(&mut self, node: &Node, _inspection: &Inspection<'_>) -> Result<bool, TraverseError> {
        self.decide(node)
    }
}
