use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::{Session, Subscription};
use crate::error::TraverseError;
use crate::fastward::Fastward;
use crate::filter::{ChildMatchPredicate, ClientFilter, FilterOptions, FilterSpec, SampleMatchPredicate};
use crate::guardian::{Anchor, Callback, FastwardSealer, Guardian, Unsealed};
use crate::hibernate::{HibernateOptions, HibernationController, Notify};
use crate::node::Node;
use crate::results::{Metrics, Results};
use crate::sampler::{Sampler, SamplingOptions};
use crate::traits::{NodePredicate, Sealer};

// ---------------------------------------------------------------------------
// TraverseBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and running a walk.
///
/// Created via [`treeward::walk()`](crate::walk). Configure with chained
/// builder methods, then call [`run()`](TraverseBuilder::run).
///
/// # Example
///
/// ```rust,ignore
/// let results = treeward::walk("/music")
///     .subscribe(Subscription::Files)
///     .filter(FilterSpec::glob("*.flac").with_scope(Scope::FILE))
///     .hibernate(HibernateOptions::default().wake_at(FilterSpec::glob("Night Drive")))
///     .callback(|node| { println!("{}", node.path().display()); Ok(()) })
///     .run()?;
/// ```
pub struct TraverseBuilder {
    root:            PathBuf,
    subscription:    Subscription,
    callback:        Option<Callback>,
    filters:         FilterOptions,
    hibernate:       Option<HibernateOptions>,
    on_wake:         Option<Notify>,
    on_sleep:        Option<Notify>,
    sampling:        Option<SamplingOptions>,
    resume_at:       Option<PathBuf>,
    collect_errors:  bool,
}

impl TraverseBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:            root.into(),
            subscription:    Subscription::default(),
            callback:        None,
            filters:         FilterOptions::default(),
            hibernate:       None,
            on_wake:         None,
            on_sleep:        None,
            sampling:        None,
            resume_at:       None,
            collect_errors:  false,
        }
    }

    // ── Callback ──────────────────────────────────────────────────────────

    /// Which node kinds reach the callback. Defaults to
    /// [`Subscription::Universal`].
    pub fn subscribe(mut self, subscription: Subscription) -> Self {
        self.subscription = subscription;
        self
    }

    /// The client callback. Required.
    ///
    /// Return `Err(TraverseError::SkipDir)` to skip the rest of the current
    /// directory, or `Err(TraverseError::SkipAll)` to end the walk.
    pub fn callback(
        mut self,
        f: impl FnMut(&Node) -> Result<(), TraverseError> + Send + 'static,
    ) -> Self {
        self.callback = Some(Box::new(f));
        self
    }

    // ── Filters ───────────────────────────────────────────────────────────

    /// Only nodes matching `spec` reach the callback.
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filters.node = Some(spec);
        self
    }

    /// Implementation behind a [`FilterSpec::custom`] node filter or
    /// hibernation condition.
    pub fn custom_filter(mut self, predicate: Arc<dyn NodePredicate>) -> Self {
        self.filters.custom = Some(predicate);
        self
    }

    /// Narrow the files attached to directories under
    /// [`Subscription::DirectoriesWithFiles`].
    pub fn child_filter(mut self, spec: FilterSpec) -> Self {
        self.filters.child = Some(spec);
        self
    }

    /// Narrow the listings sampling windows are taken from. Has no effect
    /// without [`sample`](Self::sample).
    pub fn sample_filter(mut self, spec: FilterSpec) -> Self {
        self.filters.sample = Some(spec);
        self
    }

    /// Replace every filter at once.
    pub fn filters(mut self, filters: FilterOptions) -> Self {
        self.filters = filters;
        self
    }

    // ── Hibernation ───────────────────────────────────────────────────────

    pub fn hibernate(mut self, options: HibernateOptions) -> Self {
        self.hibernate = Some(options);
        self
    }

    /// Notified with the node that wakes the walk.
    pub fn on_wake(mut self, f: impl FnMut(&Node) + Send + 'static) -> Self {
        self.on_wake = Some(Box::new(f));
        self
    }

    /// Notified with the node that puts the walk to sleep.
    pub fn on_sleep(mut self, f: impl FnMut(&Node) + Send + 'static) -> Self {
        self.on_sleep = Some(Box::new(f));
        self
    }

    // ── Sampling / resume ─────────────────────────────────────────────────

    /// Visit only the first/last N files and directories of each directory.
    pub fn sample(mut self, options: SamplingOptions) -> Self {
        self.sampling = Some(options);
        self
    }

    /// Suppress the callback up to and including `path`, which an
    /// interrupted walk reached last. Seals the chain.
    ///
    /// `path` must be a node this same configuration delivers. A target that
    /// does not exist, or that the sampler, hibernation or filter refuses, is
    /// never reached: the walk succeeds without invoking the callback and a
    /// warning is logged.
    pub fn resume_at(mut self, path: impl Into<PathBuf>) -> Self {
        self.resume_at = Some(path.into());
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Collect recoverable read errors into [`Results::errors`] and carry on,
    /// instead of failing the walk.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.collect_errors = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Validate every option and set up the chain.
    ///
    /// Links are decorated sampler first, then hibernation, then the client
    /// filter, then the resume fast-forward; the guardian orders them
    /// canonically regardless.
    ///
    /// # Errors
    ///
    /// Any validation or configuration error, before a single node is visited.
    pub fn build(self) -> Result<Session, TraverseError> {
        let callback = self.callback.ok_or(TraverseError::MissingCallback)?;
        let metrics = Arc::new(Metrics::default());

        let sealer: Box<dyn Sealer> = match self.resume_at {
            Some(_) => Box::new(FastwardSealer),
            None => Box::new(Unsealed),
        };
        let anchor = Anchor::new(callback, Arc::clone(&metrics)).subscribe(self.subscription);
        let mut guardian = Guardian::new(anchor, sealer);

        if let Some(options) = self.sampling {
            let filter = self
                .filters
                .sample
                .as_ref()
                .map(SampleMatchPredicate::build)
                .transpose()?;
            guardian.decorate(Box::new(Sampler::new(options, filter)?))?;
        }

        if let Some(options) = &self.hibernate {
            let mut controller =
                HibernationController::with_custom(options, self.filters.custom.as_ref())?;
            if let Some(notify) = self.on_wake {
                controller = controller.on_wake(notify);
            }
            if let Some(notify) = self.on_sleep {
                controller = controller.on_sleep(notify);
            }
            guardian.decorate(Box::new(controller))?;
        }

        if let Some(filter) = ClientFilter::build(&self.filters)? {
            guardian.decorate(Box::new(filter))?;
        }

        if let Some(target) = self.resume_at {
            guardian.decorate(Box::new(Fastward::new(target)))?;
        }

        let child_filter = self
            .filters
            .child
            .as_ref()
            .map(ChildMatchPredicate::build)
            .transpose()?;

        Ok(Session {
            root:            self.root,
            subscription:    self.subscription,
            guardian,
            child_filter,
            metrics,
            collect_errors:  self.collect_errors,
        })
    }

    /// Build the session and walk the tree.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build) and [`Session::run`].
    pub fn run(self) -> Result<Results, TraverseError> {
        self.build()?.run()
    }
}
