use std::sync::Arc;

use crate::engine::Subscription;
use crate::entry::Inspection;
use crate::error::TraverseError;
use crate::node::Node;
use crate::results::Metrics;
use crate::roles::{OrderedRoleSet, Role};
use crate::traits::{Link, Sealer};

/// The client callback. Returning `SkipDir` or `SkipAll` steers the walk.
pub type Callback = Box<dyn FnMut(&Node) -> Result<(), TraverseError> + Send>;

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// The final link: ticks the invocation metrics and calls the client, for
/// the nodes the client subscribed to.
pub struct Anchor {
    callback: Callback,
    metrics: Arc<Metrics>,
    subscription: Subscription,
}

impl Anchor {
    pub fn new(callback: Callback, metrics: Arc<Metrics>) -> Self {
        Self {
            callback,
            metrics,
            subscription: Subscription::default(),
        }
    }

    pub fn subscribe(mut self, subscription: Subscription) -> Self {
        self.subscription = subscription;
        self
    }
}

impl Link for Anchor {
    fn role(&self) -> Role {
        Role::Anchor
    }

    fn next(&mut self, node: &Node, _inspection: &Inspection<'_>) -> Result<bool, TraverseError> {
        if !self.subscription.accepts(node) {
            return Ok(true);
        }
        self.metrics.tick(node);
        (self.callback)(node)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Sealers
// ---------------------------------------------------------------------------

/// Never seals.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsealed;

impl Sealer for Unsealed {
    fn is_sealed(&self, _top: Role) -> bool {
        false
    }
}

/// Seals the chain once the resume fast-forward link is on top.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastwardSealer;

impl Sealer for FastwardSealer {
    fn is_sealed(&self, top: Role) -> bool {
        top == Role::Fastward
    }
}

// ---------------------------------------------------------------------------
// Guardian
// ---------------------------------------------------------------------------

/// Walks the active links in canonical order for every visited node and
/// decides whether the client callback fires.
///
/// Not synchronised: one guardian serves one walk, and decoration happens
/// before the first node is visited.
pub struct Guardian {
    chain: Vec<Option<Box<dyn Link>>>,
    roles: OrderedRoleSet<Role>,
    anchor: Anchor,
    sealer: Box<dyn Sealer>,
}

impl Guardian {
    pub fn new(anchor: Anchor, sealer: Box<dyn Sealer>) -> Self {
        Self {
            chain: (0..Role::COUNT).map(|_| None).collect(),
            roles: OrderedRoleSet::new(Role::CANONICAL, Role::Anchor),
            anchor,
            sealer,
        }
    }

    /// A guardian whose chain can always be decorated.
    pub fn unsealed(callback: Callback, metrics: Arc<Metrics>) -> Self {
        Self::new(Anchor::new(callback, metrics), Box::new(Unsealed))
    }

    /// Register `link` under its role, replacing any link already there.
    ///
    /// # Errors
    ///
    /// `SealedDecoration` if the role currently on top is sealed, and
    /// `AnchorDecoration` for a link claiming the anchor role.
    pub fn decorate(&mut self, link: Box<dyn Link>) -> Result<(), TraverseError> {
        let role = link.role();
        if role == Role::Anchor {
            return Err(TraverseError::AnchorDecoration);
        }
        if let Some(top) = self.roles.top() {
            if self.sealer.is_sealed(top) {
                return Err(TraverseError::SealedDecoration { role, top });
            }
        }

        self.chain[role.ordinal()] = Some(link);
        self.roles.insert(role);
        tracing::debug!(%role, chain = ?self.roles.listing(), "decorated");
        Ok(())
    }

    /// Remove the link for `role`. The anchor cannot be unwound.
    pub fn unwind(&mut self, role: Role) -> Result<(), TraverseError> {
        if role == Role::Anchor {
            return Ok(());
        }
        self.chain[role.ordinal()] = None;
        self.roles.delete(role);
        tracing::debug!(%role, chain = ?self.roles.listing(), "unwound");
        Ok(())
    }

    /// Active roles, anchor last.
    pub fn roles(&self) -> &OrderedRoleSet<Role> {
        &self.roles
    }

    /// Tell every active link the walk has ended.
    pub fn finish(&mut self) {
        for link in self.chain.iter_mut().flatten() {
            link.finish();
        }
    }

    /// Run the chain for `node`.
    ///
    /// A link answering `Ok(false)` drops the node silently; an error stops
    /// the chain and is returned unchanged. Links after the one that stopped
    /// the chain, anchor included, are not consulted.
    pub fn invoke(&mut self, node: &Node, inspection: &Inspection<'_>) -> Result<(), TraverseError> {
        if self.roles.count() == 1 {
            return self.anchor.next(node, inspection).map(|_| ());
        }

        for &role in self.roles.listing() {
            let proceed = match role {
                Role::Anchor => self.anchor.next(node, inspection)?,
                _ => match self.chain[role.ordinal()].as_mut() {
                    Some(link) => link.next(node, inspection)?,
                    None => true,
                },
            };
            if !proceed {
                tracing::trace!(path = %node.path().display(), %role, "refused");
                return Ok(());
            }
        }
        Ok(())
    }
}
