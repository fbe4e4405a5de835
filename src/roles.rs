use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

use indexmap::IndexSet;

/// Identity of an interceptor in the guardian's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Wraps the client callback. Always present, always last.
    Anchor,
    Sampler,
    Hibernate,
    ClientFilter,
    /// Resume fast-forward. Seals the chain when it is on top.
    Fastward,
}

impl Role {
    pub const COUNT: usize = 5;

    /// Precedence of the non-anchor roles: sampling prunes structure first,
    /// hibernation gates before filtering, fast-forward sits on top.
    pub const CANONICAL: [Role; 4] = [
        Role::Sampler,
        Role::Hibernate,
        Role::ClientFilter,
        Role::Fastward,
    ];

    /// Slot index in the guardian's chain.
    pub fn ordinal(self) -> usize {
        match self {
            Role::Anchor => 0,
            Role::Sampler => 1,
            Role::Hibernate => 2,
            Role::ClientFilter => 3,
            Role::Fastward => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Anchor => "anchor",
            Role::Sampler => "sampler",
            Role::Hibernate => "hibernate",
            Role::ClientFilter => "client-filter",
            Role::Fastward => "fastward",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// OrderedRoleSet
// ---------------------------------------------------------------------------

/// A set of roles drawn from a fixed universe, listed in canonical order.
///
/// The anchor is always a member and always last in [`listing`], whatever
/// order the universe was declared in. Non-anchor roles appear in declared
/// order, not insertion order.
///
/// [`listing`]: OrderedRoleSet::listing
#[derive(Debug, Clone)]
pub struct OrderedRoleSet<R> {
    order: IndexSet<R>,
    anchor: R,
    members: HashSet<R>,
    listing: OnceLock<Vec<R>>,
}

impl<R> OrderedRoleSet<R>
where
    R: Copy + Eq + Hash,
{
    /// Duplicates in `order` are dropped; the anchor is removed from wherever
    /// it appears and appended as the final element.
    pub fn new(order: impl IntoIterator<Item = R>, anchor: R) -> Self {
        let mut order: IndexSet<R> = order.into_iter().filter(|r| *r != anchor).collect();
        order.insert(anchor);

        let mut members = HashSet::new();
        members.insert(anchor);

        Self {
            order,
            anchor,
            members,
            listing: OnceLock::new(),
        }
    }

    pub fn anchor(&self) -> R {
        self.anchor
    }

    /// Returns `false` without effect for the anchor, an undeclared role, or
    /// a role already present.
    pub fn insert(&mut self, role: R) -> bool {
        if role == self.anchor || !self.order.contains(&role) || self.members.contains(&role) {
            return false;
        }
        self.members.insert(role);
        self.listing = OnceLock::new();
        true
    }

    /// Inserts each role; `true` only if every insertion succeeded. Not
    /// atomic: a failure does not stop the remaining insertions.
    pub fn insert_all(&mut self, roles: impl IntoIterator<Item = R>) -> bool {
        roles
            .into_iter()
            .fold(true, |all, role| self.insert(role) && all)
    }

    /// No-op for the anchor.
    pub fn delete(&mut self, role: R) {
        if role == self.anchor {
            return;
        }
        if self.members.remove(&role) {
            self.listing = OnceLock::new();
        }
    }

    /// Active roles in canonical order, anchor last.
    pub fn listing(&self) -> &[R] {
        self.listing.get_or_init(|| {
            self.order
                .iter()
                .filter(|r| self.members.contains(r))
                .copied()
                .collect()
        })
    }

    /// Position of `role` in the current listing.
    pub fn position_of(&self, role: R) -> Option<usize> {
        self.listing().iter().position(|r| *r == role)
    }

    pub fn contains(&self, role: R) -> bool {
        self.members.contains(&role)
    }

    /// Number of active roles, anchor included.
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// The last active non-anchor role in canonical order.
    pub fn top(&self) -> Option<R> {
        let listing = self.listing();
        listing[..listing.len() - 1].last().copied()
    }
}
