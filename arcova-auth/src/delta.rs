// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::traits::IdentityHandle;

/// Staged changes to the owner set of one dataset.
///
/// Additions and removals are kept disjoint: staging an addition for an identity which is
/// currently staged for removal un-stages the removal instead, and the other way around. This
/// makes staging operations idempotent and keeps the wire payload free of contradictions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDelta<ID>
where
    ID: IdentityHandle,
{
    additions: HashSet<ID>,
    removals: HashSet<ID>,
}

impl<ID> Default for OwnerDelta<ID>
where
    ID: IdentityHandle,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> OwnerDelta<ID>
where
    ID: IdentityHandle,
{
    pub fn new() -> Self {
        Self {
            additions: HashSet::new(),
            removals: HashSet::new(),
        }
    }

    /// Stage adding an identity to the owner set.
    ///
    /// Cancels out a staged removal of the same identity.
    pub fn stage_addition(&mut self, identity: ID) {
        if !self.removals.remove(&identity) {
            self.additions.insert(identity);
        }
    }

    /// Stage removing an identity from the owner set.
    ///
    /// Cancels out a staged addition of the same identity.
    pub fn stage_removal(&mut self, identity: ID) {
        if !self.additions.remove(&identity) {
            self.removals.insert(identity);
        }
    }

    pub fn additions(&self) -> &HashSet<ID> {
        &self.additions
    }

    pub fn removals(&self) -> &HashSet<ID> {
        &self.removals
    }

    /// True when the delta stages no changes at all.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}
