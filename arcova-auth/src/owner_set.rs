// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delta::OwnerDelta;
use crate::traits::IdentityHandle;

#[derive(Debug, Error)]
pub enum OwnerSetError<ID>
where
    ID: IdentityHandle,
{
    /// The acting identity is not a current owner and may not change the owner set.
    #[error("{0} is not an owner and cannot change the owner set")]
    NotAnOwner(ID),

    /// Applying the change would leave the dataset without any owner.
    #[error("change would leave the dataset without owners")]
    WouldBeEmpty,
}

/// The owner identities of one dataset.
///
/// Invariant: the set is never empty. A dataset is created with its creator as sole owner and
/// every change is validated against this invariant before it takes effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSet<ID>
where
    ID: IdentityHandle,
{
    members: HashSet<ID>,
}

impl<ID> OwnerSet<ID>
where
    ID: IdentityHandle,
{
    /// Owner set of a freshly created dataset: the creator alone.
    pub fn new(creator: ID) -> Self {
        Self {
            members: HashSet::from([creator]),
        }
    }

    /// Build an owner set from an iterator of identities, rejecting empty input.
    pub fn try_from_iter<I>(identities: I) -> Result<Self, OwnerSetError<ID>>
    where
        I: IntoIterator<Item = ID>,
    {
        let members: HashSet<ID> = identities.into_iter().collect();
        if members.is_empty() {
            return Err(OwnerSetError::WouldBeEmpty);
        }
        Ok(Self { members })
    }

    pub fn contains(&self, identity: &ID) -> bool {
        self.members.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Never true, kept for API symmetry with standard collections.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ID> {
        self.members.iter()
    }

    /// Apply a delta on behalf of an acting identity, yielding the next owner set.
    ///
    /// This is the authoritative merge rule a registry runs against its _current_ state: the
    /// actor must be a current owner, additions are unioned before removals are subtracted
    /// (adding an existing owner and removing a non-owner are no-ops), and a result with no
    /// members is rejected.
    pub fn apply(&self, actor: &ID, delta: &OwnerDelta<ID>) -> Result<Self, OwnerSetError<ID>> {
        if !self.contains(actor) {
            return Err(OwnerSetError::NotAnOwner(actor.clone()));
        }

        let mut members = self.members.clone();
        for identity in delta.additions() {
            members.insert(identity.clone());
        }
        for identity in delta.removals() {
            members.remove(identity);
        }

        if members.is_empty() {
            return Err(OwnerSetError::WouldBeEmpty);
        }

        Ok(Self { members })
    }

    /// Fast local check whether applying a delta would leave at least one owner.
    ///
    /// Used by clients to reject a staged removal before any network round trip. The registry
    /// re-checks authoritatively on commit.
    pub fn would_remain(&self, delta: &OwnerDelta<ID>) -> bool {
        let remaining = self
            .members
            .iter()
            .chain(delta.additions())
            .filter(|identity| !delta.removals().contains(*identity))
            .count();
        remaining > 0
    }
}
