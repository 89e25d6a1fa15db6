// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use arcova_auth::{OwnerDelta, OwnerSet};

use crate::dataset::DatasetId;
use crate::identity::Identity;

/// Client-side staging area for changes to one dataset's owner set.
///
/// Ephemeral and never persisted: it exists between "open manage panel" and "save"/"cancel" and
/// is bound to the session epoch at which it was opened. After a login or logout the edit is
/// dead, no matter which identity comes next.
#[derive(Clone, Debug)]
pub struct PendingOwnerEdit {
    pub(crate) dataset_id: DatasetId,
    pub(crate) base_version: u64,
    pub(crate) base_owners: OwnerSet<Identity>,
    pub(crate) delta: OwnerDelta<Identity>,
    pub(crate) opened_by: Identity,
    pub(crate) session_epoch: u64,
}

impl PendingOwnerEdit {
    pub(crate) fn new(
        dataset_id: DatasetId,
        base_version: u64,
        base_owners: OwnerSet<Identity>,
        opened_by: Identity,
        session_epoch: u64,
    ) -> Self {
        Self {
            dataset_id,
            base_version,
            base_owners,
            delta: OwnerDelta::new(),
            opened_by,
            session_epoch,
        }
    }

    /// Move the base forward to a newer server-confirmed snapshot, keeping the staged delta.
    ///
    /// Deltas are applied to the registry's current state anyway, so rebasing only updates what
    /// the local invariant checks run against.
    pub(crate) fn rebase(&mut self, version: u64, owners: OwnerSet<Identity>) {
        self.base_version = version;
        self.base_owners = owners;
    }

    pub fn dataset_id(&self) -> DatasetId {
        self.dataset_id
    }

    /// The dataset version this edit was staged against.
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn opened_by(&self) -> &Identity {
        &self.opened_by
    }

    pub fn additions(&self) -> &HashSet<Identity> {
        self.delta.additions()
    }

    pub fn removals(&self) -> &HashSet<Identity> {
        self.delta.removals()
    }

    /// True when nothing has been staged yet.
    pub fn is_empty(&self) -> bool {
        self.delta.is_empty()
    }
}
