// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::controller::edit::PendingOwnerEdit;
use crate::dataset::{DatasetId, DatasetSnapshot};
use crate::identity::Identity;
use crate::registry::{DatasetRegistry, RegistryError};
use crate::service::IdentityService;
use crate::session::SessionContext;

/// Client-side lifecycle of one dataset's owner list.
///
/// `Loaded` means a server-confirmed snapshot is cached, `Editing` that a pending edit is open on
/// top of it, `Committing` that a commit is in flight. Editing is only reachable through Loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditPhase {
    Unloaded,
    Loaded,
    Editing,
    Committing,
}

/// Client-resident authority over the locally known owner list of datasets.
///
/// Holds a cached server-confirmed snapshot and at most one pending edit per dataset, and
/// mediates all reads and mutations against the dataset registry. The registry stays the ground
/// truth throughout: loads overwrite the cache unconditionally and a successful commit replaces
/// it with the registry's response. Cheap to clone, all clones share state.
pub struct OwnershipController<R, S>
where
    R: DatasetRegistry,
    S: IdentityService,
{
    inner: Arc<Inner<R, S>>,
}

struct Inner<R, S>
where
    R: DatasetRegistry,
    S: IdentityService,
{
    registry: Arc<R>,
    session: SessionContext<S>,
    snapshots: RwLock<HashMap<DatasetId, DatasetSnapshot>>,
    edits: RwLock<HashMap<DatasetId, PendingOwnerEdit>>,
    committing: Mutex<HashSet<DatasetId>>,
}

impl<R, S> Clone for OwnershipController<R, S>
where
    R: DatasetRegistry,
    S: IdentityService,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R, S> OwnershipController<R, S>
where
    R: DatasetRegistry,
    S: IdentityService,
{
    pub fn new(registry: Arc<R>, session: SessionContext<S>) -> Self {
        let inner = Inner {
            registry,
            session,
            snapshots: RwLock::new(HashMap::new()),
            edits: RwLock::new(HashMap::new()),
            committing: Mutex::new(HashSet::new()),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Fetch the authoritative owner set and version from the registry.
    ///
    /// Always overwrites the cached snapshot for this dataset. An open pending edit survives a
    /// reload; when the registry reports a newer version the edit is rebased onto it so a later
    /// commit is never staged against a base older than the last observed state.
    pub async fn load_owners(
        &self,
        id: DatasetId,
    ) -> Result<DatasetSnapshot, OwnershipError<R>> {
        let epoch = self.inner.session.epoch().await;

        let snapshot = self
            .inner
            .registry
            .get_dataset(id)
            .await
            .map_err(OwnershipError::from_registry)?;

        if self.inner.session.epoch().await != epoch {
            warn!(dataset = %id, "discarding load result, session changed while request was in flight");
            return Err(OwnershipError::SessionChanged);
        }

        self.inner.snapshots.write().await.insert(id, snapshot.clone());

        let mut edits = self.inner.edits.write().await;
        if let Some(edit) = edits.get_mut(&id) {
            if edit.base_version < snapshot.version {
                debug!(
                    dataset = %id,
                    from = edit.base_version,
                    to = snapshot.version,
                    "rebasing pending edit onto newer snapshot"
                );
                edit.rebase(snapshot.version, snapshot.owners.clone());
            }
        }

        Ok(snapshot)
    }

    /// Open a pending edit on the last-loaded snapshot.
    ///
    /// The current identity must be a member of that snapshot's owner set. An idle edit already
    /// open for this dataset is discarded and replaced; an edit that is mid-commit is not.
    pub async fn begin_edit(
        &self,
        id: DatasetId,
    ) -> Result<PendingOwnerEdit, OwnershipError<R>> {
        let Some(actor) = self.inner.session.current_identity().await else {
            return Err(OwnershipError::NotAuthenticated);
        };
        let epoch = self.inner.session.epoch().await;

        if self.inner.committing.lock().await.contains(&id) {
            return Err(OwnershipError::CommitInFlight(id));
        }

        let (base_version, base_owners) = {
            let snapshots = self.inner.snapshots.read().await;
            let Some(snapshot) = snapshots.get(&id) else {
                return Err(OwnershipError::NotLoaded(id));
            };
            if !snapshot.owners.contains(&actor) {
                return Err(OwnershipError::Forbidden { dataset: id, actor });
            }
            (snapshot.version, snapshot.owners.clone())
        };

        let edit = PendingOwnerEdit::new(id, base_version, base_owners, actor, epoch);

        let mut edits = self.inner.edits.write().await;
        if let Some(previous) = edits.insert(id, edit.clone()) {
            if previous.session_epoch == epoch {
                warn!(dataset = %id, "discarding previously open edit");
            }
        }

        Ok(edit)
    }

    /// Stage adding an identity to the owner set. Local only, no network call.
    pub async fn stage_addition(
        &self,
        id: DatasetId,
        identity: Identity,
    ) -> Result<PendingOwnerEdit, OwnershipError<R>> {
        let epoch = self.inner.session.epoch().await;
        let mut edits = self.inner.edits.write().await;
        Self::collect_stale(&mut edits, id, epoch);

        let Some(edit) = edits.get_mut(&id) else {
            return Err(OwnershipError::NoOpenEdit(id));
        };
        edit.delta.stage_addition(identity);

        Ok(edit.clone())
    }

    /// Stage removing an identity from the owner set. Local only, no network call.
    ///
    /// Rejected right here when the resulting owner set would be empty; the registry re-checks
    /// the same invariant authoritatively on commit.
    pub async fn stage_removal(
        &self,
        id: DatasetId,
        identity: Identity,
    ) -> Result<PendingOwnerEdit, OwnershipError<R>> {
        let epoch = self.inner.session.epoch().await;
        let mut edits = self.inner.edits.write().await;
        Self::collect_stale(&mut edits, id, epoch);

        let Some(edit) = edits.get_mut(&id) else {
            return Err(OwnershipError::NoOpenEdit(id));
        };

        let mut candidate = edit.delta.clone();
        candidate.stage_removal(identity);
        if !edit.base_owners.would_remain(&candidate) {
            return Err(OwnershipError::WouldBeEmpty(id));
        }
        edit.delta = candidate;

        Ok(edit.clone())
    }

    /// Send the staged delta to the registry.
    ///
    /// On success the registry's response replaces the cached snapshot and the pending edit is
    /// discarded. An authoritative rejection (lost ownership, vanished dataset, empty result)
    /// also discards the edit; a transport failure preserves it so the same commit can be
    /// retried without re-staging. At most one commit per dataset is in flight at a time, an
    /// overlapping attempt fails immediately instead of queueing.
    pub async fn commit(&self, id: DatasetId) -> Result<DatasetSnapshot, OwnershipError<R>> {
        let Some(actor) = self.inner.session.current_identity().await else {
            return Err(OwnershipError::NotAuthenticated);
        };
        let epoch = self.inner.session.epoch().await;

        let (base_version, delta) = {
            let mut edits = self.inner.edits.write().await;
            Self::collect_stale(&mut edits, id, epoch);
            let Some(edit) = edits.get(&id) else {
                return Err(OwnershipError::NoOpenEdit(id));
            };
            (edit.base_version, edit.delta.clone())
        };

        {
            let mut committing = self.inner.committing.lock().await;
            if !committing.insert(id) {
                return Err(OwnershipError::CommitInFlight(id));
            }
        }

        debug!(dataset = %id, actor = %actor, "committing owner delta");
        let result = self
            .inner
            .registry
            .commit_owner_delta(id, base_version, &actor, &delta)
            .await;

        self.inner.committing.lock().await.remove(&id);

        if self.inner.session.epoch().await != epoch {
            warn!(dataset = %id, "discarding commit result, session changed while request was in flight");
            return Err(OwnershipError::SessionChanged);
        }

        match result {
            Ok(snapshot) => {
                self.inner.snapshots.write().await.insert(id, snapshot.clone());
                self.inner.edits.write().await.remove(&id);
                debug!(dataset = %id, version = snapshot.version, "owner delta committed");
                Ok(snapshot)
            }
            Err(RegistryError::Transport(err)) => Err(OwnershipError::Network(err)),
            Err(err) => {
                // The registry refuted an assumption this edit was staged on. Re-staging against
                // fresh state is required, keeping the edit around would only invite a second
                // rejection.
                self.inner.edits.write().await.remove(&id);
                warn!(dataset = %id, "commit rejected by registry, discarding pending edit");
                Err(OwnershipError::from_registry(err))
            }
        }
    }

    /// Discard the pending edit for a dataset, if any. Local only, idempotent.
    pub async fn cancel_edit(&self, id: DatasetId) {
        if self.inner.edits.write().await.remove(&id).is_some() {
            debug!(dataset = %id, "cancelled pending edit");
        }
    }

    /// The pending edit for a dataset, if one is open in the current session.
    ///
    /// Edits left behind by a previous session epoch are collected here and never reported.
    pub async fn pending_edit(&self, id: DatasetId) -> Option<PendingOwnerEdit> {
        let epoch = self.inner.session.epoch().await;
        let mut edits = self.inner.edits.write().await;
        Self::collect_stale(&mut edits, id, epoch);
        edits.get(&id).cloned()
    }

    /// Last server-confirmed snapshot for a dataset, if one was loaded.
    pub async fn cached_owners(&self, id: DatasetId) -> Option<DatasetSnapshot> {
        self.inner.snapshots.read().await.get(&id).cloned()
    }

    pub async fn phase(&self, id: DatasetId) -> EditPhase {
        if self.inner.committing.lock().await.contains(&id) {
            return EditPhase::Committing;
        }

        let epoch = self.inner.session.epoch().await;
        {
            let edits = self.inner.edits.read().await;
            if matches!(edits.get(&id), Some(edit) if edit.session_epoch == epoch) {
                return EditPhase::Editing;
            }
        }

        if self.inner.snapshots.read().await.contains_key(&id) {
            EditPhase::Loaded
        } else {
            EditPhase::Unloaded
        }
    }

    pub(crate) async fn cache_snapshot(&self, snapshot: DatasetSnapshot) {
        self.inner
            .snapshots
            .write()
            .await
            .insert(snapshot.id, snapshot);
    }

    /// Drop an edit opened under a different session epoch.
    fn collect_stale(
        edits: &mut HashMap<DatasetId, PendingOwnerEdit>,
        id: DatasetId,
        epoch: u64,
    ) {
        let stale = matches!(edits.get(&id), Some(edit) if edit.session_epoch != epoch);
        if stale {
            edits.remove(&id);
            debug!(dataset = %id, "collected pending edit from previous session");
        }
    }
}

#[derive(Debug, Error)]
pub enum OwnershipError<R>
where
    R: DatasetRegistry,
{
    /// No identity is logged in, so no mutating operation is even attempted.
    #[error("no identity is logged in")]
    NotAuthenticated,

    /// The dataset was never loaded in this controller; editing starts from a loaded snapshot.
    #[error("dataset {0} has not been loaded")]
    NotLoaded(DatasetId),

    #[error("dataset {0} not found")]
    NotFound(DatasetId),

    /// The acting identity is not (or no longer) an owner of the dataset.
    #[error("{actor} is not an owner of dataset {dataset}")]
    Forbidden { dataset: DatasetId, actor: Identity },

    #[error("no open edit for dataset {0}")]
    NoOpenEdit(DatasetId),

    /// The change would leave the dataset without owners.
    #[error("change would leave dataset {0} without owners")]
    WouldBeEmpty(DatasetId),

    /// A commit for this dataset is already in flight; wait for it or cancel.
    #[error("a commit for dataset {0} is already in flight")]
    CommitInFlight(DatasetId),

    /// The session changed while a request was in flight, its result was discarded.
    #[error("session changed while the request was in flight")]
    SessionChanged,

    /// Transport failure talking to the registry, safe to retry.
    #[error("transport: {0}")]
    Network(R::Error),
}

impl<R> OwnershipError<R>
where
    R: DatasetRegistry,
{
    pub(crate) fn from_registry(err: RegistryError<R::Error>) -> Self {
        match err {
            RegistryError::NotFound(id) => OwnershipError::NotFound(id),
            RegistryError::Forbidden { dataset, actor } => {
                OwnershipError::Forbidden { dataset, actor }
            }
            RegistryError::WouldBeEmpty(id) => OwnershipError::WouldBeEmpty(id),
            RegistryError::Transport(err) => OwnershipError::Network(err),
        }
    }
}
