// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::future::Future;

use arcova_auth::OwnerDelta;
use thiserror::Error;

use crate::dataset::{DatasetId, DatasetSnapshot};
use crate::identity::Identity;

/// Failures of dataset registry operations.
///
/// The domain variants are authoritative decisions by the registry and not retryable as-is;
/// `Transport` wraps the implementation's round-trip error type and is safe to retry.
#[derive(Debug, Error)]
pub enum RegistryError<E>
where
    E: Error,
{
    #[error("dataset {0} not found")]
    NotFound(DatasetId),

    /// The acting identity is not an owner of the dataset.
    #[error("{actor} is not an owner of dataset {dataset}")]
    Forbidden { dataset: DatasetId, actor: Identity },

    /// The committed delta would leave the dataset without owners.
    #[error("commit would leave dataset {0} without owners")]
    WouldBeEmpty(DatasetId),

    #[error("transport: {0}")]
    Transport(E),
}

/// External dataset registry holding the canonical owner list of every dataset.
///
/// `commit_owner_delta` applies additions and removals atomically to the registry's _current_
/// owner set, not to the snapshot at `base_version`. Changes committed by others since the base
/// are preserved; the registry serializes concurrent commits per dataset and bumps `version` on
/// every successful one.
pub trait DatasetRegistry: Send + Sync + 'static {
    type Error: Error + Send;

    fn create_dataset(
        &self,
        name: &str,
        description: &str,
        creator: &Identity,
    ) -> impl Future<Output = Result<DatasetSnapshot, RegistryError<Self::Error>>> + Send;

    fn get_dataset(
        &self,
        id: DatasetId,
    ) -> impl Future<Output = Result<DatasetSnapshot, RegistryError<Self::Error>>> + Send;

    fn commit_owner_delta(
        &self,
        id: DatasetId,
        base_version: u64,
        actor: &Identity,
        delta: &OwnerDelta<Identity>,
    ) -> impl Future<Output = Result<DatasetSnapshot, RegistryError<Self::Error>>> + Send;
}
