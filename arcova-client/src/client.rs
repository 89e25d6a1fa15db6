// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::controller::{OwnershipController, OwnershipError};
use crate::dataset::{DatasetId, DatasetSnapshot};
use crate::identity::Identity;
use crate::intent::{ManageIntent, ManageOutcome};
use crate::registry::DatasetRegistry;
use crate::service::{AuthError, IdentityService};
use crate::session::SessionContext;

#[derive(Debug, Error)]
pub enum ClientError<S, R>
where
    S: IdentityService,
    R: DatasetRegistry,
{
    #[error(transparent)]
    Auth(AuthError<S::Error>),

    #[error(transparent)]
    Ownership(OwnershipError<R>),

    /// The handle does not belong to any registered identity.
    #[error("no registered identity matches {0}")]
    UnknownIdentity(String),

    #[error("no identity is logged in")]
    NotAuthenticated,
}

/// Top-level client context: one session, one ownership controller, shared services.
///
/// Composed once at application start and handed to the UI layer; there is no ambient singleton.
/// Two `Client` values over the same services model two independent browser contexts talking to
/// the same platform.
pub struct Client<S, R>
where
    S: IdentityService,
    R: DatasetRegistry,
{
    identity_service: Arc<S>,
    registry: Arc<R>,
    session: SessionContext<S>,
    ownership: OwnershipController<R, S>,
}

impl<S, R> Client<S, R>
where
    S: IdentityService,
    R: DatasetRegistry,
{
    pub fn new(identity_service: S, registry: R) -> Self {
        let identity_service = Arc::new(identity_service);
        let registry = Arc::new(registry);
        let session = SessionContext::new(identity_service.clone());
        let ownership = OwnershipController::new(registry.clone(), session.clone());

        Self {
            identity_service,
            registry,
            session,
            ownership,
        }
    }

    pub fn session(&self) -> &SessionContext<S> {
        &self.session
    }

    pub fn ownership(&self) -> &OwnershipController<R, S> {
        &self.ownership
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, ClientError<S, R>> {
        self.identity_service
            .register(email, password)
            .await
            .map_err(ClientError::Auth)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ClientError<S, R>> {
        self.session.login(email, password).await.map_err(ClientError::Auth)
    }

    pub async fn logout(&self) -> Result<(), ClientError<S, R>> {
        self.session.logout().await.map_err(ClientError::Auth)
    }

    /// Register a new dataset with the current identity as its sole owner.
    ///
    /// The returned snapshot is cached, so the dataset is immediately loaded for editing.
    pub async fn create_dataset(
        &self,
        name: &str,
        description: &str,
    ) -> Result<DatasetSnapshot, ClientError<S, R>> {
        let Some(creator) = self.session.current_identity().await else {
            return Err(ClientError::NotAuthenticated);
        };

        let snapshot = self
            .registry
            .create_dataset(name, description, &creator)
            .await
            .map_err(|err| ClientError::Ownership(OwnershipError::from_registry(err)))?;

        debug!(dataset = %snapshot.id, creator = %creator, "dataset created");
        self.ownership.cache_snapshot(snapshot.clone()).await;

        Ok(snapshot)
    }

    /// Dispatch a manage-panel intent against a dataset.
    ///
    /// `AddOwner` resolves the handle through the identity service first; an unknown handle is
    /// rejected before anything is staged.
    pub async fn dispatch(
        &self,
        dataset: DatasetId,
        intent: ManageIntent,
    ) -> Result<ManageOutcome, ClientError<S, R>> {
        match intent {
            ManageIntent::Open => {
                let edit = self
                    .ownership
                    .begin_edit(dataset)
                    .await
                    .map_err(ClientError::Ownership)?;
                Ok(ManageOutcome::Editing(edit))
            }
            ManageIntent::AddOwner(handle) => {
                let identity = self
                    .identity_service
                    .lookup(&handle)
                    .await
                    .map_err(ClientError::Auth)?
                    .ok_or(ClientError::UnknownIdentity(handle))?;
                let edit = self
                    .ownership
                    .stage_addition(dataset, identity)
                    .await
                    .map_err(ClientError::Ownership)?;
                Ok(ManageOutcome::Editing(edit))
            }
            ManageIntent::RemoveOwner(identity) => {
                let edit = self
                    .ownership
                    .stage_removal(dataset, identity)
                    .await
                    .map_err(ClientError::Ownership)?;
                Ok(ManageOutcome::Editing(edit))
            }
            ManageIntent::Save => {
                let snapshot = self
                    .ownership
                    .commit(dataset)
                    .await
                    .map_err(ClientError::Ownership)?;
                Ok(ManageOutcome::Saved(snapshot))
            }
            ManageIntent::Cancel => {
                self.ownership.cancel_edit(dataset).await;
                Ok(ManageOutcome::Cancelled)
            }
        }
    }
}
