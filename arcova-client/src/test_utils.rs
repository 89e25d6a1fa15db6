// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock implementations of the identity service and the dataset registry.
//!
//! Both mocks keep their state behind a shared `Arc`, so cloning one yields another handle onto
//! the same "server". Two clients over clones of the same mocks behave like two browser contexts
//! talking to one platform, which is exactly what the multi-session tests need. Fault injection
//! (failing the next n requests, holding commits mid-flight) drives the retry and
//! stale-response paths.

use std::collections::HashMap;
use std::sync::Arc;

use arcova_auth::{OwnerDelta, OwnerSet, OwnerSetError};
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};

use crate::dataset::{DatasetId, DatasetSnapshot};
use crate::identity::{Credentials, Identity};
use crate::registry::{DatasetRegistry, RegistryError};
use crate::service::{AuthError, IdentityService};

/// Stand-in transport failure produced by fault injection.
#[derive(Debug, Error)]
#[error("simulated transport failure")]
pub struct MockTransportError;

/// Initialise tracing output for tests, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[derive(Debug, Default)]
struct DirectoryState {
    // Email to password.
    users: HashMap<String, String>,
    // Token to email.
    tokens: HashMap<String, String>,
    next_token: u64,
    fail_next: u32,
}

impl DirectoryState {
    fn take_fault(&mut self) -> bool {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            true
        } else {
            false
        }
    }
}

/// In-memory identity service.
#[derive(Clone, Debug)]
pub struct MockIdentityService {
    state: Arc<Mutex<DirectoryState>>,
}

impl MockIdentityService {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DirectoryState::default())),
        }
    }

    /// Fail the next `n` requests with a transport error.
    pub async fn fail_next_requests(&self, n: u32) {
        self.state.lock().await.fail_next += n;
    }
}

impl Default for MockIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityService for MockIdentityService {
    type Error = MockTransportError;

    async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError<Self::Error>> {
        let mut state = self.state.lock().await;
        if state.take_fault() {
            return Err(AuthError::Transport(MockTransportError));
        }

        if state.users.contains_key(email) {
            return Err(AuthError::AlreadyRegistered(email.to_string()));
        }
        state.users.insert(email.to_string(), password.to_string());

        Ok(Identity::new(email))
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Identity, Credentials), AuthError<Self::Error>> {
        let mut state = self.state.lock().await;
        if state.take_fault() {
            return Err(AuthError::Transport(MockTransportError));
        }

        match state.users.get(email) {
            Some(registered) if registered == password => (),
            _ => return Err(AuthError::Authentication(email.to_string())),
        }

        let token = format!("token-{}", state.next_token);
        state.next_token += 1;
        state.tokens.insert(token.clone(), email.to_string());

        Ok((Identity::new(email), Credentials::new(token)))
    }

    async fn logout(&self, credentials: Credentials) -> Result<(), AuthError<Self::Error>> {
        let mut state = self.state.lock().await;
        if state.take_fault() {
            return Err(AuthError::Transport(MockTransportError));
        }

        state.tokens.remove(credentials.token());
        Ok(())
    }

    async fn lookup(&self, handle: &str) -> Result<Option<Identity>, AuthError<Self::Error>> {
        let mut state = self.state.lock().await;
        if state.take_fault() {
            return Err(AuthError::Transport(MockTransportError));
        }

        Ok(state
            .users
            .contains_key(handle)
            .then(|| Identity::new(handle)))
    }
}

#[derive(Debug)]
struct StoredDataset {
    name: String,
    description: String,
    owners: OwnerSet<Identity>,
    version: u64,
}

impl StoredDataset {
    fn snapshot(&self, id: DatasetId) -> DatasetSnapshot {
        DatasetSnapshot {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            owners: self.owners.clone(),
            version: self.version,
        }
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    datasets: HashMap<DatasetId, StoredDataset>,
    next_id: u64,
    fail_next: u32,
    hold_commits: u32,
}

/// In-memory dataset registry applying owner deltas with the `arcova-auth` merge rule.
#[derive(Clone, Debug)]
pub struct MockRegistry {
    state: Arc<Mutex<RegistryState>>,
    commit_gate: Arc<Semaphore>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::default())),
            commit_gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Fail the next `n` requests with a transport error.
    pub async fn fail_next_requests(&self, n: u32) {
        self.state.lock().await.fail_next += n;
    }

    /// Park the next `n` commits until [`Self::release_commits`] is called.
    pub async fn hold_next_commits(&self, n: u32) {
        self.state.lock().await.hold_commits += n;
    }

    pub fn release_commits(&self) {
        self.commit_gate.add_permits(1);
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetRegistry for MockRegistry {
    type Error = MockTransportError;

    async fn create_dataset(
        &self,
        name: &str,
        description: &str,
        creator: &Identity,
    ) -> Result<DatasetSnapshot, RegistryError<Self::Error>> {
        let mut state = self.state.lock().await;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(RegistryError::Transport(MockTransportError));
        }

        state.next_id += 1;
        let id = DatasetId::new(state.next_id);
        let dataset = StoredDataset {
            name: name.to_string(),
            description: description.to_string(),
            owners: OwnerSet::new(creator.clone()),
            version: 1,
        };
        let snapshot = dataset.snapshot(id);
        state.datasets.insert(id, dataset);

        Ok(snapshot)
    }

    async fn get_dataset(
        &self,
        id: DatasetId,
    ) -> Result<DatasetSnapshot, RegistryError<Self::Error>> {
        let mut state = self.state.lock().await;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(RegistryError::Transport(MockTransportError));
        }

        state
            .datasets
            .get(&id)
            .map(|dataset| dataset.snapshot(id))
            .ok_or(RegistryError::NotFound(id))
    }

    async fn commit_owner_delta(
        &self,
        id: DatasetId,
        _base_version: u64,
        actor: &Identity,
        delta: &OwnerDelta<Identity>,
    ) -> Result<DatasetSnapshot, RegistryError<Self::Error>> {
        let held = {
            let mut state = self.state.lock().await;
            if state.hold_commits > 0 {
                state.hold_commits -= 1;
                true
            } else {
                false
            }
        };
        if held {
            // Parked until the test releases the gate; the permit is consumed for good.
            let permit = self
                .commit_gate
                .acquire()
                .await
                .expect("commit gate closed");
            permit.forget();
        }

        let mut state = self.state.lock().await;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(RegistryError::Transport(MockTransportError));
        }

        let Some(dataset) = state.datasets.get_mut(&id) else {
            return Err(RegistryError::NotFound(id));
        };

        // Deltas are applied to the current state, not to the base snapshot: concurrent commits
        // since `base_version` are preserved.
        let next = dataset.owners.apply(actor, delta).map_err(|err| match err {
            OwnerSetError::NotAnOwner(actor) => RegistryError::Forbidden { dataset: id, actor },
            OwnerSetError::WouldBeEmpty => RegistryError::WouldBeEmpty(id),
        })?;

        dataset.owners = next;
        dataset.version += 1;

        Ok(dataset.snapshot(id))
    }
}
