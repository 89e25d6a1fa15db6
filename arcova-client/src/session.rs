// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::identity::{Credentials, Identity};
use crate::service::{AuthError, IdentityService};

/// Single source of truth for "who is acting now" in this browser context.
///
/// At most one identity is bound at a time; a successful login replaces any prior session. Every
/// change of the bound identity (login, logout, credential clearing) bumps the session epoch.
/// Pending owner edits and in-flight requests are tagged with the epoch at which they started and
/// are invalidated by any mismatch, which is what keeps one user's staged edits from leaking into
/// the next user's session.
pub struct SessionContext<S>
where
    S: IdentityService,
{
    service: Arc<S>,
    state: Arc<RwLock<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    active: Option<Identity>,
    credentials: Option<Credentials>,
    epoch: u64,
}

impl<S> Clone for SessionContext<S>
where
    S: IdentityService,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S> SessionContext<S>
where
    S: IdentityService,
{
    pub(crate) fn new(service: Arc<S>) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Authenticate against the identity service and bind the resulting identity to this
    /// context, replacing any prior session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError<S::Error>> {
        let (identity, credentials) = self.service.login(email, password).await?;

        let mut state = self.state.write().await;
        state.active = Some(identity.clone());
        state.credentials = Some(credentials);
        state.epoch += 1;
        debug!(identity = %identity, "session opened");

        Ok(identity)
    }

    /// Clear the local session and invalidate the token server-side.
    ///
    /// Local state is cleared first and unconditionally, so this context holds no identity
    /// afterwards even when the remote invalidation fails. A remote failure is still reported so
    /// callers can retry it.
    pub async fn logout(&self) -> Result<(), AuthError<S::Error>> {
        let credentials = {
            let mut state = self.state.write().await;
            state.active = None;
            state.epoch += 1;
            state.credentials.take()
        };

        if let Some(credentials) = credentials {
            if let Err(err) = self.service.logout(credentials).await {
                warn!("remote session invalidation failed: {err}");
                return Err(err);
            }
        }

        Ok(())
    }

    /// Drop all locally held credentials without contacting the identity service.
    ///
    /// Simulates a fresh browser context; idempotent.
    pub async fn clear_credentials(&self) {
        let mut state = self.state.write().await;
        state.active = None;
        state.credentials = None;
        state.epoch += 1;
    }

    /// The identity bound to this context, if any. Pure read.
    pub async fn current_identity(&self) -> Option<Identity> {
        self.state.read().await.active.clone()
    }

    pub async fn credentials_present(&self) -> bool {
        self.state.read().await.credentials.is_some()
    }

    pub(crate) async fn epoch(&self) -> u64 {
        self.state.read().await.epoch
    }
}
