// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::future::Future;

use thiserror::Error;

use crate::identity::{Credentials, Identity};

/// Failures of identity service operations.
///
/// `Transport` wraps whatever error type the concrete service implementation uses for failed
/// round trips; everything else is a domain outcome reported by the service itself.
#[derive(Debug, Error)]
pub enum AuthError<E>
where
    E: Error,
{
    /// The service rejected the presented credentials.
    #[error("authentication failed for {0}")]
    Authentication(String),

    /// The handle is already taken by a registered identity.
    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    #[error("transport: {0}")]
    Transport(E),
}

/// External identity service: registers users, verifies credentials, resolves handles.
///
/// The service owns all identity data. The client only caches the identity bound to the current
/// session and never stores credentials beyond the session lifetime.
pub trait IdentityService: Send + Sync + 'static {
    type Error: Error + Send;

    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError<Self::Error>>> + Send;

    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(Identity, Credentials), AuthError<Self::Error>>> + Send;

    /// Invalidate a session token server-side.
    fn logout(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<(), AuthError<Self::Error>>> + Send;

    /// Resolve a typed handle to a registered identity, if any.
    ///
    /// Backs the "add owner by identity" intent: an owner can only be added once the handle is
    /// confirmed to belong to a registered user.
    fn lookup(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<Identity>, AuthError<Self::Error>>> + Send;
}
