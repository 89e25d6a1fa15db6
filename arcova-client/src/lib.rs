// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side session and dataset ownership management for the Arcova platform.
//!
//! The platform's dataset registry holds the canonical owner list of every dataset; this crate
//! is the client half of the contract. A [`SessionContext`] tracks which identity is acting in
//! the current browser context and an [`OwnershipController`] mediates reading, staging and
//! committing owner changes against the registry. Owner changes travel as deltas and the
//! registry merges them into its current state, so concurrent edits from different sessions
//! don't overwrite each other.
//!
//! The external services are abstracted as the [`IdentityService`] and [`DatasetRegistry`]
//! traits; in-memory mocks of both live behind the `test_utils` feature. A [`Client`] composes
//! one session and one controller over shared services and is what the UI layer gets handed at
//! application start.

mod client;
mod controller;
mod dataset;
mod identity;
mod intent;
mod registry;
mod service;
mod session;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
#[cfg(test)]
mod tests;

pub use client::{Client, ClientError};
pub use controller::{EditPhase, OwnershipController, OwnershipError, PendingOwnerEdit};
pub use dataset::{DatasetId, DatasetSnapshot};
pub use identity::{Credentials, Identity};
pub use intent::{ManageIntent, ManageOutcome};
pub use registry::{DatasetRegistry, RegistryError};
pub use service::{AuthError, IdentityService};
pub use session::SessionContext;
