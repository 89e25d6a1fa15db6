// SPDX-License-Identifier: MIT OR Apache-2.0

#[allow(clippy::module_inception)]
mod controller;
mod edit;

pub use controller::{EditPhase, OwnershipController, OwnershipError};
pub use edit::PendingOwnerEdit;
