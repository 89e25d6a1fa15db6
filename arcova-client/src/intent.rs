// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::controller::PendingOwnerEdit;
use crate::dataset::DatasetSnapshot;
use crate::identity::Identity;

/// User intents emitted by the owner management panel.
///
/// The presentation layer only translates its events (clicks, keyboard selection, whatever) into
/// these intents; each one maps 1:1 to a controller operation. How an identity was picked is of
/// no concern here, `AddOwner` carries the typed handle and nothing else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManageIntent {
    /// Open the manage panel, starting an edit on the loaded owner list.
    Open,
    /// Add an owner by their registered handle.
    AddOwner(String),
    /// Remove an owner.
    RemoveOwner(Identity),
    /// Save staged changes.
    Save,
    /// Discard staged changes.
    Cancel,
}

/// What the UI renders after an intent was dispatched.
#[derive(Clone, Debug)]
pub enum ManageOutcome {
    /// The edit (still) in progress, with its staged additions and removals.
    Editing(PendingOwnerEdit),
    /// The server-confirmed snapshot after a successful save.
    Saved(DatasetSnapshot),
    /// The edit was discarded.
    Cancelled,
}
