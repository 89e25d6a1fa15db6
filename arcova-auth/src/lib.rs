// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ownership semantics for datasets on the Arcova platform.
//!
//! A dataset has a single authoritative set of owner identities. This crate defines the rules
//! which govern that set: it is never empty, only a current owner may change it, and changes are
//! expressed as deltas (staged additions and removals) which the registry applies atomically to
//! its _current_ state rather than to the snapshot the editor last saw. Delta application is what
//! lets two people edit the owner list of the same dataset concurrently without either of them
//! losing their change.
//!
//! No I/O happens here. The client runtime and any registry implementation both depend on these
//! types so that the "would this commit empty the owner set?" question has exactly one answer on
//! both sides of the wire.

mod delta;
mod owner_set;
pub mod traits;

pub use delta::OwnerDelta;
pub use owner_set::{OwnerSet, OwnerSetError};
