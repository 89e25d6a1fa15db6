// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Debug, Display};
use std::hash::Hash as StdHash;

/// Handle uniquely identifying a registered identity.
///
/// Equality is by handle. The client crate instantiates this with its email-based identity type,
/// registry implementations are free to use whatever identifier their user store assigns.
pub trait IdentityHandle: Clone + Debug + Display + Eq + StdHash {}

impl IdentityHandle for String {}

impl IdentityHandle for &str {}
