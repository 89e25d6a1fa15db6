// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter};

use arcova_auth::OwnerSet;
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Registry-assigned identifier of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetId(u64);

impl DatasetId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for DatasetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Server-confirmed view of a dataset at one point in time.
///
/// `version` is bumped by the registry on every committed owner delta and serves as the
/// optimistic-concurrency token: a client records the version it last observed and commits
/// deltas against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSnapshot {
    pub id: DatasetId,
    pub name: String,
    pub description: String,
    pub owners: OwnerSet<Identity>,
    pub version: u64,
}
