use serde::{Deserialize, Serialize};

use crate::util::Slice;

/// A copied-out view of one indexed record.
///
/// Entries are minted by the skip list and own all of their data; they never
/// borrow into the structure's nodes. A tombstoned entry carries no payload
/// but keeps its timestamp so merge-time conflict resolution can order the
/// delete against older writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    key: String,
    payload: Option<Slice>,
    timestamp: u64,
    tombstone: bool,
}

impl Entry {
    pub(crate) fn new(key: String, payload: Option<Slice>, timestamp: u64, tombstone: bool) -> Self {
        Entry {
            key,
            payload,
            timestamp,
            tombstone,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn payload(&self) -> Option<&Slice> {
        self.payload.as_ref()
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn tombstone(&self) -> bool {
        self.tombstone
    }
}
