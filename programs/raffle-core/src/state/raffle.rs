use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use uuid::Uuid;

use crate::ownership::{SecretHash, MAX_SECRET_HASH_BYTES};

/// Longest accepted name, secret or ticket content, in characters.
pub const MAX_FIELD_CHARS: usize = 255;

/// Upper bound on the UTF-8 encoding of a `MAX_FIELD_CHARS` string.
pub const MAX_FIELD_BYTES: usize = MAX_FIELD_CHARS * 4;

// Space calculation:
// 16 (id) +
// 4 (length of name) +
// 1020 (name) +
// 4 (length of secret hash) +
// 128 (secret hash, PHC string) +
// 1 (status) +
// 1 (result: Option tag) +
// 4 (length of result) +
// 1020 (result) =
// 2198 total bytes
pub const RAFFLE_RECORD_SIZE: usize =
    16 + 4 + MAX_FIELD_BYTES + 4 + MAX_SECRET_HASH_BYTES + 1 + 1 + 4 + MAX_FIELD_BYTES;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    Open,
    Closed,
}

impl RaffleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleStatus::Open => "Open",
            RaffleStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named draw. `result` is `Some` exactly when `status` is `Closed`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    id: [u8; 16],
    pub name: String,
    pub secret: SecretHash,
    pub status: RaffleStatus,
    pub result: Option<String>,
}

impl Raffle {
    /// A freshly created raffle: Open with no result.
    pub fn open(id: Uuid, name: String, secret: SecretHash) -> Self {
        Self {
            id: id.into_bytes(),
            name,
            secret,
            status: RaffleStatus::Open,
            result: None,
        }
    }

    pub fn id(&self) -> Uuid {
        Uuid::from_bytes(self.id)
    }

    pub fn is_open(&self) -> bool {
        self.status == RaffleStatus::Open
    }

    /// Applies the terminal transition. Returns false if the raffle was not Open,
    /// in which case nothing changes.
    pub fn close_with(&mut self, result: String) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = RaffleStatus::Closed;
        self.result = Some(result);
        true
    }
}
