use borsh::{BorshDeserialize, BorshSerialize};
use uuid::Uuid;

use super::raffle::MAX_FIELD_BYTES;

/// Longest owner identity kept, in bytes. Covers textual IPv6 with a zone id.
pub const MAX_OWNER_BYTES: usize = 64;

// 16 raffle_id + 4 owner length + 64 owner + 4 content length + 1020 content
pub const TICKET_RECORD_SIZE: usize = 16 + 4 + MAX_OWNER_BYTES + 4 + MAX_FIELD_BYTES;

/// One participant's entry, unique per `(raffle_id, owner)`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    raffle_id: [u8; 16],
    pub owner: String,
    pub content: String,
}

impl Ticket {
    pub fn new(raffle_id: Uuid, owner: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            raffle_id: raffle_id.into_bytes(),
            owner: owner.into(),
            content: content.into(),
        }
    }

    pub fn raffle_id(&self) -> Uuid {
        Uuid::from_bytes(self.raffle_id)
    }
}
