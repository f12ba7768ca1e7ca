use uuid::Uuid;

use crate::{
    error::Result,
    state::{Raffle, Ticket},
};

pub use memory::MemoryStore;

pub mod memory;

/// Persistence for raffle records.
pub trait RaffleStore: Send + Sync {
    /// Inserts a new raffle. Fails if the id is already taken.
    fn create(&self, raffle: &Raffle) -> Result<()>;

    fn get(&self, raffle_id: Uuid) -> Result<Option<Raffle>>;

    /// Flips `Open -> Closed` and records `result` in one atomic step, only if the
    /// persisted status is still Open. Returns whether this call made the transition.
    fn try_close(&self, raffle_id: Uuid, result: &str) -> Result<bool>;
}

/// Persistence for tickets.
pub trait TicketStore: Send + Sync {
    /// Inserts or overwrites the ticket keyed by `(raffle_id, owner)`, atomically
    /// conditioned on the parent raffle being Open. Returns whether it wrote.
    fn upsert(&self, ticket: &Ticket) -> Result<bool>;

    /// All tickets of a raffle, in no particular order.
    fn list_by_raffle(&self, raffle_id: Uuid) -> Result<Vec<Ticket>>;
}

pub trait Store: RaffleStore + TicketStore {}

impl<T: RaffleStore + TicketStore> Store for T {}
