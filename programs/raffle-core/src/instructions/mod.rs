pub use close_raffle::*;
pub use create_raffle::*;
pub use join_raffle::*;
pub use submit_ticket::*;
pub use view_raffle::*;

pub mod close_raffle;
pub mod create_raffle;
pub mod join_raffle;
pub mod submit_ticket;
pub mod view_raffle;

use uuid::Uuid;

use crate::error::{RaffleError, Result};

/// Raffle ids must parse as UUIDs before any lookup.
pub(crate) fn parse_raffle_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RaffleError::NotFound)
}
