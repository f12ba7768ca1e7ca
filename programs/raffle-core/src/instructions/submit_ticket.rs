use tracing::debug;
use uuid::Uuid;

use crate::{
    emit,
    error::{RaffleError, Result},
    state::{Ticket, MAX_OWNER_BYTES},
    store::Store,
    Context, Event,
};

use super::parse_raffle_id;

/// Event emitted when a ticket is added or replaced
#[derive(Debug)]
pub struct TicketSubmitted {
    /// The raffle the ticket belongs to
    pub raffle: Uuid,
    /// Identity of the submitting party
    pub owner: String,
}

impl Event for TicketSubmitted {
    const NAME: &'static str = "TicketSubmitted";
}

/// Adds `owner`'s ticket to a raffle, or replaces its content if one exists.
///
/// # Arguments
/// * `ctx` - The per-call context holding the store and configuration
/// * `raffle_id` - External raffle handle; malformed ids are `NotFound`
/// * `owner` - Identity string correlating the participant's ticket (at most
///   `MAX_OWNER_BYTES` bytes)
/// * `content` - Ticket text (at most `max_field_len` characters)
///
/// # Implementation Notes
/// - A closed or absent raffle makes this a silent no-op, so callers can always
///   redirect back to the raffle page
/// - The write is one insert-or-update keyed by `(raffle_id, owner)` that the store
///   conditions on the raffle still being Open, so nothing is written after the
///   status flip. A ticket stored after a concurrent close has listed the tickets
///   but before it flipped the status is kept, without taking part in that draw
pub fn submit_ticket<S: Store + ?Sized>(
    ctx: &Context<'_, S>,
    raffle_id: &str,
    owner: &str,
    content: &str,
) -> Result<()> {
    let id = parse_raffle_id(raffle_id)?;
    if content.chars().count() > ctx.config.max_field_len {
        return Err(RaffleError::ContentTooLong);
    }
    if owner.len() > MAX_OWNER_BYTES {
        return Err(RaffleError::OwnerTooLong);
    }

    match ctx.store.get(id)? {
        Some(raffle) if raffle.is_open() => {}
        Some(_) => {
            debug!(raffle = %id, "ignoring ticket for closed raffle");
            return Ok(());
        }
        None => {
            debug!(raffle = %id, "ignoring ticket for unknown raffle");
            return Ok(());
        }
    }

    if !ctx.store.upsert(&Ticket::new(id, owner, content))? {
        debug!(raffle = %id, "raffle closed before ticket was stored");
        return Ok(());
    }

    emit(&TicketSubmitted {
        raffle: id,
        owner: owner.to_string(),
    });

    Ok(())
}
