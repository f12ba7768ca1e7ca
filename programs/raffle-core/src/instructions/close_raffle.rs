use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    emit,
    error::{RaffleError, Result},
    ownership::OwnershipProof,
    randomness::select_winner,
    store::Store,
    Context, Event,
};

use super::parse_raffle_id;

/// Event emitted when a raffle is closed and its winner drawn
#[derive(Debug)]
pub struct RaffleClosed {
    /// The id of the closed raffle
    pub raffle: Uuid,
    /// Number of tickets the winner was drawn from
    pub ticket_count: usize,
    /// Content of the winning ticket, empty if there were none
    pub result: String,
}

impl Event for RaffleClosed {
    const NAME: &'static str = "RaffleClosed";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    /// This call closed the raffle and drew `result`.
    Closed { result: String },
    /// The raffle was already closed; nothing changed.
    AlreadyClosed,
}

/// Closes a raffle and draws its single winner.
///
/// # Arguments
/// * `ctx` - The per-call context holding the store, authority and entropy source
/// * `raffle_id` - External raffle handle; malformed ids are `NotFound`
/// * `proof` - Token or session proof presented by the caller
/// * `secret` - Optional password, checked only when the proof does not verify
///
/// # Security Considerations
/// 1. A caller passes with a valid ownership proof, or else with the correct secret
/// 2. A wrong or missing secret without valid proof is `InvalidPassword`; state
///    is left untouched
///
/// # Implementation Notes
/// - Tickets are read and the winner drawn outside the store's critical section
/// - The status flip is `try_close`, conditioned on the raffle still being Open;
///   when another caller got there first the local draw is discarded
/// - Closing an already closed raffle is a no-op
pub fn close_raffle<S: Store + ?Sized>(
    ctx: &Context<'_, S>,
    raffle_id: &str,
    proof: OwnershipProof<'_>,
    secret: Option<&str>,
) -> Result<CloseOutcome> {
    let id = parse_raffle_id(raffle_id)?;

    if !ctx.authority.verify(id, proof) {
        let authorized = match secret {
            Some(secret) => ctx.authority.verify_secret(ctx.store, id, secret)?,
            None => {
                // Still distinguish an unknown raffle from a bad password.
                ctx.store.get(id)?.ok_or(RaffleError::NotFound)?;
                false
            }
        };
        if !authorized {
            warn!(raffle = %id, "close rejected: invalid password");
            return Err(RaffleError::InvalidPassword);
        }
    }

    let raffle = ctx.store.get(id)?.ok_or(RaffleError::NotFound)?;
    if !raffle.is_open() {
        debug!(raffle = %id, "raffle already closed");
        return Ok(CloseOutcome::AlreadyClosed);
    }

    let tickets = ctx.store.list_by_raffle(id)?;
    let result = select_winner(&tickets, ctx.entropy)?;

    if !ctx.store.try_close(id, &result)? {
        debug!(raffle = %id, "raffle closed concurrently, discarding draw");
        return Ok(CloseOutcome::AlreadyClosed);
    }

    emit(&RaffleClosed {
        raffle: id,
        ticket_count: tickets.len(),
        result: result.clone(),
    });

    Ok(CloseOutcome::Closed { result })
}
