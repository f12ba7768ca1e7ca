use std::fmt;

use crate::{
    error::{RaffleError, Result},
    store::Store,
    Context,
};

use super::parse_raffle_id;

/// Whether submitting will add a new ticket or replace the caller's existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketAction {
    Add,
    Update,
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketAction::Add => f.write_str("Add"),
            TicketAction::Update => f.write_str("Update"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinView {
    pub name: String,
    pub action: TicketAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Open(JoinView),
    /// The raffle no longer accepts tickets; send the caller back to the raffle page.
    Closed,
}

/// Prepares the join form for `owner`.
///
/// Unknown or malformed ids are `NotFound`. A closed raffle is not an error, the
/// caller gets `JoinOutcome::Closed` and should redirect.
pub fn join_raffle<S: Store + ?Sized>(
    ctx: &Context<'_, S>,
    raffle_id: &str,
    owner: &str,
) -> Result<JoinOutcome> {
    let id = parse_raffle_id(raffle_id)?;
    let raffle = ctx.store.get(id)?.ok_or(RaffleError::NotFound)?;
    if !raffle.is_open() {
        return Ok(JoinOutcome::Closed);
    }

    let has_ticket = ctx
        .store
        .list_by_raffle(id)?
        .iter()
        .any(|ticket| ticket.owner == owner);
    let action = if has_ticket {
        TicketAction::Update
    } else {
        TicketAction::Add
    };

    Ok(JoinOutcome::Open(JoinView {
        name: raffle.name,
        action,
    }))
}
