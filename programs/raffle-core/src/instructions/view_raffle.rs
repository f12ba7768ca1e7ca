use crate::{
    error::{RaffleError, Result},
    ownership::OwnershipProof,
    state::RaffleStatus,
    store::Store,
    Context,
};

use super::parse_raffle_id;

/// Plain data for rendering a raffle page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaffleView {
    pub name: String,
    pub status: RaffleStatus,
    pub result: Option<String>,
    /// Whether the caller may close without entering the secret
    pub can_close: bool,
}

pub fn view_raffle<S: Store + ?Sized>(
    ctx: &Context<'_, S>,
    raffle_id: &str,
    proof: OwnershipProof<'_>,
) -> Result<RaffleView> {
    let id = parse_raffle_id(raffle_id)?;
    let raffle = ctx.store.get(id)?.ok_or(RaffleError::NotFound)?;

    Ok(RaffleView {
        can_close: ctx.authority.verify(id, proof),
        name: raffle.name,
        status: raffle.status,
        result: raffle.result,
    })
}
