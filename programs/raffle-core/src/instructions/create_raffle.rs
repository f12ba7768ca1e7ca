use uuid::Uuid;

use crate::{
    emit,
    error::{RaffleError, Result},
    ownership::{OwnershipCredential, SecretHash},
    state::Raffle,
    store::Store,
    Context, Event,
};

/// Event emitted when a raffle is created
#[derive(Debug)]
pub struct RaffleCreated {
    /// The id of the created raffle
    pub raffle: Uuid,
    /// Display name of the raffle
    pub name: String,
}

impl Event for RaffleCreated {
    const NAME: &'static str = "RaffleCreated";
}

/// What the creator gets back: the external handle and the ownership artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedRaffle {
    pub id: Uuid,
    pub credential: OwnershipCredential,
}

/// Creates a new raffle in the Open state and issues its ownership credential.
///
/// # Arguments
/// * `ctx` - The per-call context holding the store, authority and configuration
/// * `name` - Display name of the raffle (1 to `max_field_len` characters)
/// * `secret` - Password that can always close the raffle (1 to `max_field_len` characters)
///
/// # Security Considerations
/// 1. The secret is stored only as a salted argon2id hash carrying its own cost
/// 2. The credential is bound to the freshly generated id and is only returned
///    once the raffle record has been persisted
///
/// # Implementation Notes
/// - Initializes the raffle in Open state with no result
/// - Generates a random v4 id, so ids never repeat across raffles
/// - Exactly one raffle record is written; a token credential lives client-side,
///   a session credential has to be recorded into the creator's session
pub fn create_raffle<S: Store + ?Sized>(
    ctx: &Context<'_, S>,
    name: &str,
    secret: &str,
) -> Result<CreatedRaffle> {
    // Validate inputs
    if name.is_empty() || secret.is_empty() {
        return Err(RaffleError::MissingNameOrSecret);
    }
    let max = ctx.config.max_field_len;
    if name.chars().count() > max || secret.chars().count() > max {
        return Err(RaffleError::NameOrSecretTooLong);
    }

    let secret = SecretHash::generate(secret, ctx.config.secret_hash_params())?;
    let id = Uuid::new_v4();
    let credential = ctx.authority.issue(id)?;

    ctx.store.create(&Raffle::open(id, name.to_string(), secret))?;

    emit(&RaffleCreated {
        raffle: id,
        name: name.to_string(),
    });

    Ok(CreatedRaffle { id, credential })
}
