use std::fmt;

use instructions::*;

pub mod config;
pub mod error;
pub mod instructions;
pub mod ownership;
pub mod randomness;
pub mod state;
pub mod store;

pub use config::RaffleConfig;
pub use error::{ErrorKind, RaffleError, Result};
pub use instructions::{
    CloseOutcome, CreatedRaffle, JoinOutcome, JoinView, RaffleView, TicketAction,
};
pub use ownership::{
    OwnerSession, OwnershipAuthority, OwnershipCredential, OwnershipProof, OwnershipScheme,
};
pub use state::{Raffle, RaffleStatus, Ticket};
pub use store::{MemoryStore, RaffleStore, Store, TicketStore};

use randomness::{EntropySource, OsEntropy};

/// Everything one use case needs, borrowed from the service for a single call.
pub struct Context<'a, S: ?Sized> {
    pub store: &'a S,
    pub authority: &'a OwnershipAuthority,
    pub entropy: &'a dyn EntropySource,
    pub config: &'a RaffleConfig,
}

/// A fact worth recording, written to the log when emitted.
pub trait Event: fmt::Debug {
    const NAME: &'static str;
}

pub(crate) fn emit<E: Event>(event: &E) {
    tracing::info!(event = E::NAME, data = ?event, "raffle event");
}

/// Entry point for the routing layer: create, view, join, submit and close.
pub struct RaffleService<S> {
    store: S,
    authority: OwnershipAuthority,
    entropy: Box<dyn EntropySource>,
    config: RaffleConfig,
}

impl<S: Store> RaffleService<S> {
    /// Builds a service with the ownership scheme selected by `config`.
    pub fn from_config(config: RaffleConfig, store: S) -> Result<Self> {
        let authority = config.authority()?;
        Ok(Self {
            store,
            authority,
            entropy: Box::new(OsEntropy),
            config,
        })
    }

    /// Replaces the OS entropy source used for winner draws.
    pub fn with_entropy(mut self, entropy: impl EntropySource + 'static) -> Self {
        self.entropy = Box::new(entropy);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheme(&self) -> OwnershipScheme {
        self.authority.scheme()
    }

    fn ctx(&self) -> Context<'_, S> {
        Context {
            store: &self.store,
            authority: &self.authority,
            entropy: self.entropy.as_ref(),
            config: &self.config,
        }
    }

    pub fn create(&self, name: &str, secret: &str) -> Result<CreatedRaffle> {
        create_raffle::create_raffle(&self.ctx(), name, secret)
    }

    pub fn view(&self, raffle_id: &str, proof: OwnershipProof<'_>) -> Result<RaffleView> {
        view_raffle::view_raffle(&self.ctx(), raffle_id, proof)
    }

    pub fn join_view(&self, raffle_id: &str, owner: &str) -> Result<JoinOutcome> {
        join_raffle::join_raffle(&self.ctx(), raffle_id, owner)
    }

    pub fn submit_ticket(&self, raffle_id: &str, owner: &str, content: &str) -> Result<()> {
        submit_ticket::submit_ticket(&self.ctx(), raffle_id, owner, content)
    }

    pub fn close(
        &self,
        raffle_id: &str,
        proof: OwnershipProof<'_>,
        secret: Option<&str>,
    ) -> Result<CloseOutcome> {
        close_raffle::close_raffle(&self.ctx(), raffle_id, proof, secret)
    }
}
