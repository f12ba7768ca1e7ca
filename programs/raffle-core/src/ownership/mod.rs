use std::collections::BTreeSet;

use serde::Deserialize;
use uuid::Uuid;

pub use secret::*;
pub use token::*;

pub mod secret;
pub mod token;

use crate::{
    error::{RaffleError, Result},
    store::RaffleStore,
};

/// Which ownership scheme a deployment runs. Never both at once.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipScheme {
    #[default]
    Token,
    Session,
}

/// Server-side session state: the raffles this caller created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerSession {
    raffles: BTreeSet<Uuid>,
}

impl OwnerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a session credential. Token credentials are left to the client.
    pub fn accept(&mut self, credential: &OwnershipCredential) {
        if let OwnershipCredential::Session(raffle_id) = credential {
            self.raffles.insert(*raffle_id);
        }
    }

    pub fn contains(&self, raffle_id: &Uuid) -> bool {
        self.raffles.contains(raffle_id)
    }
}

/// Artifact handed out at creation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnershipCredential {
    /// Signed token the client stores, e.g. as a cookie named after the raffle id.
    Token(String),
    /// Raffle id to be added to the creator's session.
    Session(Uuid),
}

/// Evidence a caller presents instead of the secret.
#[derive(Clone, Copy, Debug, Default)]
pub enum OwnershipProof<'a> {
    #[default]
    Absent,
    Token(&'a str),
    Session(&'a OwnerSession),
}

/// Decides whether a caller may close a raffle without knowing its secret.
#[derive(Clone, Debug)]
pub enum OwnershipAuthority {
    TokenBased(TokenSigner),
    SessionBased,
}

impl OwnershipAuthority {
    pub fn scheme(&self) -> OwnershipScheme {
        match self {
            OwnershipAuthority::TokenBased(_) => OwnershipScheme::Token,
            OwnershipAuthority::SessionBased => OwnershipScheme::Session,
        }
    }

    pub fn issue(&self, raffle_id: Uuid) -> Result<OwnershipCredential> {
        match self {
            OwnershipAuthority::TokenBased(signer) => {
                Ok(OwnershipCredential::Token(signer.issue(raffle_id)?))
            }
            OwnershipAuthority::SessionBased => Ok(OwnershipCredential::Session(raffle_id)),
        }
    }

    /// Never fails: a missing, malformed or foreign proof is just `false`. A proof
    /// for the other scheme is also `false`.
    pub fn verify(&self, raffle_id: Uuid, proof: OwnershipProof<'_>) -> bool {
        match (self, proof) {
            (OwnershipAuthority::TokenBased(signer), OwnershipProof::Token(token)) => {
                signer.verify(raffle_id, token)
            }
            (OwnershipAuthority::SessionBased, OwnershipProof::Session(session)) => {
                session.contains(&raffle_id)
            }
            _ => false,
        }
    }

    /// Checks `supplied` against the stored secret hash of `raffle_id`, using the
    /// cost recorded with that hash. Shared by both schemes and usable by anyone who
    /// knows the secret.
    pub fn verify_secret<S: RaffleStore + ?Sized>(
        &self,
        store: &S,
        raffle_id: Uuid,
        supplied: &str,
    ) -> Result<bool> {
        let raffle = store.get(raffle_id)?.ok_or(RaffleError::NotFound)?;
        Ok(raffle.secret.verify(supplied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_scheme_tracks_membership() {
        let authority = OwnershipAuthority::SessionBased;
        let id = Uuid::new_v4();
        let mut session = OwnerSession::new();

        assert!(!authority.verify(id, OwnershipProof::Session(&session)));

        let credential = authority.issue(id).unwrap();
        session.accept(&credential);

        assert!(authority.verify(id, OwnershipProof::Session(&session)));
        assert!(!authority.verify(Uuid::new_v4(), OwnershipProof::Session(&session)));
        // A fresh session, e.g. another device, has no membership.
        assert!(!authority.verify(id, OwnershipProof::Session(&OwnerSession::new())));
    }

    #[test]
    fn proofs_from_the_other_scheme_do_not_count() {
        let signer = TokenSigner::new(vec![3u8; MIN_TOKEN_KEY_LEN]).unwrap();
        let authority = OwnershipAuthority::TokenBased(signer);
        let id = Uuid::new_v4();

        let mut session = OwnerSession::new();
        session.accept(&OwnershipCredential::Session(id));
        assert!(!authority.verify(id, OwnershipProof::Session(&session)));
        assert!(!authority.verify(id, OwnershipProof::Absent));

        let OwnershipCredential::Token(token) = authority.issue(id).unwrap() else {
            panic!("token scheme must issue tokens");
        };
        assert!(authority.verify(id, OwnershipProof::Token(&token)));
        assert!(!OwnershipAuthority::SessionBased.verify(id, OwnershipProof::Token(&token)));
    }
}
