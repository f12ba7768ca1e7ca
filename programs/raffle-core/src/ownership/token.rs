use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{RaffleError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Minimum signing key length in bytes.
pub const MIN_TOKEN_KEY_LEN: usize = 32;

const TOKEN_DOMAIN: &[u8] = b"raffle-owner:";

/// Issues and checks ownership tokens of the form `<raffle uuid>.<hex mac>`.
///
/// A token is bound to exactly one raffle id and stays valid for as long as the
/// signing key is unchanged.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self> {
        let key = key.into();
        if key.len() < MIN_TOKEN_KEY_LEN {
            return Err(RaffleError::InvalidConfig(format!(
                "token key must be at least {MIN_TOKEN_KEY_LEN} bytes"
            )));
        }
        Ok(Self { key })
    }

    /// Builds a signer from a hex-encoded key.
    pub fn from_hex(key: &str) -> Result<Self> {
        let key = hex::decode(key.trim())
            .map_err(|e| RaffleError::InvalidConfig(format!("token key is not hex: {e}")))?;
        Self::new(key)
    }

    pub fn issue(&self, raffle_id: Uuid) -> Result<String> {
        let tag = self.mac_for(&raffle_id)?.finalize().into_bytes();
        Ok(format!("{}.{}", raffle_id.hyphenated(), hex::encode(tag)))
    }

    /// True only for a well-formed token whose embedded id is `raffle_id` and whose
    /// signature checks out. Any malformed input is simply `false`.
    pub fn verify(&self, raffle_id: Uuid, token: &str) -> bool {
        let Some((id_part, tag_part)) = token.split_once('.') else {
            return false;
        };
        let Ok(embedded) = Uuid::parse_str(id_part) else {
            return false;
        };
        if embedded != raffle_id {
            return false;
        }
        let Ok(tag) = hex::decode(tag_part) else {
            return false;
        };

        match self.mac_for(&embedded) {
            Ok(mac) => mac.verify_slice(&tag).is_ok(),
            Err(_) => false,
        }
    }

    fn mac_for(&self, raffle_id: &Uuid) -> Result<HmacSha256> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.key)
            .map_err(|_| RaffleError::InvalidConfig("invalid token key length".to_string()))?;
        mac.update(TOKEN_DOMAIN);
        mac.update(raffle_id.as_bytes());
        Ok(mac)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSigner(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(fill: u8) -> TokenSigner {
        TokenSigner::new(vec![fill; MIN_TOKEN_KEY_LEN]).unwrap()
    }

    #[test]
    fn token_is_bound_to_its_raffle() {
        let signer = signer(1);
        let id = Uuid::new_v4();
        let token = signer.issue(id).unwrap();

        assert!(signer.verify(id, &token));
        assert!(!signer.verify(Uuid::new_v4(), &token));
    }

    #[test]
    fn foreign_or_mangled_tokens_are_rejected() {
        let id = Uuid::new_v4();
        let token = signer(1).issue(id).unwrap();

        assert!(!signer(2).verify(id, &token));
        assert!(!signer(1).verify(id, ""));
        assert!(!signer(1).verify(id, "not-a-token"));
        assert!(!signer(1).verify(id, &format!("{id}.zz")));
        assert!(!signer(1).verify(id, &token[..token.len() - 2]));
    }

    #[test]
    fn short_keys_are_refused() {
        assert!(matches!(
            TokenSigner::new(vec![0u8; 8]),
            Err(RaffleError::InvalidConfig(_))
        ));
        assert!(TokenSigner::from_hex("nothex").is_err());
        assert!(TokenSigner::from_hex(&"ab".repeat(MIN_TOKEN_KEY_LEN)).is_ok());
    }
}
