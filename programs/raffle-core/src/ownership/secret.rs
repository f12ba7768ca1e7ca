use std::fmt;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{RaffleError, Result};

pub const SALT_LEN: usize = 16;

/// Upper bound on a stored PHC string. An argon2id hash with a 16-byte salt and
/// six-digit cost parameters stays under 110 bytes.
pub const MAX_SECRET_HASH_BYTES: usize = 128;

/// Argon2id cost used when hashing new secrets. Existing hashes carry their own
/// parameters and are verified with those.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecretHashParams {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl SecretHashParams {
    pub fn to_argon2(&self) -> Result<Params> {
        Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|e| RaffleError::InvalidConfig(format!("secret hash parameters: {e}")))
    }
}

/// Salted argon2id hash of a raffle secret, kept as its PHC string
/// (`$argon2id$v=19$m=..,t=..,p=1$<salt>$<hash>`).
#[derive(BorshSerialize, BorshDeserialize, Clone, PartialEq, Eq)]
pub struct SecretHash {
    phc: String,
}

impl SecretHash {
    /// Hashes `secret` under a fresh random salt.
    pub fn generate(secret: &str, params: SecretHashParams) -> Result<Self> {
        let mut salt = [0u8; SALT_LEN];
        getrandom::getrandom(&mut salt).map_err(|e| RaffleError::Entropy(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt)
            .map_err(|e| RaffleError::Entropy(format!("salt encoding: {e}")))?;

        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);
        let phc = hasher
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| RaffleError::InvalidConfig(format!("secret hashing: {e}")))?
            .to_string();
        Ok(Self { phc })
    }

    /// Wraps a stored PHC string, rejecting anything that does not parse.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self> {
        let phc = phc.into();
        if phc.len() > MAX_SECRET_HASH_BYTES || PasswordHash::new(&phc).is_err() {
            return Err(RaffleError::Encoding(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "malformed secret hash",
            )));
        }
        Ok(Self { phc })
    }

    pub fn as_phc(&self) -> &str {
        &self.phc
    }

    /// Checks `supplied` using the algorithm and cost recorded in the hash itself.
    /// The final comparison is constant-time.
    pub fn verify(&self, supplied: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };
        Argon2::default()
            .verify_password(supplied.as_bytes(), &parsed)
            .is_ok()
    }
}

// Debug never prints the hash.
impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash(..)")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const CHEAP: SecretHashParams = SecretHashParams {
        memory_kib: 8,
        iterations: 1,
    };

    #[test]
    fn verifies_only_the_original_secret() {
        let hash = SecretHash::generate("pw123", CHEAP).unwrap();
        assert!(hash.as_phc().starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(hash.verify("pw123"));
        assert!(!hash.verify("pw124"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn verification_follows_the_stored_cost() {
        let cheap = SecretHash::generate("pw123", CHEAP).unwrap();
        let costlier = SecretHash::generate(
            "pw123",
            SecretHashParams {
                memory_kib: 16,
                iterations: 2,
            },
        )
        .unwrap();

        assert!(cheap.verify("pw123"));
        assert!(costlier.verify("pw123"));
    }

    #[test]
    fn same_secret_gets_distinct_salts() {
        let a = SecretHash::generate("pw123", CHEAP).unwrap();
        let b = SecretHash::generate("pw123", CHEAP).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn stored_form_is_parsed_and_redacted() {
        let hash = SecretHash::generate("pw123", CHEAP).unwrap();
        let reloaded = SecretHash::from_phc(hash.as_phc()).unwrap();
        assert!(reloaded.verify("pw123"));
        assert_eq!(format!("{reloaded:?}"), "SecretHash(..)");

        assert!(SecretHash::from_phc("pw123").is_err());
        assert!(SecretHashParams {
            memory_kib: 0,
            iterations: 1
        }
        .to_argon2()
        .is_err());
    }
}
