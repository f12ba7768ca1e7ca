use serde::Deserialize;

use crate::{
    error::{RaffleError, Result},
    ownership::{OwnershipAuthority, OwnershipScheme, SecretHashParams, TokenSigner},
    state::MAX_FIELD_CHARS,
};

/// Argon2id memory cost for new secrets, in KiB.
pub const DEFAULT_SECRET_HASH_MEMORY_KIB: u32 = 19 * 1024;
/// Argon2id passes for new secrets.
pub const DEFAULT_SECRET_HASH_ITERATIONS: u32 = 2;

/// Deployment settings for the raffle service.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RaffleConfig {
    /// Ownership scheme for the whole deployment
    pub ownership_scheme: OwnershipScheme,
    /// Hex-encoded signing key, required by the token scheme
    pub token_key: Option<String>,
    /// Argon2id memory cost applied when hashing new raffle secrets
    pub secret_hash_memory_kib: u32,
    /// Argon2id passes applied when hashing new raffle secrets
    pub secret_hash_iterations: u32,
    /// Longest accepted name, secret or ticket content, in characters
    pub max_field_len: usize,
}

impl Default for RaffleConfig {
    fn default() -> Self {
        Self {
            ownership_scheme: OwnershipScheme::Token,
            token_key: None,
            secret_hash_memory_kib: DEFAULT_SECRET_HASH_MEMORY_KIB,
            secret_hash_iterations: DEFAULT_SECRET_HASH_ITERATIONS,
            max_field_len: MAX_FIELD_CHARS,
        }
    }
}

impl RaffleConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| RaffleError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn secret_hash_params(&self) -> SecretHashParams {
        SecretHashParams {
            memory_kib: self.secret_hash_memory_kib,
            iterations: self.secret_hash_iterations,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.secret_hash_params().to_argon2()?;
        // Records are sized for the default limit.
        if self.max_field_len == 0 || self.max_field_len > MAX_FIELD_CHARS {
            return Err(RaffleError::InvalidConfig(format!(
                "max_field_len must be between 1 and {MAX_FIELD_CHARS}"
            )));
        }
        self.token_signer()?;
        Ok(())
    }

    /// Builds the single ownership authority this deployment runs.
    pub fn authority(&self) -> Result<OwnershipAuthority> {
        self.validate()?;
        Ok(match self.token_signer()? {
            Some(signer) => OwnershipAuthority::TokenBased(signer),
            None => OwnershipAuthority::SessionBased,
        })
    }

    /// The token signer for the token scheme, `None` for the session scheme.
    fn token_signer(&self) -> Result<Option<TokenSigner>> {
        match (self.ownership_scheme, &self.token_key) {
            (OwnershipScheme::Token, Some(key)) => TokenSigner::from_hex(key).map(Some),
            (OwnershipScheme::Token, None) => Err(RaffleError::InvalidConfig(
                "token scheme requires token_key".to_string(),
            )),
            (OwnershipScheme::Session, _) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_scheme_needs_no_key() {
        let config = RaffleConfig::from_json(r#"{ "ownership_scheme": "session" }"#).unwrap();
        assert_eq!(config.secret_hash_memory_kib, DEFAULT_SECRET_HASH_MEMORY_KIB);
        assert_eq!(config.secret_hash_iterations, DEFAULT_SECRET_HASH_ITERATIONS);
        assert_eq!(config.max_field_len, MAX_FIELD_CHARS);
        assert_eq!(
            config.authority().unwrap().scheme(),
            OwnershipScheme::Session
        );
    }

    #[test]
    fn token_scheme_builds_a_signer() {
        let raw = format!(r#"{{ "token_key": "{}" }}"#, "0f".repeat(32));
        let config = RaffleConfig::from_json(&raw).unwrap();
        assert_eq!(config.authority().unwrap().scheme(), OwnershipScheme::Token);
    }

    #[test]
    fn inconsistent_settings_are_rejected() {
        let short_key = format!(r#"{{ "token_key": "{}" }}"#, "ab".repeat(8));
        let not_hex = format!(r#"{{ "token_key": "{}" }}"#, "zz".repeat(32));
        for raw in [
            r#"{}"#,
            r#"{ "ownership_scheme": "session", "secret_hash_iterations": 0 }"#,
            r#"{ "ownership_scheme": "session", "secret_hash_memory_kib": 1 }"#,
            r#"{ "ownership_scheme": "session", "max_field_len": 256 }"#,
            r#"{ "ownership_scheme": "both" }"#,
            r#"{ "ownership_scheme": "session", "unknown": 1 }"#,
            short_key.as_str(),
            not_hex.as_str(),
        ] {
            assert!(
                matches!(RaffleConfig::from_json(raw), Err(RaffleError::InvalidConfig(_))),
                "{raw}"
            );
        }
    }
}
