//! Static access-token table.
//!
//! Tokens are configured as `token=ROLE` pairs and kept only as SHA-256
//! digests once loaded.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::domain::{AccessTokenVerifier, ConfigError, Role};

type TokenDigest = [u8; 32];

/// Verifier backed by a fixed set of token digests
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    digests: HashMap<TokenDigest, Role>,
}

impl StaticTokenVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token (builder pattern)
    #[must_use]
    pub fn with_token(mut self, token: &SecretString, role: Role) -> Self {
        self.digests.insert(digest(token.expose_secret()), role);
        self
    }

    /// Parse a comma-separated `token=ROLE` list, e.g. the `API_TOKENS` variable
    pub fn from_spec(spec: &SecretString) -> Result<Self, ConfigError> {
        let mut verifier = Self::new();
        for entry in spec
            .expose_secret()
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            let (token, role) = entry.split_once('=').ok_or_else(|| invalid("expected token=ROLE"))?;
            let token = token.trim();
            if token.is_empty() {
                return Err(invalid("empty token"));
            }
            let role: Role = role.trim().parse().map_err(|e: String| invalid(&e))?;
            verifier.digests.insert(digest(token), role);
        }
        Ok(verifier)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

impl AccessTokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Option<Role> {
        self.digests.get(&digest(token)).copied()
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: "API_TOKENS".to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_known_and_unknown_tokens() {
        let verifier = StaticTokenVerifier::new()
            .with_token(&SecretString::from("admin-token".to_string()), Role::Admin)
            .with_token(&SecretString::from("staff-token".to_string()), Role::Funcionario);

        assert_eq!(verifier.verify("admin-token"), Some(Role::Admin));
        assert_eq!(verifier.verify("staff-token"), Some(Role::Funcionario));
        assert_eq!(verifier.verify("admin-token "), None);
        assert_eq!(verifier.verify(""), None);
    }

    #[test]
    fn test_from_spec() {
        let spec = SecretString::from("abc=ADMIN, def=FUNCIONARIO,".to_string());
        let verifier = StaticTokenVerifier::from_spec(&spec).unwrap();
        assert_eq!(verifier.len(), 2);
        assert_eq!(verifier.verify("abc"), Some(Role::Admin));
        assert_eq!(verifier.verify("def"), Some(Role::Funcionario));
    }

    #[test]
    fn test_from_spec_rejects_malformed_entries() {
        for spec in ["abc", "=ADMIN", "abc=ROOT"] {
            let result = StaticTokenVerifier::from_spec(&SecretString::from(spec.to_string()));
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { .. })),
                "{} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_empty_spec_yields_empty_verifier() {
        let verifier = StaticTokenVerifier::from_spec(&SecretString::from("".to_string())).unwrap();
        assert!(verifier.is_empty());
    }
}
