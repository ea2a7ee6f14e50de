//! Test utilities shared by unit and integration tests.

pub mod mocks;

pub use mocks::{MockConfig, MockDatabaseClient};

use secrecy::SecretString;

use crate::domain::Role;
use crate::infra::{MessageCatalog, StaticTokenVerifier};

/// Token accepted as `ADMIN` by [`test_verifier`]
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Token accepted as `FUNCIONARIO` by [`test_verifier`]
pub const FUNCIONARIO_TOKEN: &str = "test-funcionario-token";

/// Install the pt-BR catalog process-wide, if none is installed yet
pub fn install_test_catalog() -> &'static MessageCatalog {
    if let Ok(catalog) = MessageCatalog::installed() {
        return catalog;
    }
    MessageCatalog::for_locale("pt-BR")
        .expect("embedded pt-BR catalog")
        .install()
}

/// Verifier knowing [`ADMIN_TOKEN`] and [`FUNCIONARIO_TOKEN`]
#[must_use]
pub fn test_verifier() -> StaticTokenVerifier {
    StaticTokenVerifier::new()
        .with_token(&SecretString::from(ADMIN_TOKEN.to_string()), Role::Admin)
        .with_token(
            &SecretString::from(FUNCIONARIO_TOKEN.to_string()),
            Role::Funcionario,
        )
}
