//! Infrastructure layer implementations.

pub mod auth;
pub mod database;
pub mod i18n;

pub use auth::StaticTokenVerifier;
pub use database::{PostgresClient, PostgresConfig};
pub use i18n::{DEFAULT_LOCALE, MessageCatalog, SUPPORTED_LOCALES};
