//! Localized message catalog.
//!
//! Catalogs are JSON objects embedded at compile time, one per locale. The
//! catalog selected at startup is verified against every key the service can
//! request and then installed process-wide; after that it is only read.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::domain::ConfigError;
use crate::domain::ErrorKind;
use crate::domain::validation::FIELD_MESSAGE_KEYS;

/// Locale used when `APP_LOCALE` is not set
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// Locales with an embedded catalog
pub const SUPPORTED_LOCALES: &[&str] = &["pt-BR", "en"];

const PT_BR: &str = include_str!("../../../locales/pt-BR.json");
const EN: &str = include_str!("../../../locales/en.json");

static INSTALLED: OnceLock<MessageCatalog> = OnceLock::new();

/// Read-only lookup table from message key to localized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    locale: String,
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Load the embedded catalog for `locale` (`pt-BR`, `pt_br` and `en` style
    /// spellings are accepted).
    pub fn for_locale(locale: &str) -> Result<Self, ConfigError> {
        let normalized = locale.trim().replace('_', "-").to_ascii_lowercase();
        let (name, source) = match normalized.as_str() {
            "pt-br" | "pt" => ("pt-BR", PT_BR),
            "en" | "en-us" | "en-gb" => ("en", EN),
            _ => return Err(ConfigError::UnsupportedLocale(locale.to_string())),
        };
        Self::from_json(name, source)
    }

    /// Parse a catalog from a flat JSON object of strings
    pub fn from_json(locale: &str, json: &str) -> Result<Self, ConfigError> {
        let messages: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| ConfigError::MalformedCatalog {
                locale: locale.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Look up a message. A missing key is a configuration defect.
    pub fn get(&self, key: &str) -> Result<&str, ConfigError> {
        self.messages
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingMessage {
                locale: self.locale.clone(),
                key: key.to_string(),
            })
    }

    /// Every key the classifier may look up
    pub fn required_keys() -> impl Iterator<Item = &'static str> {
        ErrorKind::ALL
            .into_iter()
            .filter_map(|kind| kind.cause_key())
            .chain(FIELD_MESSAGE_KEYS.iter().copied())
    }

    /// Fail on the first required key that has no message
    pub fn verify(&self) -> Result<(), ConfigError> {
        for key in Self::required_keys() {
            self.get(key)?;
        }
        Ok(())
    }

    /// Install this catalog process-wide.
    ///
    /// The first installation wins; later calls return the already installed
    /// catalog.
    pub fn install(self) -> &'static MessageCatalog {
        let requested = self.locale.clone();
        let installed = INSTALLED.get_or_init(|| self);
        if installed.locale != requested {
            warn!(
                installed = %installed.locale,
                requested = %requested,
                "Message catalog already installed; keeping existing locale"
            );
        } else {
            info!(locale = %installed.locale, messages = installed.len(), "Message catalog installed");
        }
        installed
    }

    /// The process-wide catalog, if one has been installed
    pub fn installed() -> Result<&'static MessageCatalog, ConfigError> {
        INSTALLED.get().ok_or(ConfigError::CatalogNotInstalled)
    }
}
