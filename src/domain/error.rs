//! Hierarchical error types.
//!
//! `AppError` is the single error type crossing layer boundaries. Its
//! variants group failures by origin so the HTTP layer can classify them
//! without knowing which endpoint raised them.

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Input-shape failures detected while binding a request body
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One or more declared field constraints failed
    #[error("{0}")]
    Fields(#[from] validator::ValidationErrors),

    /// The body could not be bound to the request type. `path` is the
    /// dotted field path, or [`BODY_PATH`] when the body as a whole is
    /// unreadable.
    #[error("Invalid request body at {path}: {reason}")]
    Body { path: String, reason: String },
}

/// Path reported for failures that are not tied to a single field
pub const BODY_PATH: &str = "corpo";

/// Business-rule violations raised by the service layer.
///
/// Every variant except the two access variants carries the detail text
/// that is returned to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not unique: {0}")]
    NotUnique(String),

    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    #[error("Collection not empty: {0}")]
    NotEmptyCollection(String),

    #[error("More than one account client: {0}")]
    MoreThanOneAccountClient(String),

    #[error("More than one account ownership: {0}")]
    MoreThanOneAccountOwnership(String),

    #[error("No account ownership: {0}")]
    NoAccountOwnership(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

/// Discriminant of an error as seen by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FieldValidation,
    NotFound,
    NotUnique,
    EmptyCollection,
    NotEmptyCollection,
    MoreThanOneAccountClient,
    MoreThanOneAccountOwnership,
    NoAccountOwnership,
    Unauthorized,
    Forbidden,
    ServiceUnavailable,
    Internal,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 12] = [
        Self::FieldValidation,
        Self::NotFound,
        Self::NotUnique,
        Self::EmptyCollection,
        Self::NotEmptyCollection,
        Self::MoreThanOneAccountClient,
        Self::MoreThanOneAccountOwnership,
        Self::NoAccountOwnership,
        Self::Unauthorized,
        Self::Forbidden,
        Self::ServiceUnavailable,
        Self::Internal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldValidation => "field_validation",
            Self::NotFound => "not_found",
            Self::NotUnique => "not_unique",
            Self::EmptyCollection => "empty_collection",
            Self::NotEmptyCollection => "not_empty_collection",
            Self::MoreThanOneAccountClient => "more_than_one_account_client",
            Self::MoreThanOneAccountOwnership => "more_than_one_account_ownership",
            Self::NoAccountOwnership => "no_account_ownership",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Internal => "internal",
        }
    }

    /// Catalog key of the localized cause message.
    ///
    /// Access errors have no cause: their responses carry no body.
    pub fn cause_key(&self) -> Option<&'static str> {
        match self {
            Self::FieldValidation => Some("cause.field_validation"),
            Self::NotFound => Some("cause.not_found"),
            Self::NotUnique => Some("cause.not_unique"),
            Self::EmptyCollection => Some("cause.empty_collection"),
            Self::NotEmptyCollection => Some("cause.not_empty_collection"),
            Self::MoreThanOneAccountClient => Some("cause.more_than_one_account_client"),
            Self::MoreThanOneAccountOwnership => Some("cause.more_than_one_account_ownership"),
            Self::NoAccountOwnership => Some("cause.no_account_ownership"),
            Self::Unauthorized | Self::Forbidden => None,
            Self::ServiceUnavailable => Some("cause.service_unavailable"),
            Self::Internal => Some("cause.internal"),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotUnique(_) => ErrorKind::NotUnique,
            Self::EmptyCollection(_) => ErrorKind::EmptyCollection,
            Self::NotEmptyCollection(_) => ErrorKind::NotEmptyCollection,
            Self::MoreThanOneAccountClient(_) => ErrorKind::MoreThanOneAccountClient,
            Self::MoreThanOneAccountOwnership(_) => ErrorKind::MoreThanOneAccountOwnership,
            Self::NoAccountOwnership(_) => ErrorKind::NoAccountOwnership,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Forbidden => ErrorKind::Forbidden,
        }
    }

    /// Detail text attached at the point of failure
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::NotFound(msg)
            | Self::NotUnique(msg)
            | Self::EmptyCollection(msg)
            | Self::NotEmptyCollection(msg)
            | Self::MoreThanOneAccountClient(msg)
            | Self::MoreThanOneAccountOwnership(msg)
            | Self::NoAccountOwnership(msg) => Some(msg),
            Self::Unauthorized | Self::Forbidden => None,
        }
    }
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// PostgreSQL SQLSTATE for unique constraint violations
const PG_UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                Self::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(err.to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

/// Startup and configuration defects
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Malformed message catalog for locale {locale}: {reason}")]
    MalformedCatalog { locale: String, reason: String },

    #[error("Missing message '{key}' in locale {locale}")]
    MissingMessage { locale: String, key: String },

    #[error("Message catalog has not been installed")]
    CatalogNotInstalled,
}

impl AppError {
    /// Classification kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::FieldValidation,
            Self::Domain(domain) => domain.kind(),
            Self::Database(DatabaseError::Duplicate(_)) => ErrorKind::NotUnique,
            Self::Database(DatabaseError::Connection(_)) => ErrorKind::ServiceUnavailable,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
