//! The API layer, containing web handlers and routing.

pub mod auth;
pub mod banco;
pub mod classifier;
pub mod cliente;
pub mod conta;
pub mod extract;
pub mod handlers;
pub mod router;

pub use auth::{TOKEN_HEADER, require_admin, require_token};
pub use classifier::{Classification, classify, error_response};
pub use extract::JsonBody;
pub use handlers::ApiDoc;
pub use router::{DEFAULT_REQUEST_TIMEOUT, create_router, create_router_with_timeout};
