//! Response-shaping middleware applied by [`create_router`](crate::server::create_router).
//!
//! Every response gets the security headers. The CORS layer is added only
//! when the service is configured with allowed origins.

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;
