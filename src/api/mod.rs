//! HTTP surface of the contradiction checker.
//!
//! One check endpoint and one liveness endpoint, with permissive CORS so a
//! browser-based editor on any origin can call it.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::serve;
pub use types::ApiContext;
