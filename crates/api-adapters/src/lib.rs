//! Web adapter: routing, handlers, and server-rendered templates.
//!
//! The `web-axum` feature pulls in the HTTP stack; the askama template
//! structs compile unconditionally.

pub mod templates;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use router::router;
#[cfg(feature = "web-axum")]
pub use state::{AppState, SiteConfig};
