//! `postdesk-api` — HTTP surface consuming the authorization gate.
//!
//! Business endpoints live elsewhere; the routes here show the two gate
//! call shapes (list scoping and document checks) and own the
//! error-to-status mapping.

pub mod app;
pub mod context;
pub mod error;
pub mod middleware;
