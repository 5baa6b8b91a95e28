//! API Module
//!
//! HTTP handlers and routing for the KV server REST API: the full store
//! facade (scalar, TTL, counter, hash, batch, lock and key enumeration
//! operations) plus `/stats` and `/health`.
//!
//! The `enabled` configuration gate is enforced here: when the store surface
//! is disabled, KV routes answer 503 while `/stats` and `/health` stay
//! reachable and the engine keeps serving in-process callers.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
