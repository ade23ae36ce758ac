//! Dial-plan management API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! synchronizer) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod sync;
