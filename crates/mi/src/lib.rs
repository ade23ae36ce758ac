//! Client for the OpenSIPS management interface (MI).
//!
//! The switch exposes MI as JSON-RPC 2.0 over HTTP at `/mi`. This crate
//! only needs fire-and-report semantics: send a command once, and turn
//! every outcome (success, transport failure, bad status, unparseable body)
//! into an [`MiResponse`] envelope. Callers never handle a separate error
//! path.

pub mod client;
pub mod envelope;

use async_trait::async_trait;

pub use client::MiClient;
pub use envelope::{MiError, MiRequest, MiResponse};

/// Something that can run an MI command against the switch.
///
/// Implementations must not fail: every failure mode is reported through
/// [`MiResponse::error`].
#[async_trait]
pub trait MiExecutor: Send + Sync {
    async fn execute(&self, command: &str) -> MiResponse;
}
