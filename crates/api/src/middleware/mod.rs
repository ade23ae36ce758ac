//! Authentication extractors.
//!
//! - [`api_key::RequireApiKey`] -- Rejects requests without the shared API key.

pub mod api_key;
