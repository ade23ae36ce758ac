//! Domain types and pure dial-plan logic shared by the persistence, notifier
//! and HTTP crates. Nothing in here performs I/O.

pub mod dialplan;
pub mod error;
pub mod types;
