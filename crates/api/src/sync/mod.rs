//! Dial-plan synchronization service.
//!
//! [`DialplanSync`] ties the pure planning rules in `dialplan_core` to the
//! `dialplan` table and the switch's MI reload, providing a single entry
//! point for every state-changing dial-plan operation.

pub mod dialplan_sync;

pub use dialplan_sync::{DeleteOutcome, DialplanSync, InsertOutcome};
