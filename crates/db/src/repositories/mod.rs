//! Repository layer: one struct per table, each exposing async query
//! functions that take a `&PgPool`.

pub mod dialplan_repo;

pub use dialplan_repo::DialplanRepo;
