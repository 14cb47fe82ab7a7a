//! corkboard is a small data service for a community bulletin board:
//! members, their contact addresses, the posts they pin and the keyword
//! vocabulary the posts are tagged with, persisted through SeaORM on
//! SQLite (in-memory by default, file-backed via `DATABASE_URL`).
//!
//! The crate splits into:
//! - [`entity`]: the mapped tables, their relations and lifecycle hooks,
//! - [`schema`]: connection helpers and idempotent DDL setup,
//! - [`mutation`] / [`query`]: the write and read services,
//! - [`error`]: the crate error type with typed lookup failures.

pub mod entity;
pub mod error;
pub mod mutation;
pub mod query;
pub mod schema;

pub use error::{Error, Result};
pub use mutation::Mutation;
pub use query::Query;
pub use schema::{connect, connect_from_env, create_all, DEFAULT_DB_URL};
