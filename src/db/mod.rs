//! Database module: history persistence on a pooled SQLite store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and projections
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool construction and the `HistoryStore` gateway
//! - `session.rs`: unit-of-work sessions and the CRUD operations run inside them

pub mod models;
pub mod schema;
pub mod session;
pub mod sqlite;

pub use models::{HistoryRecord, HistorySummary, NewHistoryRecord};
pub use schema::SQLITE_INIT;
pub use session::Session;
pub use sqlite::{HistoryStore, SqlitePool, connect};
