//! SQL DDL for the request history table.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (ids are never reused)
/// - `image_data` BLOB, the uploaded image bytes
/// - `description` TEXT, the generated caption
/// - `created_at` TEXT, UTC RFC3339 with milliseconds, assigned by the engine
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS request_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    image_data BLOB NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS ix_request_history_id ON request_history(id);
"#;
