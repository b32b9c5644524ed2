use crate::config::DatabaseConfig;
use crate::db::schema::SQLITE_INIT;
use crate::db::session::Session;
use crate::error::PicturaError;
use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type SqlitePool = Pool<Sqlite>;

/// Open the connection pool described by `cfg`.
///
/// `pool_size` connections are kept open; up to `max_overflow` more are
/// opened under load and closed again once idle. When every connection is
/// checked out, acquisition waits up to `acquire_timeout_secs`.
pub async fn connect(cfg: &DatabaseConfig) -> Result<SqlitePool, PicturaError> {
    let options = SqliteConnectOptions::from_str(&cfg.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let max_connections = cfg.max_connections();
    let pool = SqlitePoolOptions::new()
        .min_connections(cfg.pool_size.min(max_connections))
        .max_connections(max_connections)
        .acquire_timeout(cfg.acquire_timeout())
        .idle_timeout(Duration::from_secs(300))
        .connect_with(options)
        .await?;

    info!(
        url = %cfg.url,
        pool_size = cfg.pool_size,
        max_overflow = cfg.max_overflow,
        "database pool ready"
    );
    Ok(pool)
}

/// Gateway to the request history table.
///
/// Every operation runs inside a [`Session`] obtained from one of the two
/// scopes below; both guarantee the session's connection goes back to the pool
/// exactly once, whether the work succeeds, fails or is cancelled.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Connections currently checked out of the pool.
    pub fn in_use(&self) -> usize {
        (self.pool.size() as usize).saturating_sub(self.pool.num_idle())
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), PicturaError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Session, PicturaError> {
        let tx = self.pool.begin().await?;
        Ok(Session::new(tx))
    }

    /// Committing scope: commit when `work` succeeds, roll back when it fails.
    ///
    /// A failed commit or rollback still releases the connection; the
    /// transaction is consumed either way.
    pub async fn with_commit<T, F>(&self, work: F) -> Result<T, PicturaError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, PicturaError>>,
    {
        let mut session = self.begin().await?;
        debug!("session opened (commit on success)");

        let result = work(&mut session).await;
        let outcome = match result {
            Ok(value) => match session.commit().await {
                Ok(()) => {
                    debug!("session committed");
                    Ok(value)
                }
                Err(e) => {
                    warn!(error = %e, "session commit failed");
                    Err(e)
                }
            },
            Err(e) => {
                warn!(error = %e, "unit of work failed; rolling back");
                if let Err(rb) = session.rollback().await {
                    warn!(error = %rb, "session rollback failed");
                }
                Err(e)
            }
        };
        debug!("session closed");
        outcome
    }

    /// Read-only scope: never commits, so any accidental write is discarded.
    pub async fn read_only<T, F>(&self, work: F) -> Result<T, PicturaError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, PicturaError>>,
    {
        let mut session = self.begin().await?;
        debug!("session opened (read-only)");

        let result = work(&mut session).await;
        if let Err(e) = &result {
            warn!(error = %e, "read-only unit of work failed; rolling back");
        }
        if let Err(rb) = session.rollback().await {
            warn!(error = %rb, "session rollback failed");
        }
        debug!("session closed");
        result
    }
}
