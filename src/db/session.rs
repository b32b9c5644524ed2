use crate::db::models::{HistoryRecord, HistorySummary, NewHistoryRecord};
use crate::error::PicturaError;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, error, info, warn};

/// One unit of work bound to one pooled connection.
///
/// A `Session` is only handed out by [`HistoryStore::with_commit`] and
/// [`HistoryStore::read_only`]; the scope decides whether it ends in a commit
/// or a rollback. Dropping a session without finishing it (e.g. the request
/// future was cancelled) queues a rollback and returns the connection to the
/// pool.
///
/// [`HistoryStore::with_commit`]: crate::db::HistoryStore::with_commit
/// [`HistoryStore::read_only`]: crate::db::HistoryStore::read_only
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl Session {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    pub(crate) async fn commit(self) -> Result<(), PicturaError> {
        self.tx.commit().await?;
        Ok(())
    }

    pub(crate) async fn rollback(self) -> Result<(), PicturaError> {
        self.tx.rollback().await?;
        Ok(())
    }

    /// Insert a new record and return it as stored, with `id` and `created_at`.
    pub async fn create(&mut self, input: NewHistoryRecord) -> Result<HistoryRecord, PicturaError> {
        info!(
            image_bytes = input.image_data.len(),
            "creating request history record"
        );
        let record = sqlx::query_as::<_, HistoryRecord>(
            r#"INSERT INTO request_history (image_data, description)
               VALUES (?, ?)
               RETURNING id, image_data, description, created_at"#,
        )
        .bind(input.image_data)
        .bind(input.description)
        .fetch_one(&mut *self.tx)
        .await
        .inspect_err(|e| error!(error = %e, "failed to create request history record"))?;

        info!(id = record.id, "request history record created");
        Ok(record)
    }

    /// Fetch one record. Absence is `Ok(None)`, never an error.
    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<HistoryRecord>, PicturaError> {
        info!(id, "fetching request history record");
        let record = sqlx::query_as::<_, HistoryRecord>(
            r#"SELECT id, image_data, description, created_at
               FROM request_history WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .inspect_err(|e| error!(id, error = %e, "failed to fetch request history record"))?;

        match &record {
            Some(r) => debug!(id = r.id, "request history record found"),
            None => warn!(id, "request history record not found"),
        }
        Ok(record)
    }

    /// All records projected to `id`, `description` and `created_at`, in id order.
    pub async fn list_all(&mut self) -> Result<Vec<HistorySummary>, PicturaError> {
        info!("listing request history records");
        let rows = sqlx::query_as::<_, HistorySummary>(
            r#"SELECT id, description, created_at
               FROM request_history ORDER BY id"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .inspect_err(|e| error!(error = %e, "failed to list request history records"))?;

        debug!(count = rows.len(), "request history records listed");
        Ok(rows)
    }
}
