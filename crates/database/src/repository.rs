use crate::connection::close_connection;
use crate::error::{classify, DbError, QueryFailure};
use core_types::{AlertRecord, AlertSource};
use sqlx::postgres::PgConnection;
use sqlx::Connection;

/// Alarm rows with the device location looked up in `register`.
const ALERTS_WITH_REGISTER: &str = r#"
    SELECT
        e.integration_id::text AS integration_id,
        e.created_at::timestamptz AS created_at,
        e.raw_payload::jsonb AS raw_payload,
        e.triage::jsonb AS triage,
        e.triage_level::text AS triage_level,
        e.resumo::text AS resumo,
        r.location::text AS registered_location
    FROM events e
    LEFT JOIN register r ON r.integration_id::text = e.integration_id::text
    WHERE e.is_alarm IS TRUE
      AND e.status IN ('processado', 'completo')
    ORDER BY e.created_at DESC NULLS LAST
"#;

/// Same rows from `events` alone, for deployments without `register`.
const ALERTS_EVENTS_ONLY: &str = r#"
    SELECT
        integration_id::text AS integration_id,
        created_at::timestamptz AS created_at,
        raw_payload::jsonb AS raw_payload,
        triage::jsonb AS triage,
        triage_level::text AS triage_level,
        resumo::text AS resumo,
        NULL::text AS registered_location
    FROM events
    WHERE is_alarm IS TRUE
      AND status IN ('processado', 'completo')
    ORDER BY created_at DESC NULLS LAST
"#;

/// The `DbRepository` owns the report's single database connection and
/// encapsulates the alert queries.
#[derive(Debug)]
pub struct DbRepository {
    conn: PgConnection,
}

impl DbRepository {
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }

    /// Fetches the processed alarm events, newest first.
    ///
    /// Tries the query joined against `register` first. If that table is
    /// missing, the transaction is rolled back and the events-only query is
    /// run instead. Any other failure is returned as is.
    pub async fn fetch_alert_rows(&mut self) -> Result<Vec<AlertRecord>, DbError> {
        let mut tx = self.conn.begin().await?;
        let sources = match sqlx::query_as::<_, AlertSource>(ALERTS_WITH_REGISTER)
            .fetch_all(&mut *tx)
            .await
        {
            Ok(sources) => {
                tx.commit().await?;
                sources
            }
            Err(e) if classify(&e) == QueryFailure::UndefinedRelation => {
                tracing::warn!(error = %e, "Table `register` is unavailable, falling back to `events` only.");
                tx.rollback().await?;

                let mut tx = self.conn.begin().await?;
                let sources = sqlx::query_as::<_, AlertSource>(ALERTS_EVENTS_ONLY)
                    .fetch_all(&mut *tx)
                    .await?;
                tx.commit().await?;
                sources
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(count = sources.len(), "Fetched alert rows.");
        Ok(sources.into_iter().map(AlertRecord::from).collect())
    }

    /// Releases the underlying connection.
    pub async fn close(self) {
        close_connection(self.conn).await;
    }
}
