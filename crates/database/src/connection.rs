use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

/// Opens a single connection to the PostgreSQL database.
///
/// The report issues at most two queries, so there is no pool. Network and
/// authentication failures are returned as `DbError::ConnectionError`.
pub async fn open_connection(settings: &DatabaseSettings) -> Result<PgConnection, DbError> {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.name)
        .username(&settings.user)
        .password(&settings.password)
        .application_name("alert-report");

    let conn = PgConnection::connect_with(&options)
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!(host = %settings.host, port = settings.port, database = %settings.name, "Connected to the database.");
    Ok(conn)
}

/// Terminates the session. A failed goodbye is logged and otherwise ignored,
/// the socket is dropped either way.
pub async fn close_connection(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "Failed to close the database connection cleanly.");
    }
}
