//! Runs the alert queries against a real PostgreSQL instance.
//!
//! Ignored unless the `live-db-tests` feature is enabled (or `--ignored` is
//! passed). Either way `REPORT_TEST_DATABASE_URL` must name a disposable
//! database; a missing URL fails the test instead of skipping it. Each test
//! works inside its own schema, so the presence of `register` is controlled
//! per test.

use database::DbRepository;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Executor};

const EVENTS_DDL: &str = r#"
    CREATE TABLE events (
        integration_id integer,
        created_at timestamptz,
        raw_payload jsonb,
        triage jsonb,
        triage_level text,
        resumo text,
        is_alarm boolean,
        status text
    )
"#;

const EVENTS_ROWS: &str = r#"
    INSERT INTO events VALUES
        (1, '2025-03-14 08:00:00+00', '{"payload": {"location": "Doca 2"}}', '{"ia_categoria": "Intrusão"}', NULL, 'primeiro', true, 'processado'),
        (2, NULL, '{"location": "Portão"}', NULL, 'alto', NULL, true, 'completo'),
        (3, '2025-03-14 17:00:00+00', NULL, '{"ia_resumo": "último"}', NULL, NULL, true, 'completo'),
        (4, '2025-03-14 18:00:00+00', NULL, NULL, NULL, 'pendente', true, 'novo'),
        (5, '2025-03-14 19:00:00+00', NULL, NULL, NULL, 'não é alarme', false, 'processado')
"#;

fn database_url() -> String {
    std::env::var("REPORT_TEST_DATABASE_URL")
        .expect("REPORT_TEST_DATABASE_URL must name a disposable PostgreSQL database")
}

async fn connect_in_fresh_schema(schema: &str) -> PgConnection {
    let url = database_url();
    let mut conn = PgConnection::connect(&url).await.expect("test database reachable");
    conn.execute(format!("DROP SCHEMA IF EXISTS {schema} CASCADE").as_str()).await.unwrap();
    conn.execute(format!("CREATE SCHEMA {schema}").as_str()).await.unwrap();
    conn.execute(format!("SET search_path TO {schema}").as_str()).await.unwrap();
    conn.execute(EVENTS_DDL).await.unwrap();
    conn.execute(EVENTS_ROWS).await.unwrap();
    conn
}

async fn drop_schema(schema: &str) {
    let mut conn = PgConnection::connect(&database_url()).await.unwrap();
    conn.execute(format!("DROP SCHEMA IF EXISTS {schema} CASCADE").as_str()).await.unwrap();
}

#[tokio::test]
#[cfg_attr(not(feature = "live-db-tests"), ignore = "needs REPORT_TEST_DATABASE_URL")]
async fn missing_register_falls_back_to_events_only() {
    let schema = "alert_report_no_register";
    let conn = connect_in_fresh_schema(schema).await;

    let mut repo = DbRepository::new(conn);
    let records = repo.fetch_alert_rows().await.expect("fallback query succeeds");
    repo.close().await;
    drop_schema(schema).await;

    let summaries: Vec<_> = records.iter().map(|r| r.summary.as_str()).collect();
    assert_eq!(summaries, vec!["último", "primeiro", "-"]);
    assert_eq!(records[1].location, "Doca 2");
    assert_eq!(records[1].category, "Intrusão");
    assert_eq!(records[2].location, "Portão");
    assert_eq!(records[2].category, "alto");
    assert_eq!(records[2].event_time, None);
}

#[tokio::test]
#[cfg_attr(not(feature = "live-db-tests"), ignore = "needs REPORT_TEST_DATABASE_URL")]
async fn register_location_is_joined_when_present() {
    let schema = "alert_report_with_register";
    let mut conn = connect_in_fresh_schema(schema).await;
    conn.execute("CREATE TABLE register (integration_id text, location text)").await.unwrap();
    conn.execute("INSERT INTO register VALUES ('1', 'Galpão A')").await.unwrap();

    let mut repo = DbRepository::new(conn);
    let records = repo.fetch_alert_rows().await.expect("joined query succeeds");
    repo.close().await;
    drop_schema(schema).await;

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].integration_id.as_deref(), Some("1"));
    assert_eq!(records[1].location, "Galpão A");
}

#[tokio::test]
#[cfg_attr(not(feature = "live-db-tests"), ignore = "needs REPORT_TEST_DATABASE_URL")]
async fn fallback_leaves_the_connection_usable() {
    // The failed join aborts its transaction; unless it is rolled back the
    // next statement on the same connection would fail with 25P02.
    let schema = "alert_report_repeat_fallback";
    let conn = connect_in_fresh_schema(schema).await;

    let mut repo = DbRepository::new(conn);
    let first = repo.fetch_alert_rows().await.expect("first fetch falls back");
    let second = repo.fetch_alert_rows().await.expect("second fetch on the same connection");
    repo.close().await;
    drop_schema(schema).await;

    assert_eq!(first, second);
    assert_eq!(second.len(), 3);
}
