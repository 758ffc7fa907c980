use anyhow::Context;
use chrono::{Local, Utc};
use database::{open_connection, DbRepository};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The single line printed on success, read by the workflow that runs us.
#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
    output: String,
}

/// Generates the critical-alert PDF report.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional, the container usually provides the variables.
    dotenvy::dotenv().ok();

    // Logs go to stderr, stdout only carries the status line.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = configuration::load_settings().context("Invalid report configuration")?;
    tracing::debug!(?settings, "Resolved settings.");

    let conn = open_connection(&settings.database)
        .await
        .context("Could not open the database connection")?;
    let mut repo = DbRepository::new(conn);
    let fetched = repo.fetch_alert_rows().await;
    // Released before the result is inspected, so a failed fetch still closes it.
    repo.close().await;
    let records = fetched.context("Could not fetch alert events")?;

    let rendered = match report::local_zone() {
        Some(zone) => report::build_pdf(&records, Utc::now().with_timezone(&zone)),
        None => {
            tracing::warn!("Local time zone has no name, stamping the report with its offset.");
            report::build_pdf(&records, Local::now())
        }
    };
    let pdf = rendered.context("Could not render the alert report")?;
    let path = report::write_report(&settings.output.dir, &pdf)?;

    let status = Status {
        status: "ok",
        output: path.display().to_string(),
    };
    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}
