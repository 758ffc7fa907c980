use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The root configuration structure for a report run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub output: OutputSettings,
}

/// Connection parameters for the PostgreSQL instance holding the `events` table.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    /// The database name (`dbname` in libpq terms).
    pub name: String,
    pub user: String,
    pub password: String,
}

// Settings are logged at startup, keep the password out of it.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the rendered document is written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub dir: PathBuf,
}
