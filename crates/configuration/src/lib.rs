use crate::env::{first_defined, EnvSource, ProcessEnv};
use crate::error::ConfigError;
use crate::settings::Settings;

// Declare the modules that make up this crate.
pub mod env;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, OutputSettings};

/// Hardcoded defaults, used when none of a key's variables are set.
const DEFAULTS: &[(&str, &str)] = &[
    ("database.host", "postgres"),
    ("database.port", "5432"),
    ("database.name", "sma_db"),
    ("database.user", "sma_user"),
    ("database.password", "senhaforte123"),
    ("output.dir", "/workspace/output"),
];

/// Environment variables for each key, report-specific name first.
const BINDINGS: &[(&str, &[&str])] = &[
    ("database.host", &["REPORT_DB_HOST", "DB_HOST"]),
    ("database.port", &["REPORT_DB_PORT", "DB_PORT"]),
    ("database.name", &["REPORT_DB_NAME", "DB_NAME"]),
    ("database.user", &["REPORT_DB_USER", "DB_USER"]),
    ("database.password", &["REPORT_DB_PASSWORD", "DB_PASSWORD"]),
    ("output.dir", &["REPORT_OUTPUT_DIR"]),
];

/// Resolves the report settings from the process environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&ProcessEnv)
}

/// Resolves the report settings from an arbitrary variable source.
///
/// Every key resolves to its first set variable or, failing that, its
/// hardcoded default. The only failure is a value that cannot be converted
/// to its field type, such as a non-numeric port.
pub fn load_settings_from<S: EnvSource + ?Sized>(source: &S) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();
    for (key, value) in DEFAULTS {
        builder = builder.set_default(*key, *value)?;
    }
    for (key, candidates) in BINDINGS {
        let resolved = first_defined(source, candidates);
        tracing::debug!(key, from_env = resolved.is_some(), "Resolved configuration key.");
        builder = builder.set_override_option(*key, resolved)?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    Ok(settings)
}
