use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to resolve report configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}
