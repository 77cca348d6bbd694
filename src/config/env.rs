use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directories: DirectoryConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    /// Caller id used when the identity provider yields none.
    pub default_user_id: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub reports_dirname: String,
    pub history_filename: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub artifact_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
