use std::env;

use super::env::{AppConfig, ConfigError, DirectoryConfig, LoggingConfig, ModelConfig};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let directories = DirectoryConfig {
            logs_dir: var_or("LOGS_DIR", "logs"),
            data_dir: var_or("DATA_DIR", "data"),
            reports_dirname: var_or("REPORTS_DIRNAME", "reports"),
            history_filename: var_or("HISTORY_FILENAME", "history.json"),
        };

        let model = ModelConfig {
            artifact_filename: var_or("MODEL_FILENAME", "spam_model.json"),
        };

        let logging = LoggingConfig {
            level: var_or("LOG_LEVEL", "info"),
        };

        let default_user_id = var_or("DEFAULT_USER_ID", "demo");
        if default_user_id.trim().is_empty() {
            return Err(ConfigError::Invalid("DEFAULT_USER_ID"));
        }

        Ok(Self {
            directories,
            model,
            logging,
            default_user_id,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
