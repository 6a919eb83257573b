use std::env;
use std::path::PathBuf;

use crate::export::DEFAULT_EXPORT_FILE;
use crate::logging::LoggingConfig;

pub const ARTIFACT_DIR_ENV_VAR: &str = "NUTRI_PLAN_ARTIFACT_DIR";
pub const EXPORT_PATH_ENV_VAR: &str = "NUTRI_PLAN_EXPORT_PATH";
const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Runtime settings read from the environment (and `.env`). CLI flags override them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub export_path: PathBuf,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            artifact_dir: env::var(ARTIFACT_DIR_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_DIR)),
            export_path: env::var(EXPORT_PATH_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_FILE)),
            logging: LoggingConfig::from_env(),
        }
    }

    pub fn with_artifact_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.artifact_dir = dir;
        }
        self
    }
}
