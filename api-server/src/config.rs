//! Configuration module

use std::env;
use std::path::PathBuf;

use screening_core::constants::DEFAULT_ARTIFACT_DIR;
use screening_core::ArtifactSettings;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the model artifacts
    pub model_dir: PathBuf,

    /// Extra shared config file, searched before the defaults
    pub shared_config_path: Option<PathBuf>,

    /// Exact origins allowed by CORS
    pub cors_allowed_origins: Vec<String>,

    /// https origins whose host ends with this suffix are also allowed
    pub cors_allowed_origin_suffix: Option<String>,

    /// Expose POST /admin/reload
    pub allow_reload: bool,

    /// Log output format (text, json)
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_DIR)),

            shared_config_path: env::var("SHARED_CONFIG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            cors_allowed_origins: parse_list(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),

            cors_allowed_origin_suffix: non_empty(
                &env::var("CORS_ALLOWED_ORIGIN_SUFFIX").unwrap_or_else(|_| ".vercel.app".to_string()),
            ),

            allow_reload: env::var("ALLOW_RELOAD")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "text".to_string()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Artifact locations for the model service
    pub fn artifact_settings(&self) -> ArtifactSettings {
        ArtifactSettings::new(&self.model_dir).with_config_override(self.shared_config_path.clone())
    }

    /// Whether a request `Origin` may call the API
    pub fn origin_allowed(&self, origin: &str) -> bool {
        if self.cors_allowed_origins.iter().any(|o| o == origin) {
            return true;
        }
        match (&self.cors_allowed_origin_suffix, origin.strip_prefix("https://")) {
            (Some(suffix), Some(host)) => host.len() > suffix.len() && host.ends_with(suffix.as_str()),
            _ => false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            model_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            shared_config_path: None,
            cors_allowed_origins: parse_list(DEFAULT_CORS_ORIGINS),
            cors_allowed_origin_suffix: Some(".vercel.app".to_string()),
            allow_reload: false,
            log_format: "text".to_string(),
            environment: "development".to_string(),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
