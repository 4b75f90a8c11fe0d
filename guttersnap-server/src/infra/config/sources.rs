use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub uploads: FileUploadConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub mail: FileMailConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUploadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Humantime string, e.g. `"5s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_delay: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileMailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub upload_cleanup_delay: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub email_user: Option<String>,
    pub email_pass: Option<String>,
    pub mail_recipient: Option<String>,
    pub mail_relay_url: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();

        env_config.config_path =
            std::env::var("GUTTERSNAP_CONFIG").ok().map(PathBuf::from);
        env_config.server_host = non_empty_var("SERVER_HOST");
        env_config.server_port = ["SERVER_PORT", "PORT"]
            .into_iter()
            .find_map(|name| std::env::var(name).ok())
            .and_then(|s| s.trim().parse().ok());
        env_config.static_dir =
            non_empty_var("STATIC_DIR").map(PathBuf::from);
        env_config.upload_dir =
            non_empty_var("UPLOAD_DIR").map(PathBuf::from);
        env_config.upload_cleanup_delay = non_empty_var("UPLOAD_CLEANUP_DELAY");

        env_config.cors_allowed_origins = parse_csv_var("CORS_ALLOWED_ORIGINS");

        env_config.email_user = non_empty_var("EMAIL_USER");
        env_config.email_pass = non_empty_var("EMAIL_PASS");
        env_config.mail_recipient = non_empty_var("MAIL_RECIPIENT");
        env_config.mail_relay_url = non_empty_var("MAIL_RELAY_URL");

        env_config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_csv_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| {
        raw.split(',')
            .filter_map(|part| {
                let trimmed = part.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect()
    })
}
