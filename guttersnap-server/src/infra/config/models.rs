use std::{fmt, net::SocketAddr, path::PathBuf, time::Duration};

use url::Url;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_RECIPIENT: &str = "max@barringtonclaims.com";
pub const DEFAULT_EMAIL_USER: &str = "your-email@gmail.com";
pub const DEFAULT_EMAIL_PASS: &str = "your-app-password";

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub static_dir: PathBuf,
    pub uploads: UploadConfig,
    pub cors: CorsConfig,
    pub mail: MailConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// How long stored uploads survive after the request completes.
    pub cleanup_delay: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.is_empty()
            || self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

#[derive(Clone)]
pub struct MailConfig {
    pub user: String,
    pub pass: String,
    pub recipient: String,
    /// No relay URL means notifications are only logged.
    pub relay_url: Option<Url>,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("relay_url", &self.relay_url.as_ref().map(Url::as_str))
            .finish()
    }
}

impl MailConfig {
    pub fn uses_default_credentials(&self) -> bool {
        self.user == DEFAULT_EMAIL_USER || self.pass == DEFAULT_EMAIL_PASS
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
