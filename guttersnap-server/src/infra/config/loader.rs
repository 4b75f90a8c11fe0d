use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use url::Url;

use super::{
    models::{
        Config, ConfigMetadata, CorsConfig, DEFAULT_CLEANUP_DELAY,
        DEFAULT_EMAIL_PASS, DEFAULT_EMAIL_USER, DEFAULT_HOST, DEFAULT_PORT,
        DEFAULT_RECIPIENT, DEFAULT_STATIC_DIR, DEFAULT_UPLOAD_DIR, MailConfig,
        ServerConfig, UploadConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigWarnings},
};

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["guttersnap.toml", "config/guttersnap.toml"];

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    /// Read this dotenv file instead of `./.env`. A missing file is skipped.
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env`, the optional TOML file and the process environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Same as [`ConfigLoader::load`] with an already gathered environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env_config.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((None, None)),
            },
        };

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Environment wins over the file, the file wins over defaults.
fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if config_path.is_none() {
        warnings.push_with_hint(
            "No guttersnap.toml detected; using environment variables and defaults",
            "Create guttersnap.toml or set GUTTERSNAP_CONFIG",
        );
    }

    let FileConfig {
        server: file_server,
        uploads: file_uploads,
        cors: file_cors,
        mail: file_mail,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let static_dir = env
        .static_dir
        .or(file_server.static_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

    let cleanup_delay = match env
        .upload_cleanup_delay
        .or(file_uploads.cleanup_delay)
    {
        Some(raw) => parse_delay(&raw)?,
        None => DEFAULT_CLEANUP_DELAY,
    };
    let uploads = UploadConfig {
        dir: env
            .upload_dir
            .or(file_uploads.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
        cleanup_delay,
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let relay_url = match env.mail_relay_url.or(file_mail.relay_url) {
        Some(raw) => Some(Url::parse(raw.trim()).map_err(|source| {
            ConfigLoadError::InvalidRelayUrl { url: raw, source }
        })?),
        None => None,
    };
    let mail = MailConfig {
        user: env
            .email_user
            .or(file_mail.user)
            .unwrap_or_else(|| DEFAULT_EMAIL_USER.to_string()),
        // The password is never read from the config file.
        pass: env
            .email_pass
            .unwrap_or_else(|| DEFAULT_EMAIL_PASS.to_string()),
        recipient: env
            .mail_recipient
            .or(file_mail.recipient)
            .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
        relay_url,
    };

    let config = Config {
        server,
        static_dir,
        uploads,
        cors,
        mail,
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded: false,
        },
    };

    warnings.extend(validation::check_delivery(&config));
    Ok((config, warnings))
}

fn parse_delay(raw: &str) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            key: "UPLOAD_CLEANUP_DELAY",
            value: raw.to_string(),
            source,
        }
    })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },

    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid duration for {key}: '{value}'")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("invalid mail relay URL '{url}'")]
    InvalidRelayUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
