#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use guttersnap_model::ShotId;
use guttersnap_server::{
    AppState,
    infra::config::{
        Config, ConfigMetadata, CorsConfig, MailConfig, ServerConfig,
        UploadConfig,
    },
    relay::{MailRelay, RelayError, RelayMessage},
    routes::create_router,
    uploads::UploadStore,
};
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<!doctype html><title>GutterSnap</title>";

/// What the relay saw for one message, captured while the uploads still
/// existed on disk.
#[derive(Debug, Clone)]
pub struct RelayedMessage {
    pub message: RelayMessage,
    pub attachment_sizes: Vec<Option<u64>>,
}

#[derive(Debug, Default)]
pub struct RecordingRelay {
    fail: bool,
    pub sent: Mutex<Vec<RelayedMessage>>,
}

impl RecordingRelay {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<RelayedMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailRelay for RecordingRelay {
    async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
        let attachment_sizes = message
            .attachments
            .iter()
            .map(|attachment| {
                std::fs::metadata(&attachment.path).ok().map(|meta| meta.len())
            })
            .collect();
        self.sent.lock().unwrap().push(RelayedMessage {
            message: message.clone(),
            attachment_sizes,
        });

        if self.fail {
            Err(RelayError::Rejected { status: 502 })
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub relay: Arc<RecordingRelay>,
    pub upload_dir: PathBuf,
    _tempdir: TempDir,
}

pub fn test_config(root: &Path, cleanup_delay: Duration) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        static_dir: root.join("public"),
        uploads: UploadConfig {
            dir: root.join("uploads"),
            cleanup_delay,
        },
        cors: CorsConfig::default(),
        mail: MailConfig {
            user: "bot@example.com".into(),
            pass: "secret".into(),
            recipient: "max@barringtonclaims.com".into(),
            relay_url: None,
        },
        metadata: ConfigMetadata::default(),
    }
}

pub async fn spawn_app(relay: Arc<RecordingRelay>) -> Result<TestApp> {
    build_app(relay, Duration::from_millis(50), false).await
}

pub async fn spawn_http_app(relay: Arc<RecordingRelay>) -> Result<TestApp> {
    build_app(relay, Duration::from_millis(50), true).await
}

async fn build_app(
    relay: Arc<RecordingRelay>,
    cleanup_delay: Duration,
    http_transport: bool,
) -> Result<TestApp> {
    let tempdir =
        tempfile::tempdir().context("failed to create temporary directory")?;
    let config = test_config(tempdir.path(), cleanup_delay);

    std::fs::create_dir_all(&config.static_dir)
        .context("failed to create static directory")?;
    std::fs::write(config.static_dir.join("index.html"), INDEX_HTML)
        .context("failed to write index.html")?;

    let uploads =
        UploadStore::open(&config.uploads.dir, config.uploads.cleanup_delay)
            .await
            .context("failed to open upload store")?;
    let upload_dir = config.uploads.dir.clone();

    let state = AppState::new(
        config,
        Arc::clone(&relay) as Arc<dyn MailRelay>,
        uploads,
    );
    let router = create_router(state);

    let server = if http_transport {
        TestServer::builder().http_transport().build(router)
    } else {
        TestServer::builder().build(router)
    }
    .map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        relay,
        upload_dir,
        _tempdir: tempdir,
    })
}

pub fn jpeg_part(shot: ShotId, size: usize) -> Part {
    Part::bytes(vec![0xAB; size])
        .file_name(format!("{shot} photo.jpg"))
        .mime_type("image/jpeg")
}

pub fn contact_only() -> MultipartForm {
    MultipartForm::new()
        .add_text("email", "a@b.com")
        .add_text("phone", "(555) 123-4567")
        .add_text("address", "1 Main St")
}

/// Contact fields plus every photo except `skip`.
pub fn form_without(skip: Option<ShotId>) -> MultipartForm {
    ShotId::ALL
        .into_iter()
        .filter(|shot| Some(*shot) != skip)
        .fold(contact_only(), |form, shot| {
            form.add_part(shot.as_str(), jpeg_part(shot, 64))
        })
}

pub fn complete_form() -> MultipartForm {
    form_without(None)
}

pub fn upload_dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
