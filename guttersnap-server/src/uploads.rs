//! Short-lived on-disk copies of accepted photos.
//!
//! Files live only long enough for the relay to attach them; every stored
//! file is scheduled for deletion once its request completes.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Utc;
use guttersnap_model::{ImageFile, ShotId};
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
    task::JoinHandle,
};
use tracing::{debug, warn};

/// One accepted photo written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub shot: ShotId,
    pub stored_name: String,
    pub path: PathBuf,
    pub mime: String,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    cleanup_delay: Duration,
}

impl UploadStore {
    /// Create the directory if needed.
    pub async fn open(
        dir: impl Into<PathBuf>,
        cleanup_delay: Duration,
    ) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir, cleanup_delay })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cleanup_delay(&self) -> Duration {
        self.cleanup_delay
    }

    /// Write `file` under `<unix-millis>-<sanitized name>`. Never overwrites
    /// an existing upload.
    pub async fn store(
        &self,
        shot: ShotId,
        file: &ImageFile,
    ) -> io::Result<StoredUpload> {
        let millis = Utc::now().timestamp_millis();
        let base = sanitize_file_name(&file.name, shot);

        let mut attempt = 0u32;
        loop {
            let stored_name = if attempt == 0 {
                format!("{millis}-{base}")
            } else {
                format!("{millis}-{attempt}-{base}")
            };
            let path = self.dir.join(&stored_name);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(handle) => {
                    write_fresh(handle, &path, &file.data).await?;
                    debug!(
                        shot = %shot,
                        file = %stored_name,
                        size = file.size(),
                        "upload stored"
                    );
                    return Ok(StoredUpload {
                        shot,
                        stored_name,
                        path,
                        mime: file.mime.clone(),
                    });
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Delete `uploads` after the configured delay. Failures are logged.
    pub fn schedule_cleanup(&self, uploads: Vec<StoredUpload>) -> JoinHandle<()> {
        let delay = self.cleanup_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for upload in uploads {
                match fs::remove_file(&upload.path).await {
                    Ok(()) => {
                        debug!(file = %upload.stored_name, "upload removed")
                    }
                    Err(err) => warn!(
                        file = %upload.path.display(),
                        error = %err,
                        "failed to delete upload"
                    ),
                }
            }
        })
    }
}

/// Fill a just-created file. On failure the partial file is removed so it
/// cannot outlive the request.
async fn write_fresh<W>(mut handle: W, path: &Path, data: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        handle.write_all(data).await?;
        handle.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(handle);
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!(
                file = %path.display(),
                error = %remove_err,
                "failed to remove partial upload"
            );
        }
        return Err(err);
    }
    Ok(())
}

/// Final path component of `original` with whitespace runs collapsed to `_`.
pub fn sanitize_file_name(original: &str, shot: ShotId) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut sanitized = String::with_capacity(last.len());
    let mut in_whitespace = false;
    for ch in last.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else {
            sanitized.push(ch);
            in_whitespace = false;
        }
    }

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        format!("{shot}.jpg")
    } else {
        sanitized
    }
}
