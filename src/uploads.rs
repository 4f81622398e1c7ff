//! Listing images on local disk, served back under [`URL_PREFIX`].

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use uuid::Uuid;

use crate::{db::Image, AppError, AppResult};

pub const URL_PREFIX: &str = "/uploads";

/// A file taken from a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    /// The extension to store the file under, if it's an image type we take.
    pub fn extension(&self) -> Option<&'static str> {
        let by_type = match self.content_type.as_deref() {
            Some("image/png") => Some("png"),
            Some("image/jpeg") | Some("image/jpg") => Some("jpg"),
            _ => None,
        };
        by_type.or_else(|| {
            let ext = Path::new(&self.file_name).extension()?.to_str()?.to_ascii_lowercase();
            match ext.as_str() {
                "png" => Some("png"),
                "jpg" | "jpeg" => Some("jpg"),
                _ => None,
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(ImageStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn save(&self, upload: &Upload) -> AppResult<Image> {
        let ext = upload
            .extension()
            .ok_or_else(|| AppError::Validation("Only png, jpg and jpeg images are allowed".into()))?;
        let filename = format!("{}.{ext}", Uuid::now_v7().simple());

        tokio::fs::write(self.dir.join(&filename), &upload.bytes).await?;
        tracing::debug!("stored {} ({} bytes) as {filename}", upload.file_name, upload.bytes.len());

        Ok(Image {
            url: format!("{URL_PREFIX}/{filename}"),
            filename,
        })
    }

    /// Best effort; a file left behind only costs disk space.
    pub async fn remove(&self, image: &Image) {
        let Some(name) = Path::new(&image.filename).file_name() else {
            return;
        };
        if let Err(err) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!("could not remove image {}: {err}", image.filename);
        }
    }
}
