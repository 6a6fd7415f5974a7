//! Local filesystem implementation of `MediaStore`.
//!
//! Content-addressable: files are stored under their SHA-256 hash with
//! two-level directory sharding, which deduplicates repeated uploads of the
//! same image. A WebP thumbnail is written next to each original.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageReader;
use mime::Mime;
use sha2::{Digest, Sha256};
use tokio::fs;

use domains::{AppError, MediaStore, Result, ValidationErrors};

const THUMB_EDGE: u32 = 400;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g. "./data/media").
    root: PathBuf,
    /// Public URL prefix (e.g. "/media").
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self { root, url_prefix }
    }

    /// "ab/cd/abcdef..." under the media root.
    fn sharded_path(&self, media_id: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.push(&media_id[0..2]);
        path.push(&media_id[2..4]);
        path.push(media_id);
        path
    }

    fn sharded_rel(&self, media_id: &str, name: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.url_prefix,
            &media_id[0..2],
            &media_id[2..4],
            name
        )
    }

    fn write_thumbnail(&self, original: &Path, data: &[u8], media_id: &str) -> Result<()> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| AppError::Internal(format!("image probe failed: {e}")))?
            .decode()
            .map_err(|_| {
                AppError::Validation(ValidationErrors::single(
                    "image",
                    "could not decode the uploaded image",
                ))
            })?;

        let thumb = img.thumbnail(THUMB_EDGE, THUMB_EDGE);
        let mut thumb_path = original
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        thumb_path.push(format!("thumb_{media_id}.webp"));
        thumb
            .save_with_format(&thumb_path, image::ImageFormat::WebP)
            .map_err(|e| AppError::Internal(format!("thumbnail write failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    /// Saves an upload under its SHA-256 hash. Re-uploading identical bytes
    /// is a no-op that returns the same media id.
    async fn save(&self, data: Bytes, content_type: &Mime) -> Result<String> {
        if content_type.type_() != mime::IMAGE {
            return Err(AppError::Validation(ValidationErrors::single(
                "image",
                "only image uploads are accepted",
            )));
        }
        if data.is_empty() {
            return Err(AppError::Validation(ValidationErrors::single(
                "image",
                "the uploaded file is empty",
            )));
        }

        let media_id = hex::encode(Sha256::digest(&data));
        let target = self.sharded_path(&media_id);
        let parent = target
            .parent()
            .ok_or_else(|| AppError::Internal("media root has no parent".into()))?;
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(format!("media dir create failed: {e}")))?;

        if fs::try_exists(&target)
            .await
            .map_err(|e| AppError::Internal(format!("media stat failed: {e}")))?
        {
            return Ok(media_id);
        }

        // Decode before writing so a broken upload leaves nothing behind.
        self.write_thumbnail(&target, &data, &media_id)?;
        fs::write(&target, &data)
            .await
            .map_err(|e| AppError::Internal(format!("media write failed: {e}")))?;

        tracing::debug!(media_id, size = data.len(), "stored upload");
        Ok(media_id)
    }

    fn url(&self, media_id: &str) -> String {
        self.sharded_rel(media_id, media_id)
    }

    fn thumbnail_url(&self, media_id: &str) -> String {
        self.sharded_rel(media_id, &format!("thumb_{media_id}.webp"))
    }
}
