/// File storage service - album cover images on disk
use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Cover images live in this subdirectory of the upload root
const IMAGES_DIR: &str = "images";

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
    public_url: String,
}

impl FileStorage {
    /// `base_path` is the upload root served under `/upload`; `public_url`
    /// is the server's externally visible base URL.
    pub fn new(base_path: PathBuf, public_url: impl Into<String>) -> Self {
        Self {
            base_path,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Initialize storage directories
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(self.base_path.join(IMAGES_DIR)).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Store an uploaded cover and return its generated file name.
    ///
    /// The extension follows the validated `content_type`; the client's file
    /// name is never consulted.
    pub async fn store_cover(&self, content_type: &str, data: &[u8]) -> Result<String> {
        let extension = cover_extension(content_type);
        let filename = format!("cover-{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.cover_path(&filename);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, data).await?;
        tracing::debug!("Stored cover {} ({} bytes)", filename, data.len());
        Ok(filename)
    }

    /// Remove a stored cover; a file that is already gone is not an error
    pub async fn delete_cover(&self, filename: &str) -> Result<()> {
        let Some(path) = self.resolve(filename) else {
            tracing::warn!("Refusing to delete suspicious cover name {:?}", filename);
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Absolute URL a client uses to fetch the cover
    pub fn cover_url(&self, filename: &str) -> String {
        format!("{}/upload/{}/{}", self.public_url, IMAGES_DIR, filename)
    }

    pub fn cover_path(&self, filename: &str) -> PathBuf {
        self.base_path.join(IMAGES_DIR).join(filename)
    }

    /// Stored names are plain file names; anything with a path component is
    /// rejected (prevents directory traversal)
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let is_plain = !filename.is_empty()
            && Path::new(filename).file_name().and_then(|n| n.to_str()) == Some(filename)
            && filename != ".."
            && filename != ".";
        is_plain.then(|| self.cover_path(filename))
    }
}

/// Extension for an accepted image MIME type
fn cover_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/apng" => "apng",
        "image/avif" => "avif",
        "image/gif" => "gif",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        other if other.starts_with("image/") => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("img"),
        _ => "img",
    }
}
