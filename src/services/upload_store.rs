//! Transient disk storage for uploaded images.
//!
//! Every upload lives on disk only for the duration of its request: the handler
//! saves it before validation runs and removes it before the response is sent.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// File extensions accepted for uploaded images, compared case-insensitively.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// An image received in a multipart request, not yet written to disk.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A per-request file persisted under the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub extension: String,
    pub mime_type: String,
}

/// Owner of the upload directory.
#[derive(Debug)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the upload directory if it does not exist yet.
    pub async fn new(base_path: &str) -> std::io::Result<Self> {
        let base_path = PathBuf::from(base_path);
        fs::create_dir_all(&base_path).await?;

        Ok(Self { base_path })
    }

    /// Write the image under a fresh collision-resistant name and return a
    /// handle to the stored file. A partially written file is removed before
    /// the error is surfaced.
    pub async fn save(&self, image: &UploadedImage) -> std::io::Result<StoredUpload> {
        let extension = file_extension(&image.filename);
        let path = generate_storage_path(&self.base_path, &extension);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(err) = fs::write(&path, &image.data).await {
            let _ = fs::remove_file(&path).await;
            return Err(err);
        }

        Ok(StoredUpload {
            path,
            extension,
            mime_type: image.content_type.clone(),
        })
    }

    /// Read the stored file back into memory.
    pub async fn read(&self, upload: &StoredUpload) -> std::io::Result<Vec<u8>> {
        fs::read(&upload.path).await
    }

    /// Remove the stored file. A file that is already gone is not an error, so
    /// release points may run after an earlier removal.
    pub async fn remove(&self, upload: &StoredUpload) -> std::io::Result<()> {
        match fs::remove_file(&upload.path).await {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Unique path for a new upload: millisecond timestamp plus a random suffix,
/// keeping the original extension.
pub fn generate_storage_path(directory: &Path, extension: &str) -> PathBuf {
    let filename = format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        extension
    );

    directory.join(filename)
}

/// Extension of the original filename including the leading dot, or empty when
/// the name carries none. Case is preserved; callers compare case-insensitively.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

pub fn is_supported_image_extension(extension: &str) -> bool {
    let extension = extension.to_ascii_lowercase();
    SUPPORTED_IMAGE_EXTENSIONS.contains(&extension.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_image(filename: &str) -> UploadedImage {
        UploadedImage {
            filename: filename.to_string(),
            content_type: "image/png".to_string(),
            data: vec![1, 2, 3, 4],
        }
    }

    async fn fresh_store() -> (UploadStore, PathBuf) {
        let dir = PathBuf::from(format!("target/test-upload-store-{}", Uuid::new_v4()));
        let store = UploadStore::new(dir.to_str().unwrap()).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn save_read_remove_round_trip() {
        let (store, dir) = fresh_store().await;

        let stored = store.save(&png_image("photo.png")).await.unwrap();
        assert!(stored.path.exists());
        assert_eq!(stored.extension, ".png");
        assert_eq!(stored.mime_type, "image/png");

        let bytes = store.read(&stored).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);

        store.remove(&stored).await.unwrap();
        assert!(!stored.path.exists());

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn remove_tolerates_already_removed_file() {
        let (store, dir) = fresh_store().await;

        let stored = store.save(&png_image("photo.png")).await.unwrap();
        store.remove(&stored).await.unwrap();
        store.remove(&stored).await.unwrap();

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn stored_files_land_under_base_path() {
        let (store, dir) = fresh_store().await;

        let stored = store.save(&png_image("photo.PNG")).await.unwrap();
        assert!(stored.path.starts_with(store.base_path()));
        assert_eq!(stored.extension, ".PNG");

        store.remove(&stored).await.unwrap();
        let _ = fs::remove_dir_all(&dir).await;
    }

    #[test]
    fn extension_includes_leading_dot() {
        assert_eq!(file_extension("photo.png"), ".png");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
    }

    #[test]
    fn extension_preserves_case() {
        assert_eq!(file_extension("PHOTO.JPG"), ".JPG");
    }

    #[test]
    fn extension_empty_when_name_has_none() {
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(""), "");
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_image_extension(".jpg"));
        assert!(is_supported_image_extension(".JPEG"));
        assert!(is_supported_image_extension(".Png"));
        assert!(!is_supported_image_extension(".pdf"));
        assert!(!is_supported_image_extension(".gif"));
        assert!(!is_supported_image_extension(""));
    }

    #[test]
    fn storage_paths_are_unique_per_call() {
        let dir = Path::new("uploads");
        let first = generate_storage_path(dir, ".png");
        let second = generate_storage_path(dir, ".png");

        assert_ne!(first, second);
        assert!(first.to_str().unwrap().ends_with(".png"));
        assert!(first.starts_with(dir));
    }
}
