//! Local disk storage for report photos
//!
//! Photos are written under a single upload directory with a generated name;
//! the submitted filename only contributes its extension. The path handed
//! back is an opaque reference that reports store as `photo_path`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::UploadConfig;

/// Extensions accepted for report photos, compared case-insensitively
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Error)]
pub enum PhotoStorageError {
    #[error("No photo selected")]
    MissingFilename,

    #[error("Photo is empty")]
    Empty,

    #[error("Invalid file type '{0}'. Please upload a png, jpg, jpeg or gif image")]
    UnsupportedExtension(String),

    #[error("Photo too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Refusing to touch '{0}': outside the upload directory")]
    OutsideRoot(String),

    #[error("Photo storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque reference to a stored photo
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The only file-system collaborator of the report flow
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Persist the photo bytes and return where they landed
    async fn save(
        &self,
        bytes: Vec<u8>,
        proposed_name: &str,
    ) -> Result<StoragePath, PhotoStorageError>;

    /// Delete a previously saved photo
    async fn remove(&self, path: &StoragePath) -> Result<(), PhotoStorageError>;
}

/// Lowercased extension of `filename` if it is on the allow-list
pub fn allowed_extension(filename: &str) -> Result<String, PhotoStorageError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or_else(|| PhotoStorageError::UnsupportedExtension(filename.to_string()))?;

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(PhotoStorageError::UnsupportedExtension(extension))
    }
}

/// Write `bytes` through `writer`; on failure the file at `path` is deleted
async fn write_or_discard<W>(
    mut writer: W,
    path: &Path,
    bytes: &[u8],
) -> Result<(), PhotoStorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(bytes).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };
    drop(writer);

    if let Err(e) = written {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!(
                "Failed to remove partial photo {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e.into());
    }
    Ok(())
}

/// [`PhotoStorage`] backed by a directory on local disk
pub struct LocalPhotoStorage {
    root: PathBuf,
    max_size: usize,
}

impl LocalPhotoStorage {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root: config.upload_dir.clone(),
            max_size: config.max_photo_size,
        }
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir_exists(&self) -> Result<(), PhotoStorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!("Upload directory ready: {}", self.root.display());
        Ok(())
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn save(
        &self,
        bytes: Vec<u8>,
        proposed_name: &str,
    ) -> Result<StoragePath, PhotoStorageError> {
        let proposed_name = proposed_name.trim();
        if proposed_name.is_empty() {
            return Err(PhotoStorageError::MissingFilename);
        }
        let extension = allowed_extension(proposed_name)?;

        if bytes.is_empty() {
            return Err(PhotoStorageError::Empty);
        }
        if bytes.len() > self.max_size {
            return Err(PhotoStorageError::TooLarge {
                size: bytes.len(),
                max: self.max_size,
            });
        }

        let path = self
            .root
            .join(format!("{}.{}", Uuid::now_v7().simple(), extension));

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_discard(file, &path, &bytes).await?;

        let stored = StoragePath::new(path.to_string_lossy().into_owned());
        debug!(
            "Photo stored: {} ({} bytes, proposed name '{}')",
            stored,
            bytes.len(),
            proposed_name
        );

        Ok(stored)
    }

    async fn remove(&self, path: &StoragePath) -> Result<(), PhotoStorageError> {
        let target = Path::new(path.as_str());
        if target.parent() != Some(self.root.as_path()) {
            return Err(PhotoStorageError::OutsideRoot(path.to_string()));
        }

        tokio::fs::remove_file(target).await?;
        debug!("Photo removed: {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir, max_photo_size: usize) -> LocalPhotoStorage {
        LocalPhotoStorage::new(&UploadConfig {
            upload_dir: dir.path().to_path_buf(),
            max_photo_size,
        })
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("dump.JPG").unwrap(), "jpg");
        assert_eq!(allowed_extension("a.b.png").unwrap(), "png");
        assert_eq!(allowed_extension("x.gif").unwrap(), "gif");
        assert!(matches!(
            allowed_extension("notes.txt"),
            Err(PhotoStorageError::UnsupportedExtension(ext)) if ext == "txt"
        ));
        assert!(allowed_extension("no_extension").is_err());
    }

    #[tokio::test]
    async fn test_save_writes_under_root_with_generated_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, 1024);

        let path = storage
            .save(b"fake image".to_vec(), "../../etc/passwd.png")
            .await
            .unwrap();

        let on_disk = Path::new(path.as_str());
        assert_eq!(on_disk.parent(), Some(dir.path()));
        assert_eq!(on_disk.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(!path.as_str().contains("passwd"));
        assert_eq!(tokio::fs::read(on_disk).await.unwrap(), b"fake image");
    }

    #[tokio::test]
    async fn test_save_generates_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, 1024);

        let first = storage.save(vec![1], "a.jpg").await.unwrap();
        let second = storage.save(vec![2], "a.jpg").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, 4);

        assert!(matches!(
            storage.save(vec![1], "").await,
            Err(PhotoStorageError::MissingFilename)
        ));
        assert!(matches!(
            storage.save(vec![1], "photo.bmp").await,
            Err(PhotoStorageError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            storage.save(Vec::new(), "photo.png").await,
            Err(PhotoStorageError::Empty)
        ));
        assert!(matches!(
            storage.save(vec![0; 5], "photo.png").await,
            Err(PhotoStorageError::TooLarge { size: 5, max: 4 })
        ));

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    struct BrokenDisk;

    impl AsyncWrite for BrokenDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::other("disk full")))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.jpg");
        tokio::fs::write(&path, b"half").await.unwrap();

        let err = write_or_discard(BrokenDisk, &path, b"jpeg bytes")
            .await
            .unwrap_err();

        assert!(matches!(err, PhotoStorageError::Io(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir, 1024);

        let path = storage.save(vec![1, 2, 3], "a.jpeg").await.unwrap();
        storage.remove(&path).await.unwrap();
        assert!(!Path::new(path.as_str()).exists());

        let outside = StoragePath::new("/etc/hosts");
        assert!(matches!(
            storage.remove(&outside).await,
            Err(PhotoStorageError::OutsideRoot(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_dir_exists_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("static").join("uploads");
        let storage = LocalPhotoStorage::new(&UploadConfig {
            upload_dir: upload_dir.clone(),
            max_photo_size: 1024,
        });

        storage.ensure_dir_exists().await.unwrap();
        assert!(upload_dir.is_dir());
    }
}
