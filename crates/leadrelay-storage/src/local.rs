use crate::keys::{sanitize_filename, storage_name};
use crate::traits::{AttachmentStorage, StagedFile, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: u32 = 8;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`, creating the
    /// directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Ensure a path handed back for reading points inside the upload directory.
    fn validate_path(&self, path: &Path) -> StorageResult<()> {
        let inside =
            path.parent() == Some(self.base_path.as_path()) && path.file_name().is_some();
        if !inside {
            return Err(StorageError::InvalidFilename(format!(
                "{} is not a staged file",
                path.display()
            )));
        }
        Ok(())
    }

    /// Open a brand-new file for the given name, retrying with a random suffix
    /// when the plain name already exists.
    async fn create_unique(&self, filename: &str) -> StorageResult<(PathBuf, fs::File)> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let suffix = (attempt > 0).then(rand::random::<u32>);
            let path = self
                .base_path
                .join(storage_name(timestamp_ms, suffix, filename));

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(
                        path = %path.display(),
                        attempt,
                        "Staged file name taken, retrying with suffix"
                    );
                }
                Err(e) => {
                    return Err(StorageError::CreateFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Err(StorageError::CreateFailed(format!(
            "No free name for {} after {} attempts",
            filename, MAX_NAME_ATTEMPTS
        )))
    }
}

#[async_trait]
impl AttachmentStorage for LocalStorage {
    async fn stage(&self, original_filename: &str, data: Bytes) -> StorageResult<StagedFile> {
        let filename = sanitize_filename(original_filename);
        let size = data.len();
        let start = std::time::Instant::now();

        let (path, mut file) = self.create_unique(&filename).await?;

        let written = async {
            file.write_all(&data).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup_err) = fs::remove_file(&path).await {
                tracing::debug!(
                    error = %cleanup_err,
                    path = %path.display(),
                    "Failed to remove partially written file"
                );
            }
            return Err(StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Attachment staged"
        );

        Ok(StagedFile {
            path,
            original_filename: original_filename.to_string(),
            content_type: None,
            size_bytes: size as u64,
        })
    }

    async fn read(&self, path: &Path) -> StorageResult<Vec<u8>> {
        self.validate_path(path)?;

        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!(
                    path = %path.display(),
                    size_bytes = data.len(),
                    "Staged attachment read back"
                );
                Ok(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn root(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stage_and_read_back() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let data = Bytes::from_static(b"%PDF-1.4 brief");

        let staged = storage.stage("brief.pdf", data.clone()).await.unwrap();

        assert_eq!(staged.original_filename, "brief.pdf");
        assert_eq!(staged.size_bytes, data.len() as u64);
        assert_eq!(staged.path.parent(), Some(dir.path()));
        let name = staged.path.file_name().unwrap().to_str().unwrap();
        let (timestamp, rest) = name.split_once('_').unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
        assert_eq!(rest, "brief.pdf");

        let read = storage.read(&staged.path).await.unwrap();
        assert_eq!(read, data.to_vec());
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = LocalStorage::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.root(), nested.as_path());
    }

    #[tokio::test]
    async fn test_same_filename_never_collides() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..16u8 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .stage("brief.pdf", Bytes::from(vec![i; 32]))
                    .await
                    .unwrap()
            }));
        }

        let mut paths = HashSet::new();
        for handle in handles {
            let staged = handle.await.unwrap();
            let content = storage.read(&staged.path).await.unwrap();
            assert_eq!(content.len(), 32);
            assert!(paths.insert(staged.path));
        }
        assert_eq!(paths.len(), 16);
    }

    #[tokio::test]
    async fn test_distinct_filenames_get_distinct_paths() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let (a, b) = tokio::join!(
            storage.stage("a.txt", Bytes::from_static(b"a")),
            storage.stage("b.txt", Bytes::from_static(b"b")),
        );
        assert_ne!(a.unwrap().path, b.unwrap().path);
    }

    #[tokio::test]
    async fn test_stage_sanitizes_client_path() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let staged = storage
            .stage("uploads/sub dir/notes.txt", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert_eq!(staged.path.parent(), Some(dir.path()));
        assert!(staged.path.to_str().unwrap().ends_with("_notes.txt"));
        assert_eq!(staged.original_filename, "uploads/sub dir/notes.txt");

        let staged = storage
            .stage("../escape.txt", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert_eq!(staged.path.parent(), Some(dir.path()));
        assert!(staged.path.to_str().unwrap().ends_with("_escape.txt"));

        let staged = storage.stage("..", Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(staged.path.parent(), Some(dir.path()));
        assert!(staged.path.to_str().unwrap().ends_with("_file"));
    }

    #[tokio::test]
    async fn test_stage_keeps_double_dots_inside_names() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let staged = storage
            .stage("report..final.pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        assert!(staged
            .path
            .to_str()
            .unwrap()
            .ends_with("_report..final.pdf"));

        let read = storage.read(&staged.path).await.unwrap();
        assert_eq!(read, b"%PDF");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let staged = storage.stage("gone.txt", Bytes::from_static(b"x")).await.unwrap();
        std::fs::remove_file(&staged.path).unwrap();

        let result = storage.read(&staged.path).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_rejects_paths_outside_root() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.read(Path::new("/etc/passwd")).await;
        assert!(matches!(result, Err(StorageError::InvalidFilename(_))));

        let result = storage.read(&dir.path().join("nested").join("x")).await;
        assert!(matches!(result, Err(StorageError::InvalidFilename(_))));

        let result = storage.read(&dir.path().join("..").join("x")).await;
        assert!(matches!(result, Err(StorageError::InvalidFilename(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stage_into_read_only_directory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555)).unwrap();

        let result = storage.stage("brief.pdf", Bytes::from_static(b"x")).await;

        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
        // Root ignores permission bits, so only assert when the write was refused.
        if let Err(e) = result {
            assert!(matches!(e, StorageError::CreateFailed(_)));
        }
    }
}
