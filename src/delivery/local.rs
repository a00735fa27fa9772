//! Platform capabilities for running on an ordinary file system: a
//! "download" lands in a directory, and "sharing" copies the file into
//! an outbox directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};

use super::{Blob, Downloader, FileInfo, FileSystem, ShareAction, ShareRequest, ShareSheet};

/// Saves downloads into a directory.
pub struct DirectoryDownloader {
    directory: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&self, blob: Blob, file_name: &str) -> Result<(), String> {
        fs::create_dir_all(&self.directory).map_err(|e| e.to_string())?;
        fs::write(self.directory.join(file_name), blob.data).map_err(|e| e.to_string())
    }
}

/// The local file system, with an optional scratch directory.
pub struct LocalFileSystem {
    scratch: Option<PathBuf>,
}

impl LocalFileSystem {
    pub fn new(scratch: Option<PathBuf>) -> Self {
        Self { scratch }
    }
}

impl FileSystem for LocalFileSystem {
    fn scratch_directory(&self) -> Option<PathBuf> {
        self.scratch.clone()
    }

    fn write_text(&self, path: &Path, content: &str) -> BoxFuture<io::Result<()>> {
        let path = path.to_owned();
        let content = content.to_owned();

        async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            tokio::fs::write(&path, content.as_bytes()).await
        }
        .boxed()
    }

    fn get_info(&self, path: &Path) -> BoxFuture<io::Result<FileInfo>> {
        let path = path.to_owned();

        async move {
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => Ok(FileInfo {
                    exists: true,
                    size: Some(metadata.len()),
                }),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileInfo {
                    exists: false,
                    size: None,
                }),
                Err(e) => Err(e),
            }
        }
        .boxed()
    }

    fn delete_file(&self, path: &Path, idempotent: bool) -> BoxFuture<io::Result<()>> {
        let path = path.to_owned();

        async move {
            match tokio::fs::remove_file(&path).await {
                Err(e) if idempotent && e.kind() == io::ErrorKind::NotFound => Ok(()),
                result => result,
            }
        }
        .boxed()
    }
}

/// "Shares" a file by copying it into an outbox directory.
pub struct DirectoryShare {
    outbox: PathBuf,
}

impl DirectoryShare {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self { outbox: outbox.into() }
    }
}

impl ShareSheet for DirectoryShare {
    fn share(&self, request: ShareRequest) -> BoxFuture<Result<ShareAction, String>> {
        copy_to_outbox(self.outbox.clone(), request.file).boxed()
    }
}

async fn copy_to_outbox(outbox: PathBuf, file: PathBuf) -> Result<ShareAction, String> {
    let file_name = file
        .file_name()
        .ok_or_else(|| format!("{} is not a file", file.display()))?;

    tokio::fs::create_dir_all(&outbox).await.map_err(|e| e.to_string())?;
    tokio::fs::copy(&file, outbox.join(file_name))
        .await
        .map_err(|e| e.to_string())?;

    Ok(ShareAction::Shared)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use time::OffsetDateTime;

    use super::{DirectoryDownloader, DirectoryShare, LocalFileSystem};
    use crate::delivery::{Blob, Delivery, Downloader, ExportRequest, FileSystem, NativeShare};

    #[tokio::test]
    async fn native_delivery_lands_in_the_outbox() {
        let root = tempfile::tempdir().expect("create temporary directory");
        let scratch = root.path().join("scratch");
        let outbox = root.path().join("outbox");

        let delivery = NativeShare::new(
            Arc::new(log::discard_logger()),
            Arc::new(LocalFileSystem::new(Some(scratch.clone()))),
            Arc::new(DirectoryShare::new(&outbox)),
        );

        let outcome = delivery
            .deliver(ExportRequest {
                csv: "\u{feff}\"Full Name\"\n\"Alice\"".to_owned(),
                file_name: "Intro_to_Go_attendees.csv".to_owned(),
                class_name: "Intro to Go".to_owned(),
                requested_at: OffsetDateTime::now_utc(),
            })
            .await;

        assert!(outcome.is_delivered());

        let shared = fs::read_dir(&outbox).unwrap().map(|e| e.unwrap().path()).collect::<Vec<_>>();
        assert_eq!(shared.len(), 1);
        assert_eq!(fs::read_to_string(&shared[0]).unwrap(), "\u{feff}\"Full Name\"\n\"Alice\"");

        assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_files_depends_on_idempotence() {
        let root = tempfile::tempdir().expect("create temporary directory");
        let files = LocalFileSystem::new(None);
        let missing = root.path().join("missing.csv");

        assert!(files.delete_file(&missing, true).await.is_ok());
        assert!(files.delete_file(&missing, false).await.is_err());

        let info = files.get_info(&missing).await.unwrap();
        assert!(!info.exists);
    }

    #[test]
    fn downloads_are_saved_under_the_suggested_name() {
        let root = tempfile::tempdir().expect("create temporary directory");
        let downloads = root.path().join("downloads");

        DirectoryDownloader::new(&downloads)
            .download(Blob::csv("data".to_owned()), "Intro_to_Go_attendees.csv")
            .unwrap();

        assert_eq!(
            fs::read_to_string(downloads.join("Intro_to_Go_attendees.csv")).unwrap(),
            "data"
        );
    }
}
