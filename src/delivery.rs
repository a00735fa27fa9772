use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use log::Logger;
use mime::Mime;
use time::OffsetDateTime;

use crate::environment::Platform;
use crate::errors::ExportError;

pub mod browser;
pub mod local;
pub mod native;

pub use browser::BrowserDownload;
pub use native::NativeShare;

/// A finished CSV document ready to leave the app.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// The encoded roster.
    pub csv: String,

    /// The name offered to the person receiving the file.
    pub file_name: String,

    /// The name of the exported class, used for share titles.
    pub class_name: String,

    /// When the export was requested.
    pub requested_at: OffsetDateTime,
}

/// How a delivery attempt ended.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The file was handed over. For downloads this means the download
    /// was triggered, not that it finished.
    Delivered,

    /// The person dismissed the share sheet. The temporary file is kept.
    UserCancelled,

    /// The file could not be handed over.
    Failed(ExportError),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// Hands an export to the platform. Implementations never retry on
/// their own; calling `deliver` again starts over from scratch.
pub trait Delivery: Send + Sync {
    fn deliver(&self, request: ExportRequest) -> BoxFuture<DeliveryOutcome>;
}

/// In-memory file contents handed to a client-side download.
#[derive(Clone, Debug)]
pub struct Blob {
    pub mime_type: Mime,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn csv(content: String) -> Self {
        Blob {
            mime_type: mime::TEXT_CSV_UTF_8,
            data: content.into_bytes(),
        }
    }
}

/// Triggers a client-side download. Completion is never reported back.
pub trait Downloader: Send + Sync {
    fn download(&self, blob: Blob, file_name: &str) -> Result<(), String>;
}

/// What the platform knows about a file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FileInfo {
    pub exists: bool,
    pub size: Option<u64>,
}

/// The app-writable part of the device file system.
pub trait FileSystem: Send + Sync {
    /// The directory temporary exports go in, if the platform has one.
    fn scratch_directory(&self) -> Option<PathBuf>;

    fn write_text(&self, path: &Path, content: &str) -> BoxFuture<io::Result<()>>;

    fn get_info(&self, path: &Path) -> BoxFuture<io::Result<FileInfo>>;

    /// Deletes a file. With `idempotent`, deleting a missing file
    /// succeeds.
    fn delete_file(&self, path: &Path, idempotent: bool) -> BoxFuture<io::Result<()>>;
}

/// What the person did with the share sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShareAction {
    Shared,
    Dismissed,
}

/// A file offered to the platform share sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareRequest {
    pub file: PathBuf,
    pub title: String,
    pub message: String,
}

/// The platform share sheet. An `Err` is a failure of the sheet itself,
/// never a dismissal.
pub trait ShareSheet: Send + Sync {
    fn share(&self, request: ShareRequest) -> BoxFuture<Result<ShareAction, String>>;
}

/// Everything the delivery variants may need from the platform.
#[derive(Clone)]
pub struct Capabilities {
    pub downloader: Arc<dyn Downloader>,
    pub files: Arc<dyn FileSystem>,
    pub share_sheet: Arc<dyn ShareSheet>,
}

/// Picks the delivery variant for the platform the app runs on.
pub fn for_platform(platform: Platform, logger: Arc<Logger>, capabilities: Capabilities) -> Arc<dyn Delivery> {
    if platform.is_browser_like() {
        Arc::new(BrowserDownload::new(logger, capabilities.downloader))
    } else {
        Arc::new(NativeShare::new(logger, capabilities.files, capabilities.share_sheet))
    }
}
