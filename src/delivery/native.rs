use std::path::Path;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::{debug, error, info, o, warn, Logger};
use uuid::Uuid;

use super::{Delivery, DeliveryOutcome, ExportRequest, FileInfo, FileSystem, ShareAction, ShareRequest, ShareSheet};
use crate::errors::ExportError;
use crate::session::format_date;

/// Delivers exports by writing a temporary file and offering it to the
/// platform share sheet.
pub struct NativeShare {
    logger: Arc<Logger>,
    files: Arc<dyn FileSystem>,
    share_sheet: Arc<dyn ShareSheet>,
}

impl NativeShare {
    pub fn new(logger: Arc<Logger>, files: Arc<dyn FileSystem>, share_sheet: Arc<dyn ShareSheet>) -> Self {
        Self {
            logger,
            files,
            share_sheet,
        }
    }
}

impl Delivery for NativeShare {
    fn deliver(&self, request: ExportRequest) -> BoxFuture<DeliveryOutcome> {
        share_export(self, request).boxed()
    }
}

async fn share_export(delivery: &NativeShare, request: ExportRequest) -> DeliveryOutcome {
    let logger = delivery.logger.new(o!("class" => request.class_name.clone()));

    let directory = match delivery.files.scratch_directory() {
        Some(directory) => directory,
        None => {
            error!(logger, "No scratch directory available");
            return DeliveryOutcome::Failed(ExportError::NoScratchDirectory);
        }
    };

    let path = directory.join(temporary_file_name(&request));
    let logger = logger.new(o!("file" => path.display().to_string()));

    debug!(logger, "Writing export..."; "length" => request.csv.len());
    if let Err(source) = delivery.files.write_text(&path, &request.csv).await {
        error!(logger, "Failed to write export: {}", source);
        return DeliveryOutcome::Failed(ExportError::WriteFailed { path, source });
    }

    match delivery.files.get_info(&path).await {
        Ok(FileInfo { exists: false, .. }) => {
            error!(logger, "Export was not created");
            return DeliveryOutcome::Failed(ExportError::FileMissing { path });
        }
        Ok(FileInfo { size: Some(0), .. }) => {
            error!(logger, "Export is empty");
            discard(&logger, delivery.files.as_ref(), &path).await;
            return DeliveryOutcome::Failed(ExportError::EmptyFile { path });
        }
        Ok(FileInfo { size, .. }) => {
            debug!(logger, "Export written"; "size" => size);
        }
        Err(e) => {
            warn!(logger, "Could not inspect export, sharing anyway: {}", e);
        }
    }

    let share_request = ShareRequest {
        file: path.clone(),
        title: format!("{} Attendees", request.class_name),
        message: format!(
            "{} Attendees List - {}",
            request.class_name,
            format_date(request.requested_at)
        ),
    };

    debug!(logger, "Opening share sheet...");
    match delivery.share_sheet.share(share_request).await {
        Ok(ShareAction::Dismissed) => {
            info!(logger, "Share dismissed, keeping export");
            DeliveryOutcome::UserCancelled
        }
        Ok(ShareAction::Shared) => {
            discard(&logger, delivery.files.as_ref(), &path).await;
            DeliveryOutcome::Delivered
        }
        Err(reason) => {
            error!(logger, "Failed to share export: {}", reason);
            discard(&logger, delivery.files.as_ref(), &path).await;
            DeliveryOutcome::Failed(ExportError::ShareFailed { reason })
        }
    }
}

/// Deletes a temporary export. Failures are logged and otherwise
/// ignored.
async fn discard(logger: &Logger, files: &dyn FileSystem, path: &Path) {
    match files.delete_file(path, true).await {
        Ok(()) => debug!(logger, "Temporary export deleted"),
        Err(e) => warn!(logger, "Failed to delete temporary export: {}", e),
    }
}

/// Names a temporary export so that repeated exports never collide, e.g.
/// `Intro_to_Go_attendees_1709284500000_3f2a9c1d.csv`.
fn temporary_file_name(request: &ExportRequest) -> String {
    let stem = request.file_name.trim_end_matches(".csv");
    let millis = request.requested_at.unix_timestamp_nanos() / 1_000_000;
    let nonce = Uuid::new_v4().to_simple().to_string();

    format!("{}_{}_{}.csv", stem, millis, &nonce[..8])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use futures::future::{self, BoxFuture, FutureExt};
    use time::macros::datetime;

    use super::NativeShare;
    use crate::delivery::{
        Delivery, DeliveryOutcome, ExportRequest, FileInfo, FileSystem, ShareAction, ShareRequest, ShareSheet,
    };
    use crate::errors::ExportError;

    #[derive(Default)]
    struct FakeFiles {
        files: Mutex<HashMap<PathBuf, String>>,
        no_scratch: bool,
        refuse_writes: bool,
        drop_writes: bool,
        refuse_deletes: bool,
    }

    impl FakeFiles {
        fn paths(&self) -> Vec<PathBuf> {
            self.files.lock().unwrap().keys().cloned().collect()
        }
    }

    impl FileSystem for FakeFiles {
        fn scratch_directory(&self) -> Option<PathBuf> {
            if self.no_scratch {
                None
            } else {
                Some(PathBuf::from("/scratch"))
            }
        }

        fn write_text(&self, path: &Path, content: &str) -> BoxFuture<io::Result<()>> {
            let result = if self.refuse_writes {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            } else {
                if !self.drop_writes {
                    self.files.lock().unwrap().insert(path.to_owned(), content.to_owned());
                }
                Ok(())
            };

            future::ready(result).boxed()
        }

        fn get_info(&self, path: &Path) -> BoxFuture<io::Result<FileInfo>> {
            let info = match self.files.lock().unwrap().get(path) {
                Some(content) => FileInfo {
                    exists: true,
                    size: Some(content.len() as u64),
                },
                None => FileInfo {
                    exists: false,
                    size: None,
                },
            };

            future::ready(Ok(info)).boxed()
        }

        fn delete_file(&self, path: &Path, _idempotent: bool) -> BoxFuture<io::Result<()>> {
            let result = if self.refuse_deletes {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
            } else {
                self.files.lock().unwrap().remove(path);
                Ok(())
            };

            future::ready(result).boxed()
        }
    }

    struct FakeShareSheet {
        requests: Mutex<Vec<ShareRequest>>,
        response: Result<ShareAction, String>,
    }

    impl FakeShareSheet {
        fn answering(response: Result<ShareAction, String>) -> Self {
            FakeShareSheet {
                requests: Mutex::new(vec![]),
                response,
            }
        }
    }

    impl ShareSheet for FakeShareSheet {
        fn share(&self, request: ShareRequest) -> BoxFuture<Result<ShareAction, String>> {
            self.requests.lock().unwrap().push(request);

            future::ready(self.response.clone()).boxed()
        }
    }

    fn request(csv: &str) -> ExportRequest {
        ExportRequest {
            csv: csv.to_owned(),
            file_name: "Intro_to_Go_attendees.csv".to_owned(),
            class_name: "Intro to Go".to_owned(),
            requested_at: datetime!(2024-03-01 09:15 UTC),
        }
    }

    fn delivery(files: Arc<FakeFiles>, share_sheet: Arc<FakeShareSheet>) -> NativeShare {
        NativeShare::new(Arc::new(log::discard_logger()), files, share_sheet)
    }

    #[tokio::test]
    async fn shared_exports_are_cleaned_up() {
        let files = Arc::new(FakeFiles::default());
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Shared)));

        let outcome = delivery(files.clone(), share_sheet.clone()).deliver(request("csv")).await;

        assert!(outcome.is_delivered());
        assert!(files.paths().is_empty());

        let requests = share_sheet.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].title, "Intro to Go Attendees");
        assert_eq!(requests[0].message, "Intro to Go Attendees List - 2024-03-01");

        let name = requests[0].file.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Intro_to_Go_attendees_1709284500000_"), "{}", name);
        assert!(name.ends_with(".csv"));
        assert!(requests[0].file.starts_with("/scratch"));
    }

    #[tokio::test]
    async fn dismissed_exports_are_kept() {
        let files = Arc::new(FakeFiles::default());
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Dismissed)));

        let outcome = delivery(files.clone(), share_sheet.clone()).deliver(request("csv")).await;

        assert!(matches!(outcome, DeliveryOutcome::UserCancelled));
        assert_eq!(files.paths(), vec![share_sheet.requests.lock().unwrap()[0].file.clone()]);
    }

    #[tokio::test]
    async fn write_failures_skip_the_share_sheet() {
        let files = Arc::new(FakeFiles {
            refuse_writes: true,
            ..Default::default()
        });
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Shared)));

        let outcome = delivery(files, share_sheet.clone()).deliver(request("csv")).await;

        assert!(matches!(outcome, DeliveryOutcome::Failed(ExportError::WriteFailed { .. })));
        assert!(share_sheet.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_scratch_directory_fails_early() {
        let files = Arc::new(FakeFiles {
            no_scratch: true,
            ..Default::default()
        });
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Shared)));

        let outcome = delivery(files, share_sheet.clone()).deliver(request("csv")).await;

        assert!(matches!(outcome, DeliveryOutcome::Failed(ExportError::NoScratchDirectory)));
        assert!(share_sheet.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_and_empty_files_fail() {
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Shared)));

        let dropped = Arc::new(FakeFiles {
            drop_writes: true,
            ..Default::default()
        });
        let outcome = delivery(dropped, share_sheet.clone()).deliver(request("csv")).await;
        assert!(matches!(outcome, DeliveryOutcome::Failed(ExportError::FileMissing { .. })));

        let files = Arc::new(FakeFiles::default());
        let outcome = delivery(files.clone(), share_sheet.clone()).deliver(request("")).await;
        assert!(matches!(outcome, DeliveryOutcome::Failed(ExportError::EmptyFile { .. })));
        assert!(files.paths().is_empty());

        assert!(share_sheet.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn share_failures_still_clean_up() {
        let files = Arc::new(FakeFiles::default());
        let share_sheet = Arc::new(FakeShareSheet::answering(Err("no activity".to_owned())));

        let outcome = delivery(files.clone(), share_sheet).deliver(request("csv")).await;

        assert!(matches!(outcome, DeliveryOutcome::Failed(ExportError::ShareFailed { .. })));
        assert!(files.paths().is_empty());
    }

    #[tokio::test]
    async fn cleanup_failures_do_not_change_the_outcome() {
        let files = Arc::new(FakeFiles {
            refuse_deletes: true,
            ..Default::default()
        });
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Shared)));

        let outcome = delivery(files.clone(), share_sheet).deliver(request("csv")).await;

        assert!(outcome.is_delivered());
        assert_eq!(files.paths().len(), 1);
    }

    #[tokio::test]
    async fn repeated_exports_use_fresh_files() {
        let files = Arc::new(FakeFiles::default());
        let share_sheet = Arc::new(FakeShareSheet::answering(Ok(ShareAction::Dismissed)));
        let delivery = delivery(files.clone(), share_sheet);

        delivery.deliver(request("csv")).await;
        delivery.deliver(request("csv")).await;

        assert_eq!(files.paths().len(), 2);
    }
}
