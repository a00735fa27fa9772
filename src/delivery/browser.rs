use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use log::{debug, error, Logger};

use super::{Blob, Delivery, DeliveryOutcome, Downloader, ExportRequest};
use crate::errors::ExportError;

/// Delivers exports as a client-side download.
pub struct BrowserDownload {
    logger: Arc<Logger>,
    downloader: Arc<dyn Downloader>,
}

impl BrowserDownload {
    pub fn new(logger: Arc<Logger>, downloader: Arc<dyn Downloader>) -> Self {
        Self { logger, downloader }
    }
}

impl Delivery for BrowserDownload {
    fn deliver(&self, request: ExportRequest) -> BoxFuture<DeliveryOutcome> {
        let ExportRequest { csv, file_name, .. } = request;

        debug!(self.logger, "Triggering download..."; "file_name" => &file_name, "length" => csv.len());

        let outcome = match self.downloader.download(Blob::csv(csv), &file_name) {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(reason) => {
                error!(self.logger, "Failed to trigger download: {}", reason; "file_name" => &file_name);
                DeliveryOutcome::Failed(ExportError::DownloadFailed { reason })
            }
        };

        future::ready(outcome).boxed()
    }
}
