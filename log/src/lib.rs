use std::io;
use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

/// Builds the root logger: JSON lines on stderr, tagged with build
/// metadata.
pub fn initialize_logger() -> Logger {
    json_logger(io::stderr())
}

/// Builds a logger writing JSON lines to `writer` through an async
/// drain. Records still queued are written when the last clone of the
/// logger is dropped.
#[cfg(not(feature = "env_logging"))]
pub fn json_logger<W: io::Write + Send + 'static>(writer: W) -> Logger {
    let drain = Mutex::new(Json::default(writer)).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    Logger::root(drain, build_metadata())
}

/// Builds a logger writing JSON lines to `writer`, filtered by
/// `RUST_LOG`.
#[cfg(feature = "env_logging")]
pub fn json_logger<W: io::Write + Send + 'static>(writer: W) -> Logger {
    let drain = Mutex::new(Json::default(writer)).map(Fuse);
    let drain = slog_envlogger::new(drain).ignore_res();
    let drain = Async::new(drain).build().fuse();

    Logger::root(drain, build_metadata())
}

/// A logger that drops every record. Useful in tests.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

fn build_metadata() -> slog::OwnedKV<impl slog::SendSyncRefUnwindSafeKV> {
    o!(
        "app" => info::NAME,
        "version" => info::VERSION,
        "revision" => info::REVISION,
        "build_timestamp" => info::BUILD_TIMESTAMP
    )
}
