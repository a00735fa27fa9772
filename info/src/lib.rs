/// The version of the check-in tooling, taken from the manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if `CHECKIN_REVISION` was set at build time.
pub const REVISION: Option<&str> = option_env!("CHECKIN_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");

/// The name reported in logs.
pub const NAME: &str = "checkin";
