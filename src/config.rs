use std::env;
use std::path::PathBuf;

use crate::environment::{Platform, UnknownPlatform};

/// The shared code that unlocks exporting and starting a new class.
pub const ADMIN_CODE: &str = "admin";

/// Returns the value of the named environment variable, or `default`
/// when it is not set.
pub fn get_variable_or(name: &str, default: impl Into<String>) -> String {
    env::var(name).unwrap_or_else(|_| default.into())
}

/// Where things live and which platform to behave like.
#[derive(Clone, Debug)]
pub struct Settings {
    pub data_directory: PathBuf,
    pub platform: Platform,
    pub scratch_directory: PathBuf,
    pub share_directory: PathBuf,
    pub download_directory: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, UnknownPlatform> {
        let data_directory = PathBuf::from(get_variable_or("CHECKIN_DATA_DIR", ".checkin"));

        let platform = get_variable_or("CHECKIN_PLATFORM", "native")
            .parse()?;

        let scratch_directory = env::var("CHECKIN_SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        let share_directory = env::var("CHECKIN_SHARE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("shared"));

        let download_directory = env::var("CHECKIN_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("downloads"));

        Ok(Settings {
            data_directory,
            platform,
            scratch_directory,
            share_directory,
            download_directory,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::Settings;
    use crate::environment::Platform;

    #[test]
    fn platform_comes_from_the_environment() {
        env::set_var("CHECKIN_PLATFORM", "toaster");
        let error = Settings::from_env().unwrap_err();
        assert!(error.to_string().contains("toaster"));

        env::set_var("CHECKIN_PLATFORM", "web");
        assert_eq!(Settings::from_env().unwrap().platform, Platform::Browser);

        env::remove_var("CHECKIN_PLATFORM");
        assert_eq!(Settings::from_env().unwrap().platform, Platform::Native);
    }
}
