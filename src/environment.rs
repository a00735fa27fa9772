use std::str::FromStr;
use std::sync::Arc;

use log::Logger;
use thiserror::Error;

use crate::delivery::Delivery;
use crate::roster::RosterStore;
use crate::ui::Ui;

/// Everything a screen needs, passed around explicitly.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub roster: RosterStore,
    pub delivery: Arc<dyn Delivery>,
    pub ui: Arc<dyn Ui>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        roster: RosterStore,
        delivery: Arc<dyn Delivery>,
        ui: Arc<dyn Ui>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            roster,
            delivery,
            ui,
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) admin_code: String,
}

impl Config {
    pub fn new(admin_code: impl Into<String>) -> Self {
        Self {
            admin_code: admin_code.into(),
        }
    }
}

/// The kind of platform the app runs on, which decides how exports
/// leave the device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Platform {
    /// A browser or anything else that can only trigger downloads.
    Browser,

    /// A device with a file system and a share sheet.
    Native,
}

impl Platform {
    pub fn is_browser_like(self) -> bool {
        self == Platform::Browser
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" | "browser" => Ok(Platform::Browser),
            "native" | "android" | "ios" => Ok(Platform::Native),
            _ => Err(UnknownPlatform(s.to_owned())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown platform {0:?} (expected web or native)")]
pub struct UnknownPlatform(String);
