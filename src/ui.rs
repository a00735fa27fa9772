use std::fmt;

use futures::future::BoxFuture;

use crate::errors::ValidationError;

/// The screens of the app.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route {
    ClassSetup,
    CheckIn,
    AttendeeList,
}

/// What to do with the current roster before starting a new class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExportChoice {
    ExportThenClear,
    ClearOnly,
}

/// A message shown to the person using the app. Failures carry the
/// underlying error text for the details line.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    ClassStarted { name: String },
    CheckedIn { full_name: String },
    Invalid(ValidationError),
    InvalidAdminCode,
    Exported,

    /// The export did not reach the platform. A manual retry is on
    /// offer.
    ExportFailed { reason: String },
    LoadFailed { reason: String },
    ClassSaveFailed { reason: String },
    CheckInSaveFailed { reason: String },

    /// The old class could not be removed, so it is still active.
    ClearFailed { reason: String },
}

impl Notice {
    /// Whether the notice reports something that went wrong.
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Notice::ClassStarted { .. } | Notice::CheckedIn { .. } | Notice::Exported
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ClassStarted { name } => write!(f, "Class {:?} started", name),
            Notice::CheckedIn { .. } => write!(f, "Check-in completed successfully!"),
            Notice::Invalid(e) => write!(f, "{}", e),
            Notice::InvalidAdminCode => write!(f, "Invalid admin code"),
            Notice::Exported => write!(f, "Data exported successfully!"),
            Notice::ExportFailed { reason } => write!(f, "{}. Would you like to try again?", reason),
            Notice::LoadFailed { reason } => write!(f, "Failed to load class information ({})", reason),
            Notice::ClassSaveFailed { reason } => write!(f, "Failed to save class information ({})", reason),
            Notice::CheckInSaveFailed { reason } => write!(f, "Failed to save check-in data ({})", reason),
            Notice::ClearFailed { reason } => {
                write!(f, "Failed to start new class, the current class was kept ({})", reason)
            }
        }
    }
}

/// The parts of the user interface the flows drive.
pub trait Ui: Send + Sync {
    fn notify(&self, notice: Notice);

    fn navigate(&self, route: Route);

    /// Asks whether to export the roster before it is cleared.
    fn choose_export_before_clear(&self) -> BoxFuture<ExportChoice>;
}
