use log::{debug, error, info, o};
use time::OffsetDateTime;

use crate::environment::Environment;
use crate::errors::CheckInError;
use crate::session::{Attendee, AttendeeForm};
use crate::ui::{Notice, Route};

#[derive(Debug, PartialEq)]
pub enum CheckInOutcome {
    CheckedIn(Attendee),

    /// No class is active; the UI was sent back to setup.
    NoActiveClass,
}

/// Checks an attendee in to the active class.
pub async fn check_in(environment: &Environment, form: AttendeeForm) -> Result<CheckInOutcome, CheckInError> {
    let Environment { logger, roster, ui, .. } = environment;

    let form = match form.validate() {
        Ok(form) => form,
        Err(e) => {
            info!(logger, "Check-in rejected: {}", e);
            ui.notify(Notice::Invalid(e));
            return Err(e.into());
        }
    };

    debug!(logger, "Saving check-in...");
    match roster.append(form, OffsetDateTime::now_utc()).await {
        Ok(Some(attendee)) => {
            let logger = logger.new(o!("attendee" => attendee.id.clone()));
            debug!(logger, "Checked in"; "class" => &attendee.class_name);

            ui.notify(Notice::CheckedIn {
                full_name: attendee.full_name.clone(),
            });

            Ok(CheckInOutcome::CheckedIn(attendee))
        }
        Ok(None) => {
            info!(logger, "No active class, returning to setup");
            ui.navigate(Route::ClassSetup);

            Ok(CheckInOutcome::NoActiveClass)
        }
        Err(e) => {
            error!(logger, "Failed to save check-in: {}", e);
            ui.notify(Notice::CheckInSaveFailed { reason: e.to_string() });

            Err(e.into())
        }
    }
}
