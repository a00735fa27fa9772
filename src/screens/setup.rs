use log::{debug, error, info, o};
use time::OffsetDateTime;

use crate::environment::Environment;
use crate::errors::{CheckInError, ValidationError};
use crate::normalization::{format_time, normalize_field};
use crate::session::{ClassSession, DEFAULT_END_TIME, DEFAULT_START_TIME};
use crate::ui::{Notice, Route};

/// Starts a new class, replacing whatever class was active, and moves
/// on to check-in.
pub async fn start_class(
    environment: &Environment,
    name: &str,
    start_time: &str,
    end_time: &str,
) -> Result<ClassSession, CheckInError> {
    let Environment { logger, roster, ui, .. } = environment;

    let name = normalize_field(name);
    if name.is_empty() {
        info!(logger, "Class setup rejected: no name");
        ui.notify(Notice::Invalid(ValidationError::MissingClassName));
        return Err(ValidationError::MissingClassName.into());
    }

    let session = ClassSession::new(
        name,
        time_or_default(start_time, DEFAULT_START_TIME),
        time_or_default(end_time, DEFAULT_END_TIME),
        OffsetDateTime::now_utc(),
    );
    let logger = logger.new(o!("class" => session.name.clone()));

    debug!(logger, "Saving class..."; "start" => &session.start_time, "end" => &session.end_time);
    if let Err(e) = roster.save(&session).await {
        error!(logger, "Failed to save class: {}", e);
        ui.notify(Notice::ClassSaveFailed { reason: e.to_string() });
        return Err(e.into());
    }

    ui.notify(Notice::ClassStarted {
        name: session.name.clone(),
    });
    ui.navigate(Route::CheckIn);

    Ok(session)
}

fn time_or_default(input: &str, default: &str) -> String {
    let formatted = format_time(input.trim());

    if formatted.is_empty() {
        default.to_owned()
    } else {
        formatted
    }
}
