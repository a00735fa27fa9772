use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::errors::ValidationError;
use crate::normalization;

/// Instants are stored the way browsers print them: UTC with
/// millisecond precision.
const STORED_TIMESTAMP: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

const SESSION_DATE: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_END_TIME: &str = "17:00";

/// A single person checked in to a class.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// The ID of the attendee. Unique within a session.
    pub id: String,

    /// The name provided. Required.
    pub full_name: String,

    /// The company provided, if any.
    #[serde(default)]
    pub company_name: String,

    /// The email address provided. Required.
    pub email: String,

    /// The phone number provided, if any.
    #[serde(default)]
    pub phone_number: String,

    /// Whether the attendee wants to hear about future classes.
    #[serde(default)]
    pub interested_in_future_classes: bool,

    /// The ISO-8601 instant the attendee checked in.
    pub timestamp: String,

    /// The name of the class at check-in time. Renaming the class later
    /// does not touch this.
    #[serde(default)]
    pub class_name: String,
}

impl Attendee {
    /// Creates an attendee from a validated form, snapshotting the class
    /// name.
    pub fn new(form: AttendeeForm, class_name: &str, checked_in_at: OffsetDateTime) -> Self {
        Attendee {
            id: Uuid::new_v4().to_string(),
            full_name: form.full_name,
            company_name: form.company_name,
            email: form.email,
            phone_number: form.phone_number,
            interested_in_future_classes: form.interested_in_future_classes,
            timestamp: format_timestamp(checked_in_at),
            class_name: class_name.to_owned(),
        }
    }
}

/// The fields an attendee fills in at the check-in screen.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AttendeeForm {
    pub full_name: String,
    pub company_name: String,
    pub email: String,
    pub phone_number: String,
    pub interested_in_future_classes: bool,
}

impl AttendeeForm {
    /// Trims every text field and checks that the required ones are
    /// present.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let form = AttendeeForm {
            full_name: normalization::normalize_field(&self.full_name),
            company_name: normalization::normalize_field(&self.company_name),
            email: normalization::normalize_field(&self.email),
            phone_number: normalization::normalize_field(&self.phone_number),
            interested_in_future_classes: self.interested_in_future_classes,
        };

        if form.full_name.is_empty() {
            return Err(ValidationError::MissingFullName);
        }

        if form.email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }

        Ok(form)
    }
}

/// The one class currently accepting check-ins.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    /// The ID of the session.
    pub id: String,

    /// The name of the class. Never empty.
    pub name: String,

    /// The day the class was set up, as `YYYY-MM-DD`.
    pub date: String,

    /// The scheduled start, as `HH:MM`.
    #[serde(default = "default_start_time")]
    pub start_time: String,

    /// The scheduled end, as `HH:MM`.
    #[serde(default = "default_end_time")]
    pub end_time: String,

    /// Everyone checked in so far, in check-in order.
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl ClassSession {
    /// Creates an empty session. `name` must already be normalized.
    pub fn new(name: String, start_time: String, end_time: String, created_at: OffsetDateTime) -> Self {
        ClassSession {
            id: Uuid::new_v4().to_string(),
            name,
            date: format_date(created_at),
            start_time,
            end_time,
            attendees: vec![],
        }
    }
}

fn default_start_time() -> String {
    DEFAULT_START_TIME.to_owned()
}

fn default_end_time() -> String {
    DEFAULT_END_TIME.to_owned()
}

/// Formats an instant for storage, e.g. `2024-03-01T09:15:00.250Z`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(STORED_TIMESTAMP)
        .expect("format UTC instant with a complete description")
}

/// Formats the UTC calendar day of an instant, e.g. `2024-03-01`.
pub fn format_date(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(SESSION_DATE)
        .expect("format UTC date with a complete description")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn form(full_name: &str, email: &str) -> AttendeeForm {
        AttendeeForm {
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn timestamps_match_browser_iso_strings() {
        let at = datetime!(2024-03-01 09:15:00.250 +02:00);

        assert_eq!(format_timestamp(at), "2024-03-01T07:15:00.250Z");
        assert_eq!(format_date(at), "2024-03-01");
    }

    #[test]
    fn validation_requires_name_and_email() {
        assert_eq!(form("", "a@x.com").validate(), Err(ValidationError::MissingFullName));
        assert_eq!(form("Alice", "   ").validate(), Err(ValidationError::MissingEmail));

        let validated = form("  Alice ", " alice@x.com").validate().expect("valid form");
        assert_eq!(validated.full_name, "Alice");
        assert_eq!(validated.email, "alice@x.com");
    }

    #[test]
    fn attendee_ids_do_not_collide() {
        let at = OffsetDateTime::now_utc();
        let first = Attendee::new(form("A", "a@x.com"), "Class", at);
        let second = Attendee::new(form("B", "b@x.com"), "Class", at);

        assert_ne!(first.id, second.id);
        assert_eq!(first.timestamp, second.timestamp);
    }

    #[test]
    fn records_without_optional_fields_load() {
        let raw = r#"{
            "id": "1700000000000",
            "name": "Intro to Go",
            "date": "2024-03-01",
            "attendees": [
                {"id": "1", "fullName": "Alice", "email": "alice@x.com", "timestamp": "2024-03-01T09:00:00.000Z"}
            ]
        }"#;

        let session: ClassSession = serde_json::from_str(raw).expect("parse legacy record");

        assert_eq!(session.start_time, DEFAULT_START_TIME);
        assert_eq!(session.end_time, DEFAULT_END_TIME);
        assert_eq!(session.attendees[0].company_name, "");
        assert!(!session.attendees[0].interested_in_future_classes);
    }

    #[test]
    fn records_use_camel_case_keys() {
        let at = datetime!(2024-03-01 09:00 UTC);
        let attendee = Attendee::new(form("Alice", "alice@x.com"), "Intro to Go", at);

        let value = serde_json::to_value(&attendee).expect("serialize attendee");

        assert_eq!(value["fullName"], "Alice");
        assert_eq!(value["interestedInFutureClasses"], false);
        assert_eq!(value["className"], "Intro to Go");
        assert_eq!(value["timestamp"], "2024-03-01T09:00:00.000Z");
    }
}
