//! Renders a roster as a spreadsheet-friendly CSV document.
//!
//! Every field is quoted, embedded quotes are doubled, rows are joined
//! with `\n` and the document starts with a UTF-8 byte-order mark.

use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::session::Attendee;

pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Rendered in place of a check-in time that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const CHECK_IN_TIME: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// A column of the export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Column {
    FullName,
    CompanyName,
    Email,
    PhoneNumber,
    InterestedInFutureClasses,
    CheckInTime,
    ClassName,
}

impl Column {
    /// The order used for every export.
    pub const ALL: [Column; 7] = [
        Column::FullName,
        Column::CompanyName,
        Column::Email,
        Column::PhoneNumber,
        Column::InterestedInFutureClasses,
        Column::CheckInTime,
        Column::ClassName,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::FullName => "Full Name",
            Column::CompanyName => "Company Name",
            Column::Email => "Email",
            Column::PhoneNumber => "Phone Number",
            Column::InterestedInFutureClasses => "Interested in Future Classes",
            Column::CheckInTime => "Check-in Time",
            Column::ClassName => "Class Name",
        }
    }

    fn render(self, attendee: &Attendee) -> String {
        match self {
            Column::FullName => attendee.full_name.clone(),
            Column::CompanyName => attendee.company_name.clone(),
            Column::Email => attendee.email.clone(),
            Column::PhoneNumber => attendee.phone_number.clone(),
            Column::InterestedInFutureClasses => yes_no(attendee.interested_in_future_classes).to_owned(),
            Column::CheckInTime => format_check_in_time(&attendee.timestamp),
            Column::ClassName => attendee.class_name.clone(),
        }
    }
}

/// Encodes `rows` in check-in order using the standard column order.
pub fn encode_roster(rows: &[Attendee]) -> String {
    encode(rows, &Column::ALL)
}

/// Encodes `rows` with the given columns. An empty roster yields the
/// header line alone.
pub fn encode(rows: &[Attendee], columns: &[Column]) -> String {
    let header = encode_line(columns.iter().map(|column| column.header()));

    let lines = std::iter::once(header).chain(rows.iter().map(|attendee| {
        let fields = columns.iter().map(|column| column.render(attendee)).collect::<Vec<_>>();
        encode_line(fields.iter())
    }));

    let mut document = String::new();
    document.push(BYTE_ORDER_MARK);
    document.push_str(&lines.collect::<Vec<_>>().join("\n"));
    document
}

/// Quotes a single field, doubling any quotes inside it.
///
/// ```
/// use checkin::csv::escape_field;
/// assert_eq!(escape_field(r#"O"Brien, Jr."#), r#""O""Brien, Jr.""#);
/// assert_eq!(escape_field(""), r#""""#);
/// ```
pub fn escape_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Renders a stored ISO-8601 instant as `YYYY-MM-DD HH:mm:ss` in UTC,
/// or [`INVALID_DATE`] when it does not parse.
pub fn format_check_in_time(timestamp: &str) -> String {
    OffsetDateTime::parse(timestamp, &Rfc3339)
        .ok()
        .and_then(|instant| instant.to_offset(UtcOffset::UTC).format(CHECK_IN_TIME).ok())
        .unwrap_or_else(|| INVALID_DATE.to_owned())
}

fn encode_line<S: AsRef<str>>(fields: impl Iterator<Item = S>) -> String {
    fields
        .map(|field| escape_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
