//! The flows behind each screen. Every failure is caught here: it is
//! logged, turned into a notice for the person using the app, and
//! returned to the caller.

pub mod attendees;
pub mod check_in;
pub mod setup;

pub use attendees::{AttendeeList, ExportStatus, Roster, SubmitOutcome};
pub use check_in::{check_in, CheckInOutcome};
pub use setup::start_class;
