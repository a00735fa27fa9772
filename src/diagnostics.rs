//! A self-check of the export path and the stored class, for when
//! exports misbehave on a device.

use std::fmt;

use log::{debug, warn, Logger};
use uuid::Uuid;

use crate::delivery::FileSystem;
use crate::roster::RosterStore;

const PROBE_CONTENT: &str = "Test,Data,Row\n1,2,3\n4,5,6";

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Passed(String),
    Failed(String),
}

/// The outcome of each diagnostic step, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub steps: Vec<Step>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|step| matches!(step, Step::Passed(_)))
    }

    fn pass(&mut self, logger: &Logger, message: String) {
        debug!(logger, "{}", message);
        self.steps.push(Step::Passed(message));
    }

    fn fail(&mut self, logger: &Logger, message: String) {
        warn!(logger, "{}", message);
        self.steps.push(Step::Failed(message));
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match step {
                Step::Passed(message) => writeln!(f, "ok    {}", message)?,
                Step::Failed(message) => writeln!(f, "FAIL  {}", message)?,
            }
        }

        Ok(())
    }
}

/// Writes, inspects and deletes a probe file in the scratch directory,
/// then summarizes the active class. Never panics on failures; they end
/// up in the report.
pub async fn run(logger: &Logger, files: &dyn FileSystem, roster: &RosterStore) -> Report {
    let mut report = Report::default();

    probe_scratch_directory(logger, files, &mut report).await;

    match roster.load().await {
        Ok(Some(session)) => report.pass(
            logger,
            format!(
                "Class {:?} loaded with {} attendee(s)",
                session.name,
                session.attendees.len()
            ),
        ),
        Ok(None) => report.pass(logger, String::from("No class data found")),
        Err(e) => report.fail(logger, format!("Error loading class data: {}", e)),
    }

    report
}

async fn probe_scratch_directory(logger: &Logger, files: &dyn FileSystem, report: &mut Report) {
    let directory = match files.scratch_directory() {
        Some(directory) => directory,
        None => return report.fail(logger, String::from("No directory available for writing")),
    };
    report.pass(logger, format!("Scratch directory: {}", directory.display()));

    let path = directory.join(format!("probe_{}.csv", Uuid::new_v4().to_simple()));

    if let Err(e) = files.write_text(&path, PROBE_CONTENT).await {
        return report.fail(logger, format!("Could not write {}: {}", path.display(), e));
    }
    report.pass(logger, format!("Wrote {}", path.display()));

    match files.get_info(&path).await {
        Ok(info) if info.exists && info.size == Some(PROBE_CONTENT.len() as u64) => {
            report.pass(logger, format!("Probe file has {} bytes", PROBE_CONTENT.len()))
        }
        Ok(info) => report.fail(logger, format!("Probe file looks wrong: {:?}", info)),
        Err(e) => report.fail(logger, format!("Could not inspect probe file: {}", e)),
    }

    match files.delete_file(&path, true).await {
        Ok(()) => report.pass(logger, String::from("Probe file deleted")),
        Err(e) => report.fail(logger, format!("Could not delete probe file: {}", e)),
    }
}
