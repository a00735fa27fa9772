use std::sync::{Mutex, MutexGuard};

use log::{debug, error, info, o, warn};
use time::OffsetDateTime;

use crate::admin::{AdminAction, AdminGate, GateState, Submission};
use crate::csv;
use crate::delivery::{DeliveryOutcome, ExportRequest};
use crate::environment::Environment;
use crate::errors::{CheckInError, StoreError};
use crate::normalization::export_file_name;
use crate::session::Attendee;
use crate::ui::{ExportChoice, Notice, Route};

/// What the attendee list shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    pub class_name: String,
    pub attendees: Vec<Attendee>,
}

/// How an export that did not fail ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExportStatus {
    Delivered,
    Cancelled,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was pending, or another submit is still being handled.
    Ignored,

    /// The admin code was wrong.
    Rejected,

    Exported(ExportStatus),

    /// The old class is gone and the UI is back at setup. `export` says
    /// what happened to the roster on the way out, if it was exported.
    NewClassStarted { export: Option<ExportStatus> },
}

struct ScreenState {
    gate: AdminGate,

    /// The last export that failed, kept for a manual retry.
    retry: Option<ExportRequest>,
}

/// The attendee list screen: shows the roster and runs the admin-gated
/// export and new-class actions.
pub struct AttendeeList {
    environment: Environment,
    state: Mutex<ScreenState>,
}

impl AttendeeList {
    pub fn new(environment: Environment) -> Self {
        let gate = AdminGate::new(environment.config.admin_code.clone());

        Self {
            environment,
            state: Mutex::new(ScreenState { gate, retry: None }),
        }
    }

    /// Prepares the screen: resets the gate and loads a fresh roster.
    pub async fn mount(&self) -> Roster {
        {
            let mut state = self.lock();
            state.gate.reset();
            state.retry = None;
        }

        let Environment { logger, roster, ui, .. } = &self.environment;

        match roster.load().await {
            Ok(Some(session)) => {
                debug!(logger, "Loaded roster"; "class" => &session.name, "attendees" => session.attendees.len());
                Roster {
                    class_name: session.name,
                    attendees: session.attendees,
                }
            }
            Ok(None) => Roster::default(),
            Err(e) => {
                error!(logger, "Failed to load roster: {}", e);
                ui.notify(Notice::LoadFailed { reason: e.to_string() });
                Roster::default()
            }
        }
    }

    pub fn gate_state(&self) -> GateState {
        self.lock().gate.state()
    }

    pub fn request_export(&self) -> bool {
        self.lock().gate.request(AdminAction::Export)
    }

    pub fn request_new_class(&self) -> bool {
        self.lock().gate.request(AdminAction::StartNewClass)
    }

    pub fn enter_code(&self, code: &str) {
        self.lock().gate.enter_code(code);
    }

    pub fn cancel_prompt(&self) -> bool {
        self.lock().gate.cancel()
    }

    /// Submits the entered admin code and, if it matches, runs the
    /// pending action.
    pub async fn submit(&self) -> Result<SubmitOutcome, CheckInError> {
        let logger = &self.environment.logger;
        let submission = self.lock().gate.submit();

        match submission {
            Submission::Ignored => {
                debug!(logger, "Ignoring submit");
                Ok(SubmitOutcome::Ignored)
            }
            Submission::Rejected => {
                info!(logger, "Invalid admin code");
                self.environment.ui.notify(Notice::InvalidAdminCode);
                Ok(SubmitOutcome::Rejected)
            }
            Submission::Authorized(AdminAction::Export) => {
                let result = self.export().await;
                self.lock().gate.finish();

                result.map(SubmitOutcome::Exported)
            }
            Submission::Authorized(AdminAction::StartNewClass) => match self.start_new_class().await {
                Ok(export) => {
                    self.lock().gate.finish();
                    self.environment.ui.navigate(Route::ClassSetup);

                    Ok(SubmitOutcome::NewClassStarted { export })
                }
                Err(e) => {
                    self.lock().gate.abort();
                    Err(e)
                }
            },
        }
    }

    /// Whether a failed export is waiting for a manual retry.
    pub fn can_retry_export(&self) -> bool {
        self.lock().retry.is_some()
    }

    /// Hands the last failed export to the platform again. Returns
    /// `None` when there is nothing to retry.
    pub async fn retry_export(&self) -> Option<Result<ExportStatus, CheckInError>> {
        let request = self.lock().retry.take()?;

        debug!(self.environment.logger, "Retrying export"; "class" => &request.class_name);
        Some(
            self.deliver(ExportRequest {
                requested_at: OffsetDateTime::now_utc(),
                ..request
            })
            .await,
        )
    }

    async fn export(&self) -> Result<ExportStatus, CheckInError> {
        let Environment { logger, roster, ui, .. } = &self.environment;

        let session = roster.load().await.map_err(|e| {
            error!(logger, "Failed to load roster for export: {}", e);
            ui.notify(Notice::LoadFailed { reason: e.to_string() });
            e
        })?;

        let Roster {
            class_name,
            attendees,
        } = session
            .map(|session| Roster {
                class_name: session.name,
                attendees: session.attendees,
            })
            .unwrap_or_default();

        debug!(logger, "Encoding roster..."; "class" => &class_name, "attendees" => attendees.len());
        let request = ExportRequest {
            csv: csv::encode_roster(&attendees),
            file_name: export_file_name(&class_name),
            class_name,
            requested_at: OffsetDateTime::now_utc(),
        };

        self.deliver(request).await
    }

    async fn deliver(&self, request: ExportRequest) -> Result<ExportStatus, CheckInError> {
        let Environment {
            logger, delivery, ui, ..
        } = &self.environment;
        let logger = logger.new(o!("class" => request.class_name.clone()));

        match delivery.deliver(request.clone()).await {
            DeliveryOutcome::Delivered => {
                info!(logger, "Export delivered");
                ui.notify(Notice::Exported);
                Ok(ExportStatus::Delivered)
            }
            DeliveryOutcome::UserCancelled => {
                info!(logger, "Export cancelled");
                Ok(ExportStatus::Cancelled)
            }
            DeliveryOutcome::Failed(e) => {
                error!(logger, "Export failed: {}", e);
                self.lock().retry = Some(request);
                ui.notify(Notice::ExportFailed { reason: e.to_string() });
                Err(e.into())
            }
        }
    }

    async fn start_new_class(&self) -> Result<Option<ExportStatus>, CheckInError> {
        let Environment { logger, roster, ui, .. } = &self.environment;

        let session = match roster.load().await {
            Ok(session) => session,
            Err(e @ StoreError::MalformedRecord { .. }) => {
                warn!(logger, "Clearing unreadable class: {}", e);
                None
            }
            Err(e) => {
                error!(logger, "Failed to load roster before clearing: {}", e);
                ui.notify(Notice::LoadFailed { reason: e.to_string() });
                return Err(e.into());
            }
        };
        let has_attendees = session.map_or(false, |session| !session.attendees.is_empty());

        let export = if has_attendees {
            match ui.choose_export_before_clear().await {
                ExportChoice::ExportThenClear => match self.export().await {
                    Ok(status) => Some(status),
                    Err(CheckInError::Export(_)) => Some(ExportStatus::Failed),
                    Err(e) => return Err(e),
                },
                ExportChoice::ClearOnly => None,
            }
        } else {
            None
        };

        if let Err(e) = roster.clear().await {
            error!(logger, "Failed to clear class: {}", e);
            ui.notify(Notice::ClearFailed { reason: e.to_string() });
            return Err(e.into());
        }

        info!(logger, "Class cleared"; "exported" => format!("{:?}", export));
        Ok(export)
    }

    fn lock(&self) -> MutexGuard<ScreenState> {
        self.state.lock().unwrap()
    }
}
