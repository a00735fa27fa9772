//! Guards exporting and starting a new class behind the shared admin
//! code.
//!
//! ```text
//! Idle --request--> PromptOpen(action) --submit--> Verifying(action)
//!   ^                  |    ^                          |      |
//!   +-----cancel-------+    +------mismatch / abort----+      |
//!   +---------------------------finish------------------------+
//! ```

/// The actions that need the admin code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AdminAction {
    Export,
    StartNewClass,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateState {
    Idle,
    PromptOpen(AdminAction),
    Verifying(AdminAction),
}

/// The result of submitting the entered code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Submission {
    /// The code matched. The gate stays in `Verifying` until the action
    /// calls `finish` or `abort`.
    Authorized(AdminAction),

    /// The code did not match. The prompt stays open with the code
    /// cleared.
    Rejected,

    /// Nothing to submit, or a submission is already being handled.
    Ignored,
}

pub struct AdminGate {
    secret: String,
    state: GateState,
    entered_code: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            state: GateState::Idle,
            entered_code: String::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn entered_code(&self) -> &str {
        &self.entered_code
    }

    /// Returns to `Idle`, forgetting any pending action.
    pub fn reset(&mut self) {
        self.state = GateState::Idle;
        self.entered_code.clear();
    }

    /// Opens the prompt for `action`. Ignored while verifying; an open
    /// prompt switches to the new action.
    pub fn request(&mut self, action: AdminAction) -> bool {
        match self.state {
            GateState::Verifying(_) => false,
            GateState::Idle | GateState::PromptOpen(_) => {
                self.state = GateState::PromptOpen(action);
                self.entered_code.clear();
                true
            }
        }
    }

    /// Updates the code typed into the open prompt.
    pub fn enter_code(&mut self, code: impl Into<String>) {
        if let GateState::PromptOpen(_) = self.state {
            self.entered_code = code.into();
        }
    }

    /// Closes the prompt. Not allowed while verifying.
    pub fn cancel(&mut self) -> bool {
        match self.state {
            GateState::PromptOpen(_) => {
                self.reset();
                true
            }
            GateState::Idle => true,
            GateState::Verifying(_) => false,
        }
    }

    /// Checks the entered code against the secret (case-sensitively).
    pub fn submit(&mut self) -> Submission {
        let action = match self.state {
            GateState::PromptOpen(action) => action,
            GateState::Idle | GateState::Verifying(_) => return Submission::Ignored,
        };

        self.state = GateState::Verifying(action);

        if self.entered_code == self.secret {
            Submission::Authorized(action)
        } else {
            self.state = GateState::PromptOpen(action);
            self.entered_code.clear();
            Submission::Rejected
        }
    }

    /// Ends a verified action that completed.
    pub fn finish(&mut self) {
        if let GateState::Verifying(_) = self.state {
            self.reset();
        }
    }

    /// Ends a verified action that failed, reopening the prompt so it
    /// can be retried.
    pub fn abort(&mut self) {
        if let GateState::Verifying(action) = self.state {
            self.state = GateState::PromptOpen(action);
        }
    }
}
