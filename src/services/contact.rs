//! Contact-form submission: field validation plus the in-flight /
//! confirmed / failed state machine behind the submit button.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::ContactSubmission;

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn field_error(field: &'static str, message: &'static str) -> FieldError {
    FieldError { field, message }
}

/// Validate a submission before anything leaves the machine. Empty result
/// means the form may be sent.
pub fn validate(submission: &ContactSubmission) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if submission.name.trim().is_empty() {
        errors.push(field_error("name", "Name is required"));
    }
    let email = submission.email.trim();
    if email.is_empty() {
        errors.push(field_error("email", "Email is required"));
    } else if !plausible_email(email) {
        errors.push(field_error("email", "Email address doesn't look right"));
    }
    if submission.message.trim().is_empty() {
        errors.push(field_error("message", "Message is required"));
    }
    errors
}

/// Shallow shape check only: one '@' with text either side and a dot in the
/// domain. Real verification is the mail server's job.
fn plausible_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

// ============================================================================
// Submission state machine
// ============================================================================

/// Where the form currently stands. Serialized for the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ContactFormState {
    Idle,
    Submitting,
    Confirmed { confirmed_at: DateTime<Utc> },
    Failed { message: String },
}

/// What `begin_submit` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission may go out, tagged with this id. The id travels with
    /// the request so a retry after a lost response stays deduplicable.
    Started { submission_id: Uuid },
    /// A submission is already in flight; the press is dropped.
    AlreadyInFlight,
    /// Validation failed; nothing was sent.
    Invalid(Vec<FieldError>),
}

pub struct ContactFormController {
    state: ContactFormState,
    /// How long a confirmation stays on screen before the form resets.
    confirmation_secs: i64,
}

impl ContactFormController {
    pub fn new(confirmation_secs: u64) -> Self {
        Self {
            state: ContactFormState::Idle,
            confirmation_secs: confirmation_secs as i64,
        }
    }

    pub fn state(&self) -> &ContactFormState {
        &self.state
    }

    /// A submit press. Only an idle (or previously failed) form with valid
    /// fields actually starts a submission; repeat presses while one is in
    /// flight are ignored rather than queued.
    pub fn begin_submit(&mut self, submission: &ContactSubmission) -> SubmitOutcome {
        if matches!(self.state, ContactFormState::Submitting) {
            return SubmitOutcome::AlreadyInFlight;
        }
        let errors = validate(submission);
        if !errors.is_empty() {
            return SubmitOutcome::Invalid(errors);
        }
        self.state = ContactFormState::Submitting;
        SubmitOutcome::Started {
            submission_id: Uuid::new_v4(),
        }
    }

    /// The in-flight submission finished.
    pub fn complete(&mut self, result: Result<(), String>, now: DateTime<Utc>) {
        if !matches!(self.state, ContactFormState::Submitting) {
            return;
        }
        self.state = match result {
            Ok(()) => ContactFormState::Confirmed { confirmed_at: now },
            Err(message) => {
                log::warn!("contact submission failed: {}", message);
                ContactFormState::Failed { message }
            }
        };
    }

    /// Return a stale confirmation to idle. True when the state changed.
    pub fn maybe_reset(&mut self, now: DateTime<Utc>) -> bool {
        if let ContactFormState::Confirmed { confirmed_at } = self.state {
            if (now - confirmed_at).num_seconds() >= self.confirmation_secs {
                self.state = ContactFormState::Idle;
                return true;
            }
        }
        false
    }

    /// The user dismissed a failure message; the form is editable again.
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.state, ContactFormState::Failed { .. }) {
            self.state = ContactFormState::Idle;
        }
    }
}
