//! Submission outcomes

use crate::core::session::ValidationErrorMap;
use crate::domain::Product;
use std::time::Duration;

/// Message shown when any draft fails validation
pub const FIX_FORM_ERRORS: &str = "Please fix the form errors before uploading";

/// Message for a submission with nothing selected
pub const FILES_MUST_MATCH: &str = "Files and product data must match";

/// Fallback message for failures that carry no user-facing text
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Notification text for a successful upload of `count` products
pub fn success_message(count: usize) -> String {
    let noun = if count == 1 { "product" } else { "products" };
    format!("Successfully uploaded {count} {noun}!")
}

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Ready to accept a submission
    Idle,
    /// A submission is in flight
    Submitting,
}

/// Result of one call to `SubmissionCoordinator::submit`
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The service accepted the batch; the session was reset
    Success {
        /// Number of products submitted
        count: usize,
        /// Products as returned by the service
        created: Vec<Product>,
        /// Time spent in the upload call
        duration: Duration,
    },

    /// Nothing was sent; the session holds the errors to fix
    ValidationFailure {
        /// Message that was notified
        message: String,
        /// Errors now shown in the session, keyed by draft index
        errors: ValidationErrorMap,
    },

    /// Network failure, non-2xx status, malformed body or timeout
    TransportFailure {
        /// Message that was notified
        message: String,
    },

    /// The service answered with `success: false`
    ServerRejection {
        /// Message from the service
        message: String,
    },

    /// The session itself was unusable (nothing selected, or files and
    /// drafts out of step); nothing was sent
    Inconsistent {
        /// Message that was notified
        message: String,
    },

    /// Another submission is in flight; nothing was done
    Busy,
}

impl SubmitOutcome {
    /// Whether the batch was accepted
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }

    /// User-facing message for failed outcomes
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitOutcome::ValidationFailure { message, .. }
            | SubmitOutcome::TransportFailure { message }
            | SubmitOutcome::ServerRejection { message }
            | SubmitOutcome::Inconsistent { message } => Some(message),
            SubmitOutcome::Success { .. } | SubmitOutcome::Busy => None,
        }
    }
}
