//! Batch submission
//!
//! This module provides:
//! - The all-or-nothing submission coordinator
//! - Submission outcomes and the messages they notify

pub mod coordinator;
pub mod outcome;

pub use coordinator::{SubmissionCoordinator, DEFAULT_UPLOAD_TIMEOUT};
pub use outcome::{success_message, SubmissionState, SubmitOutcome};
