//! Batch submission coordinator
//!
//! Gates a whole [`UploadSession`] on draft validation, sends every file and
//! record in one request, and turns whatever comes back into a
//! [`SubmitOutcome`] plus exactly one notification.

use super::outcome::{
    success_message, SubmissionState, SubmitOutcome, FILES_MUST_MATCH, FIX_FORM_ERRORS,
    UPLOAD_FAILED,
};
use crate::adapters::catalog::ProductApi;
use crate::core::notify::Notifier;
use crate::core::progress::ProgressReporter;
use crate::core::session::{errors_by_field, UploadSession, ValidationErrorMap};
use crate::core::validation::{validate_product_form, PRICE_NOT_POSITIVE};
use crate::domain::{
    ApiError, Field, FieldError, SelectedFile, StockroomError, SubmissionRecord,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Default deadline for one bulk upload
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Drives submissions against a [`ProductApi`]
///
/// One submission at a time: a `submit` that arrives while another is in
/// flight returns [`SubmitOutcome::Busy`].
pub struct SubmissionCoordinator {
    api: Arc<dyn ProductApi>,
    notifier: Arc<dyn Notifier>,
    progress: ProgressReporter,
    submitting: AtomicBool,
    last_error: Mutex<Option<String>>,
    refresh_tx: watch::Sender<u64>,
    upload_timeout: Duration,
}

impl SubmissionCoordinator {
    /// Create a coordinator with the default upload deadline
    pub fn new(api: Arc<dyn ProductApi>, notifier: Arc<dyn Notifier>) -> Self {
        let (refresh_tx, _rx) = watch::channel(0);
        Self {
            api,
            notifier,
            progress: ProgressReporter::new(),
            submitting: AtomicBool::new(false),
            last_error: Mutex::new(None),
            refresh_tx,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    /// Set the deadline for the upload call
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Current state
    pub fn state(&self) -> SubmissionState {
        if self.submitting.load(Ordering::Acquire) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    /// Upload progress, 0..=100
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Bumped after every successful upload; catalog views re-fetch on change
    pub fn refresh_signal(&self) -> watch::Receiver<u64> {
        self.refresh_tx.subscribe()
    }

    /// Message of the most recent failed upload, cleared when a new one starts
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Validate and upload everything in `session`
    ///
    /// On success the session is reset; on any failure it is left as is
    /// (except for validation failures, which replace its errors).
    pub async fn submit(&self, session: &mut UploadSession) -> SubmitOutcome {
        let Some(_guard) = SubmittingGuard::acquire(&self.submitting) else {
            tracing::debug!("Submission already in flight");
            return SubmitOutcome::Busy;
        };

        let records = match build_records(session) {
            Ok(records) => records,
            Err(errors) => {
                tracing::info!(invalid_drafts = errors.len(), "Drafts failed validation");
                session.replace_errors(errors);
                self.notifier.error(FIX_FORM_ERRORS);
                return SubmitOutcome::ValidationFailure {
                    message: FIX_FORM_ERRORS.to_string(),
                    errors: session.errors(),
                };
            }
        };

        self.set_last_error(None);

        if session.is_empty() || session.len() != records.len() {
            self.set_last_error(Some(FILES_MUST_MATCH.to_string()));
            self.notifier.error(FILES_MUST_MATCH);
            return SubmitOutcome::Inconsistent {
                message: FILES_MUST_MATCH.to_string(),
            };
        }

        let files: Vec<SelectedFile> = session.files().cloned().collect();
        let count = files.len();

        crate::log_upload_start!(count, session.total_bytes());
        self.progress.reset();
        let started = Instant::now();

        let call = self
            .api
            .bulk_upload(&files, &records, self.progress.clone());
        let outcome = match tokio::time::timeout(self.upload_timeout, call).await {
            Err(_) => SubmitOutcome::TransportFailure {
                message: format!(
                    "Upload timed out after {}s",
                    self.upload_timeout.as_secs()
                ),
            },
            Ok(Err(StockroomError::Api(e))) => SubmitOutcome::TransportFailure {
                message: e.to_string(),
            },
            Ok(Err(e)) => {
                crate::log_error_with_context!(&e, "Bulk upload failed unexpectedly");
                SubmitOutcome::TransportFailure {
                    message: UPLOAD_FAILED.to_string(),
                }
            }
            Ok(Ok(response)) => match response.into_data() {
                Ok(created) => {
                    self.progress.complete();
                    SubmitOutcome::Success {
                        count,
                        created: created.unwrap_or_default(),
                        duration: started.elapsed(),
                    }
                }
                Err(ApiError::Rejected(message)) if !message.is_empty() => {
                    SubmitOutcome::ServerRejection { message }
                }
                Err(_) => SubmitOutcome::ServerRejection {
                    message: UPLOAD_FAILED.to_string(),
                },
            },
        };

        match &outcome {
            SubmitOutcome::Success { duration, .. } => {
                crate::log_upload_complete!(count, duration);
                self.notifier.success(&success_message(count));
                session.reset();
                self.refresh_tx.send_modify(|generation| *generation += 1);
            }
            failed => {
                let message = failed.error_message().unwrap_or(UPLOAD_FAILED);
                tracing::warn!(files = count, error = %message, "Bulk upload failed");
                self.set_last_error(Some(message.to_string()));
                self.notifier.error(message);
            }
        }

        outcome
    }

    fn set_last_error(&self, message: Option<String>) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }
}

/// Validate every draft and build its record
///
/// `Err` carries one message per failing field for every invalid draft.
fn build_records(
    session: &UploadSession,
) -> Result<Vec<SubmissionRecord>, ValidationErrorMap> {
    let mut records = Vec::with_capacity(session.len());
    let mut errors = ValidationErrorMap::new();

    for (index, draft) in session.drafts().enumerate() {
        let mut problems = validate_product_form(draft);
        if problems.is_empty() {
            match SubmissionRecord::from_draft(draft) {
                Some(record) => {
                    records.push(record);
                    continue;
                }
                None => problems.push(FieldError::new(Field::Price, PRICE_NOT_POSITIVE)),
            }
        }
        errors.insert(index, errors_by_field(problems));
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(errors)
    }
}

/// Holds the coordinator in [`SubmissionState::Submitting`] until dropped
struct SubmittingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notify::RecordingNotifier;
    use crate::core::validation::{FileRules, NAME_REQUIRED, PRICE_REQUIRED};
    use crate::domain::{
        ApiError, ApiResponse, HealthStatus, PagedResponse, Product, ProductDraft, ProductId,
        Result,
    };
    use async_trait::async_trait;
    use bytes::Bytes;

    /// Records calls and answers with a canned result
    struct StubApi {
        calls: Mutex<Vec<Vec<SubmissionRecord>>>,
        answer: fn() -> Result<ApiResponse<Vec<Product>>>,
        delay: Duration,
    }

    impl StubApi {
        fn new(answer: fn() -> Result<ApiResponse<Vec<Product>>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                answer,
                delay: Duration::ZERO,
            }
        }

        fn calls(&self) -> Vec<Vec<SubmissionRecord>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductApi for StubApi {
        async fn fetch_page(
            &self,
            _page: usize,
            _size: usize,
        ) -> Result<ApiResponse<PagedResponse<Product>>> {
            unimplemented!()
        }

        async fn bulk_upload(
            &self,
            files: &[SelectedFile],
            records: &[SubmissionRecord],
            progress: ProgressReporter,
        ) -> Result<ApiResponse<Vec<Product>>> {
            assert_eq!(files.len(), records.len());
            self.calls.lock().unwrap().push(records.to_vec());
            progress.report_bytes(97, 100);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.answer)()
        }

        async fn get_product(&self, _id: &ProductId) -> Result<ApiResponse<Product>> {
            unimplemented!()
        }

        async fn health(&self) -> Result<ApiResponse<HealthStatus>> {
            unimplemented!()
        }

        fn base_url(&self) -> &str {
            "http://stub"
        }
    }

    fn accepted() -> Result<ApiResponse<Vec<Product>>> {
        Ok(ApiResponse {
            success: true,
            message: "Products uploaded successfully".to_string(),
            data: Some(Vec::new()),
            timestamp: String::new(),
        })
    }

    fn duplicate_category() -> Result<ApiResponse<Vec<Product>>> {
        Ok(ApiResponse {
            success: false,
            message: "Duplicate category".to_string(),
            data: None,
            timestamp: String::new(),
        })
    }

    fn unreachable_server() -> Result<ApiResponse<Vec<Product>>> {
        Err(ApiError::ConnectionFailed("connection refused".to_string()).into())
    }

    fn session_of(drafts: &[(&str, &str)]) -> UploadSession {
        let files = drafts
            .iter()
            .enumerate()
            .map(|(i, _)| {
                SelectedFile::new(format!("{i}.png"), "image/png", Bytes::from_static(b"img"))
            })
            .collect();
        let mut session = UploadSession::new();
        session.select_files(files, &FileRules::default(), &RecordingNotifier::new());
        for (i, (name, price)) in drafts.iter().enumerate() {
            session
                .fill_draft(
                    i,
                    ProductDraft {
                        name: name.to_string(),
                        price: price.to_string(),
                        ..Default::default()
                    },
                )
                .unwrap();
        }
        session
    }

    fn coordinator(api: Arc<StubApi>) -> (SubmissionCoordinator, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (SubmissionCoordinator::new(api, notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_success_resets_session_and_forces_full_progress() {
        let api = Arc::new(StubApi::new(accepted));
        let (coordinator, notifier) = coordinator(api.clone());
        let mut refresh = coordinator.refresh_signal();
        let mut session = session_of(&[("A", "10"), ("B", "2.5")]);

        let outcome = coordinator.submit(&mut session).await;

        assert!(outcome.is_success());
        assert_eq!(*coordinator.progress().borrow(), 100);
        assert!(session.is_empty());
        assert_eq!(notifier.successes(), vec!["Successfully uploaded 2 products!"]);
        assert!(notifier.errors().is_empty());
        assert!(refresh.has_changed().unwrap());
        assert_eq!(*refresh.borrow_and_update(), 1);
        assert_eq!(coordinator.state(), SubmissionState::Idle);

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].price, 10.0);
        assert_eq!(calls[0][1].name, "B");
    }

    #[tokio::test]
    async fn test_single_product_message_is_singular() {
        let (coordinator, notifier) = coordinator(Arc::new(StubApi::new(accepted)));
        let mut session = session_of(&[("A", "10")]);
        coordinator.submit(&mut session).await;
        assert_eq!(notifier.successes(), vec!["Successfully uploaded 1 product!"]);
    }

    #[tokio::test]
    async fn test_any_invalid_draft_blocks_whole_batch() {
        let api = Arc::new(StubApi::new(accepted));
        let (coordinator, notifier) = coordinator(api.clone());
        let mut session = session_of(&[("A", "10"), ("", "5"), ("C", "1"), ("D", "")]);

        let outcome = coordinator.submit(&mut session).await;

        assert!(api.calls().is_empty());
        let SubmitOutcome::ValidationFailure { message, errors } = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(message, FIX_FORM_ERRORS);
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(errors[&1][&Field::Name], NAME_REQUIRED);
        assert_eq!(errors[&3][&Field::Price], PRICE_REQUIRED);
        assert_eq!(session.errors(), errors);
        assert_eq!(notifier.errors(), vec![FIX_FORM_ERRORS]);
        assert_eq!(session.len(), 4);
        assert_eq!(coordinator.last_error(), None);
    }

    #[tokio::test]
    async fn test_validation_failure_drops_file_errors() {
        let api = Arc::new(StubApi::new(accepted));
        let (coordinator, _) = coordinator(api);
        let mut session = UploadSession::new();
        let huge = SelectedFile::new("huge.png", "image/png", Bytes::new())
            .with_declared_size(6 * 1024 * 1024);
        let ok = SelectedFile::new("ok.png", "image/png", Bytes::from_static(b"x"));
        session.select_files(vec![huge, ok], &FileRules::default(), &RecordingNotifier::new());
        assert!(session.entry(0).unwrap().error(Field::File).is_some());

        coordinator.submit(&mut session).await;

        let errors = session.errors();
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(errors[&0].get(&Field::File).is_none());
    }

    #[tokio::test]
    async fn test_server_rejection_preserves_session() {
        let (coordinator, notifier) = coordinator(Arc::new(StubApi::new(duplicate_category)));
        let mut session = session_of(&[("A", "10")]);
        let before = session.clone();

        let outcome = coordinator.submit(&mut session).await;

        assert_eq!(
            outcome,
            SubmitOutcome::ServerRejection {
                message: "Duplicate category".to_string()
            }
        );
        assert_eq!(session, before);
        assert_eq!(notifier.errors(), vec!["Duplicate category"]);
        assert_eq!(coordinator.last_error().as_deref(), Some("Duplicate category"));
        assert_ne!(*coordinator.progress().borrow(), 100);
    }

    #[tokio::test]
    async fn test_rejection_without_message_falls_back() {
        fn silent_rejection() -> Result<ApiResponse<Vec<Product>>> {
            Ok(ApiResponse {
                success: false,
                message: String::new(),
                data: None,
                timestamp: String::new(),
            })
        }
        let (coordinator, notifier) = coordinator(Arc::new(StubApi::new(silent_rejection)));
        let mut session = session_of(&[("A", "10")]);

        let outcome = coordinator.submit(&mut session).await;

        assert_eq!(
            outcome,
            SubmitOutcome::ServerRejection {
                message: UPLOAD_FAILED.to_string()
            }
        );
        assert_eq!(notifier.errors(), vec![UPLOAD_FAILED]);
        assert_eq!(session.len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_message() {
        let (coordinator, notifier) = coordinator(Arc::new(StubApi::new(unreachable_server)));
        let mut session = session_of(&[("A", "10")]);

        let outcome = coordinator.submit(&mut session).await;

        assert_eq!(
            outcome.error_message(),
            Some("Network error: connection refused")
        );
        assert_eq!(session.len(), 1);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_session_is_not_sent() {
        let api = Arc::new(StubApi::new(accepted));
        let (coordinator, notifier) = coordinator(api.clone());
        let mut session = UploadSession::new();

        let outcome = coordinator.submit(&mut session).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Inconsistent {
                message: FILES_MUST_MATCH.to_string()
            }
        );
        assert!(api.calls().is_empty());
        assert_eq!(notifier.errors(), vec![FILES_MUST_MATCH]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_timeout_preserves_session() {
        let mut stub = StubApi::new(accepted);
        stub.delay = Duration::from_secs(600);
        let notifier = Arc::new(RecordingNotifier::new());
        let coordinator = SubmissionCoordinator::new(Arc::new(stub), notifier.clone())
            .with_upload_timeout(Duration::from_secs(5));
        let mut session = session_of(&[("A", "10")]);

        let outcome = coordinator.submit(&mut session).await;

        assert_eq!(outcome.error_message(), Some("Upload timed out after 5s"));
        assert_eq!(session.len(), 1);
        assert_eq!(coordinator.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_busy() {
        let mut stub = StubApi::new(accepted);
        stub.delay = Duration::from_millis(200);
        let api = Arc::new(stub);
        let (coordinator, _) = coordinator(api.clone());
        let mut first = session_of(&[("A", "10")]);
        let mut second = session_of(&[("B", "20")]);
        let second_before = second.clone();

        let (a, b) = tokio::join!(coordinator.submit(&mut first), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            coordinator.submit(&mut second).await
        });

        assert!(a.is_success());
        assert_eq!(b, SubmitOutcome::Busy);
        assert_eq!(second, second_before);
        assert_eq!(api.calls().len(), 1);
    }

    #[test]
    fn test_build_records_parses_price() {
        let session = session_of(&[("A", " 12.50 ")]);
        let records = build_records(&session).unwrap();
        assert_eq!(records[0].price, 12.5);
        assert_eq!(records[0].description, "");
    }
}
