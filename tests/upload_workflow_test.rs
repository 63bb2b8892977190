//! Integration tests for the upload workflow against a mock product service

use bytes::Bytes;
use mockito::{Matcher, Server};
use std::sync::Arc;
use stockroom::adapters::catalog::{HttpCatalogClient, ProductApi};
use stockroom::config::{ApiConfig, RetryConfig};
use stockroom::core::notify::RecordingNotifier;
use stockroom::core::progress::ProgressReporter;
use stockroom::core::session::UploadSession;
use stockroom::core::submit::{SubmissionCoordinator, SubmitOutcome};
use stockroom::core::validation::{FileRules, NAME_REQUIRED, PRICE_NOT_POSITIVE};
use stockroom::domain::{Field, ProductDraft, SelectedFile, SubmissionRecord};

const BULK_UPLOAD: &str = "/api/products/bulk-upload";

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        retry: RetryConfig {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        },
        ..Default::default()
    }
}

fn setup(base_url: String) -> (SubmissionCoordinator, Arc<RecordingNotifier>) {
    let client = HttpCatalogClient::new(&api_config(base_url))
        .unwrap()
        .with_chunk_size(4);
    let notifier = Arc::new(RecordingNotifier::new());
    let coordinator = SubmissionCoordinator::new(Arc::new(client), notifier.clone());
    (coordinator, notifier)
}

fn image(name: &str) -> SelectedFile {
    SelectedFile::new(name, "image/png", Bytes::from_static(b"fake-png-bytes"))
}

fn session_with(drafts: Vec<ProductDraft>) -> UploadSession {
    let files = (0..drafts.len())
        .map(|i| image(&format!("item{i}.png")))
        .collect();
    let mut session = UploadSession::new();
    session.select_files(files, &FileRules::default(), &RecordingNotifier::new());
    for (i, draft) in drafts.into_iter().enumerate() {
        session.fill_draft(i, draft).unwrap();
    }
    session
}

fn draft(name: &str, price: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        price: price.to_string(),
        ..Default::default()
    }
}

fn created_body(names: &[&str]) -> String {
    let products: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            serde_json::json!({
                "id": format!("p-{i}"),
                "name": name,
                "description": "",
                "price": 10.0,
                "category": "",
                "imageUrl": format!("http://localhost:8080/images/p-{i}.png"),
                "createdAt": "2025-03-01T09:30:00"
            })
        })
        .collect();
    serde_json::json!({
        "success": true,
        "message": "Products uploaded successfully",
        "data": products,
        "timestamp": "2025-03-01T09:30:00"
    })
    .to_string()
}

#[tokio::test]
async fn test_single_draft_sends_one_request_with_parsed_price() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", BULK_UPLOAD)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="images"; filename="item0.png""#.to_string()),
            Matcher::Regex("fake-png-bytes".to_string()),
            Matcher::Regex(r#"name="productData""#.to_string()),
            Matcher::Regex(
                r#"\[\{"name":"A","description":"","price":10(\.0)?,"category":""\}\]"#
                    .to_string(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(created_body(&["A"]))
        .expect(1)
        .create_async()
        .await;

    let (coordinator, notifier) = setup(server.url());
    let mut session = session_with(vec![draft("A", "10")]);

    let outcome = coordinator.submit(&mut session).await;

    mock.assert_async().await;
    let SubmitOutcome::Success { count, created, .. } = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(count, 1);
    assert_eq!(created[0].name, "A");
    assert!(session.is_empty());
    assert_eq!(*coordinator.progress().borrow(), 100);
    assert_eq!(notifier.successes(), vec!["Successfully uploaded 1 product!"]);
}

#[tokio::test]
async fn test_images_are_sent_in_selection_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", BULK_UPLOAD)
        .match_body(Matcher::Regex(
            r#"(?s)filename="item0.png".*filename="item1.png".*filename="item2.png".*name="productData".*"name":"First".*"name":"Second".*"name":"Third""#
                .to_string(),
        ))
        .with_status(200)
        .with_body(created_body(&["First", "Second", "Third"]))
        .expect(1)
        .create_async()
        .await;

    let (coordinator, notifier) = setup(server.url());
    let mut session = session_with(vec![
        draft("First", "1"),
        draft("Second", "2"),
        draft("Third", "3"),
    ]);

    assert!(coordinator.submit(&mut session).await.is_success());
    mock.assert_async().await;
    assert_eq!(notifier.successes(), vec!["Successfully uploaded 3 products!"]);
}

#[tokio::test]
async fn test_server_rejection_keeps_session_for_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", BULK_UPLOAD)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"message":"Duplicate category","data":null}"#)
        .expect(1)
        .create_async()
        .await;

    let (coordinator, notifier) = setup(server.url());
    let mut session = session_with(vec![draft("A", "10"), draft("B", "20")]);
    let before = session.clone();

    let outcome = coordinator.submit(&mut session).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        SubmitOutcome::ServerRejection {
            message: "Duplicate category".to_string()
        }
    );
    assert_eq!(session, before);
    assert_eq!(coordinator.last_error().as_deref(), Some("Duplicate category"));
    assert_eq!(notifier.errors(), vec!["Duplicate category"]);
    assert!(notifier.successes().is_empty());
}

#[tokio::test]
async fn test_invalid_draft_blocks_every_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", BULK_UPLOAD)
        .expect(0)
        .create_async()
        .await;

    let (coordinator, notifier) = setup(server.url());
    let mut session = session_with(vec![
        draft("Valid", "5"),
        draft("  ", "5"),
        draft("Free", "0"),
        draft("Also valid", "1.25"),
    ]);

    let outcome = coordinator.submit(&mut session).await;

    mock.assert_async().await;
    let SubmitOutcome::ValidationFailure { errors, .. } = outcome else {
        panic!("expected validation failure, got {outcome:?}");
    };
    assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(errors[&1][&Field::Name], NAME_REQUIRED);
    assert_eq!(errors[&2][&Field::Price], PRICE_NOT_POSITIVE);
    assert_eq!(session.len(), 4);
    assert_eq!(
        notifier.errors(),
        vec!["Please fix the form errors before uploading"]
    );
}

#[tokio::test]
async fn test_http_error_status_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", BULK_UPLOAD)
        .with_status(500)
        .with_body(r#"{"success":false,"message":"Failed to upload products: disk full"}"#)
        .expect(1)
        .create_async()
        .await;

    let (coordinator, notifier) = setup(server.url());
    let mut session = session_with(vec![draft("A", "10")]);

    let outcome = coordinator.submit(&mut session).await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        SubmitOutcome::TransportFailure {
            message: "HTTP error! status: 500".to_string()
        }
    );
    assert_eq!(session.len(), 1);
    assert_eq!(notifier.errors(), vec!["HTTP error! status: 500"]);
}

#[tokio::test]
async fn test_malformed_success_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", BULK_UPLOAD)
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let (coordinator, _) = setup(server.url());
    let mut session = session_with(vec![draft("A", "10")]);

    let outcome = coordinator.submit(&mut session).await;

    assert_eq!(outcome.error_message(), Some("Invalid JSON response"));
    assert_eq!(session.len(), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Nothing listens on port 1
    let (coordinator, notifier) = setup("http://127.0.0.1:1".to_string());
    let mut session = session_with(vec![draft("A", "10")]);

    let outcome = coordinator.submit(&mut session).await;

    let message = outcome.error_message().unwrap_or_default().to_string();
    assert!(message.starts_with("Network error: "), "got {message}");
    assert_eq!(notifier.errors(), vec![message]);
    assert_eq!(session.len(), 1);
}

#[tokio::test]
async fn test_byte_progress_reaches_total_once_body_is_sent() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", BULK_UPLOAD)
        .with_status(200)
        .with_body(created_body(&["A", "B"]))
        .create_async()
        .await;

    let client = HttpCatalogClient::new(&api_config(server.url()))
        .unwrap()
        .with_chunk_size(3);
    let files = vec![image("a.png"), image("b.png")];
    let records = vec![
        SubmissionRecord::from_draft(&draft("A", "1")).unwrap(),
        SubmissionRecord::from_draft(&draft("B", "2")).unwrap(),
    ];
    let progress = ProgressReporter::new();

    let response = client
        .bulk_upload(&files, &records, progress.clone())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(progress.current(), 100);
}
