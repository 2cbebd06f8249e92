//! `/predict` integration tests.

use std::io::Write;
use std::time::Duration;

use produce_client::{ClientConfig, ClientError, Prediction, PredictionClient, UploadFile};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{client_for, form_part, form_parts, strict_client_for, unused_local_port};

#[tokio::test]
async fn test_predict_returns_service_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"label": "cat", "confidence": 0.97})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.predict(b"\x89PNG\r\n\x1a\nfake".to_vec()).await.unwrap();

    assert_eq!(result, json!({"label": "cat", "confidence": 0.97}));
}

#[tokio::test]
async fn test_predict_sends_single_file_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    // Include CRLF and NUL bytes so the part boundary handling is exercised.
    let payload: Vec<u8> = (0u8..=255).chain(b"\r\n--\r\n\0".iter().copied()).collect();
    let client = client_for(&server);
    client.predict(payload.clone()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(request.method.as_str(), "POST");
    assert_eq!(request.url.path(), "/predict");
    let parts = form_parts(request).await;
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name, "file");
    assert_eq!(parts[0].file_name.as_deref(), Some("upload"));
    assert_eq!(parts[0].data, payload);
}

#[tokio::test]
async fn test_predict_payload_resembling_form_headers_stays_one_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = b"x; name=\"label\" y\r\nContent-Disposition: form-data; name=\"extra\"\r\n".to_vec();
    let client = client_for(&server);
    client.predict(payload.clone()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let parts = form_parts(&requests[0]).await;
    let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["file"]);
    assert_eq!(parts[0].data, payload);
}

#[tokio::test]
async fn test_predict_target_ignores_input_and_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .expect(2)
        .mount(&server)
        .await;

    let client = PredictionClient::new(ClientConfig::new(format!("{}/", server.uri()))).unwrap();
    client.predict(Vec::<u8>::new()).await.unwrap();
    client
        .predict(UploadFile::new(b"predict?x=1".to_vec()).with_file_name("../../etc"))
        .await
        .unwrap();

    for request in server.received_requests().await.unwrap() {
        assert_eq!(request.url.path(), "/predict");
        assert_eq!(request.url.query(), None);
    }
}

#[tokio::test]
async fn test_predict_non_json_body_is_decode_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.predict(b"image").await.unwrap_err();

    assert!(err.is_decode(), "unexpected error: {err:?}");
    match err {
        ClientError::Decode { body, .. } => assert_eq!(body, "<html>Bad Gateway</html>"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_predict_unreachable_service_is_transport_error() {
    let port = unused_local_port();
    let client = PredictionClient::new(ClientConfig::new(format!("http://127.0.0.1:{port}")))
        .unwrap();

    let err = client.predict(b"image").await.unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_predict_timeout_is_transport_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"label": "cat", "confidence": 0.97}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).with_timeout(Duration::from_millis(200));
    let client = PredictionClient::new(config).unwrap();
    let err = client.predict(b"image").await.unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
    match &err {
        ClientError::Transport(e) => assert!(e.is_timeout(), "not a timeout: {e:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_predict_passes_through_error_status_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Model not loaded"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.predict(b"image").await.unwrap();

    assert_eq!(result, json!({"detail": "Model not loaded"}));
}

#[tokio::test]
async fn test_strict_policy_surfaces_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Model not loaded"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = strict_client_for(&server);
    let err = client.predict(b"image").await.unwrap_err();

    assert_eq!(err.http_status(), Some(500));
    match err {
        ClientError::Status { body, .. } => assert!(body.contains("Model not loaded")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_predict_as_decodes_typed_prediction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"label": "banana", "confidence": 0.8125})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let prediction: Prediction = client.predict_as(b"image").await.unwrap();

    assert_eq!(
        prediction,
        Prediction {
            label: "banana".to_string(),
            confidence: 0.8125,
        }
    );
}

#[tokio::test]
async fn test_predict_as_shape_mismatch_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"confidence": 0.8})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.predict_as::<Prediction>(b"image").await.unwrap_err();

    assert!(err.is_decode());
}

#[tokio::test]
async fn test_predict_as_error_status_is_reported_under_default_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Model not loaded"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.predict_as::<Prediction>(b"image").await.unwrap_err();

    assert_eq!(err.http_status(), Some(500));
}

#[tokio::test]
async fn test_predict_path_sends_file_name_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"label": "apple", "confidence": 0.99})),
        )
        .mount(&server)
        .await;

    let mut temp = tempfile::Builder::new()
        .prefix("apple_01")
        .suffix(".jpg")
        .tempfile()
        .unwrap();
    temp.write_all(b"\xff\xd8\xff\xe0apple").unwrap();

    let client = client_for(&server);
    let result = client.predict_path(temp.path()).await.unwrap();
    assert_eq!(result["label"], "apple");

    let requests = server.received_requests().await.unwrap();
    let part = form_part(&requests[0], "file").await.unwrap();
    assert!(part.file_name.unwrap().starts_with("apple_01"));
    assert_eq!(part.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(part.data, b"\xff\xd8\xff\xe0apple");
}

#[tokio::test]
async fn test_concurrent_predictions_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"label": "x"})))
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handles: Vec<_> = (0u8..4)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move { client.predict(vec![i; 16]).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let mut payloads = Vec::new();
    for request in server.received_requests().await.unwrap() {
        payloads.push(form_part(&request, "file").await.unwrap().data);
    }
    payloads.sort();
    let expected: Vec<Vec<u8>> = (0u8..4).map(|i| vec![i; 16]).collect();
    assert_eq!(payloads, expected);
}
