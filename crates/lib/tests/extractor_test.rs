//! # Extractor Workflow Tests
//!
//! End-to-end runs through `FlavorExtractor`, using the mock provider for the
//! session logic and a `wiremock` server for the full HTTP path.

mod common;

use common::{config_for, setup_tracing};
use flavor_extractor::image::file_to_data_url;
use flavor_extractor::response::to_download_json;
use flavor_extractor::{
    last_output, ExtractError, FlavorExtractor, ParsedOutput, SessionState,
};
use flavor_extractor_test_utils::{
    complete_result, response_envelope, MockVisionProvider, PNG_BYTES,
};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_missing_key_blocks_before_network() {
    let result = FlavorExtractor::builder().api_key("   ").build();
    assert!(matches!(result, Err(ExtractError::MissingApiKey)));
}

#[tokio::test]
async fn test_zero_byte_upload_never_runs() {
    // --- 1. Arrange ---
    setup_tracing();
    let provider = MockVisionProvider::new(response_envelope("{}"));
    let extractor = FlavorExtractor::builder()
        .provider(Box::new(provider.clone()))
        .build()
        .unwrap();
    let mut session = SessionState::new();

    // --- 2. Act ---
    let image = file_to_data_url(&[], Some("image/png"));
    let result = extractor.run_extraction(&mut session, image.as_ref()).await;

    // --- 3. Assert ---
    match result {
        Err(err @ ExtractError::MissingImage) => {
            assert_eq!(err.to_string(), "Please provide a valid image before running.")
        }
        other => panic!("Expected MissingImage, got {other:?}"),
    }
    assert!(provider.get_calls().is_empty());
    assert!(!session.has_result());
}

#[tokio::test]
async fn test_successful_run_is_recorded_in_session() {
    // --- 1. Arrange ---
    setup_tracing();
    let envelope = response_envelope(&complete_result().to_string());
    let provider = MockVisionProvider::new(envelope.clone());
    let extractor = FlavorExtractor::builder()
        .provider(Box::new(provider.clone()))
        .build()
        .unwrap();
    let mut session = SessionState::new();
    let image = file_to_data_url(PNG_BYTES, Some("image/png"));

    // --- 2. Act ---
    let parsed = extractor
        .run_extraction(&mut session, image.as_ref())
        .await
        .unwrap();

    // --- 3. Assert ---
    let ParsedOutput::Json {
        value,
        missing_fields,
        ..
    } = parsed
    else {
        panic!("Expected Json output");
    };
    assert!(missing_fields.is_empty());
    assert_eq!(session.last_response(), Some(&envelope));

    // The download offers exactly the decoded object.
    let document = to_download_json(&value).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&document).unwrap(), complete_result());

    let calls = provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].system_prompt.contains("### Allowed Color Names"));
    assert_eq!(calls[0].image.mime(), "image/png");
}

#[tokio::test]
async fn test_non_json_answer_is_redisplayed_raw() {
    setup_tracing();
    let provider = MockVisionProvider::new(response_envelope("sorry, I cannot process this"));
    let extractor = FlavorExtractor::builder()
        .provider(Box::new(provider))
        .build()
        .unwrap();
    let mut session = SessionState::new();
    let image = file_to_data_url(PNG_BYTES, None);

    let parsed = extractor
        .run_extraction(&mut session, image.as_ref())
        .await
        .unwrap();

    let expected = ParsedOutput::Raw("sorry, I cannot process this".to_string());
    assert_eq!(parsed, expected);
    assert_eq!(last_output(&session), Some(expected));
}

#[tokio::test]
async fn test_failed_run_keeps_previous_result() {
    // --- 1. Arrange ---
    setup_tracing();
    let good = FlavorExtractor::builder()
        .provider(Box::new(MockVisionProvider::new(response_envelope("{}"))))
        .build()
        .unwrap();
    let bad = FlavorExtractor::builder()
        .provider(Box::new(MockVisionProvider::failing()))
        .build()
        .unwrap();
    let mut session = SessionState::new();
    let image = file_to_data_url(PNG_BYTES, Some("image/png"));

    // --- 2. Act ---
    good.run_extraction(&mut session, image.as_ref())
        .await
        .unwrap();
    let result = bad.run_extraction(&mut session, image.as_ref()).await;

    // --- 3. Assert ---
    assert!(matches!(result, Err(ExtractError::Api { status: 401, .. })));
    assert_eq!(session.last_output_text(), Some("{}"));
}

#[tokio::test]
async fn test_check_api_key_updates_session() {
    setup_tracing();
    let extractor = FlavorExtractor::builder()
        .provider(Box::new(MockVisionProvider::failing()))
        .build()
        .unwrap();
    let mut session = SessionState::new();

    let status = extractor.check_api_key(&mut session).await;

    assert!(!status.ok);
    assert_eq!(session.api_key_status(), Some(&status));
}

#[tokio::test]
async fn test_full_http_run_against_mock_api() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(response_envelope(
                r#"{"flavors_list":["Strazzberry"],"brand_name":"Acme"}"#,
            )),
        )
        .expect(1)
        .mount(&server)
        .await;
    let extractor = FlavorExtractor::builder()
        .config(config_for(&server))
        .api_key("sk-test")
        .build()
        .unwrap();
    let mut session = SessionState::new();
    let image = file_to_data_url(PNG_BYTES, Some("image/png"));

    // --- 2. Act ---
    let parsed = extractor
        .run_extraction(&mut session, image.as_ref())
        .await
        .unwrap();

    // --- 3. Assert ---
    match parsed {
        ParsedOutput::Json {
            value,
            missing_fields,
            ..
        } => {
            assert_eq!(value["flavors_list"][0], "Strazzberry");
            assert_eq!(missing_fields.len(), 7);
        }
        other => panic!("Expected Json output, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_output_falls_back_to_raw_response() {
    setup_tracing();
    let envelope = serde_json::json!({"output": [], "status": "incomplete"});
    let extractor = FlavorExtractor::builder()
        .provider(Box::new(MockVisionProvider::new(envelope.clone())))
        .build()
        .unwrap();
    let mut session = SessionState::new();
    let image = file_to_data_url(PNG_BYTES, Some("image/png"));

    let parsed = extractor
        .run_extraction(&mut session, image.as_ref())
        .await
        .unwrap();

    assert_eq!(parsed, ParsedOutput::Empty);
    assert_eq!(session.last_response(), Some(&envelope));
}
