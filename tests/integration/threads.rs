//! Thread, message and run relay integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common::{
    constants::{TEST_RUN_ID, TEST_THREAD_ID},
    test_config, test_server, RelayTestHarness,
};
use crate::mocks::openai::OpenAITestData;

fn thread_path(suffix: &str) -> String {
    format!("/api/openai/threads/{}{}", TEST_THREAD_ID, suffix)
}

#[tokio::test]
async fn test_create_thread() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_create_thread().await;

    let response = harness.server.post("/api/openai/threads").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), OpenAITestData::thread());
    assert_eq!(harness.provider_request_body(0).await, json!({}));
}

#[tokio::test]
async fn test_create_message_forwards_body_verbatim() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_create_message("What is Rust?").await;

    let payload = json!({
        "role": "user",
        "content": "What is Rust?",
        "metadata": { "source": "web" }
    });

    let response = harness
        .server
        .post(&thread_path("/messages"))
        .json(&payload)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), OpenAITestData::message("What is Rust?"));
    assert_eq!(harness.provider_request_body(0).await, payload);
}

#[tokio::test]
async fn test_create_run_forwards_body_verbatim() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_create_run(TEST_RUN_ID).await;

    let payload = json!({ "assistant_id": "asst_test123", "instructions": "Be brief." });

    let response = harness.server.post(&thread_path("/runs")).json(&payload).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "queued");
    assert_eq!(harness.provider_request_body(0).await, payload);
}

#[tokio::test]
async fn test_retrieve_run() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_retrieve_run(TEST_RUN_ID, "completed").await;

    let response = harness
        .server
        .get(&thread_path(&format!("/runs/{}", TEST_RUN_ID)))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        OpenAITestData::run(TEST_RUN_ID, "completed")
    );
}

#[tokio::test]
async fn test_cancel_run() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_cancel_run(TEST_RUN_ID).await;

    let response = harness
        .server
        .post(&thread_path(&format!("/runs/{}/cancel", TEST_RUN_ID)))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "cancelling");
}

#[tokio::test]
async fn test_list_messages() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_list_messages(&["Hello", "World"]).await;

    let response = harness.server.get(&thread_path("/messages")).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        OpenAITestData::message_list(&["Hello", "World"])
    );
}

#[tokio::test]
async fn test_list_messages_forwards_query_parameters() {
    let harness = RelayTestHarness::new().await;
    Mock::given(method("GET"))
        .and(path(format!("/threads/{}/messages", TEST_THREAD_ID)))
        .and(query_param("order", "asc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(OpenAITestData::message_list(&["Hi"])))
        .expect(1)
        .mount(harness.openai.server())
        .await;

    let response = harness
        .server
        .get(&thread_path("/messages"))
        .add_query_param("order", "asc")
        .add_query_param("limit", 5)
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_thread_errors_surface_only_the_message() {
    let harness = RelayTestHarness::new().await;
    harness
        .openai
        .mock_thread_not_found("GET", format!("/threads/{}/runs/{}", TEST_THREAD_ID, TEST_RUN_ID))
        .await;

    let response = harness
        .server
        .get(&thread_path(&format!("/runs/{}", TEST_RUN_ID)))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": { "message": format!("No thread found with id '{}'.", TEST_THREAD_ID) } })
    );
}

#[tokio::test]
async fn test_message_error_without_envelope_uses_body_text() {
    let harness = RelayTestHarness::new().await;
    Mock::given(method("POST"))
        .and(path(format!("/threads/{}/messages", TEST_THREAD_ID)))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream connect error"))
        .mount(harness.openai.server())
        .await;

    let response = harness
        .server
        .post(&thread_path("/messages"))
        .json(&json!({ "role": "user", "content": "Hi" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": { "message": "upstream connect error" } })
    );
}

#[tokio::test]
async fn test_create_thread_unreachable_provider_maps_to_500() {
    let server = test_server(test_config("http://127.0.0.1:1"));

    let response = server.post("/api/openai/threads").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": { "message": "Connection error." } })
    );
}

#[tokio::test]
async fn test_malformed_run_body_is_rejected_before_provider_call() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.post(&thread_path("/runs")).text("[oops").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(harness.openai.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_list_messages_forwards_unparseable_query_untouched() {
    let harness = RelayTestHarness::new().await;
    Mock::given(method("GET"))
        .and(path(format!("/threads/{}/messages", TEST_THREAD_ID)))
        .and(query_param("limit", "abc"))
        .respond_with(ResponseTemplate::new(400).set_body_json(OpenAITestData::error(
            "Invalid 'limit': expected an integer.",
            "invalid_request_error",
            Some("integer_below_min_value"),
        )))
        .expect(1)
        .mount(harness.openai.server())
        .await;

    let response = harness
        .server
        .get(&thread_path("/messages"))
        .add_query_param("limit", "abc")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": { "message": "Invalid 'limit': expected an integer." } })
    );
    assert_eq!(harness.openai.received_requests().await.len(), 1);
}
