//! Concurrent requests must not interfere with each other

use std::future::IntoFuture;
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::common::{constants::TEST_THREAD_ID, RelayTestHarness};
use crate::mocks::openai::OpenAITestData;

#[tokio::test]
async fn test_concurrent_runs_get_their_own_payloads() {
    let harness = RelayTestHarness::new().await;
    let run_ids: Vec<String> = (0..8).map(|i| format!("run_{}", i)).collect();

    // Later runs answer sooner, so completion order differs from request order
    for (i, run_id) in run_ids.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("/threads/{}/runs/{}", TEST_THREAD_ID, run_id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(OpenAITestData::run(run_id, "in_progress"))
                    .set_delay(Duration::from_millis(10 * (8 - i as u64))),
            )
            .mount(harness.openai.server())
            .await;
    }

    let requests = run_ids.iter().map(|run_id| {
        harness
            .server
            .get(&format!("/api/openai/threads/{}/runs/{}", TEST_THREAD_ID, run_id))
            .into_future()
    });
    let responses = join_all(requests).await;

    for (run_id, response) in run_ids.iter().zip(responses) {
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["id"], run_id.as_str());
    }
}

#[tokio::test]
async fn test_failure_on_one_route_does_not_affect_another() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_chat_completion_rate_limited().await;
    harness.openai.mock_create_thread().await;

    let chat = harness
        .server
        .post("/api/openai/chat/completions")
        .json(&serde_json::json!({ "messages": [] }))
        .into_future();
    let thread = harness.server.post("/api/openai/threads").into_future();

    let (chat, thread) = futures::future::join(chat, thread).await;

    chat.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);
    thread.assert_status_ok();
    assert_eq!(thread.json::<Value>(), OpenAITestData::thread());
}
