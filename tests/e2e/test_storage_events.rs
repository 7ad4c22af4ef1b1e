use crate::e2e::helpers;

use helpers::fakes::InMemoryStorage;
use helpers::{object_created_event, speech_pcm, TestContext, BUCKET};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use voice_reply_bot::domain::reply::ChatReply;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_finish_a_job_from_a_storage_notification(ctx: &TestContext) {
    ctx.pipeline
        .storage
        .insert(BUCKET, "4821/abc123.pcm", speech_pcm());

    let response = ctx
        .client
        .post(
            "/storage/events",
            &object_created_event(BUCKET, "4821/abc123.pcm"),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({"processed": 1, "skipped": 0})));

    assert_eq!(
        ctx.pipeline.replies.sent(),
        vec![ChatReply::voice(
            4821,
            InMemoryStorage::uri(BUCKET, "4821/abc123.ogg")
        )]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_decode_form_encoded_keys(ctx: &TestContext) {
    ctx.pipeline
        .storage
        .insert(BUCKET, "4821/my job.pcm", speech_pcm());

    let response = ctx
        .client
        .post(
            "/storage/events",
            &object_created_event(BUCKET, "4821/my+job.pcm"),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(ctx
        .pipeline
        .storage
        .object(BUCKET, "4821/my job.ogg")
        .is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_delivered_assets_as_skipped(ctx: &TestContext) {
    let event = json!({
        "Records": [
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/abc123.ogg"}}},
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/other.ogg"}}}
        ]
    });

    let response = ctx.client.post("/storage/events", &event).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({"processed": 0, "skipped": 2})));
    assert!(ctx.pipeline.replies.sent().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_keys_that_do_not_name_a_chat(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/storage/events",
            &object_created_event(BUCKET, "notanumber/abc.pcm"),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("cannot recover chat id");
    assert!(ctx.pipeline.replies.sent().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_events_without_records(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/storage/events", &json!({"Records": []}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("no records");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_events(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/storage/events", "Records")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("malformed storage event");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_batch_with_a_bad_key_before_finishing_any_record(ctx: &TestContext) {
    ctx.pipeline
        .storage
        .insert(BUCKET, "4821/abc123.pcm", speech_pcm());

    let event = json!({
        "Records": [
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/abc123.pcm"}}},
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "notanumber/x.pcm"}}}
        ]
    });

    let response = ctx.client.post("/storage/events", &event).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("cannot recover chat id");
    assert!(ctx.pipeline.replies.sent().is_empty());
    assert!(ctx
        .pipeline
        .storage
        .object(BUCKET, "4821/abc123.ogg")
        .is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_batch_with_an_undecodable_key_before_finishing_any_record(
    ctx: &TestContext,
) {
    ctx.pipeline
        .storage
        .insert(BUCKET, "4821/abc123.pcm", speech_pcm());

    let event = json!({
        "Records": [
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/abc123.pcm"}}},
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/%FF%FE.pcm"}}}
        ]
    });

    let response = ctx.client.post("/storage/events", &event).await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("undecodable object key");
    assert!(ctx.pipeline.replies.sent().is_empty());
    assert_eq!(ctx.pipeline.storage.keys(), vec!["4821/abc123.pcm".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_finish_every_record_of_a_valid_batch(ctx: &TestContext) {
    ctx.pipeline
        .storage
        .insert(BUCKET, "4821/first.pcm", speech_pcm());
    ctx.pipeline
        .storage
        .insert(BUCKET, "77/second.pcm", speech_pcm());

    let event = json!({
        "Records": [
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/first.pcm"}}},
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "4821/first.ogg"}}},
            {"s3": {"bucket": {"name": BUCKET}, "object": {"key": "77/second.pcm"}}}
        ]
    });

    let response = ctx.client.post("/storage/events", &event).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body, Some(json!({"processed": 2, "skipped": 1})));

    let chats: Vec<i64> = ctx
        .pipeline
        .replies
        .sent()
        .iter()
        .map(|reply| reply.chat_id())
        .collect();
    assert_eq!(chats, vec![4821, 77]);
}
