use crate::e2e::helpers;

use helpers::fakes::InMemoryStorage;
use helpers::{pcm_tone, speech_pcm, test_settings, Pipeline, BUCKET, CHAT_ID};
use pretty_assertions::assert_eq;
use voice_reply_bot::domain::reply::ChatReply;
use voice_reply_bot::domain::speech::{
    DispatchOutcome, DispatcherApi, FinishOutcome, FinisherApi, ObjectCreated, SpeechError,
};

fn created(key: &str) -> ObjectCreated {
    ObjectCreated {
        bucket: BUCKET.to_string(),
        key: key.to_string(),
    }
}

#[tokio::test]
async fn it_should_deliver_finished_job_output_as_a_voice_reply() {
    let pipeline = Pipeline::new(test_settings());
    pipeline.storage.insert(BUCKET, "4821/abc123.pcm", speech_pcm());

    let outcome = pipeline.finisher.finish(&created("4821/abc123.pcm")).await.unwrap();

    let expected_uri = InMemoryStorage::uri(BUCKET, "4821/abc123.ogg");
    assert_eq!(
        outcome,
        FinishOutcome::Replied(ChatReply::voice(4821, expected_uri.clone()))
    );

    let asset = pipeline.storage.object(BUCKET, "4821/abc123.ogg").unwrap();
    assert_eq!(asset.content_type, "audio/ogg");
    assert_eq!(&asset.body[..4], b"OggS");

    assert_eq!(pipeline.replies.sent(), vec![ChatReply::voice(4821, expected_uri)]);
}

#[tokio::test]
async fn it_should_fail_on_keys_that_do_not_name_a_chat() {
    let pipeline = Pipeline::new(test_settings());
    pipeline.storage.insert(BUCKET, "notanumber/abc.pcm", speech_pcm());

    let result = pipeline.finisher.finish(&created("notanumber/abc.pcm")).await;

    assert_eq!(
        result,
        Err(SpeechError::KeyFormat("notanumber/abc.pcm".to_string()))
    );
    assert!(pipeline.replies.sent().is_empty());
    assert_eq!(pipeline.storage.keys(), vec!["notanumber/abc.pcm".to_string()]);
}

#[tokio::test]
async fn it_should_fail_on_keys_without_a_chat_segment() {
    let pipeline = Pipeline::new(test_settings());

    let result = pipeline.finisher.finish(&created("abc123.pcm")).await;

    assert!(matches!(result, Err(SpeechError::KeyFormat(_))));
    assert!(pipeline.replies.sent().is_empty());
}

#[tokio::test]
async fn it_should_reply_nothing_to_say_for_silent_output() {
    let pipeline = Pipeline::new(test_settings());
    pipeline.storage.insert(BUCKET, "4821/quiet.pcm", vec![0u8; 6400]);

    let outcome = pipeline.finisher.finish(&created("4821/quiet.pcm")).await.unwrap();

    let expected = ChatReply::error(CHAT_ID, &SpeechError::Silence);
    assert_eq!(outcome, FinishOutcome::Replied(expected.clone()));
    assert_eq!(pipeline.replies.sent(), vec![expected]);
    assert!(pipeline.storage.object(BUCKET, "4821/quiet.ogg").is_none());
}

#[tokio::test]
async fn it_should_reply_with_an_error_for_an_illegal_frame_size() {
    let pipeline = Pipeline::new(test_settings());
    pipeline.storage.insert(BUCKET, "4821/odd.pcm", pcm_tone(3250));

    let outcome = pipeline.finisher.finish(&created("4821/odd.pcm")).await.unwrap();

    match outcome {
        FinishOutcome::Replied(ChatReply::Text { chat_id, text }) => {
            assert_eq!(chat_id, CHAT_ID);
            assert!(text.contains("illegal frame size"), "got: {}", text);
        }
        other => panic!("Expected a text reply, got {:?}", other),
    }
    assert!(pipeline.storage.object(BUCKET, "4821/odd.ogg").is_none());
}

#[tokio::test]
async fn it_should_reply_with_an_error_when_the_object_is_missing() {
    let pipeline = Pipeline::new(test_settings());

    let outcome = pipeline.finisher.finish(&created("4821/gone.pcm")).await.unwrap();

    match outcome {
        FinishOutcome::Replied(ChatReply::Text { chat_id, text }) => {
            assert_eq!(chat_id, CHAT_ID);
            assert!(text.starts_with("storage failed"), "got: {}", text);
        }
        other => panic!("Expected a text reply, got {:?}", other),
    }
    assert_eq!(pipeline.replies.sent().len(), 1);
}

#[tokio::test]
async fn it_should_skip_objects_that_are_not_raw_output() {
    let pipeline = Pipeline::new(test_settings());
    pipeline.storage.insert(BUCKET, "4821/abc123.ogg", vec![1, 2, 3]);

    let outcome = pipeline.finisher.finish(&created("4821/abc123.ogg")).await.unwrap();

    assert_eq!(outcome, FinishOutcome::Skipped);
    assert!(pipeline.replies.sent().is_empty());
}

#[tokio::test]
async fn it_should_still_report_the_reply_when_delivery_fails() {
    let pipeline = Pipeline::new(test_settings());
    pipeline.replies.fail_deliveries();
    pipeline.storage.insert(BUCKET, "4821/abc123.pcm", speech_pcm());

    let outcome = pipeline.finisher.finish(&created("4821/abc123.pcm")).await.unwrap();

    assert!(matches!(
        outcome,
        FinishOutcome::Replied(ChatReply::Voice { chat_id: CHAT_ID, .. })
    ));
    assert_eq!(pipeline.replies.sent().len(), 1);
}

#[tokio::test]
async fn it_should_deliver_replies_in_notification_order_not_submission_order() {
    // Replies for one chat follow the order storage notifications arrive in.
    // Nothing reorders them by submission, two quick jobs can swap.
    let pipeline = Pipeline::new(test_settings());
    pipeline.storage.insert(BUCKET, "4821/first.pcm", speech_pcm());
    pipeline.storage.insert(BUCKET, "4821/second.pcm", pcm_tone(6400));

    pipeline.finisher.finish(&created("4821/second.pcm")).await.unwrap();
    pipeline.finisher.finish(&created("4821/first.pcm")).await.unwrap();

    let delivered: Vec<ChatReply> = pipeline.replies.sent();
    assert_eq!(
        delivered,
        vec![
            ChatReply::voice(CHAT_ID, InMemoryStorage::uri(BUCKET, "4821/second.ogg")),
            ChatReply::voice(CHAT_ID, InMemoryStorage::uri(BUCKET, "4821/first.ogg")),
        ]
    );
}

#[tokio::test]
async fn it_should_route_an_async_job_back_to_its_chat() {
    let pipeline = Pipeline::new(test_settings());
    let text = format!("@Bot {}", "long story ".repeat(40));

    let outcome = pipeline.dispatcher.dispatch(-100200300, &text).await;
    assert!(matches!(outcome, DispatchOutcome::Deferred { .. }));

    // The synthesis service writes its output under the prefix it was given
    let prefix = pipeline.speech.job_calls.lock()[0].destination.key_prefix.clone();
    let key = format!("{}task-0001.pcm", prefix);
    pipeline.storage.insert(BUCKET, &key, speech_pcm());

    pipeline.finisher.finish(&created(&key)).await.unwrap();

    let sent = pipeline.replies.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id(), -100200300);
    assert!(sent[0].is_voice());
    assert!(pipeline.storage.object(BUCKET, "-100200300/task-0001.ogg").is_some());
}

#[tokio::test]
async fn it_should_resolve_chats_without_touching_storage() {
    let pipeline = Pipeline::new(test_settings());

    assert_eq!(
        pipeline.finisher.resolve_chat(&created("4821/abc123.pcm")),
        Ok(Some(4821))
    );
    assert_eq!(pipeline.finisher.resolve_chat(&created("4821/abc123.ogg")), Ok(None));
    assert_eq!(
        pipeline.finisher.resolve_chat(&created("notanumber/abc.pcm")),
        Err(SpeechError::KeyFormat("notanumber/abc.pcm".to_string()))
    );

    assert!(pipeline.storage.keys().is_empty());
    assert!(pipeline.replies.sent().is_empty());
}
