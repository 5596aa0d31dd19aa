mod common;

use std::time::Duration;

use common::{broker, broker_with_cooldown, ScriptedUpstream};
use gptl10n::error::Error;
use gptl10n::query_log::{MemoryQueryLog, Stage};
use gptl10n::request::ChatResponse;
use gptl10n::Request;
use tokio_test::{assert_err, assert_ok};

fn request() -> Request
{   Request::new("You translate things.", "key: Hello")
}

#[tokio::test]
async fn test_accepts_normal_stop_and_logs_four_stages()
{   let upstream = ScriptedUpstream::new().reply("Hallo", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let text = assert_ok!(broker.complete(&request(), None).await);
    assert_eq!(text, "Hallo");
    assert_eq!(upstream.call_count(), 1);
    assert_eq!(
      log.stages()
    , vec![
        Stage::SystemInput
      , Stage::UserInput
      , Stage::ApiResponse
      , Stage::ModelOutput
      ]
    );

    let records = log.records();
    assert_eq!(records[0].content, "You translate things.");
    assert_eq!(records[1].content, "key: Hello");
    assert!(records[2].content.contains("\"finish_reason\": \"stop\""));
    assert_eq!(records[3].content, "Hallo");
}

#[tokio::test]
async fn test_sends_system_then_user_message()
{   let upstream = ScriptedUpstream::new().reply("ok", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    assert_ok!(broker.complete(&request(), None).await);

    let sent = &upstream.requests()[0];
    assert_eq!(sent.model, "test-model");
    assert_eq!(sent.messages.len(), 2);
    assert_eq!(sent.messages[0].role, "system");
    assert_eq!(sent.messages[0].content, "You translate things.");
    assert_eq!(sent.messages[1].role, "user");
    assert_eq!(sent.messages[1].content, "key: Hello");
}

#[tokio::test]
async fn test_response_text_is_trimmed()
{   let upstream = ScriptedUpstream::new().reply("\n  Hallo Welt \n", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let text = assert_ok!(broker.complete(&request(), None).await);
    assert_eq!(text, "Hallo Welt");
}

#[tokio::test]
async fn test_length_finish_is_fatal_without_retry()
{   let upstream = ScriptedUpstream::new()
      .reply("Hal", "length")
      .reply("Hallo", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 3);

    let err = assert_err!(broker.complete(&request(), None).await);
    assert_eq!(err, Error::TruncatedOutput("test-model".to_string()));
    assert_eq!(upstream.call_count(), 1);
    // the truncated answer is still on record
    assert_eq!(
      log.stages()
    , vec![Stage::SystemInput, Stage::UserInput, Stage::ApiResponse]
    );
}

#[tokio::test]
async fn test_abnormal_finish_is_retried()
{   let upstream = ScriptedUpstream::new()
      .reply("", "content_filter")
      .reply("Hallo", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let text = assert_ok!(broker.complete(&request(), None).await);
    assert_eq!(text, "Hallo");
    assert_eq!(upstream.call_count(), 2);
    assert_eq!(log.stages().len(), 3 + 4);
}

#[tokio::test]
async fn test_exhaustion_after_exactly_max_attempts()
{   let upstream = ScriptedUpstream::new()
      .reply("", "content_filter")
      .reply("", "tool_calls")
      .reply("too late", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let err = assert_err!(broker.complete(&request(), None).await);
    assert_eq!(err, Error::RetryExhausted(2));
    assert_eq!(upstream.call_count(), 2);
}

#[tokio::test]
async fn test_validator_rejection_consumes_an_attempt()
{   let upstream = ScriptedUpstream::new()
      .reply("one line", "stop")
      .reply("line one\nline two", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let two_lines = |text: &str| text.lines().count() == 2;
    let text = assert_ok!(broker.complete(&request(), Some(&two_lines)).await);
    assert_eq!(text, "line one\nline two");
    assert_eq!(upstream.call_count(), 2);
}

#[tokio::test]
async fn test_validator_never_satisfied_exhausts()
{   let upstream = ScriptedUpstream::new()
      .reply("nope", "stop")
      .reply("still nope", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let never = |_: &str| false;
    let err = assert_err!(broker.complete(&request(), Some(&never)).await);
    assert_eq!(err, Error::RetryExhausted(2));
    // rejected answers are logged in full
    assert_eq!(log.stages().len(), 8);
}

#[tokio::test]
async fn test_malformed_payloads_are_retried()
{   let upstream = ScriptedUpstream::new()
      .push(Ok(ChatResponse::default()))
      .push(Ok(ChatResponse::with_choice(None, "stop")))
      .push(Err(Error::ParseError("expected value".to_string())))
      .reply("finally", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 4);

    let text = assert_ok!(broker.complete(&request(), None).await);
    assert_eq!(text, "finally");
    assert_eq!(upstream.call_count(), 4);
}

#[tokio::test]
async fn test_rate_limit_is_transient()
{   let upstream = ScriptedUpstream::new()
      .push(Err(Error::RateLimitExceeded))
      .reply("ok", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    assert_eq!(assert_ok!(broker.complete(&request(), None).await), "ok");
}

#[tokio::test]
async fn test_transport_error_aborts()
{   let upstream = ScriptedUpstream::new()
      .push(Err(Error::HttpError("connection refused".to_string())))
      .reply("ok", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 3);

    let err = assert_err!(broker.complete(&request(), None).await);
    assert_eq!(err, Error::HttpError("connection refused".to_string()));
    assert_eq!(upstream.call_count(), 1);
    // request was logged before the call
    assert_eq!(log.stages(), vec![Stage::SystemInput, Stage::UserInput]);
}

#[tokio::test]
async fn test_attempt_override()
{   let upstream = ScriptedUpstream::new()
      .reply("", "content_filter")
      .reply("", "content_filter")
      .reply("third time", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let text = assert_ok!(
      broker.complete_with_attempts(&request(), None, 3).await
    );
    assert_eq!(text, "third time");
}

#[tokio::test]
async fn test_every_attempt_gets_its_own_stamp()
{   let upstream = ScriptedUpstream::new()
      .reply("", "content_filter")
      .reply("", "content_filter")
      .reply("ok", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 3);

    assert_ok!(broker.complete(&request(), None).await);

    let mut stamps: Vec<String> = log.records().into_iter()
      .filter(|r| r.stage == Stage::SystemInput)
      .map(|r| r.stamp)
      .collect();
    stamps.dedup();
    assert_eq!(stamps.len(), 3);

    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}

#[tokio::test]
async fn test_validator_may_borrow_caller_data()
{   let upstream = ScriptedUpstream::new()
      .reply("Hallo", "stop")
      .reply("Hallo Welt", "stop");
    let log = MemoryQueryLog::new();
    let mut broker = broker(&upstream, &log, 2);

    let required = String::from("Welt");
    let mentions_required = |response: &str| response.contains(required.as_str());
    let text = assert_ok!(
      broker.complete(&request(), Some(&mentions_required)).await
    );
    assert_eq!(text, "Hallo Welt");
    assert_eq!(upstream.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_between_consecutive_calls()
{   let upstream = ScriptedUpstream::new()
      .reply("first", "stop")
      .reply("second", "stop");
    let log = MemoryQueryLog::new();
    let cooldown = Duration::from_secs(10);
    let mut broker = broker_with_cooldown(&upstream, &log, 2, cooldown);

    assert_ok!(broker.complete(&request(), None).await);
    assert_ok!(broker.complete(&request(), None).await);

    let times = upstream.call_times();
    assert_eq!(times.len(), 2);
    assert!(times[1] - times[0] >= cooldown);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_applies_to_retries()
{   let upstream = ScriptedUpstream::new()
      .reply("", "content_filter")
      .reply("ok", "stop");
    let log = MemoryQueryLog::new();
    let cooldown = Duration::from_secs(3);
    let mut broker = broker_with_cooldown(&upstream, &log, 2, cooldown);

    assert_ok!(broker.complete(&request(), None).await);

    let times = upstream.call_times();
    assert!(times[1] - times[0] >= cooldown);
}

#[tokio::test(start_paused = true)]
async fn test_no_wait_once_cooldown_has_passed()
{   let upstream = ScriptedUpstream::new()
      .reply("first", "stop")
      .reply("second", "stop");
    let log = MemoryQueryLog::new();
    let cooldown = Duration::from_secs(5);
    let mut broker = broker_with_cooldown(&upstream, &log, 2, cooldown);

    assert_ok!(broker.complete(&request(), None).await);
    tokio::time::sleep(Duration::from_secs(8)).await;
    assert_ok!(broker.complete(&request(), None).await);

    let times = upstream.call_times();
    assert_eq!(times[1] - times[0], Duration::from_secs(8));
}
