#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gptl10n::error::Error;
use gptl10n::providers::Upstream;
use gptl10n::query_log::MemoryQueryLog;
use gptl10n::request::{ChatRequest, ChatResponse};
use gptl10n::retry::RetryPolicy;
use gptl10n::CompletionBroker;

/// Upstream fake answering from a script, recording every call
#[derive(Clone, Default)]
pub struct ScriptedUpstream
{   replies: Arc<Mutex<VecDeque<Result<ChatResponse, Error>>>>
  , calls: Arc<Mutex<Vec<(tokio::time::Instant, ChatRequest)>>>
}

impl ScriptedUpstream
{   pub fn new() -> Self
    {   ScriptedUpstream::default()
    }

    pub fn reply(self, content: &str, finish_reason: &str) -> Self
    {   self.push(Ok(ChatResponse::with_choice(Some(content), finish_reason)))
    }

    pub fn push(self, reply: Result<ChatResponse, Error>) -> Self
    {   self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize
    {   self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<tokio::time::Instant>
    {   self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub fn requests(&self) -> Vec<ChatRequest>
    {   self.calls.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream
{   async fn chat_completion(
      &self
    , request: &ChatRequest
    ) -> Result<ChatResponse, Error>
    {   self.calls.lock().unwrap()
          .push((tokio::time::Instant::now(), request.clone()));
        self.replies.lock().unwrap()
          .pop_front()
          .unwrap_or_else(|| Err(Error::Other("script exhausted".to_string())))
    }
}

/// Broker over `upstream` without cooldown
pub fn broker(
  upstream: &ScriptedUpstream
, log: &MemoryQueryLog
, max_attempts: usize
) -> CompletionBroker<ScriptedUpstream, MemoryQueryLog>
{   broker_with_cooldown(upstream, log, max_attempts, Duration::ZERO)
}

pub fn broker_with_cooldown(
  upstream: &ScriptedUpstream
, log: &MemoryQueryLog
, max_attempts: usize
, cooldown: Duration
) -> CompletionBroker<ScriptedUpstream, MemoryQueryLog>
{   CompletionBroker::with_parts(
      upstream.clone()
    , log.clone()
    , "test-model".to_string()
    , cooldown
    , RetryPolicy::new(max_attempts)
    )
}
