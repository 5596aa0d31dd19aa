use std::time::Duration;
use tokio::time::Instant;
use log::{debug, info, warn};

use crate::providers::{OpenAiClient, Upstream};
use crate::query_log::{AttemptStamp, FileQueryLog, QueryLog, Stage};
use crate::request::{ChatRequest, Request};
use crate::retry::{self, Outcome, RetryPolicy};

/// Rate-limited, retrying, auditable front of one upstream provider.
///
/// All calls go through `&mut self`, so a broker never has two
/// requests in flight.
pub struct CompletionBroker<U = OpenAiClient, L = FileQueryLog>
{   upstream: U
  , log: L
  , model: String
  , cooldown: Duration
  , policy: RetryPolicy
  , last_request: Option<Instant>
  , stamps: AttemptStamp
}

impl CompletionBroker
{   /// Broker talking to the OpenAI API, logging into
    /// `config.log_dir`
    pub fn new(config: &crate::config::BrokerConfig)
      -> Result<Self, crate::error::Error>
    {   config.validate()?;
        let upstream = OpenAiClient::new(
          config.api_key.clone()
        , Some(config.api_base.clone())
        );
        let log = FileQueryLog::create(&config.log_dir)?;
        Ok(CompletionBroker::with_parts(
          upstream
        , log
        , config.model.clone()
        , config.cooldown
        , RetryPolicy::new(config.max_attempts)
        ))
    }
}

impl<U, L> CompletionBroker<U, L>
where
  U: Upstream
, L: QueryLog
{   pub fn with_parts(
      upstream: U
    , log: L
    , model: String
    , cooldown: Duration
    , policy: RetryPolicy
    ) -> Self
    {   debug!(
          "Creating CompletionBroker for {} (cooldown {:?})",
          model, cooldown
        );
        CompletionBroker
        {   upstream
          , log
          , model
          , cooldown
          , policy
          , last_request: None
          , stamps: AttemptStamp::new()
        }
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    pub fn policy(&self) -> RetryPolicy
    {   self.policy
    }

    /// Complete with the configured attempt budget
    pub async fn complete(
      &mut self
    , request: &Request
    , validator: Option<&crate::Validator<'_>>
    ) -> crate::CompletionResult
    {   let max_attempts = self.policy.max_attempts;
        self.complete_with_attempts(request, validator, max_attempts)
          .await
    }

    /// Send `request` until a response passes the finish-reason
    /// check and `validator`, or `max_attempts` are spent.
    pub async fn complete_with_attempts(
      &mut self
    , request: &Request
    , validator: Option<&crate::Validator<'_>>
    , max_attempts: usize
    ) -> crate::CompletionResult
    {   let policy = RetryPolicy::new(max_attempts);
        let chat_request = ChatRequest::new(&self.model, request);
        let mut attempt = 1;

        while policy.allows(attempt)
        {   match self.attempt(&chat_request, request, validator).await?
            {   Outcome::Accepted(text) => {
                  debug!("Attempt {} accepted", attempt);
                  return Ok(text);
                }
              , Outcome::Retryable(reason) => {
                  warn!(
                    "Attempt {}/{} failed: {}",
                    attempt, max_attempts, reason
                  );
                }
              , Outcome::Fatal(e) => return Err(e)
            }
            attempt += 1;
        }

        Err(crate::error::Error::RetryExhausted(max_attempts))
    }

    /// One upstream call. Log failures are fatal and surface as `Err`.
    async fn attempt(
      &mut self
    , chat_request: &ChatRequest
    , request: &Request
    , validator: Option<&crate::Validator<'_>>
    ) -> Result<Outcome, crate::error::Error>
    {   self.wait_for_cooldown().await;

        let stamp = self.stamps.next();
        self.log.record(
          &stamp, Stage::SystemInput, &request.system_instructions
        )?;
        self.log.record(&stamp, Stage::UserInput, &request.user_input)?;

        let response = match self.upstream
          .chat_completion(chat_request)
          .await
        {   Ok(response) => response
          , Err(e) => return Ok(retry::classify_error(e))
        };

        let raw = match &response.raw
        {   Some(body) => body.clone()
          , None => serde_json::to_string_pretty(&response)
              .unwrap_or_else(|e| format!("<unserializable: {}>", e))
        };
        self.log.record(&stamp, Stage::ApiResponse, &raw)?;

        let text = match retry::classify_response(&response, &self.model)
        {   Outcome::Accepted(text) => text
          , other => return Ok(other)
        };

        self.log.record(&stamp, Stage::ModelOutput, &text)?;

        let outcome = retry::validate(text, validator);
        if !outcome.is_accepted()
        {   info!("Response was invalid for request {}", stamp);
        }
        Ok(outcome)
    }

    async fn wait_for_cooldown(&mut self)
    {   if let Some(last) = self.last_request
        {   let elapsed = last.elapsed();
            if elapsed < self.cooldown
            {   let wait = self.cooldown - elapsed;
                info!(
                  "Sleeping {:.1}s to not exceed the API rate limit",
                  wait.as_secs_f32()
                );
                tokio::time::sleep(wait).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
