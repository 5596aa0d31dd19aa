//! Attempt outcomes and the retry policy of the broker

use log::debug;
use crate::request::{ChatResponse, FinishReason};

/// Result of one attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome
{   /// Text survived every check; stop and return it
    Accepted(String)
  , /// Spend another attempt if any are left
    Retryable(String)
  , /// Abort the whole operation
    Fatal(crate::error::Error)
}

impl Outcome
{   pub fn is_accepted(&self) -> bool
    {   matches!(self, Outcome::Accepted(_))
    }
}

/// Classify a response by its finish reason and extract the text.
///
/// `Length` is fatal: retrying an input that does not fit the output
/// budget cannot succeed.
pub fn classify_response(
  response: &ChatResponse
, model: &str
) -> Outcome
{   match response.finish_reason()
    {   FinishReason::Length => {
          Outcome::Fatal(crate::error::Error::TruncatedOutput(
            model.to_string()
          ))
        }
      , FinishReason::Other(reason) => {
          Outcome::Retryable(format!(
            "model terminated with finish_reason {}", reason
          ))
        }
      , FinishReason::Stop => {
          match extract_text(response)
          {   Some(text) => Outcome::Accepted(text)
            , None => Outcome::Retryable(
                "unexpected response format".to_string()
              )
          }
        }
    }
}

/// Trimmed message content of the first choice
pub fn extract_text(response: &ChatResponse) -> Option<String>
{   response.choices.first()?
      .message.as_ref()?
      .content.as_ref()
      .map(|c| c.trim().to_string())
}

/// Classify a failed upstream call
pub fn classify_error(error: crate::error::Error) -> Outcome
{   if error.is_transient()
    {   Outcome::Retryable(error.to_string())
    } else
    {   Outcome::Fatal(error)
    }
}

/// Run the caller's predicate over accepted text
pub fn validate(
  text: String
, validator: Option<&crate::Validator<'_>>
) -> Outcome
{   match validator
    {   Some(is_valid) if !is_valid(&text) => {
          Outcome::Retryable("response was invalid".to_string())
        }
      , _ => Outcome::Accepted(text)
    }
}

/// Attempt budget of a single completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy
{   pub max_attempts: usize
}

impl RetryPolicy
{   pub fn new(max_attempts: usize) -> Self
    {   RetryPolicy { max_attempts }
    }

    /// Whether attempt number `attempt` (1-based) may run
    pub fn allows(&self, attempt: usize) -> bool
    {   debug!(
          "Checking attempt {} of {}",
          attempt, self.max_attempts
        );
        attempt <= self.max_attempts
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(2)
    }
}
