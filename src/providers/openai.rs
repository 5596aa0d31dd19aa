use async_trait::async_trait;
use log::{debug, trace, error};

use crate::request::{ChatRequest, ChatResponse};

// ===== OpenAI Client =====

/// Chat-completion client for OpenAI and compatible APIs
pub struct OpenAiClient
{   api_key: String
  , api_base: String
  , http_client: reqwest::Client
}

impl OpenAiClient
{   pub fn new(
      api_key: impl Into<String>
    , api_base: Option<String>
    ) -> Self
    {   debug!("Creating OpenAiClient");
        OpenAiClient
        {   api_key: api_key.into()
          , api_base: api_base
              .unwrap_or_else(||
                crate::config::DEFAULT_API_BASE.to_string()
              )
              .trim_end_matches('/')
              .to_string()
          , http_client: reqwest::Client::new()
        }
    }

    pub fn api_base(&self) -> &str
    {   &self.api_base
    }
}

#[async_trait]
impl super::Upstream for OpenAiClient
{   async fn chat_completion(
      &self
    , request: &ChatRequest
    ) -> Result<ChatResponse, crate::error::Error>
    {   debug!("Sending chat completion for: {}", request.model);
        trace!("OpenAI request: {:?}", request);

        let response = self.http_client
          .post(format!("{}/chat/completions", self.api_base))
          .header("Authorization", format!("Bearer {}", self.api_key))
          .header("Content-Type", "application/json")
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::HttpError(e.to_string())
          })?;

        let status = response.status();
        trace!("OpenAI response status: {}", status);

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {   error!("OpenAI rate limit hit");
            return Err(crate::error::Error::RateLimitExceeded);
        }

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("OpenAI API error: {}", error_text);
            return Err(crate::error::Error::ApiError(
              format!("{}: {}", status, error_text)
            ));
        }

        let body = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          crate::error::Error::HttpError(e.to_string())
        })?;

        let mut chat_response = serde_json::from_str::<ChatResponse>(&body)
          .map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        if chat_response.choices.is_empty()
        {   error!("No choices in response");
            return Err(crate::error::Error::NoChoicesInResponse);
        }
        chat_response.raw = Some(body);
        Ok(chat_response)
    }
}
