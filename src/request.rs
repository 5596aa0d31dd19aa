//! Request and response types for the chat-completion endpoint

use serde::{Deserialize, Serialize};

/// One unit of work for the broker: task description plus the
/// caller's actual input. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request
{   /// Sent with the `system` role
    pub system_instructions: String
  , /// Sent with the `user` role
    pub user_input: String
}

impl Request
{   pub fn new(
      system_instructions: impl Into<String>
    , user_input: impl Into<String>
    ) -> Self
    {   Request
        {   system_instructions: system_instructions.into()
          , user_input: user_input.into()
        }
    }

    /// The two-message payload, system first
    pub fn messages(&self) -> Vec<ChatMessage>
    {   vec![
          ChatMessage::system(&self.system_instructions)
        , ChatMessage::user(&self.user_input)
        ]
    }
}

// ===== Wire Types =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: &str) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.to_string()
        }
    }

    pub fn user(content: &str) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
}

impl ChatRequest
{   pub fn new(model: &str, request: &Request) -> Self
    {   ChatRequest
        {   model: model.to_string()
          , messages: request.messages()
          , max_tokens: None
          , temperature: None
        }
    }
}

/// Response payload. Fields are lenient so that an odd shape is
/// detected by extraction instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>
  , #[serde(default)]
    pub choices: Vec<Choice>
  , /// Response body exactly as received, when it came over the wire
    #[serde(skip)]
    pub raw: Option<String>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub role: Option<String>
  , #[serde(default)]
    pub content: Option<String>
}

impl ChatResponse
{   /// Single-choice response, handy for fakes
    pub fn with_choice(
      content: Option<&str>
    , finish_reason: &str
    ) -> Self
    {   ChatResponse
        {   id: None
          , model: None
          , choices: vec![
              Choice
              {   message: Some(ResponseMessage
                  {   role: Some("assistant".to_string())
                    , content: content.map(str::to_string)
                  })
                , finish_reason: Some(finish_reason.to_string())
              }
            ]
          , raw: None
        }
    }

    pub fn finish_reason(&self) -> FinishReason
    {   FinishReason::from_wire(
          self.choices.first()
            .and_then(|c| c.finish_reason.as_deref())
        )
    }
}

/// Why generation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason
{   /// Completed normally
    Stop
  , /// Ran out of output budget
    Length
  , /// Anything else (content filter, tool call, missing, ...)
    Other(String)
}

impl FinishReason
{   pub fn from_wire(reason: Option<&str>) -> Self
    {   match reason
        {   Some("stop") => FinishReason::Stop
          , Some("length") => FinishReason::Length
          , Some(other) => FinishReason::Other(other.to_string())
          , None => FinishReason::Other("none".to_string())
        }
    }
}

impl std::fmt::Display for FinishReason
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   match self
        {   FinishReason::Stop => write!(f, "stop")
          , FinishReason::Length => write!(f, "length")
          , FinishReason::Other(reason) => write!(f, "{}", reason)
        }
    }
}
