use std::fmt;

/// Custom error type for gptl10n operations
/// Implements Clone so tests and callers can compare and keep it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No API key in settings file or environment
    MissingApiKey(String)
  , /// HTTP transport error
    HttpError(String)
  , /// API returned an error response
    ApiError(String)
  , /// API answered with HTTP 429
    RateLimitExceeded
  , /// Failed to parse API response
    ParseError(String)
  , /// No choices in API response
    NoChoicesInResponse
  , /// Model ran out of output tokens before finishing
    TruncatedOutput(String)
  , /// No attempt produced an accepted response
    RetryExhausted(usize)
  , /// Response line without the expected prefix
    MalformedResponseLine(String)
  , /// Response line count differs from the batch size
    LineCountMismatch
    {   expected: usize
      , found: usize
    }
  , /// Localization catalog could not be read or written
    Catalog(String)
  , /// Filesystem error
    Io(String)
  , /// Invalid configuration or command line
    InvalidConfiguration(String)
  , /// User declined the overwrite confirmation
    Aborted
  , /// Generic error
    Other(String)
}

impl Error
{   /// Whether a failed upstream call may be retried within the
    /// attempt budget instead of aborting the run.
    pub fn is_transient(&self) -> bool
    {   matches!(
          self
        , Error::ParseError(_)
          | Error::NoChoicesInResponse
          | Error::RateLimitExceeded
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(hint) => {
              write!(f, "No OpenAI API key found. {}", hint)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "API error: {}", msg)
            }
          , Error::RateLimitExceeded => {
              write!(f, "API rate limit exceeded")
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::NoChoicesInResponse => {
              write!(f, "API response contained no choices")
            }
          , Error::TruncatedOutput(model) => {
              write!(f,
                "Maximum tokens exceeded for model {}. \
                 Try a model with a larger output budget, see \
                 https://platform.openai.com/docs/models",
                model
              )
            }
          , Error::RetryExhausted(attempts) => {
              write!(f,
                "Could not get a valid response after {} tries",
                attempts
              )
            }
          , Error::MalformedResponseLine(line) => {
              write!(f, "Invalid line in response: {}", line)
            }
          , Error::LineCountMismatch { expected, found } => {
              write!(f,
                "Expected {} translated lines but got {}",
                expected, found
              )
            }
          , Error::Catalog(msg) => {
              write!(f, "Catalog error: {}", msg)
            }
          , Error::Io(msg) => {
              write!(f, "I/O error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Aborted => {
              write!(f, "Aborted by user")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error
{   fn from(e: std::io::Error) -> Self
    {   Error::Io(e.to_string())
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
