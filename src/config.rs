//! Configuration for the completion broker and the optional settings file

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use log::{debug, info};

pub const DEFAULT_API_BASE: &str
  = "https://api.openai.com/v1";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2]
  = ["CHATGPT_TOKEN", "OPENAI_API_KEY"];

/// Optional JSON settings file next to the project
/// (`translate_info.json` by default)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings
{   /// API key, takes precedence over the environment
    #[serde(default)]
    pub api_key: Option<String>
  , /// Free-text description of the app, appended to translation prompts
    #[serde(default)]
    pub app_context: Option<String>
  , /// API base URL (if custom)
    #[serde(default)]
    pub api_base: Option<String>
}

impl Settings
{   /// Load settings from `path`. A missing file yields empty settings.
    pub fn load(path: &Path)
      -> Result<Self, crate::error::Error>
    {   if !path.exists()
        {   debug!("No settings file at {}", path.display());
            return Ok(Settings::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&raw)
          .map_err(|e| {
            crate::error::Error::InvalidConfiguration(
              format!("{}: {}", path.display(), e)
            )
          })?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// Resolve the API key from an explicit value or the environment.
///
/// `env` is the variable lookup, `std::env::var` in production.
pub fn resolve_api_key<F>(
  explicit: Option<&str>
, env: F
) -> Result<String, crate::error::Error>
where
  F: Fn(&str) -> Option<String>
{   if let Some(key) = explicit.filter(|k| !k.is_empty())
    {   debug!("Using API key from settings file");
        return Ok(key.to_string());
    }

    for var in API_KEY_ENV_VARS
    {   if let Some(key) = env(var).filter(|k| !k.is_empty())
        {   debug!("Using API key from {}", var);
            return Ok(key);
        }
    }

    Err(crate::error::Error::MissingApiKey(format!(
      "Set one of {} or add \"api_key\" to the settings file.",
      API_KEY_ENV_VARS.join(", ")
    )))
}

/// Everything a broker needs, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerConfig
{   /// Upstream credential
    pub api_key: String
  , /// Model identifier, opaque to the broker
    pub model: String
  , /// API base URL
    pub api_base: String
  , /// Folder receiving the per-attempt query logs
    pub log_dir: PathBuf
  , /// Minimum interval between two upstream requests
    pub cooldown: Duration
  , /// Attempts per completion before giving up
    pub max_attempts: usize
}

impl BrokerConfig
{   /// Create a config with the broker defaults
    /// (2 second cooldown, 2 attempts, `queries` log folder)
    pub fn new(
      api_key: impl Into<String>
    , model: impl Into<String>
    ) -> Self
    {   BrokerConfig
        {   api_key: api_key.into()
          , model: model.into()
          , api_base: DEFAULT_API_BASE.to_string()
          , log_dir: PathBuf::from("queries")
          , cooldown: Duration::from_secs(2)
          , max_attempts: 2
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>)
      -> Self
    {   self.api_base = api_base.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>)
      -> Self
    {   self.log_dir = log_dir.into();
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self
    {   self.cooldown = cooldown;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize)
      -> Self
    {   self.max_attempts = max_attempts;
        self
    }

    /// Check the values a broker cannot work with
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.api_key.is_empty()
        {   return Err(crate::error::Error::MissingApiKey(
              "The configured API key is empty.".to_string()
            ));
        }
        if self.max_attempts == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "max attempts must be at least 1".to_string()
            ));
        }
        if self.model.is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "model name is empty".to_string()
            ));
        }
        Ok(())
    }
}
