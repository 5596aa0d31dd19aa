//! Command-line arguments shared by both binaries

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use clap::{Args, Parser};

use crate::config::{self, BrokerConfig, Settings};

/// Flags every binary accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs
{   /// Time in seconds between two calls to the OpenAI API
    #[arg(long = "openai-api-cooldown", alias = "openai_api_cooldown", default_value_t = 60)]
    pub cooldown_secs: u64
  , /// Log folder for the queries and responses
    #[arg(long, default_value = "queries")]
    pub log_path: PathBuf
  , /// Overwrite without confirmation. Ignored if --output is given
    #[arg(long)]
    pub no_confirmation: bool
  , /// Model name, defaults per tool
    #[arg(long)]
    pub model: Option<String>
  , /// Attempts per request before giving up
    #[arg(long, default_value_t = 2)]
    pub max_attempts: usize
  , /// Optional JSON file with api_key, app_context and api_base
    #[arg(long, default_value = "translate_info.json")]
    pub settings: PathBuf
}

impl CommonArgs
{   pub fn load_settings(&self)
      -> Result<Settings, crate::error::Error>
    {   Settings::load(&self.settings)
    }

    /// Broker configuration, resolving the key from `settings` and
    /// the process environment
    pub fn broker_config(
      &self
    , settings: &Settings
    , default_model: &str
    ) -> Result<BrokerConfig, crate::error::Error>
    {   let api_key = config::resolve_api_key(
          settings.api_key.as_deref()
        , |var| std::env::var(var).ok()
        )?;
        let model = self.model.clone()
          .unwrap_or_else(|| default_model.to_string());

        let mut broker_config = BrokerConfig::new(api_key, model)
          .with_log_dir(self.log_path.clone())
          .with_cooldown(Duration::from_secs(self.cooldown_secs))
          .with_max_attempts(self.max_attempts);
        if let Some(api_base) = &settings.api_base
        {   broker_config = broker_config.with_api_base(api_base.clone());
        }
        Ok(broker_config)
    }
}

/// add-localization arguments
#[derive(Parser, Debug)]
#[command(
  author, version
, about = "Processes .swift files and replaces strings constructed with quotes by String(localized:comment:) constructors. The comment will describe how the string is used in the app's UI."
)]
pub struct AddLocalizationArgs
{   /// Either several .swift files or a single folder to process all .swift files found in it
    #[arg(required = true)]
    pub paths: Vec<PathBuf>
  , /// Output folder. If not given, the input files are overwritten
    #[arg(long)]
    pub output: Option<PathBuf>
  , /// Wrap the existing strings in place, without new variables or line breaks
    #[arg(long)]
    pub single_line_modifications: bool
  , #[command(flatten)]
    pub common: CommonArgs
}

/// translate-localization arguments
#[derive(Parser, Debug)]
#[command(
  author, version
, about = "Translates the untranslated entries of a Localizable.xcstrings catalog into another language."
)]
pub struct TranslateArgs
{   /// Target language code, e.g. de
    pub language: String
  , /// Catalog to translate. Defaults to the first Localizable.xcstrings below the current folder
    pub catalog: Option<PathBuf>
  , /// Write the updated catalog here instead of in place
    #[arg(long)]
    pub output: Option<PathBuf>
  , /// Phrases per request
    #[arg(long, default_value_t = crate::prompt::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize
  , /// Description of the app appended to the prompt
    #[arg(long)]
    pub app_context: Option<String>
  , #[command(flatten)]
    pub common: CommonArgs
}

/// Ask before files are modified in place. Only `yes` continues.
pub fn confirm_overwrite<R, W>(
  what: &str
, input: &mut R
, output: &mut W
) -> Result<bool, crate::error::Error>
where
  R: BufRead
, W: Write
{   writeln!(output, "Warning: This will modify {} in-place, i.e. overwrite them!", what)?;
    writeln!(output, "If you don't have a version control system, this is not recommended!\n")?;
    write!(output, "Please type 'yes' to continue or any other key to abort. ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if answer.trim() == "yes"
    {   return Ok(true);
    }
    writeln!(output, "\nAborting.")?;
    Ok(false)
}

/// `confirm_overwrite` on the terminal
pub fn confirm_overwrite_stdin(what: &str)
  -> Result<bool, crate::error::Error>
{   let stdin = std::io::stdin();
    confirm_overwrite(what, &mut stdin.lock(), &mut std::io::stdout())
}
