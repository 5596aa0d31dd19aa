//! Prompt, validator and response parser for catalog translation batches

use log::debug;
use crate::request::Request;

pub const DEFAULT_BATCH_SIZE: usize = 30;
pub const RESPONSE_PREFIX: &str = "translation: ";
pub const NO_COMMENT: &str = "No comment provided.";

/// One untranslated catalog entry inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry
{   pub key: String
  , pub comment: Option<String>
}

impl BatchEntry
{   pub fn new(key: impl Into<String>, comment: Option<String>)
      -> Self
    {   BatchEntry { key: key.into(), comment }
    }

    /// `key:` / `comment:` / empty `translation:` record
    pub fn query(&self) -> String
    {   let comment = self.comment.as_deref()
          .filter(|c| !c.is_empty())
          .unwrap_or(NO_COMMENT);
        format!(
          "key: {}\ncomment: {}\ntranslation: \n",
          self.key, comment
        )
    }
}

/// Task description for a language pair
pub fn system_instructions(
  source_language: &str
, target_language: &str
, app_context: Option<&str>
) -> String
{   let mut info = format!(
      "I want you to translate some text from {source} to {target}.
This text will be used to offer an iOS app in different languages.
The input given to you will consist of three lines for each phrase that needs to be translated.
First, the phrase in {source}.
Second, a comment that describes in which context the phrase is occuring in the application's UI. Make sure that the translation you provide fits this context.
Third, a line starting with \"translation: \" in which you should add your translation.

Please return only the lines starting with \"translation:\" with your added translation after the colon. Do not include the comments in the translations, those are only to add context.
",
      source = source_language
    , target = target_language
    );

    if let Some(context) = app_context.filter(|c| !c.trim().is_empty())
    {   info.push('\n');
        info.push_str(context);
    }
    info
}

/// User input for a batch: one record per entry, blank line between
pub fn batch_query(batch: &[BatchEntry]) -> String
{   batch.iter()
      .map(BatchEntry::query)
      .collect::<Vec<_>>()
      .join("\n")
}

pub fn assemble(
  batch: &[BatchEntry]
, source_language: &str
, target_language: &str
, app_context: Option<&str>
) -> Request
{   Request::new(
      system_instructions(source_language, target_language, app_context)
    , batch_query(batch)
    )
}

fn answer_lines(response: &str) -> impl Iterator<Item = &str>
{   response.lines()
      .map(|l| l.trim_end_matches('\r'))
      .filter(|l| !l.is_empty())
}

/// Accepts a response iff it has exactly `expected` non-empty lines
pub fn line_count_validator(expected: usize)
  -> impl Fn(&str) -> bool + Send + Sync
{   move |response: &str| {
      let found = answer_lines(response).count();
      if found != expected
      {   debug!(
            "Expected {} non-empty lines, got {}:\n{}",
            expected, found, response
          );
      }
      found == expected
    }
}

/// Map the i-th answer line onto the i-th batch entry.
///
/// Lines are matched by position, not by key.
pub fn parse_batch_response(
  response: &str
, batch: &[BatchEntry]
) -> Result<Vec<(String, String)>, crate::error::Error>
{   let lines: Vec<&str> = answer_lines(response).collect();
    if lines.len() != batch.len()
    {   return Err(crate::error::Error::LineCountMismatch
        {   expected: batch.len()
          , found: lines.len()
        });
    }

    batch.iter()
      .zip(lines)
      .map(|(entry, line)| {
        line.strip_prefix(RESPONSE_PREFIX)
          .map(|value| (entry.key.clone(), value.to_string()))
          .ok_or_else(|| {
            crate::error::Error::MalformedResponseLine(line.to_string())
          })
      })
      .collect()
}
