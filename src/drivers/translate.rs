//! Catalog Translator: fill a target language into an `.xcstrings` file

use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::broker::CompletionBroker;
use crate::catalog::Catalog;
use crate::prompt::translate::{self, BatchEntry};
use crate::providers::Upstream;
use crate::query_log::QueryLog;

pub const CATALOG_FILE_NAME: &str = "Localizable.xcstrings";

/// First `Localizable.xcstrings` below `dir`
pub fn find_catalog(dir: &Path) -> Option<PathBuf>
{   WalkDir::new(dir)
      .sort_by_file_name()
      .into_iter()
      .filter_map(Result::ok)
      .find(|e| e.file_type().is_file() && e.file_name() == CATALOG_FILE_NAME)
      .map(|e| e.into_path())
}

/// What to translate into and how
#[derive(Debug, Clone)]
pub struct TranslateJob
{   pub target_language: String
  , pub app_context: Option<String>
  , pub batch_size: usize
}

impl TranslateJob
{   pub fn new(target_language: impl Into<String>) -> Self
    {   TranslateJob
        {   target_language: target_language.into()
          , app_context: None
          , batch_size: translate::DEFAULT_BATCH_SIZE
        }
    }

    pub fn with_app_context(mut self, context: Option<String>) -> Self
    {   self.app_context = context;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self
    {   self.batch_size = batch_size.max(1);
        self
    }
}

/// Counts reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary
{   pub pending: usize
  , pub translated: usize
  , pub batches: usize
}

/// Escapes and quotes whose count must survive translation
pub const ESCAPE_NEEDLES: [&str; 2] = ["\\n", "\""];

/// A needle that occurs a different number of times in the translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeMismatch
{   pub needle: &'static str
  , pub expected: usize
  , pub found: usize
}

/// Compare the counts of every `ESCAPE_NEEDLES` entry
pub fn escape_mismatches(source: &str, translation: &str)
  -> Vec<EscapeMismatch>
{   ESCAPE_NEEDLES.iter()
      .map(|&needle| EscapeMismatch
      {   needle
        , expected: source.matches(needle).count()
        , found: translation.matches(needle).count()
      })
      .filter(|m| m.expected != m.found)
      .collect()
}

/// Warn when escapes or quotes got lost in translation. The
/// translation is kept either way.
fn check_escapes(source: &str, translation: &str)
{   for m in escape_mismatches(source, translation)
    {   warn!(
          "Expected {} occurrences of {} but found {}\n  source: {}\n  translation: {}",
          m.expected, m.needle, m.found, source, translation
        );
    }
}

/// Translate one batch and write it into `catalog`
pub async fn translate_batch<U, L>(
  broker: &mut CompletionBroker<U, L>
, catalog: &mut Catalog
, batch: &[BatchEntry]
, job: &TranslateJob
) -> Result<usize, crate::error::Error>
where
  U: Upstream
, L: QueryLog
{   let request = translate::assemble(
      batch
    , &catalog.source_language
    , &job.target_language
    , job.app_context.as_deref()
    );
    let validator = translate::line_count_validator(batch.len());
    let response = broker.complete(&request, Some(&validator)).await?;

    let translations = translate::parse_batch_response(&response, batch)?;
    for (key, value) in translations
    {   check_escapes(&key, &value);
        catalog.apply_translation(&key, &job.target_language, value)?;
    }
    Ok(batch.len())
}

/// Translate every pending entry of `catalog` in place, batch by
/// batch. The first failing batch aborts the run; batches finished
/// before it stay applied to the in-memory catalog.
pub async fn translate_catalog<U, L>(
  broker: &mut CompletionBroker<U, L>
, catalog: &mut Catalog
, job: &TranslateJob
) -> Result<TranslationSummary, crate::error::Error>
where
  U: Upstream
, L: QueryLog
{   let pending = catalog.pending(&job.target_language);
    let mut summary = TranslationSummary
    {   pending: pending.len()
      , ..TranslationSummary::default()
    };
    info!(
      "{} entries need a {} translation",
      pending.len(), job.target_language
    );

    for (index, batch) in pending.chunks(job.batch_size).enumerate()
    {   println!("running gpt query {}", index + 1);
        debug!("Batch {} holds {} entries", index + 1, batch.len());
        summary.translated += translate_batch(broker, catalog, batch, job).await?;
        summary.batches += 1;
    }
    Ok(summary)
}

/// Load, translate and save a catalog file. A failed run writes
/// nothing. With nothing pending, an in-place catalog is left alone.
pub async fn translate_file<U, L>(
  broker: &mut CompletionBroker<U, L>
, input: &Path
, output: &Path
, job: &TranslateJob
) -> Result<TranslationSummary, crate::error::Error>
where
  U: Upstream
, L: QueryLog
{   let mut catalog = Catalog::load(input)?;
    println!("Source language found: {}", catalog.source_language);

    let summary = translate_catalog(broker, &mut catalog, job).await?;
    if summary.translated > 0 || input != output
    {   catalog.save(output)?;
    }
    Ok(summary)
}
