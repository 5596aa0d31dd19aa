//! Source Rewriter: localize the strings of Swift files

use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::broker::CompletionBroker;
use crate::prompt::rewrite::{self, LineStyle, ReferencePair};
use crate::providers::Upstream;
use crate::query_log::QueryLog;

pub const SOURCE_EXTENSION: &str = "swift";

/// A file to localize and where its result goes. Both may be equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationPair
{   pub input: PathBuf
  , pub output: PathBuf
}

impl LocalizationPair
{   pub fn is_in_place(&self) -> bool
    {   self.input == self.output
    }
}

/// All `.swift` files below `dir`, sorted by path
pub fn swift_files_below(dir: &Path)
  -> Result<Vec<PathBuf>, crate::error::Error>
{   let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name()
    {   let entry = entry.map_err(|e| {
          crate::error::Error::Io(e.to_string())
        })?;
        let is_swift = entry.path().extension()
          .is_some_and(|ext| ext == SOURCE_EXTENSION);
        if entry.file_type().is_file() && is_swift
        {   files.push(entry.into_path());
        }
    }
    debug!("Found {} swift files below {}", files.len(), dir.display());
    Ok(files)
}

/// Deepest folder containing every path
fn common_ancestor(paths: &[PathBuf]) -> Option<PathBuf>
{   let mut common = paths.first()?.clone();
    for path in &paths[1..]
    {   while !path.starts_with(&common)
        {   if !common.pop()
            {   return None;
            }
        }
    }
    Some(common)
}

/// Turn command-line paths into input/output pairs.
///
/// A folder as first path selects every Swift file below it; further
/// paths are ignored with a warning. Otherwise every path must be an
/// existing file. With `output_dir` the layout below the common
/// folder of the inputs is recreated there.
pub fn discover_pairs(
  paths: &[PathBuf]
, output_dir: Option<&Path>
) -> Result<Vec<LocalizationPair>, crate::error::Error>
{   let first = paths.first().ok_or_else(|| {
      crate::error::Error::InvalidConfiguration(
        "no input paths given".to_string()
      )
    })?;

    let output_dir = match output_dir
    {   Some(dir) => {
          let dir = std::path::absolute(dir)?;
          if dir.exists() && !dir.is_dir()
          {   return Err(crate::error::Error::InvalidConfiguration(
                format!(
                  "--output needs to be a folder but {} was given",
                  dir.display()
                )
              ));
          }
          Some(dir)
        }
      , None => None
    };

    let (root, inputs) = if first.is_dir()
    {   if paths.len() > 1
        {   warn!(
              "Only a single input folder is supported but {} paths were given, using {}",
              paths.len(), first.display()
            );
        }
        let root = std::path::absolute(first)?;
        (root.clone(), swift_files_below(&root)?)
    } else
    {   let mut inputs = Vec::with_capacity(paths.len());
        for path in paths
        {   if path.is_dir()
            {   return Err(crate::error::Error::InvalidConfiguration(
                  format!(
                    "Path must be a file, not a folder like {}",
                    path.display()
                  )
                ));
            }
            if !path.exists()
            {   return Err(crate::error::Error::InvalidConfiguration(
                  format!("File not found: {}", path.display())
                ));
            }
            inputs.push(std::path::absolute(path)?);
        }
        let parents: Vec<PathBuf> = inputs.iter()
          .filter_map(|p| p.parent().map(Path::to_path_buf))
          .collect();
        let root = common_ancestor(&parents).unwrap_or_default();
        (root, inputs)
    };

    inputs.into_iter()
      .map(|input| {
        let output = match &output_dir
        {   None => input.clone()
          , Some(dir) => {
              let relative = input.strip_prefix(&root)
                .map_err(|_| crate::error::Error::InvalidConfiguration(
                  format!(
                    "{} is not below {}",
                    input.display(), root.display()
                  )
                ))?;
              dir.join(relative)
            }
        };
        Ok(LocalizationPair { input, output })
      })
      .collect()
}

/// Settings shared by every file of a run
#[derive(Debug, Clone)]
pub struct RewriteJob
{   pub style: LineStyle
  , pub reference: ReferencePair
}

impl RewriteJob
{   pub fn new(style: LineStyle) -> Self
    {   RewriteJob
        {   style
          , reference: ReferencePair::builtin()
        }
    }
}

/// Localize one file and write the model's answer verbatim
pub async fn rewrite_file<U, L>(
  broker: &mut CompletionBroker<U, L>
, pair: &LocalizationPair
, job: &RewriteJob
) -> Result<(), crate::error::Error>
where
  U: Upstream
, L: QueryLog
{   let source = std::fs::read_to_string(&pair.input)?;
    let request = rewrite::assemble(&source, job.style, &job.reference);

    let rewritten = match job.style
    {   LineStyle::SingleLine => {
          let keeps_code = |response: &str| {
            crate::preserve::preserves_surrounding_code(&source, response)
          };
          broker.complete(&request, Some(&keeps_code)).await?
        }
      , LineStyle::MultiLine => broker.complete(&request, None).await?
    };

    if let Some(parent) = pair.output.parent()
    {   std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&pair.output, rewritten)?;
    info!("Wrote {}", pair.output.display());
    Ok(())
}

/// Localize every pair in order. The first failure aborts the run.
pub async fn run<U, L>(
  broker: &mut CompletionBroker<U, L>
, pairs: &[LocalizationPair]
, job: &RewriteJob
) -> Result<usize, crate::error::Error>
where
  U: Upstream
, L: QueryLog
{   for pair in pairs
    {   println!("Generating localized version for:\n  {}", pair.input.display());
        if pair.is_in_place()
        {   println!("  Result will overwrite input");
        } else
        {   println!("  Result will be written to:\n  {}", pair.output.display());
        }
        rewrite_file(broker, pair, job).await?;
    }
    Ok(pairs.len())
}
