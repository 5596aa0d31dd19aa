//! Per-attempt audit log of requests and responses

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use log::{debug, trace};

/// The four files written for every attempt, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage
{   SystemInput
  , UserInput
  , ApiResponse
  , ModelOutput
}

impl Stage
{   pub fn index(self) -> u8
    {   match self
        {   Stage::SystemInput => 1
          , Stage::UserInput => 2
          , Stage::ApiResponse => 3
          , Stage::ModelOutput => 4
        }
    }

    pub fn name(self) -> &'static str
    {   match self
        {   Stage::SystemInput => "system-input"
          , Stage::UserInput => "user-input"
          , Stage::ApiResponse => "api-response"
          , Stage::ModelOutput => "gpt-output"
        }
    }

    /// `{stamp}_{index}_{name}.txt`
    pub fn file_name(self, stamp: &str) -> String
    {   format!("{}_{}_{}.txt", stamp, self.index(), self.name())
    }
}

/// Second-resolution timestamps with a zero-padded counter, so that
/// several attempts within one second still sort in attempt order.
#[derive(Debug, Default)]
pub struct AttemptStamp
{   last: Option<String>
  , repeats: usize
}

impl AttemptStamp
{   pub fn new() -> Self
    {   AttemptStamp::default()
    }

    /// Stamp for the current local time
    pub fn next(&mut self) -> String
    {   let now = chrono::Local::now()
          .format("%Y-%m-%d_%H-%M-%S")
          .to_string();
        self.next_for(now)
    }

    /// Stamp for an already formatted time, `{base}-{counter:03}`
    pub fn next_for(&mut self, base: String) -> String
    {   if self.last.as_deref() == Some(base.as_str())
        {   self.repeats += 1;
        } else
        {   self.repeats = 0;
        }
        let stamp = format!("{}-{:03}", base, self.repeats);
        self.last = Some(base);
        stamp
    }
}

/// Sink for the query log. Nothing reads it back.
pub trait QueryLog: Send
{   fn record(
      &mut self
    , stamp: &str
    , stage: Stage
    , content: &str
    ) -> Result<(), crate::error::Error>;
}

/// Writes one flat text file per stage into a folder
#[derive(Debug, Clone)]
pub struct FileQueryLog
{   dir: PathBuf
}

impl FileQueryLog
{   /// Create the log, creating `dir` if missing
    pub fn create(dir: &Path)
      -> Result<Self, crate::error::Error>
    {   let dir = std::path::absolute(dir)?;
        std::fs::create_dir_all(&dir)?;
        debug!("Query log folder: {}", dir.display());
        Ok(FileQueryLog { dir })
    }

    pub fn dir(&self) -> &Path
    {   &self.dir
    }
}

impl QueryLog for FileQueryLog
{   fn record(
      &mut self
    , stamp: &str
    , stage: Stage
    , content: &str
    ) -> Result<(), crate::error::Error>
    {   let path = self.dir.join(stage.file_name(stamp));
        trace!("Writing {}", path.display());
        std::fs::write(&path, content)?;
        Ok(())
    }
}

/// One recorded log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord
{   pub stamp: String
  , pub stage: Stage
  , pub content: String
}

/// In-memory sink; clones share the same records
#[derive(Debug, Clone, Default)]
pub struct MemoryQueryLog
{   records: Arc<Mutex<Vec<LogRecord>>>
}

impl MemoryQueryLog
{   pub fn new() -> Self
    {   MemoryQueryLog::default()
    }

    pub fn records(&self) -> Vec<LogRecord>
    {   self.records.lock()
          .map(|r| r.clone())
          .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<Stage>
    {   self.records().iter().map(|r| r.stage).collect()
    }
}

impl QueryLog for MemoryQueryLog
{   fn record(
      &mut self
    , stamp: &str
    , stage: Stage
    , content: &str
    ) -> Result<(), crate::error::Error>
    {   let mut records = self.records.lock()
          .map_err(|_| crate::error::Error::Other(
            "query log poisoned".to_string()
          ))?;
        records.push(LogRecord
        {   stamp: stamp.to_string()
          , stage
          , content: content.to_string()
        });
        Ok(())
    }
}
