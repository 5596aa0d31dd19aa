//! `.xcstrings` localization catalog

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use log::{debug, info};

use crate::prompt::BatchEntry;

pub const TRANSLATED_STATE: &str = "translated";

/// Whole catalog. Unknown fields (e.g. `version`) are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog
{   pub source_language: String
  , #[serde(default)]
    pub strings: BTreeMap<String, CatalogEntry>
  , #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localizations: Option<BTreeMap<String, Localization>>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_translate: Option<bool>
  , #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_unit: Option<StringUnit>
  , #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringUnit
{   pub state: String
  , pub value: String
}

impl CatalogEntry
{   pub fn is_translated_in(&self, language: &str) -> bool
    {   self.localizations.as_ref()
          .is_some_and(|l| l.contains_key(language))
    }

    pub fn translation(&self, language: &str) -> Option<&StringUnit>
    {   self.localizations.as_ref()?
          .get(language)?
          .string_unit.as_ref()
    }

    /// Insert or replace the `language` localization
    pub fn set_translation(&mut self, language: &str, value: String)
    {   self.localizations
          .get_or_insert_with(BTreeMap::new)
          .insert(language.to_string(), Localization
          {   string_unit: Some(StringUnit
              {   state: TRANSLATED_STATE.to_string()
                , value
              })
            , extra: serde_json::Map::new()
          });
    }
}

impl Catalog
{   pub fn from_json(raw: &str) -> Result<Self, crate::error::Error>
    {   serde_json::from_str(raw)
          .map_err(|e| crate::error::Error::Catalog(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, crate::error::Error>
    {   debug!("Loading catalog {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Catalog::from_json(&raw).map_err(|e| {
          crate::error::Error::Catalog(
            format!("{}: {}", path.display(), e)
          )
        })
    }

    /// Serialize the way Xcode does: keys sorted, two-space indent,
    /// `"key" : value`
    pub fn to_json(&self) -> Result<String, crate::error::Error>
    {   // going through Value sorts every object by key
        let value = serde_json::to_value(self)
          .map_err(|e| crate::error::Error::Catalog(e.to_string()))?;

        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(
          &mut out, XcodeFormatter::new()
        );
        value.serialize(&mut ser)
          .map_err(|e| crate::error::Error::Catalog(e.to_string()))?;
        String::from_utf8(out)
          .map_err(|e| crate::error::Error::Catalog(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), crate::error::Error>
    {   if let Some(parent) = path.parent()
            .filter(|p| !p.as_os_str().is_empty())
        {   std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!("Wrote catalog {}", path.display());
        Ok(())
    }

    /// Entries still missing `language`, in key order. Entries marked
    /// `shouldTranslate: false` are left out.
    pub fn pending(&self, language: &str) -> Vec<BatchEntry>
    {   self.strings.iter()
          .filter(|(_, e)| e.should_translate != Some(false))
          .filter(|(_, e)| !e.is_translated_in(language))
          .map(|(key, e)| BatchEntry::new(key.clone(), e.comment.clone()))
          .collect()
    }

    /// Store an accepted translation. Unknown keys are an error.
    pub fn apply_translation(
      &mut self
    , key: &str
    , language: &str
    , value: String
    ) -> Result<(), crate::error::Error>
    {   let entry = self.strings.get_mut(key)
          .ok_or_else(|| crate::error::Error::Catalog(
            format!("no entry for key {:?}", key)
          ))?;
        entry.set_translation(language, value);
        Ok(())
    }
}

/// `PrettyFormatter` with `" : "` between object keys and values
struct XcodeFormatter
{   inner: PrettyFormatter<'static>
}

impl XcodeFormatter
{   fn new() -> Self
    {   XcodeFormatter
        {   inner: PrettyFormatter::with_indent(b"  ")
        }
    }
}

impl Formatter for XcodeFormatter
{   fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool)
      -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool)
      -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W)
      -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   writer.write_all(b" : ")
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
      W: ?Sized + io::Write
    {   self.inner.end_object_value(writer)
    }
}
