//! Structural check that a rewrite only wrapped string literals

use std::borrow::Cow;
use std::sync::OnceLock;
use regex::Regex;
use log::debug;

fn localized_pattern() -> &'static Regex
{   static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
      Regex::new(
        r#"(?s)String\(\s*localized:\s*("(?:[^"\\]|\\.)*")\s*,\s*comment:\s*"(?:[^"\\]|\\.)*"\s*\)"#
      ).expect("valid localized-string pattern")
    })
}

/// Replace every `String(localized: "x", comment: "y")` by `"x"`
pub fn unwrap_localized(source: &str) -> Cow<'_, str>
{   localized_pattern().replace_all(source, "$1")
}

/// True if `rewritten` equals `original` once all localized
/// constructors in both are collapsed back into their literals.
/// Leading and trailing whitespace of the files is ignored.
pub fn preserves_surrounding_code(original: &str, rewritten: &str)
  -> bool
{   let unwrapped = unwrap_localized(rewritten);
    let expected = unwrap_localized(original);
    let same = unwrapped.trim() == expected.trim();
    if !same
    {   let line = unwrapped.trim().lines()
          .zip(expected.trim().lines())
          .position(|(a, b)| a != b);
        debug!(
          "Rewrite changed code outside string literals (first differing line: {:?})",
          line.map(|l| l + 1)
        );
    }
    same
}
