//! Prompt for wrapping user-facing Swift strings in
//! `String(localized:comment:)`

use crate::request::Request;

const TASK_INTRO: &str = "
I want you to look for strings in a Swift file and replace them with calls to the `String` initializer with the arguments `localized` and `comment` so that the file can be easier used for localization of an app.
In the string you will provide to the `comment` field in the initializer, include information about where the text will be visible, e.g. in a footer in the user interface, as part of a row in a table, as a heading for the whole page, etc.
Do this for all text that appears in the UI, even if a translation might not be necessary.
Do not remove any other text from the input file.
Just output the content of the modified file. Do not add introductory text like \"Here is the updated file\" or similar.
Just change the string. Do not add any wrapping Text views or similar.
";

const MULTI_LINE_RULE: &str = "
If the lines get very long, do not put `String(localized: \"...\", comment: \"...\")` in one line, but do it like this:
```
String(
    localized: \"...\",
    comment: \"...\"
)
```
";

const SINGLE_LINE_RULE: &str = "
Even if the lines get very long, do not add any newlines to `String(localized: \"...\", comment: \"...\")`.
Do not add any line breaks. Do not add any new variables like `let string = ...`.
";

const THREE_FILES: &str = "
You will be given three files.
First, an example of a file that has not been adapted with the string constructors.
Second, the same file, but with the required changes already applied.
Third, a file without the calls to the `String` initializer where it's your task to make those modifications and to return the whole file modified.
";

/// How the model may format the inserted constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle
{   /// Long constructors may be split over several lines
    #[default]
    MultiLine
  , /// Keep every line count; edit strings in place
    SingleLine
}

impl LineStyle
{   pub fn from_single_line_flag(single_line: bool) -> Self
    {   if single_line
        {   LineStyle::SingleLine
        } else
        {   LineStyle::MultiLine
        }
    }

    fn rule(self) -> &'static str
    {   match self
        {   LineStyle::MultiLine => MULTI_LINE_RULE
          , LineStyle::SingleLine => SINGLE_LINE_RULE
        }
    }
}

/// Annotated before/after example shown to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePair
{   pub before: String
  , pub after: String
}

impl ReferencePair
{   /// The pair shipped with the crate
    pub fn builtin() -> Self
    {   ReferencePair
        {   before: include_str!(
              "../../reference/PinEntryView_not-localized.swift"
            ).to_string()
          , after: include_str!(
              "../../reference/PinEntryView_localized.swift"
            ).to_string()
        }
    }
}

/// System instructions for `style`, including the reference pair
pub fn system_instructions(
  style: LineStyle
, reference: &ReferencePair
) -> String
{   let mut system = String::new();
    system.push_str(TASK_INTRO);
    system.push_str(style.rule());
    system.push_str(THREE_FILES);
    system.push('\n');

    system.push_str("First, a file without the modifications:\n\n");
    system.push_str(&reference.before);

    system.push_str("\n\n\n");
    system.push_str(
      "Now the same file, but with the required changes already applied:\n\n"
    );
    system.push_str(&reference.after);

    system.push_str("\n\n\n");
    system.push_str(
      "Now the last file, for which you should make those changes and respond with the whole file in updated form."
    );
    system
}

/// Request for one Swift file; the user input is the file verbatim
pub fn assemble(
  source: &str
, style: LineStyle
, reference: &ReferencePair
) -> Request
{   Request::new(system_instructions(style, reference), source)
}
