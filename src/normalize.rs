//! Deterministic post-processing for completion text

use serde::{Deserialize, Serialize};

/// Normalization applied to a successful completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeMode
{   /// Collapse every whitespace run, newlines included, to one space
    CollapseWhitespace
  , /// Collapse whitespace within lines but keep the line structure
    PreserveMarkdownStructure
}

/// Apply the selected normalization. Both modes are idempotent.
pub fn normalize(mode: NormalizeMode, text: &str) -> String
{   match mode
    {   NormalizeMode::CollapseWhitespace => {
          collapse_whitespace(text)
        }
      , NormalizeMode::PreserveMarkdownStructure => {
          preserve_markdown_structure(text)
        }
    }
}

/// Flatten the text into one line for HTML paragraph rendering.
pub fn collapse_whitespace(text: &str) -> String
{   text.split_whitespace()
      .collect::<Vec<_>>()
      .join(" ")
}

/// Keep headings, bullets and paragraph breaks usable by a Markdown
/// renderer: whitespace collapses within each line, runs of blank
/// lines collapse to a single separator.
pub fn preserve_markdown_structure(text: &str) -> String
{   let mut lines: Vec<String> = Vec::new();
    let mut blank_pending = false;

    for line in text.lines()
    {   let collapsed = collapse_whitespace(line);
        if collapsed.is_empty()
        {   blank_pending = !lines.is_empty();
            continue;
        }
        if blank_pending
        {   lines.push(String::new());
            blank_pending = false;
        }
        lines.push(collapsed);
    }

    lines.join("\n")
}
