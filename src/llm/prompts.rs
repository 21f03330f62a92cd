//! Prompt templates with `{{name}}` placeholders

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::{DigestError, Result};

/// Placeholder the summary template expects the transcript in.
pub const TRANSCRIPT_KEY: &str = "transcript";

/// Built-in prompt asking for sentiment and points of friction as JSON.
pub const DEFAULT_SUMMARY_TEMPLATE: &str = r#"I need to summarize a conversation. The transcript of the
conversation is between the <data> XML like tags.

<data>
{{transcript}}
</data>

The summary must contain a one word sentiment analysis, and
a list of issues, problems or causes of friction
during the conversation. The output must be provided in
JSON format shown in the following example.

Example output:
{
    "sentiment": <sentiment>,
    "issues": [
        {
            "topic": <topic>,
            "summary": <issue_summary>,
        }
    ]
}

Write the JSON output and nothing more.

Here is the JSON output:
"#;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
            .expect("placeholder pattern is valid")
    })
}

/// A prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The conversation summary template
    pub fn summary() -> Self {
        Self::new(DEFAULT_SUMMARY_TEMPLATE)
    }

    /// Read a template from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            DigestError::Template(format!(
                "failed to read prompt template {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::new(source))
    }

    /// Use `path` when given, the built-in summary template otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::summary()),
        }
    }

    /// Names of the placeholders in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder()
            .captures_iter(&self.source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Substitute every placeholder in one pass.
    ///
    /// Values are inserted verbatim and are not scanned for placeholders.
    pub fn render(&self, context: &HashMap<&str, &str>) -> Result<String> {
        let missing: Vec<&str> = self
            .placeholders()
            .into_iter()
            .filter(|name| !context.contains_key(name))
            .collect();

        if !missing.is_empty() {
            return Err(DigestError::Template(format!(
                "no value for placeholder(s): {}",
                missing.join(", ")
            )));
        }

        let rendered = placeholder().replace_all(&self.source, |caps: &Captures| {
            context.get(&caps[1]).copied().unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

/// Render `template` with the transcript as its only value.
pub fn render_transcript_prompt(template: &PromptTemplate, transcript: &str) -> Result<String> {
    let context = HashMap::from([(TRANSCRIPT_KEY, transcript)]);
    template.render(&context)
}
