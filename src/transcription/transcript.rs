//! Speaker-labeled transcript built from Transcribe output items

use serde::{Deserialize, Serialize};

use crate::{DigestError, Result};

/// Kind of a transcript item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A spoken word
    Pronunciation,
    /// Punctuation inserted by the service
    Punctuation,
}

/// One word or punctuation mark, in audio order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptItem {
    pub item_type: ItemType,
    pub speaker_label: Option<String>,
    pub content: String,
}

impl TranscriptItem {
    pub fn word(content: impl Into<String>, speaker: Option<&str>) -> Self {
        Self {
            item_type: ItemType::Pronunciation,
            speaker_label: speaker.map(str::to_string),
            content: content.into(),
        }
    }

    pub fn punctuation(content: impl Into<String>) -> Self {
        Self {
            item_type: ItemType::Punctuation,
            speaker_label: None,
            content: content.into(),
        }
    }
}

/// Join items into text, starting a `\n<speaker>: ` line whenever the speaker
/// label changes.
///
/// Items without a label continue the current speaker. Punctuation attaches to
/// the preceding word. Every item is followed by a single space.
pub fn reshape(items: &[TranscriptItem]) -> String {
    let mut output = String::new();
    let mut current_speaker: Option<&str> = None;

    for item in items {
        if let Some(label) = item.speaker_label.as_deref() {
            if current_speaker != Some(label) {
                current_speaker = Some(label);
                output.push('\n');
                output.push_str(label);
                output.push_str(": ");
            }
        }

        if item.item_type == ItemType::Punctuation {
            output.truncate(output.trim_end().len());
        }

        output.push_str(&item.content);
        output.push(' ');
    }

    output
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    results: RawResults,
}

#[derive(Debug, Deserialize)]
struct RawResults {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "type")]
    item_type: ItemType,
    #[serde(default)]
    speaker_label: Option<String>,
    #[serde(default)]
    alternatives: Vec<RawAlternative>,
}

#[derive(Debug, Deserialize)]
struct RawAlternative {
    content: String,
}

/// Decode the items of a Transcribe output document.
pub fn parse_transcript(json: &[u8]) -> Result<Vec<TranscriptItem>> {
    let raw: RawTranscript = serde_json::from_slice(json)
        .map_err(|e| DigestError::Transcription(format!("malformed transcript document: {e}")))?;

    raw.results
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let content = item
                .alternatives
                .into_iter()
                .next()
                .map(|alt| alt.content)
                .ok_or_else(|| {
                    DigestError::Transcription(format!(
                        "transcript item {index} has no alternatives"
                    ))
                })?;

            Ok(TranscriptItem {
                item_type: item.item_type,
                speaker_label: item.speaker_label,
                content,
            })
        })
        .collect()
}
