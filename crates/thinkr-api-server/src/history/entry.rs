use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
    Image,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
            Sender::Image => "image",
        };
        f.write_str(label)
    }
}

/// Entry payload: plain text for chat turns, a structured descriptor for
/// image generations. Untagged so the on-disk form stays a bare string or
/// a `{prompt, image_url}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryBody {
    Image { prompt: String, image_url: String },
    Text(String),
}

/// One recorded conversation turn. Immutable once appended.
///
/// Field names match the persisted layout: `{text, sender, time}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: EntryBody,
    pub sender: Sender,
    pub time: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: EntryBody::Text(text.into()),
            sender,
            time: Utc::now(),
        }
    }

    pub fn image(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            text: EntryBody::Image {
                prompt: prompt.into(),
                image_url: image_url.into(),
            },
            sender: Sender::Image,
            time: Utc::now(),
        }
    }
}
