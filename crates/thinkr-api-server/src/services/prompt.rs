//! Prompt assembly: stored history first, instruction block last, so the
//! active instruction sits closest to the generation boundary.

use crate::history::{EntryBody, HistoryEntry};

pub fn assemble(history: &[HistoryEntry], new_utterance: &str, assistant_name: &str) -> String {
    let mut conversation = String::new();

    for entry in history {
        match &entry.text {
            EntryBody::Text(text) => {
                conversation.push_str(&format!("{}: {}\n", entry.sender, text));
            }
            EntryBody::Image { prompt, .. } => {
                conversation.push_str(&format!(
                    "{} generated image for: {}\n",
                    entry.sender, prompt
                ));
            }
        }
    }

    conversation.push_str(&format!(
        "\nYou are a friendly AI assistant named {}. Answer naturally and concisely. User said: {}",
        assistant_name, new_utterance
    ));

    conversation
}
