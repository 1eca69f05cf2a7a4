//! Utterance intent classifier.
//!
//! Detects whether a raw user message is an image-generation request, one of
//! the hard-coded FAQ questions, a rename directive, or plain chat. Matching
//! is case-insensitive; FAQ phrases match on word boundaries. Evaluation
//! order is fixed: image > identity > creator > rename > generic.

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::config::IntentConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Image-generation request with the trigger keywords stripped out.
    ImageRequest { cleaned_prompt: String },

    /// "your name", "who are you"
    IdentityQuery,

    /// "who made you", "who is your creator"
    CreatorQuery,

    /// "call me <name>"
    RenameDirective { new_name: String },

    /// Fallback: forward to the generative model.
    GenericChat,
}

const IMAGE_KEYWORDS: &[&str] = &[
    "image",
    "picture",
    "draw",
    "create an image of",
    "generate",
];

// Broader than the trigger list so articles and the trailing "of" come out
// together with the keyword ("a picture of a cat" -> "a cat").
const IMAGE_STRIP_PHRASES: &[&str] = &[
    "create an image of",
    "an image of",
    "a picture of",
    "image of",
    "picture of",
    "image",
    "picture",
    "draw",
    "generate",
];

const IDENTITY_PHRASES: &[&str] = &["your name", "who are you"];

const CREATOR_PHRASES: &[&str] = &["who made you", "who is your creator"];

const RENAME_PHRASE: &str = "call me";

pub struct Classifier {
    image_keywords: Vec<String>,
    image_strip_phrases: Vec<String>,
    identity_patterns: Vec<Regex>,
    creator_patterns: Vec<Regex>,
}

impl Classifier {
    pub fn new(config: &IntentConfig) -> Result<Self> {
        let image_keywords: Vec<String> = IMAGE_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .chain(config.extra_image_keywords.iter().map(|k| k.to_lowercase()))
            .collect();

        // Strip longest phrases first so "a picture of" wins over "picture".
        let mut image_strip_phrases: Vec<String> = IMAGE_STRIP_PHRASES
            .iter()
            .map(|p| p.to_string())
            .chain(config.extra_image_keywords.iter().map(|k| k.to_lowercase()))
            .collect();
        image_strip_phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));

        let identity_patterns = word_boundary_patterns(
            IDENTITY_PHRASES,
            &config.extra_identity_phrases,
        )?;
        let creator_patterns = word_boundary_patterns(
            CREATOR_PHRASES,
            &config.extra_creator_phrases,
        )?;

        Ok(Self {
            image_keywords,
            image_strip_phrases,
            identity_patterns,
            creator_patterns,
        })
    }

    pub fn classify(&self, utterance: &str) -> Intent {
        let lower = utterance.to_lowercase();

        if self
            .image_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
        {
            let cleaned_prompt = self.clean_image_prompt(utterance);
            debug!("Detected ImageRequest, cleaned prompt: '{}'", cleaned_prompt);
            return Intent::ImageRequest { cleaned_prompt };
        }

        if self.identity_patterns.iter().any(|re| re.is_match(&lower)) {
            debug!("Detected IdentityQuery");
            return Intent::IdentityQuery;
        }

        if self.creator_patterns.iter().any(|re| re.is_match(&lower)) {
            debug!("Detected CreatorQuery");
            return Intent::CreatorQuery;
        }

        if let Some(idx) = lower.find(RENAME_PHRASE) {
            let new_name = capitalize(lower[idx + RENAME_PHRASE.len()..].trim());
            if !new_name.is_empty() {
                debug!("Detected RenameDirective: '{}'", new_name);
                return Intent::RenameDirective { new_name };
            }
        }

        debug!("Defaulting to GenericChat");
        Intent::GenericChat
    }

    // Strips case-insensitively but edits the original string, so the
    // remaining prompt keeps the user's casing.
    fn clean_image_prompt(&self, utterance: &str) -> String {
        let mut prompt = utterance.to_string();
        for phrase in &self.image_strip_phrases {
            while let Some(idx) = find_ignore_ascii_case(&prompt, phrase) {
                prompt.replace_range(idx..idx + phrase.len(), " ");
            }
        }
        prompt.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.char_indices().find_map(|(idx, _)| {
        haystack
            .get(idx..idx + needle.len())
            .filter(|window| window.eq_ignore_ascii_case(needle))
            .map(|_| idx)
    })
}

fn word_boundary_patterns(builtin: &[&str], extra: &[String]) -> Result<Vec<Regex>> {
    builtin
        .iter()
        .map(|p| p.to_string())
        .chain(extra.iter().map(|p| p.to_lowercase()))
        .map(|phrase| Ok(Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))?))
        .collect()
}

/// Python-style capitalize: first char upper, rest lower.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&IntentConfig::default()).expect("default classifier")
    }

    #[test]
    fn test_image_request_cleans_trigger_keywords() {
        assert_eq!(
            classifier().classify("generate a picture of a cat"),
            Intent::ImageRequest {
                cleaned_prompt: "a cat".to_string()
            }
        );

        assert_eq!(
            classifier().classify("create an image of a mountain at sunset"),
            Intent::ImageRequest {
                cleaned_prompt: "a mountain at sunset".to_string()
            }
        );

        assert_eq!(
            classifier().classify("Draw a spaceship"),
            Intent::ImageRequest {
                cleaned_prompt: "a spaceship".to_string()
            }
        );
    }

    #[test]
    fn test_cleaned_prompt_keeps_user_casing() {
        assert_eq!(
            classifier().classify("draw the Eiffel Tower"),
            Intent::ImageRequest {
                cleaned_prompt: "the Eiffel Tower".to_string()
            }
        );

        // Trigger keywords are stripped regardless of their own casing.
        assert_eq!(
            classifier().classify("Generate a Picture of a Cat"),
            Intent::ImageRequest {
                cleaned_prompt: "a Cat".to_string()
            }
        );
    }

    #[test]
    fn test_identity_query() {
        assert_eq!(classifier().classify("what is your name?"), Intent::IdentityQuery);
        assert_eq!(classifier().classify("Who are you"), Intent::IdentityQuery);
    }

    #[test]
    fn test_creator_query() {
        assert_eq!(classifier().classify("who made you"), Intent::CreatorQuery);
        assert_eq!(
            classifier().classify("tell me, who is your creator?"),
            Intent::CreatorQuery
        );
    }

    #[test]
    fn test_word_boundary_blocks_partial_matches() {
        // "your nameplate" must not count as an identity question.
        assert_eq!(
            classifier().classify("polish your nameplate"),
            Intent::GenericChat
        );
    }

    #[test]
    fn test_rename_directive_capitalizes() {
        assert_eq!(
            classifier().classify("call me Max"),
            Intent::RenameDirective {
                new_name: "Max".to_string()
            }
        );

        assert_eq!(
            classifier().classify("please call me ALICE"),
            Intent::RenameDirective {
                new_name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_bare_call_me_falls_through() {
        assert_eq!(classifier().classify("call me"), Intent::GenericChat);
    }

    #[test]
    fn test_generic_chat_fallback() {
        assert_eq!(classifier().classify("hello there"), Intent::GenericChat);
        assert_eq!(classifier().classify(""), Intent::GenericChat);
    }

    #[test]
    fn test_priority_image_over_identity() {
        // Contains both an image keyword and "your name"; image wins.
        let intent = classifier().classify("draw your name as graffiti");
        assert!(matches!(intent, Intent::ImageRequest { .. }));
    }

    #[test]
    fn test_priority_identity_over_rename() {
        assert_eq!(
            classifier().classify("who are you? you can call me Sam"),
            Intent::IdentityQuery
        );
    }

    #[test]
    fn test_locale_extension_keywords() {
        let config = IntentConfig {
            extra_image_keywords: vec!["zeichne".to_string()],
            extra_identity_phrases: vec!["wie heisst du".to_string()],
            ..IntentConfig::default()
        };
        let classifier = Classifier::new(&config).expect("extended classifier");

        assert_eq!(
            classifier.classify("zeichne einen hund"),
            Intent::ImageRequest {
                cleaned_prompt: "einen hund".to_string()
            }
        );
        assert_eq!(classifier.classify("wie heisst du?"), Intent::IdentityQuery);
    }
}
