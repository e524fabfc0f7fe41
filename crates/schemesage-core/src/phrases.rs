//! Canned phrase and reply tables.
//!
//! Every piece of fixed text the pipeline can emit lives here, so a
//! deployment can swap the whole table from a JSON file without touching
//! the pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Profile;
use crate::error::{Error, Result};

/// Phrase and reply table for one pipeline profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseTable {
    /// Greeting triggers, scanned first, in order.
    pub greetings: Vec<String>,
    pub greeting_replies: Vec<String>,
    /// Small-talk triggers, scanned after greetings.
    pub sentiments: Vec<String>,
    pub sentiment_replies: Vec<String>,
    /// Lead-in placed before each scheme name.
    pub intros: Vec<String>,
    /// Apologies used when nothing could be rendered.
    pub no_match: Vec<String>,
    pub empty_input: String,
    pub not_understood: String,
    /// Appended when fewer blocks were rendered than requested.
    pub cap_notice: String,
    pub timeout: String,
}

const INTROS: &[&str] = &[
    "Sure! Let's talk about",
    "Here's some information on",
    "Check out this scheme:",
    "Take a look at",
    "Here's a scheme for you:",
];

const EMPTY_INPUT: &str = "Please provide an input.";
const NOT_UNDERSTOOD: &str =
    "I couldn't understand your input. Please rephrase your question or ask something else.";
const CAP_NOTICE: &str = "<br>I can only provide information on up to 10 schemes at a time. \
                          Would you like to narrow down your search?";
const TIMEOUT: &str =
    "I'm sorry, looking that up took too long. Please try again in a moment.";

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PhraseTable {
    /// Short phrase lists with a single apology.
    pub fn basic() -> Self {
        Self {
            greetings: owned(&[
                "hi",
                "hello",
                "good morning",
                "good afternoon",
                "good evening",
                "hey",
            ]),
            greeting_replies: owned(&[
                "Hello! How can I assist you today?",
                "Hi there! What would you like to know about?",
                "Hey! How can I help you?",
            ]),
            sentiments: owned(&["how are you", "what's up", "how's it going"]),
            sentiment_replies: owned(&[
                "I'm just a bot, but I'm here to help you!",
                "I'm here to assist you. How can I help?",
                "I'm here to provide information on schemes. How can I assist you?",
            ]),
            intros: owned(INTROS),
            no_match: owned(&[
                "I'm sorry, I don't have information on that topic. Could you please ask something else?",
            ]),
            empty_input: EMPTY_INPUT.into(),
            not_understood: NOT_UNDERSTOOD.into(),
            cap_notice: CAP_NOTICE.into(),
            timeout: TIMEOUT.into(),
        }
    }

    /// Long phrase lists with several apologies.
    pub fn extended() -> Self {
        Self {
            greetings: owned(&[
                "hi",
                "hello",
                "good morning",
                "good afternoon",
                "good evening",
                "hey",
                "gud morning",
                "greetings",
                "howdy",
                "hola",
                "bonjour",
                "ciao",
                "namaste",
                "salaam",
                "aloha",
                "shalom",
                "konnichiwa",
                "yo",
                "what's up",
                "wassup",
                "sup",
                "ahoy",
                "g'day",
                "hiya",
                "well hello there",
                "greetings and salutations",
                "howdy partner",
                "hey there",
                "hi there",
            ]),
            greeting_replies: owned(&[
                "Hello! How can I assist you today?",
                "Hi there! What would you like to know about?",
                "Hey! How can I help you?",
                "Greetings! How may I be of service?",
                "Howdy! What can I help you with?",
                "Yo! What's up? How can I help?",
                "G'day! What can I do for you?",
                "Well hello there! How can I assist you today?",
            ]),
            sentiments: owned(&[
                "how are you",
                "what's up",
                "whats up",
                "how's it going",
                "how are you doing",
                "how you doing",
                "how's everything",
                "how r u",
                "how r you",
                "how ru",
                "how ru doing",
                "how are things",
                "how goes it",
                "how's life",
                "how's your day",
            ]),
            sentiment_replies: owned(&[
                "I'm just a bot, but I'm here to help you!",
                "I'm here to assist you. How can I help?",
                "I'm here to provide information on schemes. How can I assist you?",
                "I'm an AI assistant, but I'll do my best to help you!",
                "I'm doing well, thanks for asking! How can I assist you today?",
            ]),
            intros: owned(INTROS),
            no_match: owned(&[
                "I'm sorry, I couldn't find any relevant schemes for your query.",
                "Unfortunately, I don't have information related to that. Could you please ask something else?",
                "I apologize, but your query doesn't seem to match any of the schemes in my database. Could you rephrase your question or ask about a different topic?",
            ]),
            empty_input: EMPTY_INPUT.into(),
            not_understood: NOT_UNDERSTOOD.into(),
            cap_notice: CAP_NOTICE.into(),
            timeout: TIMEOUT.into(),
        }
    }

    /// Built-in table for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Basic => Self::basic(),
            Profile::Extended => Self::extended(),
        }
    }

    /// Load a table from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&data)?;
        table.validate()?;
        Ok(table)
    }

    /// Every list a reply can be drawn from must be non-empty.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("greeting_replies", self.greeting_replies.is_empty() && !self.greetings.is_empty()),
            ("sentiment_replies", self.sentiment_replies.is_empty() && !self.sentiments.is_empty()),
            ("intros", self.intros.is_empty()),
            ("no_match", self.no_match.is_empty()),
        ];
        for (name, missing) in required {
            if missing {
                return Err(Error::Config(format!("phrase table: `{name}` must not be empty")));
            }
        }
        Ok(())
    }
}

impl Default for PhraseTable {
    fn default() -> Self {
        Self::extended()
    }
}
