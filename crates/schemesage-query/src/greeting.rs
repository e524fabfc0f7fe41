//! Greeting and small-talk detection.
//!
//! Greetings are scanned before sentiments and the first matching phrase
//! wins. A match short-circuits retrieval with a canned reply.

use rand::seq::SliceRandom;
use rand::Rng;
use schemesage_core::{GreetingMatch, PhraseTable};

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallTalk {
    Greeting,
    Sentiment,
}

struct TriggerGroup {
    kind: SmallTalk,
    /// Normalized trigger phrases, in scan order.
    phrases: Vec<String>,
    replies: Vec<String>,
}

/// A small-talk match and the reply chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortCircuit<'a> {
    pub kind: SmallTalk,
    pub phrase: &'a str,
    pub reply: &'a str,
}

pub struct GreetingDetector {
    groups: Vec<TriggerGroup>,
    mode: GreetingMatch,
}

impl GreetingDetector {
    pub fn new(phrases: &PhraseTable, mode: GreetingMatch) -> Self {
        let group = |kind, triggers: &[String], replies: &[String]| TriggerGroup {
            kind,
            phrases: triggers
                .iter()
                .map(|p| normalize(p))
                .filter(|p| !p.is_empty())
                .collect(),
            replies: replies.to_vec(),
        };

        Self {
            groups: vec![
                group(SmallTalk::Greeting, &phrases.greetings, &phrases.greeting_replies),
                group(SmallTalk::Sentiment, &phrases.sentiments, &phrases.sentiment_replies),
            ],
            mode,
        }
    }

    /// First trigger phrase contained in `normalized`, if any.
    pub fn find(&self, normalized: &str) -> Option<(SmallTalk, &str)> {
        let text = normalized.to_lowercase();
        let padded = format!(" {text} ");

        self.groups.iter().find_map(|group| {
            group
                .phrases
                .iter()
                .find(|phrase| match self.mode {
                    GreetingMatch::Substring => text.contains(phrase.as_str()),
                    GreetingMatch::Word => padded.contains(&format!(" {phrase} ")),
                })
                .map(|phrase| (group.kind, phrase.as_str()))
        })
    }

    /// Match `normalized` and draw one reply uniformly from the matching
    /// group. `None` means the pipeline should go on to retrieval.
    pub fn detect<R: Rng + ?Sized>(&self, normalized: &str, rng: &mut R) -> Option<ShortCircuit<'_>> {
        let (kind, phrase) = self.find(normalized)?;
        let group = self.groups.iter().find(|g| g.kind == kind)?;
        let reply = group.replies.choose(rng)?;
        Some(ShortCircuit {
            kind,
            phrase,
            reply: reply.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn extended() -> GreetingDetector {
        GreetingDetector::new(&PhraseTable::extended(), GreetingMatch::Substring)
    }

    #[test]
    fn test_greeting_reply_is_canned() {
        let table = PhraseTable::extended();
        let detector = extended();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let hit = detector.detect("hey there", &mut rng).unwrap();
            assert_eq!(hit.kind, SmallTalk::Greeting);
            assert!(table.greeting_replies.iter().any(|r| r == hit.reply));
        }
    }

    #[test]
    fn test_first_phrase_wins() {
        // "hi" precedes "hey there" in the greeting list
        let detector = extended();
        assert_eq!(detector.find("hi there"), Some((SmallTalk::Greeting, "hi")));
    }

    #[test]
    fn test_greetings_scanned_before_sentiments() {
        let detector = GreetingDetector::new(&PhraseTable::basic(), GreetingMatch::Substring);
        assert_eq!(detector.find("hello how are you"), Some((SmallTalk::Greeting, "hello")));
        assert_eq!(detector.find("how are you"), Some((SmallTalk::Sentiment, "how are you")));
    }

    #[test]
    fn test_apostrophe_phrases_match_normalized_input() {
        let detector = GreetingDetector::new(&PhraseTable::basic(), GreetingMatch::Substring);
        assert_eq!(detector.find("hows it going"), Some((SmallTalk::Sentiment, "hows it going")));
    }

    #[test]
    fn test_substring_vs_word_mode() {
        // "hi" hides inside "children"
        let substring = GreetingDetector::new(&PhraseTable::basic(), GreetingMatch::Substring);
        assert!(substring.find("schemes for children").is_some());

        let word = GreetingDetector::new(&PhraseTable::basic(), GreetingMatch::Word);
        assert!(word.find("schemes for children").is_none());
        assert_eq!(word.find("well hi"), Some((SmallTalk::Greeting, "hi")));
    }

    #[test]
    fn test_no_match() {
        let detector = GreetingDetector::new(&PhraseTable::basic(), GreetingMatch::Substring);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(detector.detect("pension for widows", &mut rng).is_none());
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let detector = extended();
        let a = detector.detect("hello", &mut StdRng::seed_from_u64(42)).unwrap().reply.to_string();
        let b = detector.detect("hello", &mut StdRng::seed_from_u64(42)).unwrap().reply.to_string();
        assert_eq!(a, b);
    }
}
