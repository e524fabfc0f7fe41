//! Runtime types.

use serde::Serialize;

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// At least one scheme block was rendered.
    Answered,
    /// Greeting or small talk; retrieval was skipped.
    Greeting,
    EmptyInput,
    /// Rejected by the validity filter, or nothing left after normalization.
    InvalidQuery,
    NoMatch,
    RetrievalTimeout,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Greeting => "greeting",
            Self::EmptyInput => "empty_input",
            Self::InvalidQuery => "invalid_query",
            Self::NoMatch => "no_match",
            Self::RetrievalTimeout => "retrieval_timeout",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final text for one request plus its outcome code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub outcome: Outcome,
}

impl Reply {
    pub fn new(text: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}

/// A request that passed screening and needs retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    pub normalized: String,
    /// Positive; not capped here.
    pub requested: usize,
}

/// Result of the screening stages that run before retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screened {
    Done(Reply),
    Retrieve(Query),
}
