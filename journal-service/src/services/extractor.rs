//! Text extraction from the completion envelope.
//!
//! Walks candidates → content → parts → text with presence checks at every
//! level; a miss anywhere resolves to the caller's fallback literal.

use crate::models::CompletionResponse;

/// Outcome of pulling the first text part out of a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<'a> {
    Found(&'a str),
    Fallback(&'static str),
}

impl Extraction<'_> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Extraction::Found(text) => *text,
            Extraction::Fallback(text) => *text,
        }
    }

    pub fn into_string(self) -> String {
        self.as_str().to_string()
    }
}

/// First candidate's first part's text, if every level is present and the
/// text is non-empty.
pub fn first_text(response: &CompletionResponse) -> Option<&str> {
    response
        .candidates
        .as_deref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.as_deref())
        .and_then(|parts| parts.first())
        .and_then(|part| part.text.as_deref())
        .filter(|text| !text.is_empty())
}

pub fn extract<'a>(response: &'a CompletionResponse, fallback: &'static str) -> Extraction<'a> {
    match first_text(response) {
        Some(text) => Extraction::Found(text),
        None => Extraction::Fallback(fallback),
    }
}
