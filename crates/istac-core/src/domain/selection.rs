//! Candidate selection after a rejection.
//!
//! When a request is rejected the caller shows a numbered list of
//! candidates and asks the user to pick one. The answer is itself
//! untrusted: it must be a position in that list or one of the listed
//! codes, never a new code. [`Selection`] bounds how many wrong answers are
//! tolerated before the caller has to search again.

use serde::Serialize;
use thiserror::Error;

use crate::domain::normalize::normalize;
use crate::domain::value_objects::IndicatorCode;

/// Wrong answers tolerated before a selection is abandoned.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

/// How many candidate codes a failed pick lists back to the user.
const LISTED_ON_MISMATCH: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SelectionError {
    #[error("empty selection")]
    Empty,

    #[error("no candidates to choose from")]
    NoCandidates,

    #[error("number {input} is out of range, choose between 1 and {max}")]
    OutOfRange { input: String, max: usize },

    #[error("'{input}' matches none of the options (valid: {})", .valid.join(", "))]
    NotACandidate { input: String, valid: Vec<String> },
}

/// Check one answer against the candidate list.
///
/// Accepts a 1-based position or a code from the list (compared after
/// normalization). Anything else is an error, including real catalog codes
/// that were not offered.
pub fn validate_selection(
    candidates: &[IndicatorCode],
    input: &str,
) -> Result<IndicatorCode, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoCandidates);
    }
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        return input
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=candidates.len()).contains(n))
            .map(|n| candidates[n - 1].clone())
            .ok_or_else(|| SelectionError::OutOfRange {
                input: input.to_string(),
                max: candidates.len(),
            });
    }

    let key = normalize(input);
    candidates
        .iter()
        .find(|c| c.as_str() == key)
        .cloned()
        .ok_or_else(|| SelectionError::NotACandidate {
            input: input.to_string(),
            valid: candidates
                .iter()
                .take(LISTED_ON_MISMATCH)
                .map(ToString::to_string)
                .collect(),
        })
}

/// A pending choice among candidates, with a bounded number of attempts.
///
/// [`Selection::submit`] consumes the selection, so a finished selection
/// cannot be answered again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    candidates: Vec<IndicatorCode>,
    attempts: usize,
    max_attempts: usize,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    /// The answer picked a candidate.
    Selected(IndicatorCode),
    /// Wrong answer; the selection is still open.
    Retry {
        selection: Selection,
        error: SelectionError,
    },
    /// Wrong answer and no attempts left.
    Exhausted { error: SelectionError },
}

impl Selection {
    /// `None` when there is nothing to choose from.
    pub fn new(candidates: Vec<IndicatorCode>) -> Option<Self> {
        (!candidates.is_empty()).then_some(Self {
            candidates,
            attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// At least one attempt is always allowed.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn candidates(&self) -> &[IndicatorCode] {
        &self.candidates
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn remaining(&self) -> usize {
        self.max_attempts - self.attempts
    }

    pub fn submit(mut self, input: &str) -> SelectionStep {
        self.attempts += 1;
        match validate_selection(&self.candidates, input) {
            Ok(code) => SelectionStep::Selected(code),
            Err(error) if self.attempts >= self.max_attempts => SelectionStep::Exhausted { error },
            Err(error) => SelectionStep::Retry {
                selection: self,
                error,
            },
        }
    }
}
