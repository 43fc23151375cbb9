//! Post-execution scan of generated text for indicator-like tokens.
//!
//! The scanner is advisory: it reports every code-shaped token it finds and
//! whether the catalog knows it. It never rewrites the text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::catalog::Catalog;
use crate::domain::normalize::normalize;

/// Uppercase letter followed by uppercase letters, digits or underscores.
static CODE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\p{Lu}[\p{Lu}\p{Nd}_]*\b").expect("code token regex is valid")
});

pub const DEFAULT_MIN_TOKEN_LEN: usize = 5;

/// Tokens that look like codes in assistant output but never are.
pub const DEFAULT_IGNORED_TOKENS: &[&str] = &["ISTAC", "TOOL_REQUEST", "END_TOOL_REQUEST", "NOTA", "FUENTE"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPolicy {
    pub min_token_len: usize,
    /// Normalized tokens that are never reported.
    pub ignore: Vec<String>,
}

impl ScanPolicy {
    pub fn new<I, S>(min_token_len: usize, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_token_len,
            ignore: ignore
                .into_iter()
                .map(|t| normalize(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    fn ignores(&self, token: &str) -> bool {
        self.ignore.iter().any(|t| t == token)
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_LEN, DEFAULT_IGNORED_TOKENS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Known,
    Unverified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Byte range of the token in the scanned text.
    pub span: Range<usize>,
    /// The token as it appears in the text.
    pub token: String,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn unverified(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.verdict == Verdict::Unverified)
    }

    pub fn known(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.verdict == Verdict::Known)
    }

    /// `true` if no unverified token was found.
    pub fn is_clean(&self) -> bool {
        self.unverified().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Scan with the default policy.
pub fn scan(catalog: &Catalog, text: &str) -> ScanReport {
    scan_with(catalog, text, &ScanPolicy::default())
}

pub fn scan_with(catalog: &Catalog, text: &str, policy: &ScanPolicy) -> ScanReport {
    let registry = catalog.dimensions();

    let findings = CODE_TOKEN_RE
        .find_iter(text)
        .filter(|m| m.as_str().chars().count() >= policy.min_token_len)
        .filter_map(|m| {
            let key = normalize(m.as_str());
            if key.is_empty() || policy.ignores(&key) {
                return None;
            }
            let verdict = if catalog.contains(&key) {
                Verdict::Known
            } else if registry.is_vocabulary(&key) {
                return None;
            } else {
                Verdict::Unverified
            };
            Some(Finding {
                span: m.range(),
                token: m.as_str().to_string(),
                verdict,
            })
        })
        .collect();

    ScanReport { findings }
}
