//! Domain value objects: IndicatorCode, IndicatorStatus.
//!
//! Pure value types with equality-by-value and no identity. Parsing always
//! goes through [`normalize`](crate::domain::normalize) so two spellings of
//! the same code compare equal.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::normalize::normalize;

// ── IndicatorCode ─────────────────────────────────────────────────────────────

/// A normalized indicator code (`POBLACION`, `TASA_PARO`, …).
///
/// The inner string is guaranteed to be non-empty and in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IndicatorCode(String);

impl IndicatorCode {
    /// Normalize `raw` into a code. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for IndicatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IndicatorCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<IndicatorCode, _>` be queried with a plain `&str`.
impl Borrow<str> for IndicatorCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for IndicatorCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for IndicatorCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── IndicatorStatus ───────────────────────────────────────────────────────────

/// Publication status of an indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStatus {
    #[default]
    Active,
    Deprecated,
}

impl IndicatorStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deprecated => "deprecated",
        }
    }

    pub const fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated)
    }
}

impl fmt::Display for IndicatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "" | "ACTIVE" | "ACTIVO" | "PUBLISHED" | "PUBLICADO" => Ok(Self::Active),
            "DEPRECATED" | "OBSOLETO" | "ARCHIVED" | "ARCHIVADO" | "DISCONTINUED" => {
                Ok(Self::Deprecated)
            }
            _ => Err(format!("unknown indicator status: {s}")),
        }
    }
}
