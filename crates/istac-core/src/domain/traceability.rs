//! Source attribution check for answers that quote statistical figures.
//!
//! A response that contains figures must carry the `📌` marker and name at
//! least two of the traceability fields, so that every number can be traced
//! back to an indicator and period.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const TRACE_MARKER: &str = "📌";

pub const TRACE_KEYWORDS: &[&str] = &["Fuente", "Indicador", "Código", "Periodo"];

/// Minimum number of [`TRACE_KEYWORDS`] a traced answer must mention.
pub const MIN_TRACE_KEYWORDS: usize = 2;

/// Thousand-separated numbers, percentages, or runs of four or more digits.
static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:\.\d{3})+|\d+(?:,\d+)?%|\d{4,}").expect("figure regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TraceabilityVerdict {
    /// No statistical figures, nothing to trace.
    NotRequired,
    Complete { found: Vec<String> },
    /// Figures without the trace marker.
    Missing,
    /// Marker present but too few trace fields.
    Incomplete { found: Vec<String> },
}

impl TraceabilityVerdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::NotRequired | Self::Complete { .. })
    }
}

impl std::fmt::Display for TraceabilityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotRequired => f.write_str("no figures, traceability not required"),
            Self::Complete { found } => write!(f, "traceable ({})", found.join(", ")),
            Self::Missing => write!(f, "figures without the {TRACE_MARKER} trace block"),
            Self::Incomplete { found } => write!(
                f,
                "incomplete trace block: {}/{} fields ({})",
                found.len(),
                TRACE_KEYWORDS.len(),
                found.join(", ")
            ),
        }
    }
}

/// `true` if `text` quotes something that looks like a statistical figure.
pub fn has_figures(text: &str) -> bool {
    FIGURE_RE.is_match(text)
}

pub fn check_traceability(text: &str) -> TraceabilityVerdict {
    if !has_figures(text) {
        return TraceabilityVerdict::NotRequired;
    }
    if !text.contains(TRACE_MARKER) {
        return TraceabilityVerdict::Missing;
    }

    let lower = text.to_lowercase();
    let found: Vec<String> = TRACE_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(&kw.to_lowercase()))
        .map(|kw| (*kw).to_string())
        .collect();

    if found.len() < MIN_TRACE_KEYWORDS {
        TraceabilityVerdict::Incomplete { found }
    } else {
        TraceabilityVerdict::Complete { found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_figures_needs_no_trace() {
        assert_eq!(
            check_traceability("La población creció el año pasado."),
            TraceabilityVerdict::NotRequired
        );
        assert_eq!(check_traceability("Hay 3 islas y 12 meses."), TraceabilityVerdict::NotRequired);
    }

    #[test]
    fn detects_figure_shapes() {
        assert!(has_figures("2.207.225 habitantes"));
        assert!(has_figures("paro del 16,2%"));
        assert!(has_figures("en 2023"));
        assert!(!has_figures("unos 150 turistas"));
    }

    #[test]
    fn figures_without_marker_are_missing() {
        assert_eq!(
            check_traceability("Canarias tiene 2.207.225 habitantes."),
            TraceabilityVerdict::Missing
        );
    }

    #[test]
    fn marker_with_one_field_is_incomplete() {
        let verdict = check_traceability("Paro: 16,2%\n📌 Fuente: ISTAC");
        assert_eq!(
            verdict,
            TraceabilityVerdict::Incomplete {
                found: vec!["Fuente".into()]
            }
        );
        assert!(!verdict.is_ok());
    }

    #[test]
    fn complete_trace_block() {
        let text = "Población: 2.207.225\n📌 Fuente: ISTAC | Indicador: POBLACION | Código: POBLACION | Periodo: 2023";
        let verdict = check_traceability(text);
        assert!(verdict.is_ok());
        assert_eq!(
            verdict,
            TraceabilityVerdict::Complete {
                found: vec![
                    "Fuente".into(),
                    "Indicador".into(),
                    "Código".into(),
                    "Periodo".into()
                ]
            }
        );
    }

    #[test]
    fn verdict_serializes_with_status_tag() {
        let json = serde_json::to_value(TraceabilityVerdict::Missing).unwrap();
        assert_eq!(json["status"], "missing");
    }
}
