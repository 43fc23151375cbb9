//! Attribute classification: is a requested name an indicator, a dimension
//! of a given indicator, or neither?
//!
//! The resolver only ever looks at one attribute against one entry. Compound
//! identifiers (`POBLACION_ISLA`) are never resolved into a valid request;
//! [`decompose`] explains them so that rejections can point at the base code.

use std::fmt;

use serde::Serialize;

use crate::domain::catalog::Catalog;
use crate::domain::entities::{CatalogEntry, DimensionSpec};
use crate::domain::normalize::normalize;
use crate::domain::value_objects::IndicatorCode;

// ── classify ──────────────────────────────────────────────────────────────────

/// What an attribute name refers to, relative to one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind<'a> {
    /// The attribute is itself a catalog indicator code.
    Indicator(&'a CatalogEntry),
    /// Names or aliases exactly one dimension the entry exposes.
    Dimension(&'a DimensionSpec),
    /// A shared alias that maps to several dimensions the entry exposes.
    Ambiguous(Vec<&'a DimensionSpec>),
    /// Not exposed by the entry, or not a known name at all.
    Unknown,
}

/// Classify `attribute` in the context of `entry`.
pub fn classify<'a>(
    catalog: &'a Catalog,
    entry: &CatalogEntry,
    attribute: &str,
) -> AttributeKind<'a> {
    let key = normalize(attribute);
    if key.is_empty() {
        return AttributeKind::Unknown;
    }

    if let Some(indicator) = catalog.lookup(&key) {
        return AttributeKind::Indicator(indicator);
    }

    let mut exposed: Vec<&DimensionSpec> = catalog
        .dimensions()
        .resolve(&key)
        .into_iter()
        .filter(|spec| entry.exposes(spec.name()))
        .collect();

    match exposed.len() {
        0 => AttributeKind::Unknown,
        1 => AttributeKind::Dimension(exposed.remove(0)),
        _ => AttributeKind::Ambiguous(exposed),
    }
}

// ── decompose ─────────────────────────────────────────────────────────────────

/// One dimension term found in the suffix of a compound identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundSegment {
    pub term: String,
    /// Canonical names of the dimensions the term belongs to.
    pub dimensions: Vec<String>,
}

/// An identifier of the form `CODE_SUFFIX` where `CODE` is a catalog code
/// and the suffix spells out dimension vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundIdentifier {
    pub base: IndicatorCode,
    pub segments: Vec<CompoundSegment>,
}

impl CompoundIdentifier {
    /// Distinct dimension names mentioned in the suffix, first-seen order.
    pub fn dimension_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.segments.iter().flat_map(|s| &s.dimensions) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

impl fmt::Display for CompoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for segment in &self.segments {
            write!(f, " + {} ({})", segment.term, segment.dimensions.join("|"))?;
        }
        Ok(())
    }
}

/// Split `identifier` into the longest catalog code prefix and a suffix made
/// only of dimension vocabulary.
///
/// Returns `None` when the identifier is itself a catalog code, has no
/// catalog prefix, or has a suffix that is not entirely dimension terms.
pub fn decompose(catalog: &Catalog, identifier: &str) -> Option<CompoundIdentifier> {
    let key = normalize(identifier);
    if catalog.contains(&key) {
        return None;
    }

    let tokens: Vec<&str> = key.split('_').collect();
    for split in (1..tokens.len()).rev() {
        let prefix = tokens[..split].join("_");
        let Some(entry) = catalog.lookup(&prefix) else {
            continue;
        };

        let mut segments = Vec::new();
        let all_terms = tokens[split..].iter().all(|token| {
            match segment_token(catalog, token) {
                Some(found) => {
                    segments.extend(found);
                    true
                }
                None => false,
            }
        });

        if all_terms {
            return Some(CompoundIdentifier {
                base: entry.code().clone(),
                segments,
            });
        }
    }

    None
}

/// Word-break `token` into registry vocabulary, preferring longer terms.
fn segment_token(catalog: &Catalog, token: &str) -> Option<Vec<CompoundSegment>> {
    let registry = catalog.dimensions();
    let n = token.len();

    // best[i]: segmentation of token[i..], if any.
    let mut best: Vec<Option<Vec<CompoundSegment>>> = vec![None; n + 1];
    best[n] = Some(Vec::new());

    for start in (0..n).rev() {
        for end in (start + 1..=n).rev() {
            let Some(rest) = best[end].as_ref() else {
                continue;
            };
            let Some(term) = token.get(start..end) else {
                continue;
            };
            let specs = registry.segment_term(term);
            if specs.is_empty() {
                continue;
            }
            let mut segments = Vec::with_capacity(rest.len() + 1);
            segments.push(CompoundSegment {
                term: term.to_string(),
                dimensions: specs.iter().map(|s| s.name().to_string()).collect(),
            });
            segments.extend(rest.iter().cloned());
            best[start] = Some(segments);
            break;
        }
    }

    best.swap_remove(0)
}
