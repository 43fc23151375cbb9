//! Dimension specifications and the registry that indexes them.
//!
//! A dimension (`geo`, `sex`, `age`, …) is a filter axis, never an indicator.
//! Specs are global: an indicator only *exposes* a subset of them through its
//! `available_dimensions`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::CatalogLoadError;
use crate::domain::normalize::normalize;

/// Terms shorter than this are not used to split compound identifiers.
/// Single-letter value aliases (`I`, `M`) would otherwise match anywhere.
const MIN_SEGMENT_TERM_LEN: usize = 3;

// ── ValuePattern ──────────────────────────────────────────────────────────────

/// An open-ended family of permitted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValuePattern {
    /// All-digit code within an inclusive range, e.g. municipality codes
    /// `35001..=38999`.
    NumericRange { min: u64, max: u64 },
    /// `YYYY`, `YYYYQn` or `YYYYMmm`.
    Period,
}

impl ValuePattern {
    /// Check an already-normalized value against the pattern.
    ///
    /// Numeric codes must be written in canonical form: `035001` is not
    /// `35001`.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::NumericRange { min, max } => {
                !value.is_empty()
                    && value.bytes().all(|b| b.is_ascii_digit())
                    && value.parse::<u64>().is_ok_and(|n| {
                        (*min..=*max).contains(&n) && n.to_string() == value
                    })
            }
            Self::Period => is_period(value),
        }
    }

    /// Short human description used in rejection messages.
    pub fn describe(&self) -> String {
        match self {
            Self::NumericRange { min, max } => format!("{min}-{max}"),
            Self::Period => "YYYY | YYYYQn | YYYYMmm".to_string(),
        }
    }
}

impl fmt::Display for ValuePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn is_period(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return false;
    }
    match &bytes[4..] {
        [] => true,
        [b'Q', q] => (b'1'..=b'4').contains(q),
        [b'M', m1, m2] => {
            m1.is_ascii_digit()
                && m2.is_ascii_digit()
                && matches!((m1 - b'0') * 10 + (m2 - b'0'), 1..=12)
        }
        _ => false,
    }
}

// ── DimensionSpec ─────────────────────────────────────────────────────────────

/// A recognized dimension and the values it permits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionSpec {
    name: String,
    key: String,
    label: String,
    aliases: Vec<String>,
    values: Vec<String>,
    value_aliases: BTreeMap<String, String>,
    patterns: Vec<ValuePattern>,
}

impl DimensionSpec {
    /// Create a spec. The canonical name is the lowercase form of the
    /// normalized input (`"Geo "` → `"geo"`).
    pub fn new(name: impl AsRef<str>, label: impl Into<String>) -> Self {
        let key = normalize(name.as_ref());
        Self {
            name: key.to_ascii_lowercase(),
            key,
            label: label.into(),
            aliases: Vec::new(),
            values: Vec::new(),
            value_aliases: BTreeMap::new(),
            patterns: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for alias in aliases {
            let alias = normalize(alias.as_ref());
            if !alias.is_empty() && alias != self.key && !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            let value = normalize(value.as_ref());
            if !value.is_empty() && !self.values.contains(&value) {
                self.values.push(value);
            }
        }
        self
    }

    pub fn with_value_alias(mut self, alias: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.value_aliases
            .insert(normalize(alias.as_ref()), normalize(value.as_ref()));
        self
    }

    pub fn with_pattern(mut self, pattern: ValuePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Canonical lowercase name (`geo`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized lookup key (`GEO`).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value_aliases(&self) -> &BTreeMap<String, String> {
        &self.value_aliases
    }

    pub fn patterns(&self) -> &[ValuePattern] {
        &self.patterns
    }

    /// `true` if the normalized `term` is this dimension's key or an alias.
    pub fn answers_to(&self, term: &str) -> bool {
        self.key == term || self.aliases.iter().any(|a| a == term)
    }

    /// Resolve a raw filter value to its canonical form.
    ///
    /// Exact value first, then value alias, then patterns. `None` means the
    /// value is not permitted.
    pub fn resolve_value(&self, raw: &str) -> Option<String> {
        let value = normalize(raw);
        if value.is_empty() {
            return None;
        }
        if self.values.contains(&value) {
            return Some(value);
        }
        if let Some(canonical) = self.value_aliases.get(&value) {
            return Some(canonical.clone());
        }
        self.patterns
            .iter()
            .any(|p| p.matches(&value))
            .then_some(value)
    }

    /// Enumerable values followed by pattern descriptions.
    pub fn allowed_values(&self) -> Vec<String> {
        self.values
            .iter()
            .cloned()
            .chain(self.patterns.iter().map(ValuePattern::describe))
            .collect()
    }

    /// Internal consistency of a single spec.
    pub fn validate(&self) -> Result<(), CatalogLoadError> {
        let invalid = |reason: String| CatalogLoadError::InvalidDimensionSpec {
            dimension: self.name.clone(),
            reason,
        };

        if self.key.is_empty() {
            return Err(invalid("dimension name is empty".into()));
        }
        if self.values.is_empty() && self.patterns.is_empty() {
            return Err(invalid("no permitted values or patterns".into()));
        }
        for (alias, target) in &self.value_aliases {
            if alias.is_empty() {
                return Err(invalid("empty value alias".into()));
            }
            if !self.values.contains(target) {
                return Err(invalid(format!(
                    "value alias '{alias}' points at undeclared value '{target}'"
                )));
            }
        }
        for pattern in &self.patterns {
            if let ValuePattern::NumericRange { min, max } = pattern
                && min > max
            {
                return Err(invalid(format!("empty numeric range {min}-{max}")));
            }
        }
        Ok(())
    }
}

// ── DimensionRegistry ─────────────────────────────────────────────────────────

/// The process-wide set of dimension specs.
///
/// Built once at load time; lookups never allocate a cache afterwards.
#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    specs: Vec<DimensionSpec>,
    /// normalized name or alias → spec indices (aliases may be shared).
    names: HashMap<String, Vec<usize>>,
    /// names, aliases, values and value aliases → spec indices.
    terms: HashMap<String, Vec<usize>>,
    default_dimensions: Vec<String>,
}

impl DimensionRegistry {
    /// Index `specs`.
    ///
    /// # Errors
    ///
    /// - a spec fails [`DimensionSpec::validate`]
    /// - two specs share a canonical name
    /// - an alias of one spec equals the canonical name of another
    pub fn new(specs: Vec<DimensionSpec>) -> Result<Self, CatalogLoadError> {
        let mut names: HashMap<String, Vec<usize>> = HashMap::new();
        let mut terms: HashMap<String, Vec<usize>> = HashMap::new();

        for spec in &specs {
            spec.validate()?;
        }

        for (idx, spec) in specs.iter().enumerate() {
            if let Some(existing) = names.get(spec.key()) {
                let other = &specs[existing[0]];
                return Err(CatalogLoadError::InvalidDimensionSpec {
                    dimension: spec.name().to_string(),
                    reason: if other.key() == spec.key() {
                        "declared twice".into()
                    } else {
                        format!("name is already an alias of '{}'", other.name())
                    },
                });
            }
            names.insert(spec.key().to_string(), vec![idx]);
        }

        for (idx, spec) in specs.iter().enumerate() {
            for alias in spec.aliases() {
                let entry = names.entry(alias.clone()).or_default();
                if let Some(&first) = entry.first()
                    && specs[first].key() == alias.as_str()
                {
                    return Err(CatalogLoadError::InvalidDimensionSpec {
                        dimension: spec.name().to_string(),
                        reason: format!("alias '{alias}' is the name of another dimension"),
                    });
                }
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }

        for (idx, spec) in specs.iter().enumerate() {
            let vocabulary = std::iter::once(spec.key())
                .chain(spec.aliases().iter().map(String::as_str))
                .chain(spec.values().iter().map(String::as_str))
                .chain(spec.value_aliases().keys().map(String::as_str));
            for term in vocabulary {
                let entry = terms.entry(term.to_string()).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }

        Ok(Self {
            specs,
            names,
            terms,
            default_dimensions: Vec::new(),
        })
    }

    /// Dimensions assigned to catalog rows that do not list their own.
    pub fn with_default_dimensions<I, S>(mut self, names: I) -> Result<Self, CatalogLoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut defaults = Vec::new();
        for name in names {
            let spec = self.get(name.as_ref()).ok_or_else(|| {
                CatalogLoadError::InvalidDimensionSpec {
                    dimension: name.as_ref().to_string(),
                    reason: "listed in default_dimensions but never declared".into(),
                }
            })?;
            if !defaults.iter().any(|d| d == spec.name()) {
                defaults.push(spec.name().to_string());
            }
        }
        self.default_dimensions = defaults;
        Ok(self)
    }

    /// Spec by canonical name or key (aliases are not considered).
    pub fn get(&self, name: &str) -> Option<&DimensionSpec> {
        let key = normalize(name);
        self.specs.iter().find(|s| s.key() == key)
    }

    /// Every spec whose name or alias equals the normalized `attribute`.
    ///
    /// More than one spec is returned only for shared aliases.
    pub fn resolve(&self, attribute: &str) -> Vec<&DimensionSpec> {
        self.lookup_indices(&self.names, &normalize(attribute))
    }

    /// `true` if `term` (normalized) names or aliases a dimension.
    pub fn is_dimension_name(&self, term: &str) -> bool {
        self.names.contains_key(term)
    }

    /// `true` if `term` (normalized) is any dimension vocabulary: name,
    /// alias, permitted value or value alias.
    pub fn is_vocabulary(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Dimensions a vocabulary term belongs to, for segmenting compound
    /// identifiers. Short terms are excluded.
    pub fn segment_term(&self, term: &str) -> Vec<&DimensionSpec> {
        if term.len() < MIN_SEGMENT_TERM_LEN {
            return Vec::new();
        }
        self.lookup_indices(&self.terms, term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimensionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn default_dimensions(&self) -> &[String] {
        &self.default_dimensions
    }

    fn lookup_indices(&self, map: &HashMap<String, Vec<usize>>, key: &str) -> Vec<&DimensionSpec> {
        map.get(key)
            .map(|idx| idx.iter().map(|&i| &self.specs[i]).collect())
            .unwrap_or_default()
    }
}
