//! Identifier canonicalisation.
//!
//! Every string that is compared against the catalog (indicator codes,
//! dimension names, filter values, scanned tokens) goes through [`normalize`]
//! first. The output only ever contains `A-Z`, `0-9` and single interior
//! underscores, which is the code grammar of the catalog.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Canonicalise a raw identifier.
///
/// Steps, in order:
/// 1. trim surrounding whitespace
/// 2. uppercase
/// 3. strip diacritics (`Ó` → `O`) via canonical decomposition
/// 4. collapse every run of characters outside `[A-Z0-9_]` into one `_`
///
/// Underscore runs collapse to a single `_` and leading or trailing
/// underscores are dropped, so the function is idempotent.
///
/// ```
/// use istac_core::domain::normalize;
///
/// assert_eq!(normalize("  Población "), "POBLACION");
/// assert_eq!(normalize("tasa de  paro"), "TASA_DE_PARO");
/// assert_eq!(normalize(&normalize("Año-2023")), normalize("Año-2023"));
/// ```
pub fn normalize(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();

    let mut out = String::with_capacity(upper.len());
    let mut pending_separator = false;

    for c in upper.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            // '_', whitespace, punctuation and any non-ASCII residue.
            pending_separator = true;
        }
    }

    out
}

/// `true` if `s` is already in canonical form.
pub fn is_normalized(s: &str) -> bool {
    normalize(s) == s
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_accents_and_uppercases() {
        assert_eq!(normalize("Población"), "POBLACION");
        assert_eq!(normalize("POBLACIÓN_HOMBRES"), "POBLACION_HOMBRES");
        assert_eq!(normalize("Tasa_paro"), "TASA_PARO");
        assert_eq!(normalize("alturaMontaña"), "ALTURAMONTANA");
    }

    #[test]
    fn collapses_whitespace_and_punctuation() {
        assert_eq!(normalize("tasa de paro"), "TASA_DE_PARO");
        assert_eq!(normalize("tasa -- de\t paro"), "TASA_DE_PARO");
        assert_eq!(normalize("TASA__PARO"), "TASA_PARO");
        assert_eq!(normalize("grupo de edad (años)"), "GRUPO_DE_EDAD_ANOS");
    }

    #[test]
    fn trims_edge_separators() {
        assert_eq!(normalize("  _POBLACION_ "), "POBLACION");
        assert_eq!(normalize("¿población?"), "POBLACION");
        assert_eq!(normalize("`TASA_PARO`,"), "TASA_PARO");
    }

    #[test]
    fn garbage_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("¡¿…?!"), "");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize("2023q1"), "2023Q1");
        assert_eq!(normalize("35 001"), "35_001");
    }

    #[test]
    fn is_normalized_detects_canonical_form() {
        assert!(is_normalized("POBLACION"));
        assert!(is_normalized(""));
        assert!(!is_normalized("poblacion"));
        assert!(!is_normalized("POBLACION_"));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn output_stays_within_code_grammar(s in "\\PC*") {
            let out = normalize(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
            prop_assert!(!out.starts_with('_'));
            prop_assert!(!out.ends_with('_'));
            prop_assert!(!out.contains("__"));
        }
    }
}
