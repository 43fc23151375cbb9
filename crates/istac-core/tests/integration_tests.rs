//! Integration tests for istac-core.

use std::sync::Arc;
use std::thread;

use istac_core::{
    application::GuardService,
    domain::{
        Catalog, CatalogLoadError, CatalogRecord, DimensionRegistry, DimensionSpec,
        EditDistanceRanker, ScanPolicy, SuggestionRanker, ValidationResult, ValuePattern, Verdict,
        normalize, scan, suggest, validate_request,
    },
};
use proptest::prelude::*;

fn registry() -> DimensionRegistry {
    DimensionRegistry::new(vec![
        DimensionSpec::new("geo", "Territorio")
            .with_aliases(["isla", "islas", "municipio", "municipios", "canarias"])
            .with_values(["ISLANDS", "MUNICIPALITIES", "REGIONS"])
            .with_value_alias("I", "ISLANDS")
            .with_pattern(ValuePattern::NumericRange {
                min: 35001,
                max: 38999,
            }),
        DimensionSpec::new("sex", "Sexo")
            .with_aliases(["sexo", "género", "hombres", "mujeres"])
            .with_values(["F", "M", "T"]),
        DimensionSpec::new("age", "Edad")
            .with_aliases(["edad", "edades"])
            .with_values(["Y0T14", "Y15T64", "Y_GE65"]),
        DimensionSpec::new("time", "Periodo")
            .with_aliases(["periodo", "año"])
            .with_pattern(ValuePattern::Period),
    ])
    .unwrap()
    .with_default_dimensions(["geo", "time"])
    .unwrap()
}

fn catalog() -> Catalog {
    Catalog::build(
        vec![
            CatalogRecord::new("POBLACION", "Población").dimensions(["geo", "sex", "age"]),
            CatalogRecord::new("POBLACION_HOMBRES", "Población de hombres"),
            CatalogRecord::new("TASA_PARO", "Tasa de paro").dimensions(["geo", "sex", "time"]),
            CatalogRecord::new("TURISTAS", "Turistas recibidos"),
            CatalogRecord::new("AFILIADOS", "Afiliados a la Seguridad Social").status("deprecated"),
        ],
        registry(),
    )
    .unwrap()
}

fn filters(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn accented_identifier_is_accepted() {
    let c = catalog();
    let result = validate_request(&c, "Población", &[]);
    assert!(matches!(
        result,
        ValidationResult::Accepted { ref resolved_code, ref resolved_filters, .. }
            if resolved_code == "POBLACION" && resolved_filters.is_empty()
    ));
}

#[test]
fn code_plus_dimension_is_rejected_with_base_suggestion() {
    let c = catalog();
    match validate_request(&c, "POBLACION_ISLA", &[]) {
        ValidationResult::RejectedUnknownIndicator { suggestions, .. } => {
            assert_eq!(suggestions, ["POBLACION"]);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn dimension_filter_is_accepted() {
    let c = catalog();
    let result = validate_request(&c, "POBLACION", &filters(&[("geo", "ISLANDS")]));
    let ValidationResult::Accepted {
        resolved_code,
        resolved_filters,
        ..
    } = result
    else {
        panic!("expected acceptance");
    };
    assert_eq!(resolved_code, "POBLACION");
    assert_eq!(resolved_filters.len(), 1);
    assert_eq!(resolved_filters["geo"], "ISLANDS");
}

#[test]
fn invented_dimension_is_rejected() {
    let c = catalog();
    let result = validate_request(&c, "POBLACION", &filters(&[("alturaMontaña", "3718")]));
    assert!(matches!(
        result,
        ValidationResult::RejectedInvalidDimension { ref dimension, .. } if dimension == "alturaMontaña"
    ));
}

#[test]
fn scan_flags_unknown_code() {
    let c = catalog();
    let report = scan(&c, "El indicador PARO_FALSO no existe");
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].token, "PARO_FALSO");
    assert_eq!(report.findings[0].verdict, Verdict::Unverified);
}

// ── Properties ────────────────────────────────────────────────────────────────

#[test]
fn every_catalog_code_is_accepted_without_filters() {
    let c = catalog();
    for entry in c.all() {
        let result = validate_request(&c, entry.code().as_str(), &[]);
        assert!(result.is_accepted(), "{} -> {result}", entry.code());
    }
}

#[test]
fn compounds_with_dimensions_are_never_accepted() {
    let c = catalog();
    for entry in c.all() {
        for spec in c.dimensions().iter() {
            for term in std::iter::once(spec.key()).chain(spec.aliases().iter().map(String::as_str)) {
                let compound = format!("{}_{}", entry.code(), term);
                if c.contains(&compound) {
                    continue;
                }
                let result = validate_request(&c, &compound, &[]);
                assert!(!result.is_accepted(), "{compound} was accepted");
            }
        }
    }
}

#[test]
fn numeric_codes_must_be_canonical() {
    let c = catalog();
    for value in ["035001", "0038999", "00000000000000035001", "350010000000000000000000000"] {
        let result = validate_request(&c, "POBLACION", &filters(&[("geo", value)]));
        assert!(
            matches!(result, ValidationResult::RejectedInvalidValue { .. }),
            "{value} -> {result}"
        );
    }
}

#[test]
fn dimension_names_are_not_indicators() {
    let c = catalog();
    for name in ["isla", "sexo", "Edad", "GEO"] {
        let result = validate_request(&c, name, &[]);
        assert!(
            matches!(result, ValidationResult::RejectedDimensionAsIndicator { .. }),
            "{name} -> {result}"
        );
    }
}

#[test]
fn colliding_catalog_fails_to_load() {
    let err = Catalog::build(
        vec![
            CatalogRecord::new("POBLACION", "Población"),
            CatalogRecord::new("Municipio", "Municipio"),
        ],
        registry(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CatalogLoadError::NamespaceCollision {
            name: "MUNICIPIO".into()
        }
    );
}

#[test]
fn deprecated_indicator_is_accepted_and_flagged() {
    let c = catalog();
    assert!(matches!(
        validate_request(&c, "afiliados", &[]),
        ValidationResult::Accepted { deprecated: true, .. }
    ));
}

#[test]
fn prose_is_not_flagged() {
    let c = catalog();
    let text = "En Canarias la población creció un 1,2% en el año 2023 según el ISTAC.";
    assert!(scan(&c, text).is_empty());
}

// ── Concurrency ───────────────────────────────────────────────────────────────

#[test]
fn validation_runs_concurrently_on_shared_catalog() {
    let service = Arc::new(GuardService::new(Arc::new(catalog())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..50 {
                    let code = if i % 2 == 0 { "POBLACION" } else { "TASA_PARO" };
                    assert!(service.validate_request(code, &[]).is_accepted());
                    assert!(!service.validate_request("POBLACION_ISLA", &[]).is_accepted());
                    assert!(service.scan_text("POBLACION y FALSO_CODIGO").findings.len() == 2);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn service_honours_scan_policy() {
    let service = GuardService::new(Arc::new(catalog()))
        .with_scan_policy(ScanPolicy::new(5, ["FALSO_CODIGO"]))
        .unwrap();
    assert!(service.scan_text("FALSO_CODIGO").is_clean());
}

proptest! {
    #[test]
    fn unknown_strings_are_rejected_as_unknown(s in "[a-z]{3,12}") {
        let c = catalog();
        let key = normalize(&s);
        prop_assume!(!c.contains(&key));
        prop_assume!(!c.dimensions().is_dimension_name(&key));

        let result = validate_request(&c, &s, &[]);
        let is_unknown = matches!(result, ValidationResult::RejectedUnknownIndicator { .. });
        prop_assert!(is_unknown);
    }

    #[test]
    fn suggestions_respect_limit_and_bound(s in "[A-Z_]{1,14}", limit in 0usize..6) {
        let c = catalog();
        let ranker = EditDistanceRanker::default();
        let ranked = ranker.rank(&c, &s, limit);
        prop_assert!(ranked.len() <= limit);
        prop_assert_eq!(suggest(&c, &s, limit).len(), ranked.len());

        let key = normalize(&s);
        for suggestion in ranked {
            let entry = c.get(&suggestion.code).unwrap();
            let justified = suggestion.code.as_str().contains(&key)
                || normalize(entry.display_name()).contains(&key)
                || key.contains(suggestion.code.as_str())
                || suggestion.distance <= ranker.max_distance;
            prop_assert!(justified);
        }
    }

    #[test]
    fn accepted_filter_values_are_canonical(
        dimension in prop::sample::select(vec!["geo", "isla", "sexo", "edad", "periodo"]),
        value in "0{0,3}[0-9]{4,6}|[0-9]{4}([QqMm][0-9]{1,2})?|[a-zA-Z_ ]{1,10}",
    ) {
        let c = catalog();
        let result = validate_request(&c, "POBLACION", &filters(&[(dimension, value.as_str())]));
        if let ValidationResult::Accepted { resolved_filters, .. } = result {
            for (name, resolved) in &resolved_filters {
                let spec = c.dimensions().get(name).unwrap();
                prop_assert_eq!(&normalize(resolved), resolved);
                let canonical = spec.values().contains(resolved)
                    || spec.patterns().iter().any(|p| p.matches(resolved));
                prop_assert!(canonical, "{}={} is not canonical", name, resolved);
            }
        }
    }

    #[test]
    fn short_tokens_never_flagged(s in "[A-Z]{1,4}") {
        let c = catalog();
        let text = format!("texto {s} texto");
        prop_assert!(scan(&c, &text).is_empty());
    }
}
