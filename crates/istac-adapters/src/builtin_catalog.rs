//! Built-in catalog and dimension registry.
//!
//! A compiled-in snapshot of the most requested ISTAC indicators and the
//! dimensions they expose. Used when no catalog file is configured, and as
//! the fixture for end-to-end tests of the CLI.
//!
//! Indicators without an explicit dimension list get the registry defaults
//! (`geo`, `time`).

use tracing::debug;

use istac_core::{
    application::ports::{CatalogSource, DimensionSource},
    domain::{CatalogLoadError, CatalogRecord, DimensionRegistry, DimensionSpec, ValuePattern},
};

/// Origin reported in logs and load errors.
pub const BUILTIN_ORIGIN: &str = "builtin";

const DEFAULT_DIMENSIONS: &[&str] = &["geo", "time"];

struct Row {
    code: &'static str,
    title: &'static str,
    topic: &'static str,
    dimensions: Option<&'static [&'static str]>,
    status: &'static str,
}

const fn row(
    code: &'static str,
    title: &'static str,
    topic: &'static str,
    dimensions: Option<&'static [&'static str]>,
) -> Row {
    Row {
        code,
        title,
        topic,
        dimensions,
        status: "active",
    }
}

const INDICATORS: &[Row] = &[
    // Demografía
    row("POBLACION", "Población", "Demografía", Some(&["geo", "sex", "age", "time"])),
    row("POBLACION_HOMBRES", "Población de hombres", "Demografía", Some(&["geo", "age", "time"])),
    row("POBLACION_MUJERES", "Población de mujeres", "Demografía", Some(&["geo", "age", "time"])),
    row(
        "POBLACION_EXTRANJERA",
        "Población extranjera",
        "Demografía",
        Some(&["geo", "sex", "nationality", "time"]),
    ),
    row("NACIMIENTOS", "Nacimientos", "Demografía", Some(&["geo", "sex", "time"])),
    row("DEFUNCIONES", "Defunciones", "Demografía", Some(&["geo", "sex", "age", "time"])),
    row("EDAD_MEDIA", "Edad media de la población", "Demografía", Some(&["geo", "sex", "time"])),
    Row {
        code: "POBLACION_DERECHO",
        title: "Población de derecho",
        topic: "Demografía",
        dimensions: Some(&["geo", "sex", "time"]),
        status: "deprecated",
    },
    // Mercado laboral
    row("TASA_PARO", "Tasa de paro", "Mercado laboral", Some(&["geo", "sex", "age", "time"])),
    row("TASA_ACTIVIDAD", "Tasa de actividad", "Mercado laboral", Some(&["geo", "sex", "age", "time"])),
    row("TASA_EMPLEO", "Tasa de empleo", "Mercado laboral", Some(&["geo", "sex", "age", "time"])),
    row(
        "PARO_REGISTRADO",
        "Paro registrado",
        "Mercado laboral",
        Some(&["geo", "sex", "age", "time", "measure"]),
    ),
    row(
        "AFILIACIONES",
        "Afiliaciones a la Seguridad Social",
        "Mercado laboral",
        Some(&["geo", "time", "measure"]),
    ),
    // Turismo
    row("TURISTAS", "Turistas recibidos", "Turismo", Some(&["geo", "time", "measure"])),
    row("PERNOCTACIONES", "Pernoctaciones hoteleras", "Turismo", None),
    row("GASTO_TURISTICO", "Gasto turístico total", "Turismo", None),
    // Economía
    row("IPC", "Índice de precios de consumo", "Economía", Some(&["geo", "time", "measure"])),
    row("PIB", "Producto interior bruto", "Economía", Some(&["geo", "time", "measure"])),
    row("VIVIENDAS_LIBRES", "Precio de la vivienda libre", "Vivienda", None),
];

/// The compiled-in dimension specs, in presentation order.
fn builtin_specs() -> Vec<DimensionSpec> {
    vec![
        DimensionSpec::new("geo", "Territorio")
            .with_aliases([
                "isla",
                "islas",
                "municipio",
                "municipios",
                "comarca",
                "comarcas",
                "provincia",
                "provincias",
                "canarias",
                "territorio",
            ])
            .with_values(["REGIONS", "PROVINCES", "ISLANDS", "MUNICIPALITIES"])
            .with_value_alias("R", "REGIONS")
            .with_value_alias("P", "PROVINCES")
            .with_value_alias("I", "ISLANDS")
            .with_value_alias("M", "MUNICIPALITIES")
            .with_value_alias("regiones", "REGIONS")
            .with_value_alias("canarias", "REGIONS")
            .with_value_alias("provincias", "PROVINCES")
            .with_value_alias("islas", "ISLANDS")
            .with_value_alias("municipios", "MUNICIPALITIES")
            .with_pattern(ValuePattern::NumericRange {
                min: 35001,
                max: 38999,
            }),
        DimensionSpec::new("sex", "Sexo")
            .with_aliases(["sexo", "género", "hombre", "hombres", "mujer", "mujeres"])
            .with_values(["F", "M", "T"])
            .with_value_alias("mujer", "F")
            .with_value_alias("mujeres", "F")
            .with_value_alias("hombre", "M")
            .with_value_alias("hombres", "M")
            .with_value_alias("total", "T"),
        DimensionSpec::new("age", "Edad")
            .with_aliases([
                "edad",
                "edades",
                "años",
                "grupo de edad",
                "grupos de edad",
                "jóvenes",
                "mayores",
                "niños",
            ])
            .with_values([
                "Y0T14", "Y15T64", "Y_GE65", "Y16T24", "Y25T54", "Y_GE55", "TOTAL",
            ])
            .with_value_alias("0-14", "Y0T14")
            .with_value_alias("15-64", "Y15T64")
            .with_value_alias("65+", "Y_GE65")
            .with_value_alias("16-24", "Y16T24")
            .with_value_alias("25-54", "Y25T54")
            .with_value_alias("55+", "Y_GE55"),
        DimensionSpec::new("time", "Periodo")
            .with_aliases([
                "periodo",
                "año",
                "años",
                "fecha",
                "trimestre",
                "mes",
                "mensual",
                "anual",
                "trimestral",
            ])
            .with_pattern(ValuePattern::Period),
        DimensionSpec::new("measure", "Medida")
            .with_aliases(["medida", "tipo de medida"])
            .with_values(["ABSOLUTE", "INTERANNUAL_RATE"])
            .with_value_alias("A", "ABSOLUTE")
            .with_value_alias("absoluto", "ABSOLUTE")
            .with_value_alias("tasa interanual", "INTERANNUAL_RATE")
            .with_value_alias("variación interanual", "INTERANNUAL_RATE"),
        DimensionSpec::new("nationality", "Nacionalidad")
            .with_aliases(["nacionalidad", "extranjero", "extranjeros", "español", "españoles"])
            .with_values(["SPANISH", "FOREIGN", "TOTAL"])
            .with_value_alias("española", "SPANISH")
            .with_value_alias("extranjera", "FOREIGN"),
    ]
}

/// Catalog and dimension source backed by the compiled-in tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalogSource;

impl BuiltinCatalogSource {
    pub fn new() -> Self {
        Self
    }

    /// Number of compiled-in indicators.
    pub fn indicator_count() -> usize {
        INDICATORS.len()
    }
}

impl CatalogSource for BuiltinCatalogSource {
    fn describe(&self) -> String {
        BUILTIN_ORIGIN.to_string()
    }

    fn records(&self) -> Result<Vec<CatalogRecord>, CatalogLoadError> {
        let records: Vec<CatalogRecord> = INDICATORS
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let record = CatalogRecord::new(row.code, row.title)
                    .topic(row.topic)
                    .status(row.status)
                    .at(format!("{BUILTIN_ORIGIN}:{}", idx + 1));
                match row.dimensions {
                    Some(dims) => record.dimensions(dims.iter().copied()),
                    None => record,
                }
            })
            .collect();
        debug!(rows = records.len(), "built-in catalog rows");
        Ok(records)
    }
}

impl DimensionSource for BuiltinCatalogSource {
    fn describe(&self) -> String {
        BUILTIN_ORIGIN.to_string()
    }

    fn registry(&self) -> Result<DimensionRegistry, CatalogLoadError> {
        DimensionRegistry::new(builtin_specs())?.with_default_dimensions(DEFAULT_DIMENSIONS)
    }
}
