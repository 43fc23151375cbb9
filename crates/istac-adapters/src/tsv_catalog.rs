//! Tab-separated catalog loader.
//!
//! Reads the indicator list exported from the ISTAC indicators API.
//!
//! # Format
//!
//! ```text
//! code	production-title#es	subject	dimensions	status
//! POBLACION	Población	Demografía	geo,sex,age,time	active
//! TASA_PARO	Tasa de paro	Mercado laboral	geo|sex|time
//! ```
//!
//! - `code` is required.
//! - The display name comes from `title` or `production-title#es`.
//! - The topic comes from `topic` or `subject`.
//! - `dimensions` may be separated by `,`, `|` or `;`. A missing column or
//!   empty cell means "use the registry defaults".
//! - `status` is optional (`active` when absent).
//!
//! Rows with an empty code are skipped, and so is a repeated header row.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use istac_core::{
    application::ports::CatalogSource,
    domain::{CatalogLoadError, CatalogRecord, normalize},
};

const CODE_COLUMNS: &[&str] = &["code", "id"];
const TITLE_COLUMNS: &[&str] = &["title", "production-title#es", "display_name", "name"];
const TOPIC_COLUMNS: &[&str] = &["topic", "subject", "subject-title#es"];
const DIMENSION_COLUMNS: &[&str] = &["dimensions", "available_dimensions"];
const STATUS_COLUMNS: &[&str] = &["status"];

const DIMENSION_SEPARATORS: &[char] = &[',', '|', ';'];

/// Catalog source backed by a `.tsv` file.
#[derive(Debug, Clone)]
pub struct TsvCatalogSource {
    path: PathBuf,
}

impl TsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse TSV content from any reader. `origin` prefixes error locations.
    pub fn parse<R: Read>(reader: R, origin: &str) -> Result<Vec<CatalogRecord>, CatalogLoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| CatalogLoadError::Malformed {
                location: format!("{origin}:1"),
                reason: e.to_string(),
            })?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(CatalogLoadError::Empty);
        }

        let columns = Columns::locate(&headers).ok_or_else(|| CatalogLoadError::Malformed {
            location: format!("{origin}:1"),
            reason: "missing 'code' column".into(),
        })?;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row.map_err(|e| CatalogLoadError::Malformed {
                location: format!("{origin}:{}", idx + 2),
                reason: e.to_string(),
            })?;
            let line = row.position().map_or(idx as u64 + 2, |p| p.line());
            let location = format!("{origin}:{line}");

            let field = |col: Option<usize>| -> Option<String> {
                col.and_then(|i| row.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };

            let Some(code) = field(Some(columns.code)) else {
                debug!(%location, "skipping row without code");
                continue;
            };
            if normalize(&code) == "CODE" {
                debug!(%location, "skipping repeated header row");
                continue;
            }

            records.push(CatalogRecord {
                display_name: field(columns.title).unwrap_or_default(),
                topic: field(columns.topic).unwrap_or_default(),
                dimensions: field(columns.dimensions).map(|cell| split_dimensions(&cell)),
                status: field(columns.status),
                location,
                code,
            });
        }

        Ok(records)
    }
}

impl CatalogSource for TsvCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn records(&self) -> Result<Vec<CatalogRecord>, CatalogLoadError> {
        if !self.path.exists() {
            return Err(CatalogLoadError::SourceNotFound {
                path: self.path.clone(),
            });
        }

        let file = File::open(&self.path).map_err(|e| CatalogLoadError::Io {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let origin = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.describe());

        let records = Self::parse(file, &origin)?;
        debug!(rows = records.len(), "read catalog rows");
        Ok(records)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Columns {
    code: usize,
    title: Option<usize>,
    topic: Option<usize>,
    dimensions: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Option<Self> {
        let find = |names: &[&str]| {
            names.iter().find_map(|name| {
                headers.iter().position(|h| {
                    h.trim_start_matches('\u{feff}')
                        .trim()
                        .eq_ignore_ascii_case(name)
                })
            })
        };

        Some(Self {
            code: find(CODE_COLUMNS)?,
            title: find(TITLE_COLUMNS),
            topic: find(TOPIC_COLUMNS),
            dimensions: find(DIMENSION_COLUMNS),
            status: find(STATUS_COLUMNS),
        })
    }
}

fn split_dimensions(cell: &str) -> Vec<String> {
    cell.split(DIMENSION_SEPARATORS)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
