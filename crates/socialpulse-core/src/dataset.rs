//! Ingestion boundary: schema mapping and data sources
//!
//! Datasets are registered once per platform. The text column is resolved
//! once per dataset from an explicit, ordered list of candidate field names;
//! a dataset with none of them is rejected with [`Error::Schema`] before any
//! record is produced.
//!
//! Files are JSON (array or JSON Lines) or CSV with a header row. CSV bytes
//! are decoded with the registered [`TextEncoding`], ISO-8859-1 by default.

use crate::error::{Error, Result};
use crate::types::{Platform, RawRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Per-platform mapping from dataset columns to record fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMapping {
    /// Candidate text columns, in preference order
    #[serde(default = "default_text_fields")]
    pub text_fields: Vec<String>,

    /// Column holding the declared source language
    #[serde(default)]
    pub language_field: Option<String>,

    /// Column holding the record id. Row position is used when absent.
    #[serde(default)]
    pub id_field: Option<String>,
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self {
            text_fields: default_text_fields(),
            language_field: None,
            id_field: None,
        }
    }
}

fn default_text_fields() -> Vec<String> {
    vec!["body".to_string(), "text".to_string()]
}

/// Column names picked for one registered dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub text_field: String,
    pub language_field: Option<String>,
    pub id_field: Option<String>,
}

impl SchemaMapping {
    /// Pick concrete columns from the set a dataset actually has.
    ///
    /// Optional columns that the dataset lacks are dropped; a missing text
    /// column is fatal.
    pub fn resolve<'a, I>(&self, columns: I) -> Result<ResolvedSchema>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns: BTreeSet<&str> = columns.into_iter().collect();

        let text_field = self
            .text_fields
            .iter()
            .find(|candidate| columns.contains(candidate.as_str()))
            .cloned()
            .ok_or_else(|| {
                Error::schema(format!(
                    "no text column found (looked for {:?}, dataset has {:?})",
                    self.text_fields, columns
                ))
            })?;

        let keep = |field: &Option<String>| {
            field
                .as_ref()
                .filter(|name| columns.contains(name.as_str()))
                .cloned()
        };

        Ok(ResolvedSchema {
            text_field,
            language_field: keep(&self.language_field),
            id_field: keep(&self.id_field),
        })
    }
}

/// Supplies raw records for a platform.
///
/// Implementations own their data; the pipeline never holds dataset state
/// between invocations.
pub trait DataSource: Send + Sync {
    /// Load every record registered for `platform`
    fn load(&self, platform: Platform) -> Result<Vec<RawRecord>>;

    /// Platforms this source can serve
    fn platforms(&self) -> Vec<Platform>;
}

/// On-disk layout of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// JSON array of objects, or one object per line
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl DatasetFormat {
    /// Format implied by the file extension; anything but `.csv` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Character encoding of CSV cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value
    #[default]
    Latin1,
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| Error::dataset(format!("invalid UTF-8: {e}"))),
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// A single dataset file together with its schema mapping
#[derive(Debug, Clone)]
pub struct DatasetRegistration {
    pub path: PathBuf,
    pub schema: SchemaMapping,
    pub format: DatasetFormat,
    pub encoding: TextEncoding,
}

impl DatasetRegistration {
    /// Registration with the format taken from the file extension
    pub fn new(path: impl Into<PathBuf>, schema: SchemaMapping) -> Self {
        let path = path.into();
        Self {
            format: DatasetFormat::from_path(&path),
            encoding: TextEncoding::default(),
            path,
            schema,
        }
    }

    pub fn with_format(mut self, format: DatasetFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Loads JSON or CSV dataset files, one per platform
#[derive(Debug, Default)]
pub struct FileDataSource {
    datasets: HashMap<Platform, DatasetRegistration>,
}

impl FileDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dataset file for a platform, replacing any previous one.
    /// The format follows the file extension.
    pub fn register(
        &mut self,
        platform: Platform,
        path: impl Into<PathBuf>,
        schema: SchemaMapping,
    ) -> &mut Self {
        self.register_dataset(platform, DatasetRegistration::new(path, schema))
    }

    /// Register a fully specified dataset for a platform
    pub fn register_dataset(
        &mut self,
        platform: Platform,
        registration: DatasetRegistration,
    ) -> &mut Self {
        debug!(
            %platform,
            path = %registration.path.display(),
            format = ?registration.format,
            "registered dataset"
        );
        self.datasets.insert(platform, registration);
        self
    }

    fn registration(&self, platform: Platform) -> Result<&DatasetRegistration> {
        self.datasets
            .get(&platform)
            .ok_or_else(|| Error::dataset(format!("no dataset registered for {platform}")))
    }
}

impl DataSource for FileDataSource {
    fn load(&self, platform: Platform) -> Result<Vec<RawRecord>> {
        let registration = self.registration(platform)?;

        let records = match registration.format {
            DatasetFormat::Json => {
                let rows = parse_rows(&std::fs::read_to_string(&registration.path)?)?;
                rows_to_records(&rows, &registration.schema, platform)
            }
            DatasetFormat::Csv => {
                let bytes = std::fs::read(&registration.path)?;
                let (columns, rows) = parse_csv(&bytes, registration.encoding)?;
                columns_to_records(&columns, &rows, &registration.schema, platform)
            }
        }
        .map_err(|e| {
            if matches!(e, Error::Schema(_)) {
                error!(%platform, path = %registration.path.display(), "{e}");
            }
            e
        })?;

        info!(%platform, count = records.len(), "loaded dataset");
        Ok(records)
    }

    fn platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<_> = self.datasets.keys().copied().collect();
        platforms.sort();
        platforms
    }
}

/// Parse dataset content as a JSON array, falling back to JSON Lines.
pub fn parse_rows(content: &str) -> Result<Vec<Map<String, Value>>> {
    let trimmed = content.trim_start();

    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed)?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| into_object(index, value))
            .collect();
    }

    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| into_object(index, serde_json::from_str(line)?))
        .collect()
}

fn into_object(index: usize, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::dataset(format!(
            "row {index} is not an object: {other}"
        ))),
    }
}

/// Parse CSV content with a header row into its columns and rows.
///
/// Empty cells become null, so an empty text cell is absent text.
pub fn parse_csv(
    bytes: &[u8],
    encoding: TextEncoding,
) -> Result<(Vec<String>, Vec<Map<String, Value>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut columns = reader
        .byte_headers()
        .map_err(|e| Error::dataset(format!("unreadable CSV header: {e}")))?
        .iter()
        .map(|name| encoding.decode(name))
        .collect::<Result<Vec<_>>>()?;
    if let Some(first) = columns.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_string();
    }

    let mut rows = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|e| Error::dataset(format!("row {index}: {e}")))?;

        let mut row = Map::new();
        for (name, cell) in columns.iter().zip(record.iter()) {
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(encoding.decode(cell)?)
            };
            row.insert(name.clone(), value);
        }
        rows.push(row);
    }

    Ok((columns, rows))
}

/// Convert parsed rows into raw records.
///
/// The schema is resolved once against the union of all row keys, the way a
/// dataframe exposes columns.
pub fn rows_to_records(
    rows: &[Map<String, Value>],
    mapping: &SchemaMapping,
    platform: Platform,
) -> Result<Vec<RawRecord>> {
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    records_from(columns, rows, mapping, platform)
}

/// Convert rows into raw records, resolving the schema against a declared
/// column list such as a CSV header.
pub fn columns_to_records(
    columns: &[String],
    rows: &[Map<String, Value>],
    mapping: &SchemaMapping,
    platform: Platform,
) -> Result<Vec<RawRecord>> {
    records_from(columns.iter().map(String::as_str), rows, mapping, platform)
}

fn records_from<'a>(
    columns: impl IntoIterator<Item = &'a str>,
    rows: &[Map<String, Value>],
    mapping: &SchemaMapping,
    platform: Platform,
) -> Result<Vec<RawRecord>> {
    let schema = mapping.resolve(columns)?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let id = match &schema.id_field {
                Some(field) => parse_id(row.get(field), index)?,
                None => index as i64,
            };

            let text = row
                .get(&schema.text_field)
                .and_then(Value::as_str)
                .map(str::to_string);

            let language = schema
                .language_field
                .as_ref()
                .and_then(|field| row.get(field))
                .and_then(Value::as_str)
                .map(str::to_string);

            Ok(RawRecord {
                id,
                text,
                platform,
                language,
            })
        })
        .collect()
}

fn parse_id(value: Option<&Value>, index: usize) -> Result<i64> {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| Error::dataset(format!("row {index}: id {n} is not an integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| Error::dataset(format!("row {index}: id '{s}' is not an integer"))),
        _ => Err(Error::dataset(format!("row {index}: missing id"))),
    }
}
