use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One decoded spreadsheet line keyed by its header labels.
///
/// Empty workbook cells and cells past the end of a short CSV line are not
/// present. When a header label repeats, the right-most cell wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// A company extracted from an ingested spreadsheet.
///
/// Field names on the wire match the JSON the web client consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Zero-based position within the ingestion batch that produced it
    pub id: usize,
    #[serde(rename = "razaoSocial")]
    pub legal_name: String,
    /// Canonical `NN.NNN.NNN/NNNN-NN` form, or the raw cell when it is not 14 digits
    #[serde(rename = "cnpj")]
    pub identifier: String,
    #[serde(rename = "url")]
    pub reference_url: String,
}

/// Spreadsheet flavours understood by the format dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Workbook => "workbook",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub count: usize,
    pub skipped: usize,
    pub format: SourceFormat,
    pub batch_id: Uuid,
    pub ingested_at: DateTime<Utc>,
}
