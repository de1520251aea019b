use tracing::debug;

use super::{columns, identifier};
use crate::common::constants::{DEFAULT_REFERENCE_URL_BASE, REFERENCE_QUERY_PARAM};
use crate::domain::{CompanyRecord, RawRow};

/// Records produced from one batch of raw rows
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    pub records: Vec<CompanyRecord>,
    /// Raw rows dropped because a name or CNPJ could not be resolved
    pub skipped: usize,
}

/// Turns raw spreadsheet rows into company records
#[derive(Debug, Clone)]
pub struct RowTransformer {
    reference_url_base: String,
}

impl Default for RowTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_URL_BASE)
    }
}

impl RowTransformer {
    pub fn new(reference_url_base: impl Into<String>) -> Self {
        Self {
            reference_url_base: reference_url_base.into(),
        }
    }

    /// Link to the external lookup page for a cleaned CNPJ
    pub fn reference_url(&self, digits: &str) -> String {
        let separator = if self.reference_url_base.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{}{}={}",
            self.reference_url_base, separator, REFERENCE_QUERY_PARAM, digits
        )
    }

    /// Build a record from `row`, or `None` when either field is missing.
    pub fn transform(&self, row: &RawRow, index: usize) -> Option<CompanyRecord> {
        let name = columns::resolve_name(row)?;
        let raw_identifier = columns::resolve_identifier(row)?;

        Some(CompanyRecord {
            id: index,
            legal_name: name.trim().to_string(),
            identifier: identifier::format(raw_identifier),
            reference_url: self.reference_url(&identifier::clean(raw_identifier)),
        })
    }

    /// Transform every row in order. Ids count kept records only, so a
    /// skipped row never leaves a gap.
    pub fn transform_all(&self, rows: &[RawRow]) -> TransformOutcome {
        let mut outcome = TransformOutcome::default();
        for (position, row) in rows.iter().enumerate() {
            match self.transform(row, outcome.records.len()) {
                Some(record) => outcome.records.push(record),
                None => {
                    debug!(position, "Skipping row without legal name or CNPJ");
                    outcome.skipped += 1;
                }
            }
        }
        outcome
    }
}
