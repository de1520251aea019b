use crate::common::constants::{IDENTIFIER_HEADERS, LEGAL_NAME_HEADERS};
use crate::domain::RawRow;

/// Return the first value under `headers` (tried in order) that is not blank.
fn first_present<'a>(row: &'a RawRow, headers: &[&str]) -> Option<&'a str> {
    headers
        .iter()
        .filter_map(|header| row.get(header))
        .find(|value| !value.trim().is_empty())
}

/// Find the legal-name cell, trying every accepted spelling of the header.
pub fn resolve_name(row: &RawRow) -> Option<&str> {
    first_present(row, LEGAL_NAME_HEADERS)
}

/// Find the CNPJ cell, trying every accepted spelling of the header.
pub fn resolve_identifier(row: &RawRow) -> Option<&str> {
    first_present(row, IDENTIFIER_HEADERS)
}
