//! Format dispatch and spreadsheet decoding.
//!
//! The declared filename picks the decoder; the staged upload is released on
//! every path out of [`decode`], including unsupported formats.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

use super::upload::StagedUpload;
use crate::common::constants::{CSV_EXTENSION, XLSX_EXTENSION, XLS_EXTENSION};
use crate::common::error::{CompanyError, Result};
use crate::domain::{RawRow, SourceFormat};

/// Lower-cased extension of `filename`, empty when it has none.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Pick a decoder from the declared filename.
pub fn detect_format(filename: &str) -> Result<SourceFormat> {
    let extension = extension_of(filename);
    match extension.as_str() {
        CSV_EXTENSION => Ok(SourceFormat::Csv),
        XLSX_EXTENSION | XLS_EXTENSION => Ok(SourceFormat::Workbook),
        _ => Err(CompanyError::UnsupportedFormat { extension }),
    }
}

/// Decode a staged upload into raw rows, then delete the staged file.
pub fn decode(upload: StagedUpload) -> Result<Vec<RawRow>> {
    let result = detect_format(upload.original_filename()).and_then(|format| {
        let bytes = std::fs::read(upload.path())?;
        debug!(%format, bytes_len = bytes.len(), "Decoding staged upload");
        match format {
            SourceFormat::Csv => decode_csv(&bytes),
            SourceFormat::Workbook => decode_workbook(bytes),
        }
    });
    upload.release();
    result
}

/// UTF-8 (BOM-aware) first, Windows-1252 when the bytes are not valid UTF-8.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    warn!(
        detected = encoding.name(),
        "CSV is not valid UTF-8; falling back to windows-1252"
    );
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}

/// Decode delimited text whose first record holds the header labels.
pub fn decode_csv(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CompanyError::decode(CSV_EXTENSION, e))?
        .clone();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| CompanyError::decode(CSV_EXTENSION, format!("line {}: {}", idx + 2, e)))?;
        let row: RawRow = headers.iter().zip(record.iter()).collect();
        rows.push(row);
    }

    info!(
        columns = headers.len(),
        rows = rows.len(),
        "Decoded CSV"
    );
    Ok(rows)
}

/// Text for a workbook cell, `None` for empty cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        // Integral floats print without a fractional part (CNPJs typed as numbers)
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

/// Decode the first sheet of an xlsx/xls workbook, using its first row as
/// header labels.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| CompanyError::decode("workbook", e))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        warn!("Workbook has no sheets");
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CompanyError::decode("workbook", e))?;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_cells
        .iter()
        .map(|c| cell_text(c).filter(|h| !h.is_empty()))
        .collect();

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row: RawRow = headers
            .iter()
            .zip(cells.iter())
            .filter_map(|(header, cell)| Some((header.clone()?, cell_text(cell)?)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    info!(sheet = %sheet_name, rows = rows.len(), "Decoded workbook");
    Ok(rows)
}
