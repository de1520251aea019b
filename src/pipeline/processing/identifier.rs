//! CNPJ cleaning and display formatting.
//!
//! Input comes straight from user spreadsheets, so nothing here fails: a value
//! that does not carry exactly fourteen digits is handed back untouched.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::constants::CNPJ_DIGITS;

static CNPJ_GROUPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2})(\d{3})(\d{3})(\d{4})(\d{2})$").expect("valid CNPJ grouping regex")
});

/// Strip every character that is not an ASCII decimal digit.
pub fn clean(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render `raw` as `NN.NNN.NNN/NNNN-NN` when it cleans to fourteen digits,
/// otherwise return it unchanged.
pub fn format(raw: &str) -> String {
    let digits = clean(raw);
    if digits.len() != CNPJ_DIGITS {
        return raw.to_string();
    }
    CNPJ_GROUPS
        .replace(&digits, "$1.$2.$3/$4-$5")
        .into_owned()
}
