#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward population extraction from the city ward profiles workbook.
//!
//! The upstream spreadsheet has no machine-readable schema: ward labels
//! (`"Ward 1"` .. `"Ward 25"`) sit in one fixed row and the census totals
//! in the row directly below, at a fixed column range of the
//! `2021 One Variable` sheet. This crate is the single place that fragile
//! positional contract lives, so layout drift fails here with a
//! cell-precise diagnostic instead of producing silently wrong numbers.

use std::io::Cursor;

use calamine::{Data, Range, Reader as _, Xlsx};
use fire_map_fire_models::WardKey;
use serde::{Deserialize, Serialize};

/// Sheet holding the one-variable census profile.
pub const SHEET_NAME: &str = "2021 One Variable";

/// Zero-based sheet row holding the `"Ward N"` labels.
const LABEL_ROW: u32 = 17;

/// Zero-based sheet row holding the population totals.
const VALUE_ROW: u32 = 18;

/// Zero-based sheet column of the first ward.
const FIRST_WARD_COL: u32 = 2;

/// Number of ward columns to read.
const WARD_COLS: u32 = 25;

/// Errors that can occur while extracting ward populations.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// The workbook could not be opened or read.
    #[error("Workbook error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    /// The fixed-position layout did not match expectations.
    #[error("Workbook layout error: {message}")]
    Layout {
        /// Description of the cell that did not match.
        message: String,
    },
}

/// Population of a single ward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardPopulation {
    /// Normalized ward key.
    pub ward: WardKey,
    /// 2021 census population total.
    pub population: f64,
}

/// Reads ward populations from the raw bytes of the profiles workbook.
///
/// # Errors
///
/// Returns [`PopulationError`] if the workbook cannot be opened, the
/// expected sheet is absent, or the fixed cell layout does not hold.
pub fn extract_ward_population(bytes: &[u8]) -> Result<Vec<WardPopulation>, PopulationError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .map_err(|e| PopulationError::Layout {
            message: format!("sheet '{SHEET_NAME}' not readable: {e}"),
        })?;

    let populations = population_from_range(&range)?;

    log::info!("Extracted population for {} wards from workbook", populations.len());

    Ok(populations)
}

/// Translates the fixed cell layout of the profile sheet into typed rows.
///
/// # Errors
///
/// Returns [`PopulationError::Layout`] for any cell that is missing, has an
/// unparseable ward label, or holds a non-numeric population value.
pub fn population_from_range(range: &Range<Data>) -> Result<Vec<WardPopulation>, PopulationError> {
    let mut populations = Vec::with_capacity(WARD_COLS as usize);

    for col in FIRST_WARD_COL..FIRST_WARD_COL + WARD_COLS {
        let label_cell = range.get_value((LABEL_ROW, col));
        let ward = label_cell
            .and_then(cell_str)
            .and_then(parse_ward_label)
            .ok_or_else(|| PopulationError::Layout {
                message: format!(
                    "expected a 'Ward N' label at row {LABEL_ROW}, col {col}, found {label_cell:?}"
                ),
            })?;

        let value_cell = range.get_value((VALUE_ROW, col));
        let population = value_cell.and_then(cell_f64).ok_or_else(|| PopulationError::Layout {
            message: format!(
                "expected a population number at row {VALUE_ROW}, col {col}, found {value_cell:?}"
            ),
        })?;

        populations.push(WardPopulation { ward, population });
    }

    Ok(populations)
}

/// Parses a `"Ward N"` label into a ward key.
///
/// The label must split on whitespace into exactly two tokens, with the
/// second being the ward number.
#[must_use]
pub fn parse_ward_label(label: &str) -> Option<WardKey> {
    let mut tokens = label.split_whitespace();
    let prefix = tokens.next()?;
    let number = tokens.next()?;
    if prefix != "Ward" || tokens.next().is_some() {
        return None;
    }
    number.parse().ok()
}

/// Extracts a string from a cell, if it holds one.
fn cell_str(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Extracts a numeric value from a cell, accepting floats, integers, and
/// numeric strings (the census export is inconsistent about cell types).
#[allow(clippy::cast_precision_loss)]
fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (20, 30));
        for i in 0..25u32 {
            let col = FIRST_WARD_COL + i;
            range.set_value((LABEL_ROW, col), Data::String(format!("Ward {}", i + 1)));
            range.set_value((VALUE_ROW, col), Data::Float(100_000.0 + f64::from(i)));
        }
        range
    }

    #[test]
    fn extracts_all_twenty_five_wards() {
        let populations = population_from_range(&profile_range()).unwrap();
        assert_eq!(populations.len(), 25);
        assert_eq!(populations[0].ward.to_string(), "01");
        assert_eq!(populations[24].ward.to_string(), "25");
        assert!((populations[12].population - 100_012.0).abs() < f64::EPSILON);
    }

    #[test]
    fn errors_on_malformed_ward_label() {
        let mut range = profile_range();
        range.set_value((LABEL_ROW, FIRST_WARD_COL + 3), Data::String("Ward 4 Total".to_owned()));
        let err = population_from_range(&range).unwrap_err();
        assert!(matches!(err, PopulationError::Layout { .. }));
    }

    #[test]
    fn errors_on_missing_population_value() {
        let mut range = profile_range();
        range.set_value((VALUE_ROW, FIRST_WARD_COL + 5), Data::Empty);
        let err = population_from_range(&range).unwrap_err();
        assert!(matches!(err, PopulationError::Layout { .. }));
    }

    #[test]
    fn errors_when_layout_shifted_by_a_row() {
        let mut shifted = Range::new((0, 0), (20, 30));
        for i in 0..25u32 {
            let col = FIRST_WARD_COL + i;
            shifted.set_value((LABEL_ROW + 1, col), Data::String(format!("Ward {}", i + 1)));
            shifted.set_value((VALUE_ROW + 1, col), Data::Float(100_000.0));
        }
        assert!(population_from_range(&shifted).is_err());
    }

    #[test]
    fn parses_valid_ward_labels() {
        assert_eq!(parse_ward_label("Ward 7").unwrap().to_string(), "07");
        assert_eq!(parse_ward_label("Ward 25").unwrap().to_string(), "25");
    }

    #[test]
    fn rejects_malformed_ward_labels() {
        assert!(parse_ward_label("Ward").is_none());
        assert!(parse_ward_label("Ward seven").is_none());
        assert!(parse_ward_label("Ward 7 Total").is_none());
        assert!(parse_ward_label("Toronto Ward 7").is_none());
        assert!(parse_ward_label("Ward 99").is_none());
    }

    #[test]
    fn accepts_numeric_strings_with_thousands_separators() {
        assert!((cell_f64(&Data::String("103,000".to_owned())).unwrap() - 103_000.0).abs() < f64::EPSILON);
    }
}
