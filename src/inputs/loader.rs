//! Load valuation inputs from CSV (one company per row) or JSON
//!
//! CSV headers use the `ValuationInputs` field names. Missing columns take the
//! reference defaults. Rates are fractions.

use super::ValuationInputs;
use crate::error::InputError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load every row of a CSV file
pub fn load_inputs_csv(path: &Path) -> Result<Vec<ValuationInputs>, InputError> {
    let file = File::open(path)?;
    load_inputs_csv_from_reader(file)
}

/// Load every row from any CSV reader
pub fn load_inputs_csv_from_reader<R: Read>(reader: R) -> Result<Vec<ValuationInputs>, InputError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (idx, result) in reader.deserialize::<ValuationInputs>().enumerate() {
        let inputs = result?;
        // 1-indexed data rows, header excluded
        validate(&inputs, idx + 1)?;
        rows.push(inputs);
    }

    log::debug!("Loaded {} valuation rows", rows.len());
    Ok(rows)
}

/// Load a single `ValuationInputs` document from a JSON file
pub fn load_inputs_json(path: &Path) -> Result<ValuationInputs, InputError> {
    let file = File::open(path)?;
    let inputs: ValuationInputs = serde_json::from_reader(file)?;
    validate(&inputs, 1)?;
    Ok(inputs)
}

/// Reject values no valuation can use. Economic plausibility is not checked here.
fn validate(inputs: &ValuationInputs, row: usize) -> Result<(), InputError> {
    match inputs.non_finite_field() {
        Some(name) => Err(InputError::Invalid {
            row,
            message: format!("{} is not a finite number", name),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rows_with_partial_columns() {
        let data = "\
ebit,market_cap,forecast_period
500,4000,5
650, 5200 ,7
";
        let rows = load_inputs_csv_from_reader(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].ebit, 650.0);
        assert_eq!(rows[1].market_cap, 5200.0);
        assert_eq!(rows[1].forecast_period, 7);
        // Columns not present keep the reference defaults
        assert_eq!(rows[1].shares_outstanding, 100.0);
    }

    #[test]
    fn test_non_numeric_cell_is_csv_error() {
        let data = "ebit,beta\n500,high\n";
        let err = load_inputs_csv_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::Csv(_)));
    }

    #[test]
    fn test_non_finite_value_reports_row() {
        let data = "ebit,beta\n500,1.1\n500,NaN\n";
        let err = load_inputs_csv_from_reader(data.as_bytes()).unwrap_err();

        match err {
            InputError::Invalid { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("beta"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_json_file() {
        let err = load_inputs_json(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, InputError::Io(_)));
    }
}
