//! Load batches of calculation requests
//!
//! JSON files hold an array of tagged requests (any mix of calculators).
//! CSV files hold one calculator's inputs per row, with column names matching
//! the input fields; omitted columns take the calculator's defaults.

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::catalog::CalculatorKind;
use crate::engines::{CagrInput, EmiInput, GoalInput, InflationInput, RetirementInput, SipInput};
use crate::error::DataError;
use crate::scenario::CalculationRequest;

/// Load a JSON array of requests from a file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<CalculationRequest>, DataError> {
    let file = File::open(path)?;
    load_requests_from_reader(BufReader::new(file))
}

/// Load a JSON array of requests from any reader
pub fn load_requests_from_reader<R: Read>(reader: R) -> Result<Vec<CalculationRequest>, DataError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load one calculator's inputs from a CSV file
pub fn load_requests_csv<P: AsRef<Path>>(
    kind: CalculatorKind,
    path: P,
) -> Result<Vec<CalculationRequest>, DataError> {
    let file = File::open(path)?;
    load_requests_csv_from_reader(kind, file)
}

pub fn load_requests_csv_from_reader<R: Read>(
    kind: CalculatorKind,
    reader: R,
) -> Result<Vec<CalculationRequest>, DataError> {
    let reader = csv::Reader::from_reader(reader);
    match kind {
        CalculatorKind::Cagr => read_rows::<_, CagrInput>(reader, CalculationRequest::Cagr),
        CalculatorKind::Emi => read_rows::<_, EmiInput>(reader, CalculationRequest::Emi),
        CalculatorKind::Sip => read_rows::<_, SipInput>(reader, CalculationRequest::Sip),
        CalculatorKind::Inflation => {
            read_rows::<_, InflationInput>(reader, CalculationRequest::Inflation)
        }
        CalculatorKind::ValueDepreciation => {
            read_rows::<_, InflationInput>(reader, CalculationRequest::ValueDepreciation)
        }
        CalculatorKind::Retirement => {
            read_rows::<_, RetirementInput>(reader, CalculationRequest::Retirement)
        }
        CalculatorKind::GoalBased => {
            read_rows::<_, GoalInput>(reader, CalculationRequest::GoalBased)
        }
    }
}

fn read_rows<R: Read, T: DeserializeOwned>(
    mut reader: csv::Reader<R>,
    wrap: fn(T) -> CalculationRequest,
) -> Result<Vec<CalculationRequest>, DataError> {
    let mut requests = Vec::new();
    for result in reader.deserialize() {
        let row: T = result?;
        requests.push(wrap(row));
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::GoalMode;

    #[test]
    fn test_load_mixed_json() {
        let json = r#"[
            { "calculator": "emi", "principal": 250000, "annual_rate_pct": 9.5, "years": 3 },
            { "calculator": "value-depreciation", "amount": 5000 },
            { "calculator": "retirement" }
        ]"#;
        let requests = load_requests_from_reader(json.as_bytes()).unwrap();

        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0],
            CalculationRequest::Emi(EmiInput {
                principal: 250_000.0,
                annual_rate_pct: 9.5,
                years: 3,
            })
        );
        assert_eq!(
            requests[1],
            CalculationRequest::ValueDepreciation(InflationInput {
                amount: 5_000.0,
                ..InflationInput::default()
            })
        );
        assert_eq!(requests[2], CalculationRequest::Retirement(RetirementInput::default()));
    }

    #[test]
    fn test_unknown_calculator_is_an_error() {
        let json = r#"[{ "calculator": "mortgage" }]"#;
        let err = load_requests_from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Json(_)));
    }

    #[test]
    fn test_load_csv_rows() {
        let csv = "goal_amount,years,expected_return_pct,mode\n\
                   1000000,10,12,sip\n\
                   250000,5,8,lumpsum\n";
        let requests =
            load_requests_csv_from_reader(CalculatorKind::GoalBased, csv.as_bytes()).unwrap();

        assert_eq!(requests.len(), 2);
        let CalculationRequest::GoalBased(second) = &requests[1] else {
            panic!("expected goal requests");
        };
        assert_eq!(second.goal_amount, 250_000.0);
        assert_eq!(second.years, 5);
        assert_eq!(second.mode, GoalMode::Lumpsum);
    }

    #[test]
    fn test_csv_missing_columns_default() {
        let csv = "principal\n100000\n";
        let requests = load_requests_csv_from_reader(CalculatorKind::Emi, csv.as_bytes()).unwrap();
        assert_eq!(
            requests,
            vec![CalculationRequest::Emi(EmiInput {
                principal: 100_000.0,
                ..EmiInput::default()
            })]
        );
    }

    #[test]
    fn test_csv_bad_value() {
        let csv = "principal,years\n100000,five\n";
        let err = load_requests_csv_from_reader(CalculatorKind::Emi, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }
}
