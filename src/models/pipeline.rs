//! Pipeline contract: a table goes in, one label per row comes out.

use crate::types::table::Table;
use anyhow::{bail, Result};

/// A trained preprocessing + classifier pipeline.
///
/// Implementations own their encoding of the input columns. Callers hand over
/// the table untouched and get back labels in row order.
pub trait Pipeline: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Column names the pipeline was fitted on, in fit order.
    fn feature_names(&self) -> &[String];

    /// Predict one label per row.
    fn predict(&self, table: &Table) -> Result<Vec<i64>>;
}

/// Reject tables whose columns differ from the fitted feature names.
///
/// Unseen and missing names are listed; the same names in another order
/// are rejected as well.
pub fn check_feature_names(fitted: &[String], provided: &[String]) -> Result<()> {
    if fitted == provided {
        return Ok(());
    }

    let unseen: Vec<&String> = provided.iter().filter(|c| !fitted.contains(c)).collect();
    let missing: Vec<&String> = fitted.iter().filter(|c| !provided.contains(c)).collect();

    let mut message = String::from("The feature names should match those that were passed during fit.");
    if unseen.is_empty() && missing.is_empty() {
        message.push_str("\nFeature names must be in the same order as they were in fit.");
    }
    if !unseen.is_empty() {
        message.push_str("\nFeature names unseen at fit time:");
        for name in unseen {
            message.push_str(&format!("\n- {}", name));
        }
    }
    if !missing.is_empty() {
        message.push_str("\nFeature names seen at fit time, yet now missing:");
        for name in missing {
            message.push_str(&format!("\n- {}", name));
        }
    }

    bail!(message)
}

/// Reject tables with no rows.
pub fn check_non_empty(table: &Table) -> Result<()> {
    if table.is_empty() {
        bail!(
            "Found array with 0 sample(s) (shape=(0, {})) while a minimum of 1 is required.",
            table.num_columns()
        );
    }
    Ok(())
}

/// Element type a pipeline input column is declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int64,
    Int32,
    Float32,
    Float64,
    Text,
}

/// One column's cells converted to the declared element type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<i64>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    /// Convert text cells to `kind`. Empty float cells become NaN.
    pub fn encode(kind: ColumnKind, column: &str, cells: &[&str]) -> Result<Self> {
        Ok(match kind {
            ColumnKind::Int64 => ColumnData::Int64(parse_cells(column, cells, parse_int)?),
            ColumnKind::Int32 => ColumnData::Int32(parse_cells(column, cells, |s| {
                parse_int(s).and_then(|v| i32::try_from(v).ok())
            })?),
            ColumnKind::Float32 => {
                ColumnData::Float32(parse_cells(column, cells, |s| parse_float(s).map(|v| v as f32))?)
            }
            ColumnKind::Float64 => ColumnData::Float64(parse_cells(column, cells, parse_float)?),
            ColumnKind::Text => ColumnData::Text(cells.iter().map(|s| s.to_string()).collect()),
        })
    }
}

fn parse_cells<T>(column: &str, cells: &[&str], parse: impl Fn(&str) -> Option<T>) -> Result<Vec<T>> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match parse(cell.trim()) {
            Some(v) => Ok(v),
            None => bail!(
                "could not convert value {:?} in column {:?} (row {})",
                cell,
                column,
                row + 1
            ),
        })
        .collect()
}

/// Integers, accepting a whole-valued float spelling such as `40.0`.
///
/// Floats outside the i64 range are rejected rather than saturated.
fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().or_else(|| {
        let f = s.parse::<f64>().ok()?;
        let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
        (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
    })
}

fn parse_float(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matching_names_pass() {
        let fitted = names(&["age", "race"]);
        assert!(check_feature_names(&fitted, &fitted.clone()).is_ok());
    }

    #[test]
    fn test_unseen_column_reported() {
        let err = check_feature_names(&names(&["age", "race"]), &names(&["age", "race", "salary"]))
            .unwrap_err()
            .to_string();

        assert!(err.contains("unseen at fit time"));
        assert!(err.contains("- salary"));
        assert!(!err.contains("yet now missing"));
    }

    #[test]
    fn test_missing_column_reported() {
        let err = check_feature_names(&names(&["age", "race"]), &names(&["age"]))
            .unwrap_err()
            .to_string();

        assert!(err.contains("yet now missing"));
        assert!(err.contains("- race"));
    }

    #[test]
    fn test_reordered_columns_rejected() {
        let err = check_feature_names(&names(&["age", "race"]), &names(&["race", "age"]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("same order"));
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = Table::new(names(&["age"]));
        assert!(check_non_empty(&table).is_err());
    }

    #[test]
    fn test_encode_integers() {
        let data = ColumnData::encode(ColumnKind::Int64, "age", &["39", " 50 ", "40.0"]).unwrap();
        assert_eq!(data, ColumnData::Int64(vec![39, 50, 40]));
    }

    #[test]
    fn test_encode_bad_integer() {
        let err = ColumnData::encode(ColumnKind::Int64, "age", &["39", "forty"])
            .unwrap_err()
            .to_string();
        assert!(err.contains("\"age\""));
        assert!(err.contains("row 2"));
    }

    #[test]
    fn test_encode_int32_overflow() {
        assert!(ColumnData::encode(ColumnKind::Int32, "fnlwgt", &["99999999999"]).is_err());
    }

    #[test]
    fn test_encode_float_empty_is_nan() {
        match ColumnData::encode(ColumnKind::Float32, "capital-gain", &["1.5", ""]).unwrap() {
            ColumnData::Float32(v) => {
                assert_eq!(v[0], 1.5);
                assert!(v[1].is_nan());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_encode_text_passthrough() {
        let data = ColumnData::encode(ColumnKind::Text, "race", &["White", " Other"]).unwrap();
        assert_eq!(data, ColumnData::Text(names(&["White", " Other"])));
    }

    #[test]
    fn test_encode_out_of_range_float_integer() {
        let err = ColumnData::encode(ColumnKind::Int64, "capital-gain", &["0", "1e30"])
            .unwrap_err()
            .to_string();
        assert!(err.contains("1e30"));
        assert!(err.contains("row 2"));

        assert!(ColumnData::encode(ColumnKind::Int64, "capital-gain", &["-1e19"]).is_err());
        assert!(ColumnData::encode(ColumnKind::Int32, "capital-gain", &["1e30"]).is_err());
        assert_eq!(
            ColumnData::encode(ColumnKind::Int64, "capital-gain", &["1e4"]).unwrap(),
            ColumnData::Int64(vec![10_000])
        );
    }
}
