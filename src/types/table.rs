//! In-memory table of text cells, parsed from and serialized to CSV.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Read;

/// Rectangular table: ordered column names plus rows of text cells.
///
/// Cells stay as text; typing them is the pipeline's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows, checking every row matches the header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!(
                    "row {} has {} fields, expected {}",
                    i + 1,
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Self { columns, rows })
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Parse CSV with a header row.
    ///
    /// Ragged rows are an error. A header with no data rows gives an empty table.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();

        if columns.is_empty() {
            bail!("CSV input has no header row");
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to parse CSV record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Serialize as UTF-8 CSV with a header row.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Append a column on the right. `values` must have one entry per row.
    pub fn with_column(mut self, name: String, values: Vec<String>) -> Result<Self> {
        if values.len() != self.rows.len() {
            bail!(
                "column {:?} has {} values, table has {} rows",
                name,
                values.len(),
                self.rows.len()
            );
        }
        if self.column_index(&name).is_some() {
            bail!("column {:?} already exists", name);
        }

        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// `base`, or `base_1`, `base_2`, ... if that name is already taken.
    pub fn unique_column_name(&self, base: &str) -> String {
        if self.column_index(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{}_{}", base, i))
            .find(|name| self.column_index(name).is_none())
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_csv() {
        let csv = "age,workclass\n39,State-gov\n50,Self-emp-not-inc\n";
        let table = Table::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.columns(), ["age", "workclass"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.column("workclass").unwrap(), vec!["State-gov", "Self-emp-not-inc"]);
    }

    #[test]
    fn test_parse_header_only() {
        let table = Table::from_csv("age,race\n".as_bytes()).unwrap();
        assert_eq!(table.num_columns(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_ragged_rows_fails() {
        let csv = "a,b\n1,2\n3\n";
        assert!(Table::from_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert!(Table::from_csv("".as_bytes()).is_err());
    }

    #[test]
    fn test_quoted_cells_survive_serialization() {
        let table = Table::from_rows(
            cols(&["native-country", "note"]),
            vec![vec!["Outlying-US(Guam-USVI-etc)".into(), "a, \"b\"".into()]],
        )
        .unwrap();

        let bytes = table.to_csv().unwrap();
        let reparsed = Table::from_csv(bytes.as_slice()).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_to_csv_layout() {
        let table = Table::from_rows(cols(&["x", "y"]), vec![vec!["1".into(), "2".into()]]).unwrap();
        let text = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert_eq!(text, "x,y\n1,2\n");
    }

    #[test]
    fn test_from_rows_checks_width() {
        assert!(Table::from_rows(cols(&["a", "b"]), vec![vec!["1".into()]]).is_err());
    }

    #[test]
    fn test_with_column_appends() {
        let table = Table::from_rows(
            cols(&["a"]),
            vec![vec!["1".into()], vec!["2".into()]],
        )
        .unwrap()
        .with_column("b".into(), vec!["x".into(), "y".into()])
        .unwrap();

        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows()[1], vec!["2", "y"]);
    }

    #[test]
    fn test_with_column_length_mismatch() {
        let table = Table::from_rows(cols(&["a"]), vec![vec!["1".into()]]).unwrap();
        assert!(table.with_column("b".into(), vec![]).is_err());
    }

    #[test]
    fn test_unique_column_name() {
        let table = Table::new(cols(&["PredictedClass", "PredictedClass_1"]));
        assert_eq!(table.unique_column_name("Label"), "Label");
        assert_eq!(table.unique_column_name("PredictedClass"), "PredictedClass_2");
    }

    #[test]
    fn test_head() {
        let rows = (0..10).map(|i| vec![i.to_string()]).collect();
        let table = Table::from_rows(cols(&["n"]), rows).unwrap();
        let head = table.head(5);
        assert_eq!(head.num_rows(), 5);
        assert_eq!(head.rows()[4], vec!["4"]);
        assert_eq!(table.head(50).num_rows(), 10);
    }
}
