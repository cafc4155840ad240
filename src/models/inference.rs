//! Inference over an ONNX export of the trained pipeline

use crate::models::pipeline::{check_feature_names, check_non_empty, ColumnData, ColumnKind, Pipeline};
use crate::types::table::Table;
use anyhow::{anyhow, bail, Context, Result};
use ort::session::{Session, SessionOutputs};
use ort::value::{DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// One declared pipeline input: a single named column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// Tensor rank the input is declared with, `[N, 1]` or `[N]`
    pub rank: usize,
}

impl InputSpec {
    /// Tensor shape for `rows` values of this input
    pub fn shape(&self, rows: usize) -> Vec<i64> {
        if self.rank == 1 {
            vec![rows as i64]
        } else {
            vec![rows as i64, 1]
        }
    }
}

/// Pipeline backed by an ONNX Runtime session.
///
/// Each table column feeds the input of the same name; the classifier's
/// label output is the prediction.
pub struct OnnxPipeline {
    name: String,
    /// Session runs need exclusive access, so predictions are serialized here
    session: Mutex<Session>,
    inputs: Vec<InputSpec>,
    feature_names: Vec<String>,
    label_output: String,
}

impl OnnxPipeline {
    pub fn new(name: &str, session: Session, inputs: Vec<InputSpec>, label_output: String) -> Self {
        let feature_names = inputs.iter().map(|i| i.name.clone()).collect();
        Self {
            name: name.to_string(),
            session: Mutex::new(session),
            inputs,
            feature_names,
            label_output,
        }
    }

    /// Build one named tensor per declared input from the table's columns
    fn build_feeds(&self, table: &Table) -> Result<Vec<(String, DynValue)>> {
        let rows = table.num_rows();

        self.inputs
            .iter()
            .map(|input| {
                let cells = table
                    .column(&input.name)
                    .ok_or_else(|| anyhow!("column {:?} not found in input", input.name))?;
                let data = ColumnData::encode(input.kind, &input.name, &cells)?;
                let value = into_value(data, input.shape(rows))
                    .with_context(|| format!("Failed to create tensor for {:?}", input.name))?;
                Ok((input.name.clone(), value))
            })
            .collect()
    }
}

impl Pipeline for OnnxPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, table: &Table) -> Result<Vec<i64>> {
        check_feature_names(&self.feature_names, table.columns())?;
        check_non_empty(table)?;

        let feeds = self.build_feeds(table)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        let outputs = session.run(feeds)?;
        let labels = extract_labels(&outputs, &self.label_output)?;

        if labels.len() != table.num_rows() {
            bail!(
                "model returned {} labels for {} rows",
                labels.len(),
                table.num_rows()
            );
        }

        debug!(model = %self.name, rows = labels.len(), "Pipeline inference complete");
        Ok(labels)
    }
}

fn into_value(data: ColumnData, shape: Vec<i64>) -> Result<DynValue> {
    Ok(match data {
        ColumnData::Int64(v) => Tensor::from_array((shape, v))?.into_dyn(),
        ColumnData::Int32(v) => Tensor::from_array((shape, v))?.into_dyn(),
        ColumnData::Float32(v) => Tensor::from_array((shape, v))?.into_dyn(),
        ColumnData::Float64(v) => Tensor::from_array((shape, v))?.into_dyn(),
        ColumnData::Text(v) => Tensor::from_string_array((shape, v.as_slice()))?.into_dyn(),
    })
}

/// Read the label output; sklearn exports emit int64, some converters int32.
fn extract_labels(outputs: &SessionOutputs, label_output: &str) -> Result<Vec<i64>> {
    let output = outputs
        .get(label_output)
        .ok_or_else(|| anyhow!("model produced no {:?} output", label_output))?;

    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return Ok(data.to_vec());
    }
    if let Ok((_, data)) = output.try_extract_tensor::<i32>() {
        return Ok(data.iter().map(|&v| v as i64).collect());
    }

    bail!("label output {:?} is not an integer tensor", label_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ort::tensor::TensorElementType;
    use ort::value::ValueType;

    fn element_type_and_shape(value: &DynValue) -> (TensorElementType, Vec<i64>) {
        match value.dtype() {
            ValueType::Tensor { ty, shape, .. } => (ty.clone(), shape.to_vec()),
            other => panic!("expected a tensor, found {:?}", other),
        }
    }

    #[test]
    fn test_input_shape_by_rank() {
        let column = InputSpec {
            name: "age".to_string(),
            kind: ColumnKind::Int64,
            rank: 2,
        };
        assert_eq!(column.shape(3), vec![3, 1]);

        let flat = InputSpec { rank: 1, ..column };
        assert_eq!(flat.shape(3), vec![3]);
    }

    #[test]
    fn test_int_column_becomes_column_tensor() {
        let input = InputSpec {
            name: "age".to_string(),
            kind: ColumnKind::Int64,
            rank: 2,
        };
        let data = ColumnData::encode(input.kind, &input.name, &["39", "50", "18"]).unwrap();

        let value = into_value(data, input.shape(3)).unwrap();

        let (ty, shape) = element_type_and_shape(&value);
        assert_eq!(ty, TensorElementType::Int64);
        assert_eq!(shape, vec![3, 1]);
        let (_, values) = value.try_extract_tensor::<i64>().unwrap();
        assert_eq!(values, &[39, 50, 18]);
    }

    #[test]
    fn test_text_column_becomes_string_tensor() {
        let input = InputSpec {
            name: "race".to_string(),
            kind: ColumnKind::Text,
            rank: 1,
        };
        let data = ColumnData::encode(input.kind, &input.name, &["White", "Black"]).unwrap();

        let value = into_value(data, input.shape(2)).unwrap();

        let (ty, shape) = element_type_and_shape(&value);
        assert_eq!(ty, TensorElementType::String);
        assert_eq!(shape, vec![2]);
    }

    #[test]
    fn test_float_column_keeps_rows() {
        let data = ColumnData::encode(ColumnKind::Float32, "capital-gain", &["0", "", "7688"]).unwrap();

        let value = into_value(data, vec![3, 1]).unwrap();

        let (ty, shape) = element_type_and_shape(&value);
        assert_eq!(ty, TensorElementType::Float32);
        assert_eq!(shape, vec![3, 1]);
    }
}
