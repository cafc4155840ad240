//! Predictor service: one loaded pipeline, single-record and batch prediction.

use crate::config::{BatchConfig, ModelConfig};
use crate::models::loader::ModelLoader;
use crate::models::pipeline::Pipeline;
use crate::types::record::EmployeeRecord;
use crate::types::table::Table;
use anyhow::{bail, Context, Result};
use tracing::{debug, info};

/// Labels for a scored batch alongside the augmented table
#[derive(Debug, Clone)]
pub struct BatchPrediction {
    /// Input columns followed by the label column
    pub table: Table,
    /// Name the label column ended up with
    pub label_column: String,
    pub labels: Vec<i64>,
}

/// Wraps one loaded pipeline. Immutable once built; share it behind an `Arc`.
pub struct Predictor {
    pipeline: Box<dyn Pipeline>,
    label_column: String,
}

impl Predictor {
    /// Wrap an already-loaded pipeline
    pub fn new(pipeline: Box<dyn Pipeline>) -> Self {
        Self {
            pipeline,
            label_column: BatchConfig::default().label_column,
        }
    }

    /// Set the base name of the column appended to batch output
    pub fn with_label_column(mut self, label_column: impl Into<String>) -> Self {
        self.label_column = label_column.into();
        self
    }

    /// Load the artifact named in `config`.
    ///
    /// Fails here, not at prediction time, when the artifact is missing or unreadable.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads)?;
        let pipeline = loader
            .load(&config.path, &config.name)
            .context("Failed to load model artifact")?;

        info!(model = %config.name, "Predictor ready");
        Ok(Self::new(Box::new(pipeline)))
    }

    pub fn model_name(&self) -> &str {
        self.pipeline.name()
    }

    /// Columns the pipeline was trained on
    pub fn feature_names(&self) -> &[String] {
        self.pipeline.feature_names()
    }

    /// Predict the label for one record.
    ///
    /// The record goes to the pipeline as a one-row table; pipeline errors
    /// propagate as they are.
    pub fn predict_one(&self, record: &EmployeeRecord) -> Result<i64> {
        let labels = self.pipeline.predict(&record.to_table())?;
        let label = labels
            .first()
            .copied()
            .context("pipeline returned no prediction")?;

        debug!(model = %self.pipeline.name(), label, "Single prediction");
        Ok(label)
    }

    /// Score every row of `table` in one pipeline call.
    ///
    /// No column checks happen here. Any pipeline error fails the whole batch.
    pub fn predict_batch(&self, table: &Table) -> Result<BatchPrediction> {
        let labels = self.pipeline.predict(table)?;
        if labels.len() != table.num_rows() {
            bail!(
                "pipeline returned {} labels for {} rows",
                labels.len(),
                table.num_rows()
            );
        }

        let label_column = table.unique_column_name(&self.label_column);
        let augmented = table
            .clone()
            .with_column(label_column.clone(), labels.iter().map(i64::to_string).collect())?;

        debug!(
            model = %self.pipeline.name(),
            rows = labels.len(),
            label_column = %label_column,
            "Batch prediction"
        );

        Ok(BatchPrediction {
            table: augmented,
            label_column,
            labels,
        })
    }
}
