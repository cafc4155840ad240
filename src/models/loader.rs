//! ONNX pipeline loader

use crate::models::inference::{InputSpec, OnnxPipeline};
use crate::models::pipeline::ColumnKind;
use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use std::path::Path;
use tracing::info;

/// Loader for ONNX pipeline artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        let onnx_threads = onnx_threads.max(1);
        info!(onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the pipeline artifact from file.
    ///
    /// A missing or unreadable artifact is an error here, never later at
    /// prediction time.
    pub fn load<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<OnnxPipeline> {
        let path = path.as_ref();

        if !path.exists() {
            bail!("Model artifact not found: {}", path.display());
        }

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX pipeline");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let inputs = session
            .inputs
            .iter()
            .map(|input| {
                let (kind, rank) = input_kind(&input.input_type)
                    .with_context(|| format!("Unsupported input {:?}", input.name))?;
                Ok(InputSpec {
                    name: input.name.clone(),
                    kind,
                    rank,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if inputs.is_empty() {
            bail!("Model {} declares no inputs", path.display());
        }

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .context("Model declares no outputs")?;

        info!(
            model = %name,
            inputs = inputs.len(),
            input_names = ?inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            output = %label_output,
            "Pipeline loaded successfully"
        );

        Ok(OnnxPipeline::new(name, session, inputs, label_output))
    }
}

/// Column kind and tensor rank for a declared input.
fn input_kind(value_type: &ValueType) -> Result<(ColumnKind, usize)> {
    match value_type {
        ValueType::Tensor { ty, shape, .. } => Ok((column_kind(*ty)?, shape.len())),
        other => bail!("expected a tensor input, found {:?}", other),
    }
}

fn column_kind(ty: TensorElementType) -> Result<ColumnKind> {
    Ok(match ty {
        TensorElementType::Int64 => ColumnKind::Int64,
        TensorElementType::Int32 => ColumnKind::Int32,
        TensorElementType::Float32 => ColumnKind::Float32,
        TensorElementType::Float64 => ColumnKind::Float64,
        TensorElementType::String => ColumnKind::Text,
        other => bail!("unsupported element type {:?}", other),
    })
}
