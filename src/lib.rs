//! Salary Predictor Library
//!
//! Collects the thirteen attributes of an employee record (or a CSV batch of
//! them), runs them through a pre-trained ONNX pipeline and reports whether
//! each individual earns above or at-or-below 50K.

pub mod config;
pub mod metrics;
pub mod models;
pub mod predictor;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use models::{ModelLoader, OnnxPipeline, Pipeline};
pub use predictor::{BatchPrediction, Predictor};
pub use types::{EmployeeRecord, IncomeBracket, Table};
