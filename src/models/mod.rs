//! Pipeline loading and inference

pub mod inference;
pub mod loader;
pub mod pipeline;

pub use inference::OnnxPipeline;
pub use loader::ModelLoader;
pub use pipeline::Pipeline;
