pub mod names_pipeline;

pub use names_pipeline::NamesPipeline;
