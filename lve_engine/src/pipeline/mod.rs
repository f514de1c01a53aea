/// Pipeline module - configuration (draft and ready) and the owning graphics pipeline

pub mod pipeline_config;
pub mod graphics_pipeline;

pub use pipeline_config::*;
pub use graphics_pipeline::*;

// Config and shader file helpers shared by unit tests
#[cfg(test)]
pub(crate) mod tests_support;
