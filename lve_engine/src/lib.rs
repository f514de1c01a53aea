/*!
# LVE Engine

Core types for the LVE graphics pipeline layer.

This crate is platform-agnostic: it loads SPIR-V bytecode from disk, builds
and validates the fixed-function pipeline configuration, and drives any
backend implementing [`GraphicsDevice`](crate::lve::GraphicsDevice) to turn
both into a [`GraphicsPipeline`](crate::lve::pipeline::GraphicsPipeline).

## Architecture

- **GraphicsDevice**: Factory trait for shader modules and pipelines
- **Shader**: Shader module trait
- **Pipeline**: Graphics pipeline trait
- **PipelineConfigInfo**: Draft fixed-function configuration
- **ReadyPipelineConfig**: Configuration with every required field set

Backends (see `lve_engine_renderer_vulkan`) provide concrete types that implement these traits.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod shader_loader;
pub mod pipeline;

// Main lve namespace module
pub mod lve {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Graphics device factory trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with device traits and fixed-function state types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Pipeline configuration and construction
    pub mod pipeline {
        pub use crate::pipeline::*;
    }

    // Shader bytecode loading
    pub mod shader {
        pub use crate::shader_loader::*;
    }
}
