/// Graphics device module - device abstraction traits and fixed-function state types

// Module declarations
pub mod graphics_device;
pub mod shader;
pub mod pipeline;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use shader::*;
pub use pipeline::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
