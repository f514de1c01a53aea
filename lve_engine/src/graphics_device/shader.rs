/// Shader trait and shader descriptor

use std::any::Any;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

/// Descriptor for creating a shader module
#[derive(Debug, Clone)]
pub struct ShaderDesc<'a> {
    /// Compiled shader bytecode (SPIR-V)
    pub code: &'a [u8],
    /// Shader stage
    pub stage: ShaderStage,
    /// Entry point function name
    pub entry_point: String,
}

/// Shader module resource trait
///
/// Implemented by backend-specific shader types (e.g., the Vulkan shader module).
/// The module is destroyed when dropped. A module must keep the native
/// device state it was created from alive until it is dropped, even when the
/// device object itself goes away first.
pub trait Shader: Send + Sync {
    /// Stage this module was created for
    fn stage(&self) -> ShaderStage;

    /// Concrete type access, so a backend can recognize its own modules
    fn as_any(&self) -> &dyn Any;
}
