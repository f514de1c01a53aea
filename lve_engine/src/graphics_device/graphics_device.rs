/// GraphicsDevice trait - the factory interface backends implement

use crate::error::Result;
use crate::graphics_device::{Shader, ShaderDesc, Pipeline, PipelineDesc};

// ============================================================================
// Configuration
// ============================================================================

/// Which validation messages reach the engine logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSeverity {
    /// Errors only
    ErrorsOnly,
    /// Errors and warnings
    ErrorsAndWarnings,
    /// Everything, including info and verbose
    All,
}

/// Per-category filter for validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMessageFilter {
    pub show_general: bool,
    pub show_validation: bool,
    pub show_performance: bool,
}

impl Default for DebugMessageFilter {
    fn default() -> Self {
        Self {
            show_general: true,
            show_validation: true,
            show_performance: true,
        }
    }
}

/// Graphics device configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
    /// Minimum severity of validation messages forwarded to the logger
    pub debug_severity: DebugSeverity,
    /// Validation message categories forwarded to the logger
    pub debug_message_filter: DebugMessageFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            app_name: "LVE Application".to_string(),
            app_version: (1, 0, 0),
            debug_severity: DebugSeverity::ErrorsAndWarnings,
            debug_message_filter: DebugMessageFilter::default(),
        }
    }
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Main graphics device trait
///
/// Central factory for GPU objects. Every object it returns is exclusively
/// owned by the caller and releases its backend handles when dropped. The
/// native device is torn down only after the last of those objects is gone,
/// so dropping the device first is allowed.
/// Implemented by backend-specific devices (e.g., VulkanGraphicsDevice).
pub trait GraphicsDevice: Send + Sync {
    /// Create a shader module from compiled bytecode
    ///
    /// # Errors
    ///
    /// `Error::ShaderModuleCreation` when the driver rejects the bytecode.
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Box<dyn Shader>>;

    /// Create a graphics pipeline from two shader modules and a ready config
    ///
    /// # Errors
    ///
    /// `Error::PipelineCreation` when the driver fails to build the pipeline,
    /// or when either shader was not created by this device.
    /// No partially created pipeline is left behind.
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Box<dyn Pipeline>>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;
}
