/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every call, tracks how many shader modules and pipelines are
/// alive, and can be told to reject shaders or pipelines the way a driver would.
///
/// Like a real backend, every shader and pipeline shares the device core, so
/// the core is released only after the device and all its objects are gone.
/// [`MockGraphicsDevice::teardown`] reports what was still alive at that point.

use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Shader, ShaderDesc, ShaderStage, Pipeline, PipelineDesc,
};
use crate::pipeline::ReadyPipelineConfig;

// ============================================================================
// Shared device core
// ============================================================================

/// Object counts observed when the device core was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTeardown {
    pub live_shaders: usize,
    pub live_pipelines: usize,
}

/// Filled in when the device core drops
pub type TeardownRecord = Arc<Mutex<Option<MockTeardown>>>;

#[derive(Debug)]
struct MockDeviceCore {
    live_shaders: AtomicUsize,
    live_pipelines: AtomicUsize,
    teardown: TeardownRecord,
}

impl Drop for MockDeviceCore {
    fn drop(&mut self) {
        let snapshot = MockTeardown {
            live_shaders: self.live_shaders.load(Ordering::SeqCst),
            live_pipelines: self.live_pipelines.load(Ordering::SeqCst),
        };
        *self.teardown.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    pub code_size: usize,
    pub entry_point: String,
    core: Arc<MockDeviceCore>,
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockShader {
    fn drop(&mut self) {
        self.core.live_shaders.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Mock Pipeline
// ============================================================================

#[derive(Debug)]
pub struct MockPipeline {
    pub subpass: u32,
    core: Arc<MockDeviceCore>,
}

impl Pipeline for MockPipeline {}

impl Drop for MockPipeline {
    fn drop(&mut self) {
        self.core.live_pipelines.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    /// Stages passed to create_shader, in call order (including rejected calls)
    pub shader_calls: Vec<ShaderStage>,
    /// Number of create_pipeline calls (including rejected calls)
    pub pipeline_calls: usize,
    /// Config received by the last create_pipeline call
    pub last_config: Option<ReadyPipelineConfig>,
    /// Reject create_shader for this stage
    pub reject_shader_stage: Option<ShaderStage>,
    /// Reject every create_pipeline call
    pub reject_pipeline: bool,
    core: Arc<MockDeviceCore>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            shader_calls: Vec::new(),
            pipeline_calls: 0,
            last_config: None,
            reject_shader_stage: None,
            reject_pipeline: false,
            core: Arc::new(MockDeviceCore {
                live_shaders: AtomicUsize::new(0),
                live_pipelines: AtomicUsize::new(0),
                teardown: Arc::new(Mutex::new(None)),
            }),
        }
    }

    /// Number of shader modules created and not yet dropped
    pub fn live_shader_count(&self) -> usize {
        self.core.live_shaders.load(Ordering::SeqCst)
    }

    /// Number of pipelines created and not yet dropped
    pub fn live_pipeline_count(&self) -> usize {
        self.core.live_pipelines.load(Ordering::SeqCst)
    }

    /// True when no device call has been made at all
    pub fn untouched(&self) -> bool {
        self.shader_calls.is_empty() && self.pipeline_calls == 0
    }

    /// Handle that outlives the device and reports its core release
    pub fn teardown(&self) -> TeardownRecord {
        Arc::clone(&self.core.teardown)
    }

    fn owns(&self, shader: &dyn Shader) -> bool {
        shader
            .as_any()
            .downcast_ref::<MockShader>()
            .is_some_and(|mock| Arc::ptr_eq(&mock.core, &self.core))
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Box<dyn Shader>> {
        self.shader_calls.push(desc.stage);

        if self.reject_shader_stage == Some(desc.stage) {
            return Err(Error::ShaderModuleCreation(
                format!("mock driver rejected {:?} bytecode", desc.stage)
            ));
        }

        self.core.live_shaders.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockShader {
            stage: desc.stage,
            code_size: desc.code.len(),
            entry_point: desc.entry_point,
            core: Arc::clone(&self.core),
        }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Box<dyn Pipeline>> {
        self.pipeline_calls += 1;
        self.last_config = Some(desc.config.clone());

        if !self.owns(desc.vertex_shader) || !self.owns(desc.fragment_shader) {
            return Err(Error::PipelineCreation("shader module from another device".to_string()));
        }

        if self.reject_pipeline {
            return Err(Error::PipelineCreation("mock driver rejected pipeline".to_string()));
        }

        self.core.live_pipelines.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPipeline {
            subpass: desc.config.subpass(),
            core: Arc::clone(&self.core),
        }))
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
