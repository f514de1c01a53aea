/// GraphicsPipeline - a created pipeline together with the shader modules it was built from

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, Pipeline, PipelineDesc, Shader, ShaderDesc, ShaderStage,
};
use crate::pipeline::{PipelineConfigInfo, ReadyPipelineConfig};
use crate::shader_loader::ShaderBytecode;
use crate::{engine_bail, engine_error, engine_info, engine_trace};

/// Shader entry point used for both stages
const ENTRY_POINT: &str = "main";

/// Owning handle to a graphics pipeline and its vertex/fragment shader modules
///
/// Construction is all-or-nothing: on any failure every module already
/// created is released before the error is returned. Not `Clone`; move it or
/// borrow it. Dropping it destroys the pipeline first, then the modules.
///
/// The device may be dropped before the pipeline: backend objects keep the
/// native device alive, and a pipeline built through the engine singleton
/// also holds the engine's device until its own modules are released.
pub struct GraphicsPipeline {
    // Field order is drop order
    pipeline: Box<dyn Pipeline>,
    vertex_shader: Box<dyn Shader>,
    fragment_shader: Box<dyn Shader>,
    config: ReadyPipelineConfig,
    /// Engine device this pipeline was built with, released last
    _engine_device: Option<Arc<Mutex<dyn GraphicsDevice>>>,
}

impl GraphicsPipeline {
    /// Load vertex and fragment bytecode from disk and build the pipeline
    ///
    /// The config is checked first, so an incomplete config fails before
    /// any file is read or any device call is made.
    ///
    /// # Errors
    ///
    /// - `Error::PipelineCreation` if the config is not ready, or the device
    ///   fails to build the pipeline
    /// - `Error::FileOpen` if either bytecode file cannot be read
    /// - `Error::ShaderModuleCreation` if the device rejects either bytecode
    pub fn new<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        vert_path: impl AsRef<Path>,
        frag_path: impl AsRef<Path>,
        config: &PipelineConfigInfo,
    ) -> Result<Self> {
        let config = config.ready()?;

        let vertex_code = ShaderBytecode::load(vert_path)?;
        let fragment_code = ShaderBytecode::load(frag_path)?;

        engine_info!("lve::Pipeline", "Vertex shader code size: {}", vertex_code.len());
        engine_info!("lve::Pipeline", "Fragment shader code size: {}", fragment_code.len());

        Self::create(device, &vertex_code, &fragment_code, config)
    }

    /// Build the pipeline from bytecode already in memory
    pub fn from_bytecode<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        vertex_code: &ShaderBytecode,
        fragment_code: &ShaderBytecode,
        config: &PipelineConfigInfo,
    ) -> Result<Self> {
        let config = config.ready()?;
        Self::create(device, vertex_code, fragment_code, config)
    }

    /// Same as [`GraphicsPipeline::new`], using the engine's graphics device singleton
    ///
    /// The pipeline keeps that device alive, so
    /// [`Engine::destroy_graphics_device`] only drops the engine's reference.
    pub fn with_engine_device(
        vert_path: impl AsRef<Path>,
        frag_path: impl AsRef<Path>,
        config: &PipelineConfigInfo,
    ) -> Result<Self> {
        let device = Engine::graphics_device()?;

        let mut pipeline = {
            let Ok(mut guard) = device.lock() else {
                engine_bail!("lve::Pipeline", "GraphicsDevice lock poisoned");
            };
            Self::new(&mut *guard, vert_path, frag_path, config)?
        };

        pipeline._engine_device = Some(device);
        Ok(pipeline)
    }

    fn create<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        vertex_code: &ShaderBytecode,
        fragment_code: &ShaderBytecode,
        config: ReadyPipelineConfig,
    ) -> Result<Self> {
        let vertex_shader = Self::create_shader_module(device, vertex_code, ShaderStage::Vertex)?;
        let fragment_shader = Self::create_shader_module(device, fragment_code, ShaderStage::Fragment)?;

        let pipeline = device
            .create_pipeline(PipelineDesc {
                vertex_shader: vertex_shader.as_ref(),
                fragment_shader: fragment_shader.as_ref(),
                config: &config,
            })
            .map_err(|e| {
                engine_error!("lve::Pipeline", "Failed to create graphics pipeline: {}", e);
                match e {
                    Error::PipelineCreation(_) => e,
                    other => Error::PipelineCreation(other.to_string()),
                }
            })?;

        engine_info!("lve::Pipeline", "Graphics pipeline created (subpass {})", config.subpass());

        Ok(Self {
            pipeline,
            vertex_shader,
            fragment_shader,
            config,
            _engine_device: None,
        })
    }

    fn create_shader_module<D: GraphicsDevice + ?Sized>(
        device: &mut D,
        code: &ShaderBytecode,
        stage: ShaderStage,
    ) -> Result<Box<dyn Shader>> {
        engine_trace!("lve::Pipeline", "Creating {:?} shader module ({} bytes)", stage, code.len());

        device
            .create_shader(ShaderDesc {
                code: code.as_bytes(),
                stage,
                entry_point: ENTRY_POINT.to_string(),
            })
            .map_err(|e| {
                engine_error!("lve::Pipeline", "Failed to create {:?} shader module from '{}': {}",
                    stage, code.path().display(), e);
                match e {
                    Error::ShaderModuleCreation(_) => e,
                    other => Error::ShaderModuleCreation(other.to_string()),
                }
            })
    }

    pub fn pipeline(&self) -> &dyn Pipeline {
        self.pipeline.as_ref()
    }

    pub fn vertex_shader(&self) -> &dyn Shader {
        self.vertex_shader.as_ref()
    }

    pub fn fragment_shader(&self) -> &dyn Shader {
        self.fragment_shader.as_ref()
    }

    /// Config the pipeline was built from
    pub fn config(&self) -> &ReadyPipelineConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "graphics_pipeline_tests.rs"]
mod tests;
