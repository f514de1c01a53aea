/// VulkanShader - Vulkan implementation of the Shader trait

use std::any::Any;
use std::sync::Arc;

use lve_engine::lve::render::{Shader as ShaderTrait, ShaderStage};
use ash::vk;

use crate::vulkan_context::GpuContext;

/// Vulkan shader module
pub struct Shader {
    pub(crate) module: vk::ShaderModule,
    pub(crate) stage: ShaderStage,
    pub(crate) entry_point: String,
    /// Shared device state (keeps the VkDevice alive until this module is destroyed)
    pub(crate) context: Arc<GpuContext>,
}

impl ShaderTrait for Shader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_shader_module(self.module, None);
        }
    }
}
