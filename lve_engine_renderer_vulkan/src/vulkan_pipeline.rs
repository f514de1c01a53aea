/// VulkanPipeline - Vulkan implementation of the Pipeline trait

use std::sync::Arc;

use lve_engine::lve::render::Pipeline as PipelineTrait;
use ash::vk;

use crate::vulkan_context::GpuContext;

/// Vulkan graphics pipeline
///
/// Layout and render pass are owned by the caller; only the pipeline is
/// destroyed on drop.
pub struct Pipeline {
    pub(crate) pipeline: vk::Pipeline,
    /// Shared device state (keeps the VkDevice alive until this pipeline is destroyed)
    pub(crate) context: Arc<GpuContext>,
}

impl PipelineTrait for Pipeline {}

impl Drop for Pipeline {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_pipeline(self.pipeline, None);
        }
    }
}
