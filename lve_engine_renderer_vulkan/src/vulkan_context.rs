/// GpuContext - Vulkan device state shared by the device and every object it creates
///
/// Held through `Arc` by `VulkanGraphicsDevice`, shader modules and
/// pipelines. The logical device, debug messenger and instance are destroyed
/// when the last holder is dropped, so no object can outlive the `VkDevice`
/// it was created from.

use ash::vk;

pub struct GpuContext {
    /// Vulkan logical device
    pub device: ash::Device,

    /// Vulkan instance (destroyed last)
    pub(crate) instance: ash::Instance,

    /// Loader must stay alive as long as the instance
    pub(crate) entry: ash::Entry,

    /// Validation messenger, when enabled
    pub(crate) debug_messenger: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl Drop for GpuContext {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();
            self.device.destroy_device(None);

            // Stop forwarding before the messenger goes away
            if let Some((loader, messenger)) = self.debug_messenger.take() {
                crate::debug::cleanup_debug_config();
                loader.destroy_debug_utils_messenger(messenger, None);
            }

            self.instance.destroy_instance(None);
        }
    }
}
