/// Surface - window surface owned by a VulkanGraphicsDevice

use std::marker::PhantomData;
use ash::vk;

use crate::vulkan::VulkanGraphicsDevice;

/// Platform window surface (`VkSurfaceKHR`)
///
/// Borrows the device that created it, so it cannot outlive the Vulkan
/// instance. Destroyed on drop.
pub struct Surface<'d> {
    surface: vk::SurfaceKHR,
    loader: ash::khr::surface::Instance,
    _device: PhantomData<&'d VulkanGraphicsDevice>,
}

impl<'d> Surface<'d> {
    pub(crate) fn new(surface: vk::SurfaceKHR, loader: ash::khr::surface::Instance) -> Self {
        Self {
            surface,
            loader,
            _device: PhantomData,
        }
    }

    /// Raw surface handle, for swapchain creation
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Surface capabilities (extent limits, image counts) for a physical device
    pub fn capabilities(&self, physical_device: vk::PhysicalDevice) -> Option<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.loader
                .get_physical_device_surface_capabilities(physical_device, self.surface)
                .ok()
        }
    }
}

impl Drop for Surface<'_> {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_surface(self.surface, None);
        }
    }
}
