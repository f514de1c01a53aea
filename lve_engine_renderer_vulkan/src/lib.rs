/*!
# LVE Engine - Vulkan Backend

Vulkan implementation of the `lve_engine` graphics device traits, built on
`ash`. Window surfaces come from any `raw-window-handle` window through
`ash-window`; shader entry points are checked with `spirq` reflection.

```ignore
use lve_engine::lve::render::Config;
use lve_engine_renderer_vulkan::lve::VulkanGraphicsDevice;

let device = VulkanGraphicsDevice::new(&window, Config::default())?;
```
*/

mod vulkan;
mod vulkan_context;
mod vulkan_format;
mod vulkan_shader;
mod vulkan_pipeline;
mod vulkan_surface;
mod debug;

// Main lve namespace module
pub mod lve {
    pub use crate::vulkan::VulkanGraphicsDevice;
    pub use crate::vulkan_surface::Surface;

    // Validation layer statistics
    pub mod debug {
        pub use crate::debug::{ValidationStats, get_validation_stats, print_validation_stats_report};
    }
}
