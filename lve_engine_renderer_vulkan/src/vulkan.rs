/// VulkanGraphicsDevice - Vulkan implementation of the GraphicsDevice trait

use lve_engine::lve::{GraphicsDevice, Result, Error};
use lve_engine::lve::render::{
    Config, ShaderDesc, ShaderStage, PipelineDesc, Shader as ShaderTrait,
    Pipeline as PipelineTrait,
};
use ash::vk;
use ash::vk::Handle;
use std::ffi::{CStr, CString};
use std::sync::Arc;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use lve_engine::{engine_debug, engine_info, engine_warn, engine_err, engine_err_of};

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::*;
use crate::vulkan_shader::Shader;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_surface::Surface;

const LOG_SOURCE: &str = "lve::vulkan";

/// First word of every SPIR-V module
const SPIRV_MAGIC: u32 = 0x0723_0203;

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

/// Vulkan graphics device
///
/// Shares the instance, the logical device and (when validation is enabled)
/// the debug messenger with every shader module and pipeline it creates,
/// through [`GpuContext`]. Dropping the device before those objects is safe:
/// the native device is destroyed when the last of them goes away.
pub struct VulkanGraphicsDevice {
    context: Arc<GpuContext>,
    physical_device: vk::PhysicalDevice,

    graphics_queue: vk::Queue,
    graphics_queue_family: u32,
    /// Present queue (may be same as graphics)
    present_queue: vk::Queue,
    present_queue_family: u32,
}

/// Logical device plus the queue families it was created with
struct DeviceParts {
    physical_device: vk::PhysicalDevice,
    device: ash::Device,
    graphics_queue_family: u32,
    present_queue_family: u32,
}

impl VulkanGraphicsDevice {
    /// Create a new Vulkan device for `window`
    ///
    /// Picks the first physical device that has a graphics queue, can present
    /// to the window and supports the swapchain extension.
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` for any failure during bring-up. Objects
    /// created before the failure are destroyed.
    pub fn new<W: HasDisplayHandle + HasWindowHandle>(
        window: &W,
        config: Config,
    ) -> Result<Self> {
        unsafe {
            let entry = ash::Entry::load()
                .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                    "Failed to load Vulkan library: {:?}", e))?;

            let validation = cfg!(feature = "vulkan-validation")
                && config.enable_validation
                && Self::validation_layer_available(&entry);

            let instance = Self::create_instance(&entry, window, &config, validation)?;

            let debug_messenger = if validation {
                match Self::create_debug_messenger(&entry, &instance, &config) {
                    Ok(messenger) => Some(messenger),
                    Err(e) => {
                        instance.destroy_instance(None);
                        return Err(e);
                    }
                }
            } else {
                None
            };

            let parts = match Self::create_logical_device(&entry, &instance, window) {
                Ok(parts) => parts,
                Err(e) => {
                    if let Some((loader, messenger)) = &debug_messenger {
                        crate::debug::cleanup_debug_config();
                        loader.destroy_debug_utils_messenger(*messenger, None);
                    }
                    instance.destroy_instance(None);
                    return Err(e);
                }
            };

            let graphics_queue = parts.device.get_device_queue(parts.graphics_queue_family, 0);
            let present_queue = parts.device.get_device_queue(parts.present_queue_family, 0);

            engine_info!(LOG_SOURCE, "Vulkan device ready (validation: {}, graphics family: {}, present family: {})",
                validation, parts.graphics_queue_family, parts.present_queue_family);

            let context = Arc::new(GpuContext {
                device: parts.device,
                instance,
                entry,
                debug_messenger,
            });

            Ok(Self {
                context,
                physical_device: parts.physical_device,
                graphics_queue,
                graphics_queue_family: parts.graphics_queue_family,
                present_queue,
                present_queue_family: parts.present_queue_family,
            })
        }
    }

    unsafe fn validation_layer_available(entry: &ash::Entry) -> bool {
        let layers = match entry.enumerate_instance_layer_properties() {
            Ok(layers) => layers,
            Err(e) => {
                engine_warn!(LOG_SOURCE, "Failed to enumerate instance layers: {:?}", e);
                return false;
            }
        };

        let found = layers
            .iter()
            .any(|layer| CStr::from_ptr(layer.layer_name.as_ptr()) == VALIDATION_LAYER);

        if !found {
            engine_warn!(LOG_SOURCE, "Validation requested but {:?} is not installed", VALIDATION_LAYER);
        }
        found
    }

    unsafe fn create_instance<W: HasDisplayHandle>(
        entry: &ash::Entry,
        window: &W,
        config: &Config,
        validation: bool,
    ) -> Result<ash::Instance> {
        let app_name = CString::new(config.app_name.as_str())
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Invalid application name: {}", e))?;
        let (major, minor, patch) = config.app_version;

        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(c"LVE")
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let display_handle = window.display_handle()
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to get display handle: {}", e))?;
        let mut extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to get required extensions: {}", e))?
            .to_vec();

        let layer_names = if validation {
            extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            vec![]
        };

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extension_names);

        entry
            .create_instance(&create_info, None)
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to create Vulkan instance: {:?}", e))
    }

    unsafe fn create_debug_messenger(
        entry: &ash::Entry,
        instance: &ash::Instance,
        config: &Config,
    ) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
        let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);

        crate::debug::init_debug_config(crate::debug::Config {
            severity: config.debug_severity,
            message_filter: config.debug_message_filter,
        });

        let debug_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(crate::debug::severity_flags(config.debug_severity))
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
            )
            .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

        let messenger = debug_utils
            .create_debug_utils_messenger(&debug_info, None)
            .map_err(|e| {
                crate::debug::cleanup_debug_config();
                engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                    "Failed to create debug messenger: {:?}", e)
            })?;

        Ok((debug_utils, messenger))
    }

    /// Pick a physical device using a temporary surface, then create the logical device
    unsafe fn create_logical_device<W: HasDisplayHandle + HasWindowHandle>(
        entry: &ash::Entry,
        instance: &ash::Instance,
        window: &W,
    ) -> Result<DeviceParts> {
        let surface_loader = ash::khr::surface::Instance::new(entry, instance);
        let surface = Self::create_raw_surface(entry, instance, window)?;

        let picked = Self::pick_physical_device(instance, &surface_loader, surface);
        surface_loader.destroy_surface(surface, None);
        let (physical_device, graphics_queue_family, present_queue_family) = picked?;

        let queue_priorities = [1.0];
        let mut queue_create_infos = vec![
            vk::DeviceQueueCreateInfo::default()
                .queue_family_index(graphics_queue_family)
                .queue_priorities(&queue_priorities),
        ];
        if present_queue_family != graphics_queue_family {
            queue_create_infos.push(
                vk::DeviceQueueCreateInfo::default()
                    .queue_family_index(present_queue_family)
                    .queue_priorities(&queue_priorities),
            );
        }

        let device_extension_names = [ash::khr::swapchain::NAME.as_ptr()];
        let device_features = vk::PhysicalDeviceFeatures::default();

        let device_create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_create_infos)
            .enabled_extension_names(&device_extension_names)
            .enabled_features(&device_features);

        let device = instance
            .create_device(physical_device, &device_create_info, None)
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to create logical device: {:?}", e))?;

        Ok(DeviceParts {
            physical_device,
            device,
            graphics_queue_family,
            present_queue_family,
        })
    }

    unsafe fn create_raw_surface<W: HasDisplayHandle + HasWindowHandle>(
        entry: &ash::Entry,
        instance: &ash::Instance,
        window: &W,
    ) -> Result<vk::SurfaceKHR> {
        let display_handle = window.display_handle()
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to get display handle: {}", e))?;
        let window_handle = window.window_handle()
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to get window handle: {}", e))?;

        ash_window::create_surface(
            entry,
            instance,
            display_handle.as_raw(),
            window_handle.as_raw(),
            None,
        )
        .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
            "Failed to create surface: {:?}", e))
    }

    /// First device with graphics + present queues and swapchain support
    unsafe fn pick_physical_device(
        instance: &ash::Instance,
        surface_loader: &ash::khr::surface::Instance,
        surface: vk::SurfaceKHR,
    ) -> Result<(vk::PhysicalDevice, u32, u32)> {
        let physical_devices = instance
            .enumerate_physical_devices()
            .map_err(|e| engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
                "Failed to enumerate physical devices: {:?}", e))?;

        engine_debug!(LOG_SOURCE, "Found {} physical device(s)", physical_devices.len());

        for physical_device in physical_devices {
            let properties = instance.get_physical_device_properties(physical_device);
            let name = CStr::from_ptr(properties.device_name.as_ptr()).to_string_lossy();

            let Some((graphics, present)) =
                Self::find_queue_families(instance, surface_loader, surface, physical_device)
            else {
                engine_debug!(LOG_SOURCE, "Skipping '{}': missing graphics or present queue", name);
                continue;
            };

            if !Self::supports_swapchain(instance, physical_device) {
                engine_debug!(LOG_SOURCE, "Skipping '{}': no swapchain support", name);
                continue;
            }

            engine_info!(LOG_SOURCE, "Using physical device '{}'", name);
            return Ok((physical_device, graphics, present));
        }

        Err(engine_err_of!(Error::InitializationFailed, LOG_SOURCE,
            "No Vulkan device with graphics and present support found"))
    }

    unsafe fn find_queue_families(
        instance: &ash::Instance,
        surface_loader: &ash::khr::surface::Instance,
        surface: vk::SurfaceKHR,
        physical_device: vk::PhysicalDevice,
    ) -> Option<(u32, u32)> {
        let queue_families = instance.get_physical_device_queue_family_properties(physical_device);

        let graphics = queue_families
            .iter()
            .position(|qf| qf.queue_count > 0 && qf.queue_flags.contains(vk::QueueFlags::GRAPHICS))?
            as u32;

        let can_present = |index: u32| {
            surface_loader
                .get_physical_device_surface_support(physical_device, index, surface)
                .unwrap_or(false)
        };

        // Prefer one family for both
        let present = if can_present(graphics) {
            graphics
        } else {
            (0..queue_families.len() as u32).find(|&i| can_present(i))?
        };

        Some((graphics, present))
    }

    unsafe fn supports_swapchain(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> bool {
        instance
            .enumerate_device_extension_properties(physical_device)
            .map(|extensions| {
                extensions.iter().any(|ext| {
                    CStr::from_ptr(ext.extension_name.as_ptr()) == ash::khr::swapchain::NAME
                })
            })
            .unwrap_or(false)
    }

    /// Create a presentable surface for `window`
    ///
    /// The surface borrows this device and is destroyed when dropped.
    pub fn create_window_surface<W: HasDisplayHandle + HasWindowHandle>(
        &self,
        window: &W,
    ) -> Result<Surface<'_>> {
        let context = &self.context;
        let surface = unsafe { Self::create_raw_surface(&context.entry, &context.instance, window)? };
        let loader = ash::khr::surface::Instance::new(&context.entry, &context.instance);
        Ok(Surface::new(surface, loader))
    }

    // ===== Accessors for swapchain / render pass code =====

    pub fn device(&self) -> &ash::Device {
        &self.context.device
    }

    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    pub fn graphics_queue(&self) -> (vk::Queue, u32) {
        (self.graphics_queue, self.graphics_queue_family)
    }

    pub fn present_queue(&self) -> (vk::Queue, u32) {
        (self.present_queue, self.present_queue_family)
    }

    pub fn validation_enabled(&self) -> bool {
        self.context.debug_messenger.is_some()
    }

    /// Check size and magic, then copy into aligned words
    fn spirv_words(code: &[u8]) -> Result<Vec<u32>> {
        if code.is_empty() || code.len() % 4 != 0 {
            return Err(engine_err_of!(Error::ShaderModuleCreation, LOG_SOURCE,
                "Shader code size must be a non-zero multiple of 4 (size: {} bytes)", code.len()));
        }

        // read_spv also fixes up big-endian modules
        let words = ash::util::read_spv(&mut std::io::Cursor::new(code))
            .map_err(|e| engine_err_of!(Error::ShaderModuleCreation, LOG_SOURCE,
                "Failed to read SPIR-V words: {}", e))?;

        if words.first() != Some(&SPIRV_MAGIC) {
            return Err(engine_err_of!(Error::ShaderModuleCreation, LOG_SOURCE,
                "Shader code is not SPIR-V (bad magic number)"));
        }

        Ok(words)
    }

    /// Reflect the module and make sure it exports `entry_point`
    fn check_entry_point(words: &[u32], entry_point: &str, stage: ShaderStage) -> Result<()> {
        let entry_points = spirq::ReflectConfig::new()
            .spv(words)
            .ref_all_rscs(true)
            .reflect()
            .map_err(|e| engine_err_of!(Error::ShaderModuleCreation, LOG_SOURCE,
                "SPIR-V reflection failed: {:?}", e))?;

        if entry_points.iter().any(|ep| ep.name == entry_point) {
            Ok(())
        } else {
            let found: Vec<&str> = entry_points.iter().map(|ep| ep.name.as_str()).collect();
            Err(engine_err_of!(Error::ShaderModuleCreation, LOG_SOURCE,
                "{:?} shader has no entry point '{}' (found: {:?})", stage, entry_point, found))
        }
    }

    /// Recover the Vulkan shader behind a `&dyn Shader`
    ///
    /// Fails with `Error::PipelineCreation` for modules of another backend.
    fn as_vulkan_shader(shader: &dyn ShaderTrait) -> Result<&Shader> {
        shader
            .as_any()
            .downcast_ref::<Shader>()
            .ok_or_else(|| engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                "{:?} shader was not created by the Vulkan backend", shader.stage()))
    }

    /// Vulkan shader created by this device
    fn own_shader<'s>(&self, shader: &'s dyn ShaderTrait) -> Result<&'s Shader> {
        let vulkan_shader = Self::as_vulkan_shader(shader)?;

        if !Arc::ptr_eq(&vulkan_shader.context, &self.context) {
            return Err(engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                "{:?} shader belongs to another Vulkan device", shader.stage()));
        }

        Ok(vulkan_shader)
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Box<dyn ShaderTrait>> {
        let words = Self::spirv_words(desc.code)?;
        Self::check_entry_point(&words, &desc.entry_point, desc.stage)?;

        let create_info = vk::ShaderModuleCreateInfo::default().code(&words);

        let module = unsafe { self.context.device.create_shader_module(&create_info, None) }
            .map_err(|e| engine_err_of!(Error::ShaderModuleCreation, LOG_SOURCE,
                "Failed to create shader module: {:?}", e))?;

        engine_debug!(LOG_SOURCE, "{:?} shader module created ({} bytes)", desc.stage, desc.code.len());

        Ok(Box::new(Shader {
            module,
            stage: desc.stage,
            entry_point: desc.entry_point,
            context: Arc::clone(&self.context),
        }))
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Box<dyn PipelineTrait>> {
        if desc.vertex_shader.stage() != ShaderStage::Vertex
            || desc.fragment_shader.stage() != ShaderStage::Fragment
        {
            return Err(engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                "Shader stages mismatch (vertex slot: {:?}, fragment slot: {:?})",
                desc.vertex_shader.stage(), desc.fragment_shader.stage()));
        }

        let vertex_shader = self.own_shader(desc.vertex_shader)?;
        let fragment_shader = self.own_shader(desc.fragment_shader)?;
        let config = desc.config;

        let entry_point_vert = CString::new(vertex_shader.entry_point.as_str())
            .map_err(|e| engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                "Invalid vertex entry point: {}", e))?;
        let entry_point_frag = CString::new(fragment_shader.entry_point.as_str())
            .map_err(|e| engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                "Invalid fragment entry point: {}", e))?;

        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::default()
                .stage(shader_stage_to_vk(vertex_shader.stage))
                .module(vertex_shader.module)
                .name(&entry_point_vert),
            vk::PipelineShaderStageCreateInfo::default()
                .stage(shader_stage_to_vk(fragment_shader.stage))
                .module(fragment_shader.module)
                .name(&entry_point_frag),
        ];

        // No vertex buffers consumed yet
        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default();

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(topology_to_vk(config.input_assembly().topology))
            .primitive_restart_enable(config.input_assembly().primitive_restart_enable);

        let viewports = [viewport_to_vk(config.viewport())];
        let scissors = [rect_to_vk(config.scissor())];
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewports(&viewports)
            .scissors(&scissors);

        let raster = config.rasterization();
        let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
            .depth_clamp_enable(raster.depth_clamp_enable)
            .rasterizer_discard_enable(raster.rasterizer_discard_enable)
            .polygon_mode(polygon_mode_to_vk(raster.polygon_mode))
            .line_width(raster.line_width)
            .cull_mode(cull_mode_to_vk(raster.cull_mode))
            .front_face(front_face_to_vk(raster.front_face))
            .depth_bias_enable(raster.depth_bias.enable)
            .depth_bias_constant_factor(raster.depth_bias.constant_factor)
            .depth_bias_clamp(raster.depth_bias.clamp)
            .depth_bias_slope_factor(raster.depth_bias.slope_factor);

        let multisample = config.multisample();
        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .rasterization_samples(sample_count_to_vk(multisample.sample_count))
            .sample_shading_enable(multisample.sample_shading_enable)
            .min_sample_shading(multisample.min_sample_shading)
            .alpha_to_coverage_enable(multisample.alpha_to_coverage_enable)
            .alpha_to_one_enable(multisample.alpha_to_one_enable);

        let color_blend_attachments = [color_blend_attachment_to_vk(config.color_blend_attachment())];
        let blend = config.color_blend();
        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(blend.logic_op_enable)
            .logic_op(logic_op_to_vk(blend.logic_op))
            .attachments(&color_blend_attachments)
            .blend_constants(blend.blend_constants);

        let depth = config.depth_stencil();
        let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo::default()
            .depth_test_enable(depth.depth_test_enable)
            .depth_write_enable(depth.depth_write_enable)
            .depth_compare_op(compare_op_to_vk(depth.depth_compare_op))
            .depth_bounds_test_enable(depth.depth_bounds_test_enable)
            .min_depth_bounds(depth.min_depth_bounds)
            .max_depth_bounds(depth.max_depth_bounds)
            .stencil_test_enable(depth.stencil_test_enable)
            .front(stencil_op_state_to_vk(&depth.front))
            .back(stencil_op_state_to_vk(&depth.back));

        let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_state)
            .input_assembly_state(&input_assembly_state)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization_state)
            .multisample_state(&multisample_state)
            .color_blend_state(&color_blend_state)
            .depth_stencil_state(&depth_stencil_state)
            .layout(vk::PipelineLayout::from_raw(config.pipeline_layout().as_raw()))
            .render_pass(vk::RenderPass::from_raw(config.render_pass().as_raw()))
            .subpass(config.subpass())
            .base_pipeline_handle(vk::Pipeline::null())
            .base_pipeline_index(-1);

        let result = unsafe {
            self.context.device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_create_info],
                None,
            )
        };

        let pipelines = match result {
            Ok(pipelines) => pipelines,
            Err((partial, e)) => {
                for pipeline in partial.into_iter().filter(|p| *p != vk::Pipeline::null()) {
                    unsafe { self.context.device.destroy_pipeline(pipeline, None) };
                }
                return Err(engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                    "Failed to create graphics pipeline: {:?}", e));
            }
        };

        let pipeline = pipelines
            .into_iter()
            .next()
            .ok_or_else(|| engine_err_of!(Error::PipelineCreation, LOG_SOURCE,
                "Driver returned no pipeline"))?;

        Ok(Box::new(Pipeline {
            pipeline,
            context: Arc::clone(&self.context),
        }))
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.context.device
                .device_wait_idle()
                .map_err(|e| engine_err!(LOG_SOURCE, "Failed to wait idle: {:?}", e))
        }
    }
}

impl Drop for VulkanGraphicsDevice {
    fn drop(&mut self) {
        let holders = Arc::strong_count(&self.context) - 1;
        if holders > 0 {
            engine_debug!(LOG_SOURCE, "Device dropped; native device kept alive by {} object(s)", holders);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_tests.rs"]
mod tests;
