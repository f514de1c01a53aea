/// Pipeline configuration: the draft `PipelineConfigInfo` and the
/// `ReadyPipelineConfig` a graphics device accepts.
///
/// A draft comes out of [`PipelineConfigInfo::default_config`] with viewport,
/// scissor, input assembly and rasterization filled in. The pipeline layout,
/// render pass, multisample, color blend and depth/stencil states stay unset
/// until the caller provides them; [`PipelineConfigInfo::ready`] is the only
/// way to obtain a [`ReadyPipelineConfig`].

use crate::error::{Error, Result};
use crate::graphics_device::{
    Viewport, Rect2D, Extent2D, InputAssemblyState, PrimitiveTopology,
    RasterizationState, PolygonMode, CullMode, FrontFace, DepthBias,
    MultisampleState, ColorBlendAttachmentState, ColorBlendState, DepthStencilState,
    PipelineLayoutHandle, RenderPassHandle,
};
use crate::{engine_err_of, engine_error};

/// Draft description of the fixed-function state of a graphics pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfigInfo {
    pub viewport: Viewport,
    pub scissor: Rect2D,
    pub input_assembly: InputAssemblyState,
    pub rasterization: RasterizationState,
    pub multisample: Option<MultisampleState>,
    pub color_blend_attachment: Option<ColorBlendAttachmentState>,
    pub color_blend: Option<ColorBlendState>,
    pub depth_stencil: Option<DepthStencilState>,
    /// Externally owned; must outlive any pipeline created from this config
    pub pipeline_layout: Option<PipelineLayoutHandle>,
    /// Externally owned; must outlive any pipeline created from this config
    pub render_pass: Option<RenderPassHandle>,
    pub subpass: u32,
}

impl PipelineConfigInfo {
    /// Baseline configuration for a `width` x `height` framebuffer
    ///
    /// Triangle lists without primitive restart, a full-framebuffer viewport
    /// (depth 0..1) and matching scissor, filled polygons, no culling,
    /// clockwise front faces, 1.0 line width and no depth bias. Subpass 0.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDimension` when `width` or `height` is zero.
    pub fn default_config(width: u32, height: u32) -> Result<Self> {
        let extent = checked_extent(width, height)?;

        Ok(Self {
            viewport: Viewport::from_extent(extent),
            scissor: Rect2D::from_extent(extent),
            input_assembly: InputAssemblyState {
                topology: PrimitiveTopology::TriangleList,
                primitive_restart_enable: false,
            },
            rasterization: RasterizationState {
                depth_clamp_enable: false,
                rasterizer_discard_enable: false,
                polygon_mode: PolygonMode::Fill,
                line_width: 1.0,
                cull_mode: CullMode::None,
                front_face: FrontFace::Clockwise,
                depth_bias: DepthBias::default(),
            },
            multisample: None,
            color_blend_attachment: None,
            color_blend: None,
            depth_stencil: None,
            pipeline_layout: None,
            render_pass: None,
            subpass: 0,
        })
    }

    /// Framebuffer extent covered by the scissor
    pub fn extent(&self) -> Extent2D {
        self.scissor.extent
    }

    /// Resize viewport and scissor together, resetting both to the origin
    ///
    /// The viewport depth range is kept.
    pub fn set_extent(&mut self, width: u32, height: u32) -> Result<()> {
        let extent = checked_extent(width, height)?;
        let (min_depth, max_depth) = (self.viewport.min_depth, self.viewport.max_depth);

        self.viewport = Viewport {
            min_depth,
            max_depth,
            ..Viewport::from_extent(extent)
        };
        self.scissor = Rect2D::from_extent(extent);
        Ok(())
    }

    /// Replace the scissor only, deliberately diverging from the viewport
    pub fn set_scissor(&mut self, scissor: Rect2D) {
        self.scissor = scissor;
    }

    /// True while the scissor covers exactly the viewport rectangle
    pub fn scissor_matches_viewport(&self) -> bool {
        self.scissor.offset.x as f32 == self.viewport.x
            && self.scissor.offset.y as f32 == self.viewport.y
            && self.scissor.extent.width as f32 == self.viewport.width
            && self.scissor.extent.height as f32 == self.viewport.height
    }

    pub fn with_pipeline_layout(mut self, layout: PipelineLayoutHandle) -> Self {
        self.pipeline_layout = Some(layout);
        self
    }

    pub fn with_render_pass(mut self, render_pass: RenderPassHandle) -> Self {
        self.render_pass = Some(render_pass);
        self
    }

    pub fn with_subpass(mut self, subpass: u32) -> Self {
        self.subpass = subpass;
        self
    }

    pub fn with_multisample(mut self, state: MultisampleState) -> Self {
        self.multisample = Some(state);
        self
    }

    pub fn with_color_blend_attachment(mut self, state: ColorBlendAttachmentState) -> Self {
        self.color_blend_attachment = Some(state);
        self
    }

    pub fn with_color_blend(mut self, state: ColorBlendState) -> Self {
        self.color_blend = Some(state);
        self
    }

    pub fn with_depth_stencil(mut self, state: DepthStencilState) -> Self {
        self.depth_stencil = Some(state);
        self
    }

    /// Names of the required fields that are still unset, in declaration order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pipeline_layout.is_none() {
            missing.push("pipeline_layout");
        }
        if self.render_pass.is_none() {
            missing.push("render_pass");
        }
        if self.multisample.is_none() {
            missing.push("multisample");
        }
        if self.color_blend_attachment.is_none() {
            missing.push("color_blend_attachment");
        }
        if self.color_blend.is_none() {
            missing.push("color_blend");
        }
        if self.depth_stencil.is_none() {
            missing.push("depth_stencil");
        }
        missing
    }

    pub fn is_ready(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Complete the draft
    ///
    /// # Errors
    ///
    /// `Error::PipelineCreation` naming every required field still unset.
    pub fn ready(&self) -> Result<ReadyPipelineConfig> {
        let (
            Some(pipeline_layout),
            Some(render_pass),
            Some(multisample),
            Some(color_blend_attachment),
            Some(color_blend),
            Some(depth_stencil),
        ) = (
            self.pipeline_layout,
            self.render_pass,
            self.multisample,
            self.color_blend_attachment,
            self.color_blend,
            self.depth_stencil,
        ) else {
            return Err(engine_err_of!(
                Error::PipelineCreation,
                "lve::PipelineConfig",
                "Pipeline config is missing required fields: {}",
                self.missing_fields().join(", ")
            ));
        };

        Ok(ReadyPipelineConfig {
            viewport: self.viewport,
            scissor: self.scissor,
            input_assembly: self.input_assembly,
            rasterization: self.rasterization,
            multisample,
            color_blend_attachment,
            color_blend,
            depth_stencil,
            pipeline_layout,
            render_pass,
            subpass: self.subpass,
        })
    }
}

fn checked_extent(width: u32, height: u32) -> Result<Extent2D> {
    if width == 0 || height == 0 {
        engine_error!("lve::PipelineConfig", "Invalid framebuffer dimension {}x{}", width, height);
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(Extent2D::new(width, height))
}

/// Fully specified pipeline configuration
///
/// Only obtainable from [`PipelineConfigInfo::ready`], so every state block,
/// the layout and the render pass are guaranteed to be present.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyPipelineConfig {
    viewport: Viewport,
    scissor: Rect2D,
    input_assembly: InputAssemblyState,
    rasterization: RasterizationState,
    multisample: MultisampleState,
    color_blend_attachment: ColorBlendAttachmentState,
    color_blend: ColorBlendState,
    depth_stencil: DepthStencilState,
    pipeline_layout: PipelineLayoutHandle,
    render_pass: RenderPassHandle,
    subpass: u32,
}

impl ReadyPipelineConfig {
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scissor(&self) -> &Rect2D {
        &self.scissor
    }

    pub fn input_assembly(&self) -> &InputAssemblyState {
        &self.input_assembly
    }

    pub fn rasterization(&self) -> &RasterizationState {
        &self.rasterization
    }

    pub fn multisample(&self) -> &MultisampleState {
        &self.multisample
    }

    pub fn color_blend_attachment(&self) -> &ColorBlendAttachmentState {
        &self.color_blend_attachment
    }

    pub fn color_blend(&self) -> &ColorBlendState {
        &self.color_blend
    }

    pub fn depth_stencil(&self) -> &DepthStencilState {
        &self.depth_stencil
    }

    pub fn pipeline_layout(&self) -> PipelineLayoutHandle {
        self.pipeline_layout
    }

    pub fn render_pass(&self) -> RenderPassHandle {
        self.render_pass
    }

    pub fn subpass(&self) -> u32 {
        self.subpass
    }
}

impl TryFrom<&PipelineConfigInfo> for ReadyPipelineConfig {
    type Error = Error;

    fn try_from(config: &PipelineConfigInfo) -> Result<Self> {
        config.ready()
    }
}

#[cfg(test)]
#[path = "pipeline_config_tests.rs"]
mod tests;
