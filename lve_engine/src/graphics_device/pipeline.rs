/// Pipeline trait, fixed-function state types and pipeline descriptor

use std::num::NonZeroU64;
use bitflags::bitflags;
use crate::graphics_device::Shader;
use crate::pipeline::ReadyPipelineConfig;

// ===== OPAQUE HANDLES =====

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Wrap a raw backend handle value. Returns `None` for the null handle.
            pub fn from_raw(raw: u64) -> Option<Self> {
                NonZeroU64::new(raw).map(Self)
            }

            /// Raw backend handle value (never zero)
            pub fn as_raw(&self) -> u64 {
                self.0.get()
            }
        }
    };
}

opaque_handle!(
    /// Externally owned pipeline layout (e.g., a `VkPipelineLayout` as u64)
    PipelineLayoutHandle
);

opaque_handle!(
    /// Externally owned render pass (e.g., a `VkRenderPass` as u64)
    RenderPassHandle
);

// ===== INPUT ASSEMBLY =====

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

/// Input assembly state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputAssemblyState {
    pub topology: PrimitiveTopology,
    /// Allow a special index value to restart strip/fan topologies
    pub primitive_restart_enable: bool,
}

// ===== VIEWPORT / SCISSOR =====

/// Viewport transform rectangle with depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Viewport covering `extent` from the origin with depth range [0, 1]
    pub fn from_extent(extent: Extent2D) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 2D integer offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset2D {
    pub x: i32,
    pub y: i32,
}

/// 2D extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rectangle (offset + extent), used for the scissor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2D {
    pub offset: Offset2D,
    pub extent: Extent2D,
}

impl Rect2D {
    /// Rectangle covering `extent` from the origin
    pub fn from_extent(extent: Extent2D) -> Self {
        Self {
            offset: Offset2D::default(),
            extent,
        }
    }
}

// ===== RASTERIZATION =====

/// Polygon rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    /// Fill polygons
    Fill,
    /// Draw edges only (wireframe)
    Line,
    /// Draw vertices only
    Point,
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
    FrontAndBack,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Depth bias parameters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DepthBias {
    pub enable: bool,
    /// Constant depth offset
    pub constant_factor: f32,
    /// Maximum (or minimum) depth bias
    pub clamp: f32,
    /// Slope-based depth offset
    pub slope_factor: f32,
}

/// Rasterization fixed-function state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizationState {
    pub depth_clamp_enable: bool,
    pub rasterizer_discard_enable: bool,
    pub polygon_mode: PolygonMode,
    pub line_width: f32,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub depth_bias: DepthBias,
}

// ===== MULTISAMPLE =====

/// Multisample count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleCount {
    S1,
    S2,
    S4,
    S8,
    S16,
    S32,
    S64,
}

impl SampleCount {
    /// Number of samples per pixel
    pub fn count(&self) -> u32 {
        match self {
            SampleCount::S1 => 1,
            SampleCount::S2 => 2,
            SampleCount::S4 => 4,
            SampleCount::S8 => 8,
            SampleCount::S16 => 16,
            SampleCount::S32 => 32,
            SampleCount::S64 => 64,
        }
    }
}

/// Multisampling state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultisampleState {
    pub sample_count: SampleCount,
    pub sample_shading_enable: bool,
    /// Minimum fraction of samples shaded when sample shading is enabled
    pub min_sample_shading: f32,
    pub alpha_to_coverage_enable: bool,
    pub alpha_to_one_enable: bool,
}

impl Default for MultisampleState {
    fn default() -> Self {
        Self {
            sample_count: SampleCount::S1,
            sample_shading_enable: false,
            min_sample_shading: 1.0,
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
        }
    }
}

// ===== COLOR BLEND =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    SrcAlphaSaturate,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// result = src * srcFactor + dst * dstFactor
    Add,
    /// result = src * srcFactor - dst * dstFactor
    Subtract,
    /// result = dst * dstFactor - src * srcFactor
    ReverseSubtract,
    /// result = min(src, dst)
    Min,
    /// result = max(src, dst)
    Max,
}

/// Framebuffer logic operation (applied instead of blending when enabled)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    Clear,
    And,
    AndReverse,
    Copy,
    AndInverted,
    NoOp,
    Xor,
    Or,
    Nor,
    Equivalent,
    Invert,
    OrReverse,
    CopyInverted,
    OrInverted,
    Nand,
    Set,
}

bitflags! {
    /// Color channels written to the attachment
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorComponents: u32 {
        const R = 0b0001;
        const G = 0b0010;
        const B = 0b0100;
        const A = 0b1000;
        const RGBA = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

/// Per-attachment color blending state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBlendAttachmentState {
    pub blend_enable: bool,
    pub src_color_factor: BlendFactor,
    pub dst_color_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
    pub color_write_mask: ColorComponents,
}

impl ColorBlendAttachmentState {
    /// Classic "over" alpha blending
    pub fn alpha_blending() -> Self {
        Self {
            blend_enable: true,
            src_color_factor: BlendFactor::SrcAlpha,
            dst_color_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
            color_write_mask: ColorComponents::RGBA,
        }
    }
}

impl Default for ColorBlendAttachmentState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
            color_write_mask: ColorComponents::RGBA,
        }
    }
}

/// Global color blending state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBlendState {
    pub logic_op_enable: bool,
    pub logic_op: LogicOp,
    pub blend_constants: [f32; 4],
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            logic_op_enable: false,
            logic_op: LogicOp::Copy,
            blend_constants: [0.0; 4],
        }
    }
}

// ===== DEPTH/STENCIL =====

/// Comparison operator for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Stencil operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementAndClamp,
    DecrementAndClamp,
    Invert,
    IncrementAndWrap,
    DecrementAndWrap,
}

/// Stencil operation state (per-face)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilOpState {
    pub fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub compare_op: CompareOp,
    pub compare_mask: u32,
    pub write_mask: u32,
    pub reference: u32,
}

impl Default for StencilOpState {
    fn default() -> Self {
        Self {
            fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
            compare_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        }
    }
}

/// Depth and stencil testing state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilState {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: CompareOp,
    pub depth_bounds_test_enable: bool,
    pub min_depth_bounds: f32,
    pub max_depth_bounds: f32,
    pub stencil_test_enable: bool,
    pub front: StencilOpState,
    pub back: StencilOpState,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: CompareOp::Less,
            depth_bounds_test_enable: false,
            min_depth_bounds: 0.0,
            max_depth_bounds: 1.0,
            stencil_test_enable: false,
            front: StencilOpState::default(),
            back: StencilOpState::default(),
        }
    }
}

// ===== PIPELINE DESCRIPTOR =====

/// Descriptor for creating a graphics pipeline
///
/// The config is a [`ReadyPipelineConfig`], so every required field is
/// guaranteed to be set before a backend sees it.
#[derive(Clone, Copy)]
pub struct PipelineDesc<'a> {
    pub vertex_shader: &'a dyn Shader,
    pub fragment_shader: &'a dyn Shader,
    pub config: &'a ReadyPipelineConfig,
}

/// Pipeline resource trait
///
/// Implemented by backend-specific pipeline types.
/// The pipeline is destroyed when dropped, and like [`Shader`] it keeps the
/// native device state alive until then.
pub trait Pipeline: Send + Sync {
    // No public methods for now, pipelines are bound by command recording
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
