//! Unit tests for vulkan_format.rs
//!
//! Pure conversion functions, no GPU required.

use super::*;
use lve_engine::lve::render::{Extent2D, Offset2D};

fn all_channels() -> vk::ColorComponentFlags {
    vk::ColorComponentFlags::R
        | vk::ColorComponentFlags::G
        | vk::ColorComponentFlags::B
        | vk::ColorComponentFlags::A
}

// ============================================================================
// INPUT ASSEMBLY / SHADER STAGE
// ============================================================================

#[test]
fn test_topology_to_vk() {
    assert_eq!(topology_to_vk(PrimitiveTopology::PointList), vk::PrimitiveTopology::POINT_LIST);
    assert_eq!(topology_to_vk(PrimitiveTopology::LineList), vk::PrimitiveTopology::LINE_LIST);
    assert_eq!(topology_to_vk(PrimitiveTopology::LineStrip), vk::PrimitiveTopology::LINE_STRIP);
    assert_eq!(topology_to_vk(PrimitiveTopology::TriangleList), vk::PrimitiveTopology::TRIANGLE_LIST);
    assert_eq!(topology_to_vk(PrimitiveTopology::TriangleStrip), vk::PrimitiveTopology::TRIANGLE_STRIP);
    assert_eq!(topology_to_vk(PrimitiveTopology::TriangleFan), vk::PrimitiveTopology::TRIANGLE_FAN);
}

#[test]
fn test_shader_stage_to_vk() {
    assert_eq!(shader_stage_to_vk(ShaderStage::Vertex), vk::ShaderStageFlags::VERTEX);
    assert_eq!(shader_stage_to_vk(ShaderStage::Fragment), vk::ShaderStageFlags::FRAGMENT);
}

// ============================================================================
// RASTERIZATION
// ============================================================================

#[test]
fn test_rasterization_enums_to_vk() {
    assert_eq!(polygon_mode_to_vk(PolygonMode::Fill), vk::PolygonMode::FILL);
    assert_eq!(polygon_mode_to_vk(PolygonMode::Line), vk::PolygonMode::LINE);
    assert_eq!(polygon_mode_to_vk(PolygonMode::Point), vk::PolygonMode::POINT);

    assert_eq!(cull_mode_to_vk(CullMode::None), vk::CullModeFlags::NONE);
    assert_eq!(cull_mode_to_vk(CullMode::Front), vk::CullModeFlags::FRONT);
    assert_eq!(cull_mode_to_vk(CullMode::Back), vk::CullModeFlags::BACK);
    assert_eq!(cull_mode_to_vk(CullMode::FrontAndBack), vk::CullModeFlags::FRONT_AND_BACK);

    assert_eq!(front_face_to_vk(FrontFace::Clockwise), vk::FrontFace::CLOCKWISE);
    assert_eq!(front_face_to_vk(FrontFace::CounterClockwise), vk::FrontFace::COUNTER_CLOCKWISE);
}

// ============================================================================
// DEPTH / STENCIL
// ============================================================================

#[test]
fn test_compare_op_to_vk() {
    assert_eq!(compare_op_to_vk(CompareOp::Never), vk::CompareOp::NEVER);
    assert_eq!(compare_op_to_vk(CompareOp::Less), vk::CompareOp::LESS);
    assert_eq!(compare_op_to_vk(CompareOp::LessOrEqual), vk::CompareOp::LESS_OR_EQUAL);
    assert_eq!(compare_op_to_vk(CompareOp::GreaterOrEqual), vk::CompareOp::GREATER_OR_EQUAL);
    assert_eq!(compare_op_to_vk(CompareOp::Always), vk::CompareOp::ALWAYS);
}

#[test]
fn test_stencil_op_state_to_vk() {
    let state = StencilOpState {
        fail_op: StencilOp::Zero,
        pass_op: StencilOp::Replace,
        depth_fail_op: StencilOp::IncrementAndWrap,
        compare_op: CompareOp::Equal,
        compare_mask: 0x0F,
        write_mask: 0xF0,
        reference: 7,
    };

    let vk_state = stencil_op_state_to_vk(&state);

    assert_eq!(vk_state.fail_op, vk::StencilOp::ZERO);
    assert_eq!(vk_state.pass_op, vk::StencilOp::REPLACE);
    assert_eq!(vk_state.depth_fail_op, vk::StencilOp::INCREMENT_AND_WRAP);
    assert_eq!(vk_state.compare_op, vk::CompareOp::EQUAL);
    assert_eq!(vk_state.compare_mask, 0x0F);
    assert_eq!(vk_state.write_mask, 0xF0);
    assert_eq!(vk_state.reference, 7);
}

// ============================================================================
// COLOR BLEND
// ============================================================================

#[test]
fn test_blend_factor_and_op_to_vk() {
    assert_eq!(blend_factor_to_vk(BlendFactor::Zero), vk::BlendFactor::ZERO);
    assert_eq!(blend_factor_to_vk(BlendFactor::SrcAlpha), vk::BlendFactor::SRC_ALPHA);
    assert_eq!(blend_factor_to_vk(BlendFactor::OneMinusSrcAlpha), vk::BlendFactor::ONE_MINUS_SRC_ALPHA);
    assert_eq!(blend_factor_to_vk(BlendFactor::SrcAlphaSaturate), vk::BlendFactor::SRC_ALPHA_SATURATE);

    assert_eq!(blend_op_to_vk(BlendOp::Add), vk::BlendOp::ADD);
    assert_eq!(blend_op_to_vk(BlendOp::ReverseSubtract), vk::BlendOp::REVERSE_SUBTRACT);
    assert_eq!(blend_op_to_vk(BlendOp::Max), vk::BlendOp::MAX);
}

#[test]
fn test_logic_op_to_vk() {
    assert_eq!(logic_op_to_vk(LogicOp::Clear), vk::LogicOp::CLEAR);
    assert_eq!(logic_op_to_vk(LogicOp::Copy), vk::LogicOp::COPY);
    assert_eq!(logic_op_to_vk(LogicOp::NoOp), vk::LogicOp::NO_OP);
    assert_eq!(logic_op_to_vk(LogicOp::Equivalent), vk::LogicOp::EQUIVALENT);
    assert_eq!(logic_op_to_vk(LogicOp::Set), vk::LogicOp::SET);
}

#[test]
fn test_color_components_to_vk() {
    assert_eq!(color_components_to_vk(ColorComponents::RGBA), all_channels());
    assert_eq!(color_components_to_vk(ColorComponents::empty()), vk::ColorComponentFlags::empty());
    assert_eq!(
        color_components_to_vk(ColorComponents::R | ColorComponents::A),
        vk::ColorComponentFlags::R | vk::ColorComponentFlags::A
    );
}

#[test]
fn test_disabled_blend_attachment_keeps_factors() {
    let vk_state = color_blend_attachment_to_vk(&ColorBlendAttachmentState::default());

    assert_eq!(vk_state.blend_enable, vk::FALSE);
    assert_eq!(vk_state.src_color_blend_factor, vk::BlendFactor::ONE);
    assert_eq!(vk_state.dst_color_blend_factor, vk::BlendFactor::ZERO);
    assert_eq!(vk_state.color_write_mask, all_channels());
}

#[test]
fn test_alpha_blend_attachment_to_vk() {
    let vk_state = color_blend_attachment_to_vk(&ColorBlendAttachmentState::alpha_blending());

    assert_eq!(vk_state.blend_enable, vk::TRUE);
    assert_eq!(vk_state.src_color_blend_factor, vk::BlendFactor::SRC_ALPHA);
    assert_eq!(vk_state.dst_color_blend_factor, vk::BlendFactor::ONE_MINUS_SRC_ALPHA);
    assert_eq!(vk_state.alpha_blend_op, vk::BlendOp::ADD);
}

// ============================================================================
// MULTISAMPLE
// ============================================================================

#[test]
fn test_sample_count_to_vk_matches_count() {
    for count in [
        SampleCount::S1, SampleCount::S2, SampleCount::S4, SampleCount::S8,
        SampleCount::S16, SampleCount::S32, SampleCount::S64,
    ] {
        assert_eq!(sample_count_to_vk(count).as_raw(), count.count());
    }
}

// ============================================================================
// VIEWPORT / SCISSOR
// ============================================================================

#[test]
fn test_viewport_to_vk() {
    let viewport = Viewport::from_extent(Extent2D::new(800, 600));

    let vk_viewport = viewport_to_vk(&viewport);

    assert_eq!(vk_viewport.x, 0.0);
    assert_eq!(vk_viewport.y, 0.0);
    assert_eq!(vk_viewport.width, 800.0);
    assert_eq!(vk_viewport.height, 600.0);
    assert_eq!(vk_viewport.min_depth, 0.0);
    assert_eq!(vk_viewport.max_depth, 1.0);
}

#[test]
fn test_rect_to_vk() {
    let rect = Rect2D {
        offset: Offset2D { x: -4, y: 12 },
        extent: Extent2D::new(320, 200),
    };

    let vk_rect = rect_to_vk(&rect);

    assert_eq!(vk_rect.offset.x, -4);
    assert_eq!(vk_rect.offset.y, 12);
    assert_eq!(vk_rect.extent.width, 320);
    assert_eq!(vk_rect.extent.height, 200);
}
