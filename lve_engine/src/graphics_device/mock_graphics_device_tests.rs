/// Unit tests for MockGraphicsDevice and associated mock types.

use crate::graphics_device::mock_graphics_device::*;
use crate::graphics_device::{GraphicsDevice, PipelineDesc, Shader, ShaderDesc, ShaderStage};
use crate::pipeline::tests_support::ready_config;
use crate::error::Error;

fn shader_desc(stage: ShaderStage, code: &[u8]) -> ShaderDesc<'_> {
    ShaderDesc {
        code,
        stage,
        entry_point: "main".to_string(),
    }
}

// ============================================================================
// MockShader Tests
// ============================================================================

#[test]
fn test_mock_shader_records_desc() {
    let mut device = MockGraphicsDevice::new();
    let code = [0u8; 16];
    let shader = device.create_shader(shader_desc(ShaderStage::Vertex, &code)).unwrap();

    assert_eq!(shader.stage(), ShaderStage::Vertex);
    assert_eq!(device.shader_calls, vec![ShaderStage::Vertex]);
    assert_eq!(device.live_shader_count(), 1);
}

#[test]
fn test_mock_shader_drop_releases() {
    let mut device = MockGraphicsDevice::new();
    let code = [0u8; 4];
    let shader = device.create_shader(shader_desc(ShaderStage::Fragment, &code)).unwrap();
    assert_eq!(device.live_shader_count(), 1);

    drop(shader);
    assert_eq!(device.live_shader_count(), 0);
}

#[test]
fn test_mock_shader_rejection() {
    let mut device = MockGraphicsDevice::new();
    device.reject_shader_stage = Some(ShaderStage::Fragment);
    let code = [0u8; 4];

    assert!(device.create_shader(shader_desc(ShaderStage::Vertex, &code)).is_ok());
    let result = device.create_shader(shader_desc(ShaderStage::Fragment, &code));
    assert!(matches!(result, Err(Error::ShaderModuleCreation(_))));
    assert_eq!(device.shader_calls.len(), 2);
}

// ============================================================================
// MockPipeline Tests
// ============================================================================

#[test]
fn test_mock_pipeline_creation() {
    let mut device = MockGraphicsDevice::new();
    let code = [0u8; 4];
    let vert = device.create_shader(shader_desc(ShaderStage::Vertex, &code)).unwrap();
    let frag = device.create_shader(shader_desc(ShaderStage::Fragment, &code)).unwrap();
    let config = ready_config(800, 600);

    let pipeline = device.create_pipeline(PipelineDesc {
        vertex_shader: vert.as_ref(),
        fragment_shader: frag.as_ref(),
        config: &config,
    });

    assert!(pipeline.is_ok());
    assert_eq!(device.pipeline_calls, 1);
    assert_eq!(device.live_pipeline_count(), 1);
    assert_eq!(device.last_config.as_ref(), Some(&config));
}

#[test]
fn test_mock_pipeline_rejection() {
    let mut device = MockGraphicsDevice::new();
    device.reject_pipeline = true;
    let code = [0u8; 4];
    let vert = device.create_shader(shader_desc(ShaderStage::Vertex, &code)).unwrap();
    let frag = device.create_shader(shader_desc(ShaderStage::Fragment, &code)).unwrap();
    let config = ready_config(32, 32);

    let result = device.create_pipeline(PipelineDesc {
        vertex_shader: vert.as_ref(),
        fragment_shader: frag.as_ref(),
        config: &config,
    });

    assert!(matches!(result, Err(Error::PipelineCreation(_))));
    assert_eq!(device.live_pipeline_count(), 0);
}

#[test]
fn test_mock_device_untouched_and_wait_idle() {
    let device = MockGraphicsDevice::new();
    assert!(device.untouched());
    assert!(device.wait_idle().is_ok());
}

#[test]
fn test_mock_pipeline_rejects_shader_from_other_device() {
    let mut device = MockGraphicsDevice::new();
    let mut other = MockGraphicsDevice::new();
    let code = [0u8; 4];
    let vert = other.create_shader(shader_desc(ShaderStage::Vertex, &code)).unwrap();
    let frag = device.create_shader(shader_desc(ShaderStage::Fragment, &code)).unwrap();
    let config = ready_config(64, 64);

    let result = device.create_pipeline(PipelineDesc {
        vertex_shader: vert.as_ref(),
        fragment_shader: frag.as_ref(),
        config: &config,
    });

    assert!(matches!(result, Err(Error::PipelineCreation(_))));
    assert_eq!(device.live_pipeline_count(), 0);
}

// ============================================================================
// Device Core Lifetime Tests
// ============================================================================

#[test]
fn test_mock_device_core_released_with_device_when_nothing_alive() {
    let device = MockGraphicsDevice::new();
    let teardown = device.teardown();

    drop(device);

    assert_eq!(
        *teardown.lock().unwrap(),
        Some(MockTeardown { live_shaders: 0, live_pipelines: 0 })
    );
}

#[test]
fn test_mock_device_core_outlives_device_while_shader_alive() {
    let mut device = MockGraphicsDevice::new();
    let teardown = device.teardown();
    let code = [0u8; 4];
    let shader = device.create_shader(shader_desc(ShaderStage::Vertex, &code)).unwrap();

    drop(device);
    assert!(teardown.lock().unwrap().is_none());

    drop(shader);
    assert_eq!(
        *teardown.lock().unwrap(),
        Some(MockTeardown { live_shaders: 0, live_pipelines: 0 })
    );
}
