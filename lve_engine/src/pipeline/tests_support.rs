/// Shared helpers for unit tests that need configs or shader files on disk

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::graphics_device::{
    PipelineLayoutHandle, RenderPassHandle, MultisampleState,
    ColorBlendAttachmentState, ColorBlendState, DepthStencilState,
};
use crate::pipeline::{PipelineConfigInfo, ReadyPipelineConfig};

/// Default config with every required field filled in
pub fn complete_config(width: u32, height: u32) -> PipelineConfigInfo {
    PipelineConfigInfo::default_config(width, height)
        .unwrap()
        .with_pipeline_layout(PipelineLayoutHandle::from_raw(0x10).unwrap())
        .with_render_pass(RenderPassHandle::from_raw(0x20).unwrap())
        .with_multisample(MultisampleState::default())
        .with_color_blend_attachment(ColorBlendAttachmentState::default())
        .with_color_blend(ColorBlendState::default())
        .with_depth_stencil(DepthStencilState::default())
}

pub fn ready_config(width: u32, height: u32) -> ReadyPipelineConfig {
    complete_config(width, height).ready().unwrap()
}

static NEXT_FILE_ID: AtomicUsize = AtomicUsize::new(0);

/// Temporary file removed on drop
pub struct TempShaderFile {
    path: PathBuf,
}

impl TempShaderFile {
    pub fn with_contents(name: &str, contents: &[u8]) -> Self {
        let id = NEXT_FILE_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "lve_unit_{}_{}_{}",
            std::process::id(),
            id,
            name
        ));
        std::fs::write(&path, contents).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempShaderFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Bytes 0..len wrapping at 256
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}
