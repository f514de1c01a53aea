//! Shader bytecode loading
//!
//! Reads pre-compiled shader bytecode (SPIR-V) from disk into an owned buffer
//! sized exactly to the file. The contents are opaque at this level; the
//! graphics device validates them when creating a shader module.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::{engine_debug, engine_error};

/// Owned, immutable shader bytecode loaded from a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBytecode {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl ShaderBytecode {
    /// Load the whole file at `path`
    ///
    /// # Errors
    ///
    /// `Error::FileOpen` when the path is missing, unreadable, not a regular
    /// file, or the file ends before its reported size has been read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut file = File::open(path)
            .map_err(|e| file_open_error(path, e.to_string()))?;

        let metadata = file.metadata()
            .map_err(|e| file_open_error(path, e.to_string()))?;

        if !metadata.is_file() {
            return Err(file_open_error(path, "not a regular file".to_string()));
        }

        let size = usize::try_from(metadata.len())
            .map_err(|_| file_open_error(path, format!("file too large ({} bytes)", metadata.len())))?;

        let bytes = read_sized(path, &mut file, size)?;

        engine_debug!("lve::ShaderLoader", "Loaded '{}' ({} bytes)", path.display(), bytes.len());

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// Wrap bytecode that is already in memory (embedded or generated)
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Path the bytecode was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume into the raw buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Load shader bytecode from `path`
///
/// Shorthand for [`ShaderBytecode::load`].
pub fn load_shader_bytecode(path: impl AsRef<Path>) -> Result<ShaderBytecode> {
    ShaderBytecode::load(path)
}

/// Read exactly `size` bytes; a reader that ends early is a `FileOpen` error
fn read_sized(path: &Path, reader: &mut impl Read, size: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; size];
    reader.read_exact(&mut bytes)
        .map_err(|e| file_open_error(path, format!("short read of {} bytes: {}", size, e)))?;
    Ok(bytes)
}

fn file_open_error(path: &Path, reason: String) -> Error {
    engine_error!("lve::ShaderLoader", "Failed to open shader file '{}': {}", path.display(), reason);
    Error::FileOpen {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
#[path = "shader_loader_tests.rs"]
mod tests;
