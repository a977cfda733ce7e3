//! WGSL shader sources read from disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

/// Card shader location relative to the workspace root.
pub const CARD_SHADER_REL: &str = "assets/shaders/rtt.wgsl";

/// Shader text plus the path it came from (used for labels and logs).
#[derive(Clone, Debug)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub wgsl: String,
}

impl ShaderSource {
    /// File stem, e.g. `rtt` for `assets/shaders/rtt.wgsl`.
    pub fn label(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "shader".to_owned())
    }
}

/// Default card shader path: `$CARGO_MANIFEST_DIR/../../assets/shaders/rtt.wgsl`.
pub fn default_card_shader_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(CARD_SHADER_REL)
}

/// Load a WGSL shader. Fails on unreadable or blank files; WGSL validity is
/// checked later by the device.
pub fn load_wgsl(path: impl AsRef<Path>) -> Result<ShaderSource> {
    let path = path.as_ref();
    log::info!("Loading shader from {:?}", path);

    let wgsl = fs::read_to_string(path)
        .with_context(|| format!("Failed to read shader: {}", path.display()))?;
    if wgsl.trim().is_empty() {
        bail!("Shader file is empty: {}", path.display());
    }

    Ok(ShaderSource {
        path: path.to_path_buf(),
        wgsl,
    })
}
