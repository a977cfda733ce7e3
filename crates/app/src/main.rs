//! Render-to-texture demo: stripes drawn once into an offscreen texture,
//! shown every frame on a card. Press `m` to toggle mipmapping.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "rtt-card", about = "Render-to-texture card demo")]
struct Cli {
    /// GPU backend: auto|vulkan|dx12|metal|gl
    #[arg(long, default_value = "auto")]
    gpu_backend: String,

    /// Initial window size, WIDTHxHEIGHT
    #[arg(long, default_value = "800x600", value_parser = parse_size)]
    size: (u32, u32),

    /// Card shader (WGSL); defaults to the bundled assets/shaders/rtt.wgsl
    #[arg(long)]
    shader: Option<PathBuf>,

    /// Rotate the card around Z at 15 degrees per second
    #[arg(long)]
    spin: bool,
}

fn parse_backend(val: &str) -> wgpu::Backends {
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn parse_size(v: &str) -> Result<(u32, u32)> {
    let (sw, sh) = v
        .split_once('x')
        .or_else(|| v.split_once('X'))
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got '{v}'"))?;
    let w = sw.trim().parse::<u32>()?;
    let h = sh.trim().parse::<u32>()?;
    Ok((w.max(1), h.max(1)))
}

fn config_from(cli: Cli) -> platform::DemoConfig {
    let defaults = platform::DemoConfig::default();
    platform::DemoConfig {
        backends: parse_backend(&cli.gpu_backend),
        width: cli.size.0,
        height: cli.size.1,
        shader_path: cli.shader.unwrap_or(defaults.shader_path),
        spin: cli.spin,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config_from(Cli::parse());
    log::info!(
        "Starting rtt-card. Backend: {:?}, window_size={}x{}, shader={:?}, spin={}",
        config.backends,
        config.width,
        config.height,
        config.shader_path,
        config.spin
    );

    if let Err(err) = platform::run(config) {
        log::error!("Fatal: {err:#}");
        std::process::exit(1);
    }

    log::info!("Graceful shutdown. Bye!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parses_both_separators() {
        assert_eq!(parse_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_size("640X480").unwrap(), (640, 480));
    }

    #[test]
    fn size_zero_is_clamped() {
        assert_eq!(parse_size("0x0").unwrap(), (1, 1));
    }

    #[test]
    fn size_rejects_garbage() {
        assert!(parse_size("wide").is_err());
        assert!(parse_size("12xfoo").is_err());
    }

    #[test]
    fn backend_aliases() {
        assert_eq!(parse_backend("VK"), wgpu::Backends::VULKAN);
        assert_eq!(parse_backend("d3d12"), wgpu::Backends::DX12);
        assert_eq!(parse_backend("gles"), wgpu::Backends::GL);
        assert_eq!(parse_backend("bogus"), wgpu::Backends::all());
    }

    #[test]
    fn cli_defaults_build_config() {
        let cli = Cli::try_parse_from(["rtt-card"]).unwrap();
        let cfg = config_from(cli);
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.backends, wgpu::Backends::all());
        assert!(!cfg.spin);
    }

    #[test]
    fn cli_flags_override() {
        let cli = Cli::try_parse_from([
            "rtt-card",
            "--gpu-backend",
            "metal",
            "--size",
            "320x200",
            "--shader",
            "custom.wgsl",
            "--spin",
        ])
        .unwrap();
        let cfg = config_from(cli);
        assert_eq!(cfg.backends, wgpu::Backends::METAL);
        assert_eq!((cfg.width, cfg.height), (320, 200));
        assert_eq!(cfg.shader_path, PathBuf::from("custom.wgsl"));
        assert!(cfg.spin);
    }
}
