//! Process-wide defaults for font lookup and rasterization.
//!
//! Values come from compile-time constants and may be overridden once per
//! process through `ATLAS_TEXT_FONT_DIR`, `ATLAS_TEXT_FONT_FILE` and
//! `ATLAS_TEXT_RESOLUTION`.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Fixed width of every atlas pixel buffer.
pub const ATLAS_WIDTH: u32 = 1024;

/// Rasterizer resolution in points when none is requested.
pub const DEFAULT_RESOLUTION: u32 = 64;

pub const DEFAULT_FONT_FILE: &str = "DejaVuSans.ttf";

#[cfg(target_os = "windows")]
const PLATFORM_FONT_DIRECTORY: &str = "C:\\Windows\\Fonts";
#[cfg(target_os = "macos")]
const PLATFORM_FONT_DIRECTORY: &str = "/Library/Fonts";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const PLATFORM_FONT_DIRECTORY: &str = "/usr/share/fonts/truetype/dejavu";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDefaults {
    pub font_directory: PathBuf,
    pub font_file: String,
    pub resolution: u32,
}

static DEFAULTS: OnceLock<FontDefaults> = OnceLock::new();

/// Returns the defaults, reading the environment on first use.
pub fn defaults() -> &'static FontDefaults {
    DEFAULTS.get_or_init(|| FontDefaults {
        font_directory: parse_font_dir_from_env()
            .unwrap_or_else(|| PathBuf::from(PLATFORM_FONT_DIRECTORY)),
        font_file: parse_font_file_from_env().unwrap_or_else(|| DEFAULT_FONT_FILE.to_string()),
        resolution: parse_resolution_from_env().unwrap_or(DEFAULT_RESOLUTION),
    })
}

fn env_value(name: &str) -> Option<String> {
    let v = std::env::var(name).ok()?;
    let v = v.trim();
    if v.is_empty() {
        return None;
    }
    Some(v.to_string())
}

fn parse_font_dir_from_env() -> Option<PathBuf> {
    env_value("ATLAS_TEXT_FONT_DIR").map(PathBuf::from)
}

fn parse_font_file_from_env() -> Option<String> {
    env_value("ATLAS_TEXT_FONT_FILE")
}

fn parse_resolution_from_env() -> Option<u32> {
    let v = env_value("ATLAS_TEXT_RESOLUTION")?;
    parse_resolution(&v)
}

pub(crate) fn parse_resolution(v: &str) -> Option<u32> {
    match v.parse::<u32>() {
        Ok(0) | Err(_) => {
            log::warn!("ignoring invalid font resolution {:?}", v);
            None
        }
        Ok(r) => Some(r),
    }
}
