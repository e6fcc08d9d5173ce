//! Configuration file loading.
//!
//! Every key is optional; an absent file yields the built-in asset set for
//! the INTELLLX site.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default source logo, relative to the working directory.
pub const DEFAULT_SOURCE: &str = "public/images/logo/officialintelllxlogo.png";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "public/images/logo";

/// Default directory for the monogram favicon set.
pub const DEFAULT_MONOGRAM_DIR: &str = "public";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source image path.
    pub source: PathBuf,
    /// Directory that receives every generated file.
    pub output_dir: PathBuf,
    /// Backend preference: `auto`, `tools`, or a backend name.
    pub backend: String,
    /// Placeholder placement: `copy` or `symlink`.
    pub fallback: String,
    /// Full-size inverted logo; `None` disables it.
    pub white_logo: Option<String>,
    /// Exact-size resized copies.
    pub resize: Vec<ResizeTarget>,
    /// Square icons fitted inside their box on a transparent canvas.
    pub contain: Vec<ContainTarget>,
    /// Padded square icon.
    pub icon: IconConfig,
    /// Multi-resolution `.ico` bundle.
    pub favicon: FaviconConfig,
    /// Text-only favicon settings.
    pub monogram: MonogramConfig,
}

/// One exact-size resized copy.
#[derive(Debug, Clone, Deserialize)]
pub struct ResizeTarget {
    /// Output file name.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Also write an inverted `white-<name>` copy.
    #[serde(default = "default_true")]
    pub white: bool,
}

/// One "contain" icon.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainTarget {
    /// Output file name.
    pub name: String,
    /// Square edge in pixels.
    pub size: u32,
}

/// Padded square icon settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    /// Whether the icon is produced at all.
    pub enabled: bool,
    /// Output file name.
    pub name: String,
    /// Output name of the inverted icon; `None` disables it.
    pub white_name: Option<String>,
    /// Canvas edge in pixels.
    pub canvas: u32,
    /// Fraction of the canvas the logo may occupy.
    pub margin: f64,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "intelllx-icon.png".to_string(),
            white_name: Some("intelllx-icon-white.png".to_string()),
            canvas: 512,
            margin: 0.8,
        }
    }
}

/// Favicon bundle settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FaviconConfig {
    /// Whether the bundle is produced at all.
    pub enabled: bool,
    /// Output file name.
    pub name: String,
    /// Embedded resolutions.
    pub sizes: Vec<u32>,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self { enabled: true, name: "favicon.ico".to_string(), sizes: vec![16, 32, 48] }
    }
}

/// Monogram favicon settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonogramConfig {
    /// Background colour as `#rrggbb` or `#rrggbbaa`.
    pub background: String,
    /// Text colour as `#rrggbb` or `#rrggbbaa`.
    pub foreground: String,
    /// Extra font files tried before the built-in candidates.
    pub fonts: Vec<PathBuf>,
    /// Where the monogram set is written.
    pub output_dir: PathBuf,
}

impl Default for MonogramConfig {
    fn default() -> Self {
        Self {
            background: "#3b82f6".to_string(),
            foreground: "#ffffff".to_string(),
            fonts: Vec::new(),
            output_dir: PathBuf::from(DEFAULT_MONOGRAM_DIR),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            backend: "auto".to_string(),
            fallback: "copy".to_string(),
            white_logo: Some("intelllx-logo-white.png".to_string()),
            resize: default_resize_targets(),
            contain: default_contain_targets(),
            icon: IconConfig::default(),
            favicon: FaviconConfig::default(),
            monogram: MonogramConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_resize_targets() -> Vec<ResizeTarget> {
    [
        (32, "favicon-32x32.png"),
        (64, "favicon-64x64.png"),
        (128, "intelllx-logo-128.png"),
        (256, "intelllx-logo-256.png"),
        (512, "intelllx-logo-512.png"),
    ]
    .into_iter()
    .map(|(edge, name)| ResizeTarget { name: name.to_string(), width: edge, height: edge, white: true })
    .collect()
}

fn default_contain_targets() -> Vec<ContainTarget> {
    [
        (16, "favicon-16x16.png"),
        (180, "apple-touch-icon.png"),
        (192, "icon-192x192.png"),
        (512, "icon-512x512.png"),
    ]
    .into_iter()
    .map(|(size, name)| ContainTarget { name: name.to_string(), size })
    .collect()
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `BRANDKIT_CONFIG` environment variable
/// 3. `./brandkit.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("BRANDKIT_CONFIG") {
        return PathBuf::from(p);
    }

    PathBuf::from("brandkit.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.source, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.backend, "auto");
        assert_eq!(config.fallback, "copy");
        assert_eq!(config.resize.len(), 5);
        assert_eq!(config.contain.len(), 4);
        assert_eq!(config.icon.canvas, 512);
        assert!((config.icon.margin - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.favicon.sizes, vec![16, 32, 48]);
        assert_eq!(config.monogram.background, "#3b82f6");
        assert_eq!(config.monogram.output_dir, PathBuf::from(DEFAULT_MONOGRAM_DIR));
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/brandkit.toml")).unwrap();
        assert_eq!(config.backend, "auto");
    }

    #[test]
    fn load_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brandkit.toml");
        std::fs::write(
            &path,
            r#"
source = "art/logo.png"
output_dir = "dist/brand"
backend = "tools"
fallback = "symlink"

[[resize]]
name = "logo-48.png"
width = 48
height = 48
white = false

[icon]
canvas = 256
margin = 0.9

[favicon]
sizes = [16, 24]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.source, PathBuf::from("art/logo.png"));
        assert_eq!(config.output_dir, PathBuf::from("dist/brand"));
        assert_eq!(config.backend, "tools");
        assert_eq!(config.fallback, "symlink");
        assert_eq!(config.resize.len(), 1);
        assert_eq!(config.resize[0].width, 48);
        assert!(!config.resize[0].white);
        assert_eq!(config.icon.canvas, 256);
        assert_eq!(config.icon.name, "intelllx-icon.png");
        assert_eq!(config.favicon.sizes, vec![16, 24]);
        assert_eq!(config.favicon.name, "favicon.ico");
        assert_eq!(config.contain.len(), 4);
    }

    #[test]
    fn resize_white_defaults_to_true() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brandkit.toml");
        std::fs::write(&path, "[[resize]]\nname = \"a.png\"\nwidth = 8\nheight = 4\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.resize[0].white);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-brandkit.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-brandkit.toml"));
    }
}
