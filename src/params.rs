//! The asset plan: which files a run produces and how each one is shaped.

use std::fmt;

use crate::config::Config;

/// Largest edge accepted for any generated raster.
const MAX_EDGE: u32 = 16_384;

/// Largest edge an `.ico` directory entry can describe.
const MAX_ICO_EDGE: u32 = 256;

/// Geometry of a derived asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Source dimensions unchanged.
    Original,
    /// Stretched to exactly `width` x `height`.
    Exact {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
    /// Fitted inside the box, aspect preserved, centered on transparency.
    Contain {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },
    /// Square canvas with the content scaled to `margin` of the best fit.
    Icon {
        /// Canvas edge in pixels.
        canvas: u32,
        /// Fraction of the canvas the content may occupy, in `(0, 1]`.
        margin: f64,
    },
    /// Multi-resolution `.ico` container.
    Favicon {
        /// Square edge of every embedded image.
        sizes: Vec<u32>,
    },
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original size"),
            Self::Exact { width, height } => write!(f, "{width}x{height}"),
            Self::Contain { width, height } => write!(f, "contain {width}x{height}"),
            Self::Icon { canvas, margin } => {
                write!(f, "icon {canvas}x{canvas} at {:.0}%", margin * 100.0)
            }
            Self::Favicon { sizes } => {
                let list: Vec<String> = sizes.iter().map(u32::to_string).collect();
                write!(f, "ico [{}]", list.join(", "))
            }
        }
    }
}

/// Colour treatment of a derived asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Colours as in the source.
    Normal,
    /// Colour channels inverted for dark backgrounds; alpha untouched.
    Inverted,
}

/// One output file of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    /// File name inside the output directory.
    pub file_name: String,
    /// Geometry.
    pub shape: Shape,
    /// Colour treatment.
    pub tone: Tone,
}

impl AssetSpec {
    /// Build an asset with normal tone.
    #[must_use]
    pub fn new(file_name: impl Into<String>, shape: Shape) -> Self {
        Self { file_name: file_name.into(), shape, tone: Tone::Normal }
    }

    /// Same asset with inverted tone.
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.tone = Tone::Inverted;
        self
    }
}

/// Name of the inverted counterpart of a resized asset: `white-<name>`.
#[must_use]
pub fn white_name(name: &str) -> String {
    format!("white-{name}")
}

/// Size of content fitted inside `box_w` x `box_h`, scaled by `margin`.
///
/// Dimensions are truncated toward zero but never drop below one pixel.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fit_within(src: (u32, u32), box_w: u32, box_h: u32, margin: f64) -> (u32, u32) {
    let (src_w, src_h) = (f64::from(src.0.max(1)), f64::from(src.1.max(1)));
    let scale = (f64::from(box_w) / src_w).min(f64::from(box_h) / src_h) * margin;
    let w = (src_w * scale).floor() as u32;
    let h = (src_h * scale).floor() as u32;
    (w.clamp(1, box_w.max(1)), h.clamp(1, box_h.max(1)))
}

/// Offset that centers `inner` within `outer` (integer division, left/top bias).
#[must_use]
pub fn center_offset(outer: u32, inner: u32) -> u32 {
    outer.saturating_sub(inner) / 2
}

/// Validate a pair of output dimensions.
///
/// # Errors
///
/// Returns an error if either edge is zero or larger than the supported maximum.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), String> {
    if (1..=MAX_EDGE).contains(&width) && (1..=MAX_EDGE).contains(&height) {
        Ok(())
    } else {
        Err(format!("Unsupported size {width}x{height}. Edges must be 1..={MAX_EDGE}"))
    }
}

/// Validate the icon margin factor.
///
/// # Errors
///
/// Returns an error unless `0 < margin <= 1`.
pub fn validate_margin(margin: f64) -> Result<(), String> {
    if margin > 0.0 && margin <= 1.0 {
        Ok(())
    } else {
        Err(format!("Unsupported icon margin {margin}. Valid: greater than 0, at most 1"))
    }
}

/// Validate the resolutions embedded in a favicon bundle.
///
/// # Errors
///
/// Returns an error if the list is empty or any size is outside `1..=256`.
pub fn validate_favicon_sizes(sizes: &[u32]) -> Result<(), String> {
    if sizes.is_empty() {
        return Err("Favicon needs at least one size".to_string());
    }
    match sizes.iter().find(|s| !(1..=MAX_ICO_EDGE).contains(*s)) {
        Some(bad) => Err(format!("Unsupported favicon size {bad}. Valid: 1..={MAX_ICO_EDGE}")),
        None => Ok(()),
    }
}

/// Validate an output file name.
///
/// # Errors
///
/// Returns an error if the name is empty or would escape the output directory.
pub fn validate_file_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        Err(format!("Invalid output file name '{name}'"))
    } else {
        Ok(())
    }
}

/// Optional output names are switched off with an empty string.
fn enabled_name(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

/// Expand the configuration into the ordered list of assets for a run.
///
/// # Errors
///
/// Returns an error if any configured size, margin or file name is invalid.
pub fn build_plan(config: &Config) -> Result<Vec<AssetSpec>, String> {
    let mut plan = Vec::new();

    for target in &config.resize {
        validate_dimensions(target.width, target.height)?;
        let shape = Shape::Exact { width: target.width, height: target.height };
        plan.push(AssetSpec::new(target.name.clone(), shape.clone()));
        if target.white {
            plan.push(AssetSpec::new(white_name(&target.name), shape).inverted());
        }
    }

    if let Some(name) = enabled_name(config.white_logo.as_deref()) {
        plan.push(AssetSpec::new(name, Shape::Original).inverted());
    }

    let icon = &config.icon;
    if icon.enabled {
        validate_dimensions(icon.canvas, icon.canvas)?;
        validate_margin(icon.margin)?;
        let shape = Shape::Icon { canvas: icon.canvas, margin: icon.margin };
        plan.push(AssetSpec::new(icon.name.clone(), shape.clone()));
        if let Some(white) = enabled_name(icon.white_name.as_deref()) {
            plan.push(AssetSpec::new(white, shape).inverted());
        }
    }

    for target in &config.contain {
        validate_dimensions(target.size, target.size)?;
        let shape = Shape::Contain { width: target.size, height: target.size };
        plan.push(AssetSpec::new(target.name.clone(), shape));
    }

    let favicon = &config.favicon;
    if favicon.enabled {
        validate_favicon_sizes(&favicon.sizes)?;
        plan.push(AssetSpec::new(
            favicon.name.clone(),
            Shape::Favicon { sizes: favicon.sizes.clone() },
        ));
    }

    for spec in &plan {
        validate_file_name(&spec.file_name)?;
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResizeTarget;

    #[test]
    fn fit_landscape_into_square() {
        assert_eq!(fit_within((800, 400), 512, 512, 1.0), (512, 256));
    }

    #[test]
    fn fit_with_margin() {
        // 512 / 800 * 0.8 = 0.512
        assert_eq!(fit_within((800, 400), 512, 512, 0.8), (409, 204));
    }

    #[test]
    fn fit_fills_configured_fraction_exactly() {
        assert_eq!(fit_within((1000, 1000), 1000, 1000, 0.7), (700, 700));
        assert_eq!(fit_within((1000, 1000), 1000, 1000, 0.9), (900, 900));
        assert_eq!(fit_within((200, 100), 100, 100, 0.3), (30, 15));
    }

    #[test]
    fn fit_portrait_into_square() {
        assert_eq!(fit_within((300, 600), 180, 180, 1.0), (90, 180));
    }

    #[test]
    fn fit_never_collapses_to_zero() {
        assert_eq!(fit_within((10_000, 1), 16, 16, 0.8), (12, 1));
    }

    #[test]
    fn center_offsets() {
        assert_eq!(center_offset(512, 409), 51);
        assert_eq!(center_offset(512, 204), 154);
        assert_eq!(center_offset(10, 20), 0);
    }

    #[test]
    fn white_names() {
        assert_eq!(white_name("favicon-32x32.png"), "white-favicon-32x32.png");
    }

    #[test]
    fn shape_display() {
        assert_eq!(Shape::Exact { width: 32, height: 32 }.to_string(), "32x32");
        assert_eq!(Shape::Icon { canvas: 512, margin: 0.8 }.to_string(), "icon 512x512 at 80%");
        assert_eq!(Shape::Favicon { sizes: vec![16, 32] }.to_string(), "ico [16, 32]");
    }

    #[test]
    fn validate_dimensions_bounds() {
        assert!(validate_dimensions(32, 32).is_ok());
        assert!(validate_dimensions(0, 32).is_err());
        assert!(validate_dimensions(32, 20_000).is_err());
    }

    #[test]
    fn validate_margin_bounds() {
        assert!(validate_margin(0.8).is_ok());
        assert!(validate_margin(1.0).is_ok());
        assert!(validate_margin(0.0).is_err());
        assert!(validate_margin(1.5).is_err());
    }

    #[test]
    fn validate_favicon_size_list() {
        assert!(validate_favicon_sizes(&[16, 32, 48]).is_ok());
        assert!(validate_favicon_sizes(&[]).is_err());
        assert!(validate_favicon_sizes(&[16, 512]).is_err());
    }

    #[test]
    fn validate_file_names() {
        assert!(validate_file_name("favicon.ico").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("../escape.png").is_err());
        assert!(validate_file_name("..").is_err());
    }

    #[test]
    fn default_plan_covers_every_output() {
        let plan = build_plan(&Config::default()).unwrap();
        let names: Vec<&str> = plan.iter().map(|s| s.file_name.as_str()).collect();
        for expected in [
            "favicon-32x32.png",
            "white-favicon-32x32.png",
            "favicon-64x64.png",
            "intelllx-logo-128.png",
            "intelllx-logo-256.png",
            "intelllx-logo-512.png",
            "white-intelllx-logo-512.png",
            "intelllx-logo-white.png",
            "intelllx-icon.png",
            "intelllx-icon-white.png",
            "favicon-16x16.png",
            "apple-touch-icon.png",
            "icon-192x192.png",
            "icon-512x512.png",
            "favicon.ico",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn default_plan_tones() {
        let plan = build_plan(&Config::default()).unwrap();
        let white = plan.iter().find(|s| s.file_name == "intelllx-logo-white.png").unwrap();
        assert_eq!(white.tone, Tone::Inverted);
        assert_eq!(white.shape, Shape::Original);
        let icon = plan.iter().find(|s| s.file_name == "intelllx-icon.png").unwrap();
        assert_eq!(icon.tone, Tone::Normal);
        assert_eq!(icon.shape, Shape::Icon { canvas: 512, margin: 0.8 });
    }

    #[test]
    fn resize_without_white_variant() {
        let config = Config {
            resize: vec![ResizeTarget {
                name: "tiny.png".into(),
                width: 8,
                height: 8,
                white: false,
            }],
            ..Config::default()
        };
        let plan = build_plan(&config).unwrap();
        assert!(plan.iter().any(|s| s.file_name == "tiny.png"));
        assert!(!plan.iter().any(|s| s.file_name == "white-tiny.png"));
    }

    #[test]
    fn empty_names_disable_optional_outputs() {
        let mut config = Config { white_logo: Some(String::new()), ..Config::default() };
        config.icon.white_name = Some(String::new());
        let plan = build_plan(&config).unwrap();
        assert!(!plan.iter().any(|s| s.file_name.is_empty()));
        assert!(!plan.iter().any(|s| s.shape == Shape::Original));
        assert_eq!(plan.iter().filter(|s| matches!(s.shape, Shape::Icon { .. })).count(), 1);
    }

    #[test]
    fn invalid_resize_rejected() {
        let config = Config {
            resize: vec![ResizeTarget { name: "zero.png".into(), width: 0, height: 8, white: true }],
            ..Config::default()
        };
        assert!(build_plan(&config).unwrap_err().contains("Unsupported size"));
    }
}
