//! Text-only favicon: a letter centered on a solid square.
//!
//! Fonts are tried in order and a missing one is skipped silently; with no
//! usable font the icon is just the background colour.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::adapters::library::write_ico;
use crate::config::MonogramConfig;
use crate::error::AssetError;
use crate::output::clear_destination;
use crate::params::Tone;

/// Font files tried after any configured ones.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Edge of the master image everything else is derived from.
const MASTER_EDGE: u32 = 32;

/// Resolutions embedded in the monogram `.ico`.
const ICO_SIZES: [u32; 2] = [16, 32];

/// A monogram ready to render.
pub struct Monogram {
    /// Text drawn in the middle, usually one letter.
    pub text: String,
    /// Fill colour.
    pub background: Rgba<u8>,
    /// Text colour.
    pub foreground: Rgba<u8>,
    /// Font for the text; `None` renders background only.
    pub font: Option<FontVec>,
}

impl Monogram {
    /// Build a monogram from config, loading the first usable font.
    ///
    /// # Errors
    ///
    /// Returns an error if either colour is malformed.
    pub fn from_config(text: &str, config: &MonogramConfig) -> Result<Self, String> {
        Ok(Self {
            text: text.to_string(),
            background: parse_color(&config.background)?,
            foreground: parse_color(&config.foreground)?,
            font: load_font(&config.fonts),
        })
    }

    /// Render at `edge` x `edge`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
    pub fn render(&self, edge: u32) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(edge, edge, self.background);
        let Some(ref font) = self.font else {
            return canvas;
        };
        if self.text.is_empty() {
            return canvas;
        }

        let scale = PxScale::from(edge as f32 * 0.75);
        let (text_w, text_h) = text_size(scale, font, &self.text);
        let x = (edge as i32 - text_w as i32) / 2;
        let y = (edge as i32 - text_h as i32) / 2 - (edge / 16) as i32;
        draw_text_mut(&mut canvas, self.foreground, x, y, scale, font, &self.text);
        canvas
    }

    /// Write `favicon-32x32.png`, `favicon-16x16.png` and the `.ico` named
    /// `ico_name` into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written.
    pub fn write(&self, output_dir: &Path, ico_name: &str) -> Result<Vec<PathBuf>, AssetError> {
        std::fs::create_dir_all(output_dir)?;
        let master = self.render(MASTER_EDGE);
        let small = imageops::resize(&master, 16, 16, FilterType::Lanczos3);

        let png32 = output_dir.join("favicon-32x32.png");
        let png16 = output_dir.join("favicon-16x16.png");
        let ico = output_dir.join(ico_name);

        clear_destination(&png32)?;
        master.save_with_format(&png32, ImageFormat::Png)?;
        clear_destination(&png16)?;
        small.save_with_format(&png16, ImageFormat::Png)?;
        clear_destination(&ico)?;
        write_ico(&master, &ICO_SIZES, Tone::Normal, &ico)?;

        Ok(vec![ico, png32, png16])
    }
}

/// First font that loads from `extra`, then the built-in candidates.
#[must_use]
pub fn load_font(extra: &[PathBuf]) -> Option<FontVec> {
    extra
        .iter()
        .map(PathBuf::as_path)
        .chain(FONT_CANDIDATES.iter().map(Path::new))
        .find_map(|path| {
            let bytes = std::fs::read(path).ok()?;
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    tracing::debug!(font = %path.display(), "loaded monogram font");
                    Some(font)
                }
                Err(e) => {
                    tracing::debug!(font = %path.display(), error = %e, "skipping unreadable font");
                    None
                }
            }
        })
}

/// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
///
/// # Errors
///
/// Returns an error for any other shape or non-hex digits.
pub fn parse_color(hex: &str) -> Result<Rgba<u8>, String> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || format!("Invalid colour '{hex}'. Expected #rrggbb or #rrggbbaa");
    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
