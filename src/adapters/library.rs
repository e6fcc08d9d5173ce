//! In-process backend built on the `image` crate.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::AssetError;
use crate::model::BackendKind;
use crate::params::{center_offset, fit_within, Shape, Tone};
use crate::ports::{ImageBackend, RenderRequest};

/// Resampling filter for every resize.
const FILTER: FilterType = FilterType::Lanczos3;

/// Backend that decodes, transforms and encodes without leaving the process.
#[derive(Debug, Default)]
pub struct LibraryBackend;

impl LibraryBackend {
    /// Create the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for LibraryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Library
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<(), AssetError> {
        let source = load_rgba(request.source)?;
        let tone = request.spec.tone;

        if let Shape::Favicon { ref sizes } = request.spec.shape {
            return write_ico(&source, sizes, tone, request.dest);
        }

        let mut out = reshape(&source, &request.spec.shape);
        apply_tone(&mut out, tone);
        out.save_with_format(request.dest, ImageFormat::Png)?;
        Ok(())
    }
}

/// Decode any supported raster into 8-bit RGBA.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    Ok(image::open(path)?.into_rgba8())
}

/// Apply a non-favicon shape to an RGBA image.
#[must_use]
pub fn reshape(source: &RgbaImage, shape: &Shape) -> RgbaImage {
    match *shape {
        Shape::Original | Shape::Favicon { .. } => source.clone(),
        Shape::Exact { width, height } => imageops::resize(source, width, height, FILTER),
        Shape::Contain { width, height } => contain(source, width, height, 1.0),
        Shape::Icon { canvas, margin } => contain(source, canvas, canvas, margin),
    }
}

/// Fit `source` inside a transparent `width` x `height` canvas, scaled by
/// `margin`, centered.
#[must_use]
pub fn contain(source: &RgbaImage, width: u32, height: u32, margin: f64) -> RgbaImage {
    let (w, h) = fit_within(source.dimensions(), width, height, margin);
    let scaled = imageops::resize(source, w, h, FILTER);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let x = center_offset(width, w);
    let y = center_offset(height, h);
    imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));
    canvas
}

/// Invert colour channels in place when `tone` asks for it. Alpha is kept.
pub fn apply_tone(image: &mut RgbaImage, tone: Tone) {
    if tone == Tone::Normal {
        return;
    }
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = 255 - *channel;
        }
    }
}

/// Write a multi-resolution `.ico`, one contained frame per size.
///
/// # Errors
///
/// Returns an error if a frame cannot be encoded or the file cannot be written.
pub fn write_ico(source: &RgbaImage, sizes: &[u32], tone: Tone, dest: &Path) -> Result<(), AssetError> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);
    for &size in sizes {
        let mut frame = contain(source, size, size, 1.0);
        apply_tone(&mut frame, tone);
        let image = IconImage::from_rgba_data(size, size, frame.into_raw());
        icon_dir.add_entry(IconDirEntry::encode(&image)?);
        tracing::debug!(size, "encoded ico frame");
    }
    let file = File::create(dest)?;
    icon_dir.write(BufWriter::new(file))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{white_name, AssetSpec};

    /// 80x40: left half red, right half semi-transparent blue.
    fn sample() -> RgbaImage {
        RgbaImage::from_fn(80, 40, |x, _| {
            if x < 40 {
                Rgba([200, 30, 10, 255])
            } else {
                Rgba([20, 40, 220, 128])
            }
        })
    }

    fn render_to(dir: &Path, spec: &AssetSpec) -> std::path::PathBuf {
        let source = dir.join("logo.png");
        if !source.exists() {
            sample().save(&source).unwrap();
        }
        let dest = dir.join(&spec.file_name);
        let request = RenderRequest { source: &source, spec, dest: &dest };
        LibraryBackend::new().render(&request).unwrap();
        dest
    }

    #[test]
    fn exact_resize_has_requested_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let spec = AssetSpec::new("favicon-32x32.png", Shape::Exact { width: 32, height: 32 });
        let dest = render_to(dir.path(), &spec);
        assert_eq!(image::image_dimensions(&dest).unwrap(), (32, 32));
    }

    #[test]
    fn inverted_original_flips_colour_channels_only() {
        let dir = tempfile::tempdir().unwrap();
        let spec = AssetSpec::new("white.png", Shape::Original).inverted();
        let dest = render_to(dir.path(), &spec);

        let original = sample();
        let white = image::open(&dest).unwrap().into_rgba8();
        assert_eq!(white.dimensions(), original.dimensions());
        for (o, w) in original.pixels().zip(white.pixels()) {
            assert_eq!(w.0[0], 255 - o.0[0]);
            assert_eq!(w.0[1], 255 - o.0[1]);
            assert_eq!(w.0[2], 255 - o.0[2]);
            assert_eq!(w.0[3], o.0[3]);
        }
    }

    #[test]
    fn inverted_resized_copy_matches_inverted_resize() {
        let dir = tempfile::tempdir().unwrap();
        let shape = Shape::Exact { width: 32, height: 32 };
        let normal = render_to(dir.path(), &AssetSpec::new("favicon-32x32.png", shape.clone()));
        let white = render_to(
            dir.path(),
            &AssetSpec::new(white_name("favicon-32x32.png"), shape).inverted(),
        );

        let normal = image::open(&normal).unwrap().into_rgba8();
        let white = image::open(&white).unwrap().into_rgba8();
        assert_eq!(white.dimensions(), (32, 32));
        for (n, w) in normal.pixels().zip(white.pixels()) {
            assert_eq!(w.0[0], 255 - n.0[0]);
            assert_eq!(w.0[1], 255 - n.0[1]);
            assert_eq!(w.0[2], 255 - n.0[2]);
            assert_eq!(w.0[3], n.0[3]);
        }
    }

    #[test]
    fn icon_is_square_and_centered() {
        let dir = tempfile::tempdir().unwrap();
        // 80x40 into 64 at 50%: content 32x16 at (16, 24).
        let spec = AssetSpec::new("icon.png", Shape::Icon { canvas: 64, margin: 0.5 });
        let dest = render_to(dir.path(), &spec);
        let icon = image::open(&dest).unwrap().into_rgba8();

        assert_eq!(icon.dimensions(), (64, 64));
        assert_eq!(icon.get_pixel(0, 0).0[3], 0);
        assert_eq!(icon.get_pixel(15, 30).0[3], 0);
        assert_eq!(icon.get_pixel(30, 23).0[3], 0);
        assert_eq!(icon.get_pixel(48, 30).0[3], 0);
        assert_eq!(icon.get_pixel(30, 40).0[3], 0);
        assert!(icon.get_pixel(16, 24).0[3] > 0);
        assert!(icon.get_pixel(20, 32).0[3] > 0);
        assert!(icon.get_pixel(47, 39).0[3] > 0);
    }

    #[test]
    fn contain_keeps_canvas_size() {
        let source = sample();
        let out = contain(&source, 180, 180, 1.0);
        assert_eq!(out.dimensions(), (180, 180));
        // Content is 180x90, centered vertically.
        assert_eq!(out.get_pixel(90, 44).0[3], 0);
        assert!(out.get_pixel(10, 90).0[3] > 0);
        assert_eq!(out.get_pixel(90, 135).0[3], 0);
    }

    #[test]
    fn favicon_embeds_every_size() {
        let dir = tempfile::tempdir().unwrap();
        let spec = AssetSpec::new("favicon.ico", Shape::Favicon { sizes: vec![16, 32, 48] });
        let dest = render_to(dir.path(), &spec);

        let file = File::open(&dest).unwrap();
        let icon_dir = IconDir::read(file).unwrap();
        let widths: Vec<u32> = icon_dir.entries().iter().map(IconDirEntry::width).collect();
        assert_eq!(widths, vec![16, 32, 48]);
    }

    #[test]
    fn rerender_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let spec = AssetSpec::new("logo-128.png", Shape::Exact { width: 128, height: 128 });
        let dest = render_to(dir.path(), &spec);
        let first = std::fs::read(&dest).unwrap();
        let dest = render_to(dir.path(), &spec);
        assert_eq!(std::fs::read(&dest).unwrap(), first);
    }

    #[test]
    fn missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = AssetSpec::new("x.png", Shape::Original);
        let source = dir.path().join("absent.png");
        let dest = dir.path().join("x.png");
        let request = RenderRequest { source: &source, spec: &spec, dest: &dest };
        assert!(LibraryBackend::new().render(&request).is_err());
        assert!(!dest.exists());
    }
}
