//! Output directory handling, placeholder placement and size reporting.

use std::path::{Path, PathBuf};

use crate::error::AssetError;
use crate::model::FallbackMode;

/// Create the output directory (and parents) if absent.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn prepare_output_dir(dir: &Path) -> Result<(), AssetError> {
    std::fs::create_dir_all(dir).map_err(AssetError::Io)
}

/// Remove whatever currently sits at `path`, including a dangling symlink.
///
/// A leftover link from an earlier placeholder run would otherwise make the
/// next write land on the source image itself.
///
/// # Errors
///
/// Returns an error if an existing entry cannot be removed.
pub fn clear_destination(path: &Path) -> Result<(), AssetError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(AssetError::InvalidArgument(format!(
            "{} is a directory",
            path.display()
        ))),
        Ok(_) => std::fs::remove_file(path).map_err(AssetError::Io),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AssetError::Io(e)),
    }
}

/// Put the source under `dest` unchanged, by copy or symlink.
///
/// # Errors
///
/// Returns an error if the destination cannot be cleared or written.
pub fn place_placeholder(source: &Path, dest: &Path, mode: FallbackMode) -> Result<(), AssetError> {
    clear_destination(dest)?;
    match mode {
        FallbackMode::Copy => copy_file(source, dest),
        FallbackMode::Symlink => link_file(source, dest),
    }
}

fn copy_file(source: &Path, dest: &Path) -> Result<(), AssetError> {
    std::fs::copy(source, dest).map(|_| ()).map_err(AssetError::Io)
}

#[cfg(unix)]
fn link_file(source: &Path, dest: &Path) -> Result<(), AssetError> {
    let target = link_target(source, dest)?;
    std::os::unix::fs::symlink(target, dest).map_err(AssetError::Io)
}

#[cfg(not(unix))]
fn link_file(source: &Path, dest: &Path) -> Result<(), AssetError> {
    copy_file(source, dest)
}

/// Link target for `dest`: the bare file name when both live in the same
/// directory, otherwise the absolute source path.
///
/// # Errors
///
/// Returns an error if the source cannot be canonicalized.
pub fn link_target(source: &Path, dest: &Path) -> Result<PathBuf, AssetError> {
    let source = source.canonicalize()?;
    let dest_dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.canonicalize()?,
        _ => std::env::current_dir()?,
    };
    match (source.parent(), source.file_name()) {
        (Some(parent), Some(name)) if parent == dest_dir => Ok(PathBuf::from(name)),
        _ => Ok(source),
    }
}

/// Size in bytes of the file at `path`, following symlinks.
#[must_use]
pub fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

/// Human-readable byte count: `1,234 bytes (1.2 KB)`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let digits = bytes.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped} bytes ({:.1} KB)", bytes as f64 / 1024.0)
}
