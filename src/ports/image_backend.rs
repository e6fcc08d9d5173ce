//! Image backend port: turn one source file into one derived asset.

use std::path::Path;

use crate::error::AssetError;
use crate::model::BackendKind;
use crate::params::AssetSpec;

/// A request to produce a single asset.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Source image, assumed to exist.
    pub source: &'a Path,
    /// What to produce.
    pub spec: &'a AssetSpec,
    /// Final output path; overwritten if present.
    pub dest: &'a Path,
}

/// Produces derived assets from a source image.
pub trait ImageBackend {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// Write the asset described by `request` to `request.dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset could not be produced; the caller
    /// decides how to recover.
    fn render(&self, request: &RenderRequest<'_>) -> Result<(), AssetError>;
}

/// Answers whether an external program is installed and runnable.
pub trait ToolProbe {
    /// True when `program` exists and its version query succeeds.
    fn responds(&self, program: &str) -> bool;
}

impl<F> ToolProbe for F
where
    F: Fn(&str) -> bool,
{
    fn responds(&self, program: &str) -> bool {
        self(program)
    }
}
