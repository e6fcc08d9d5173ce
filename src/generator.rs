//! The batch: render every planned asset, falling back per file, never
//! aborting after the source has been found.

use std::path::{Path, PathBuf};

use crate::context::BackendContext;
use crate::error::AssetError;
use crate::model::BackendKind;
use crate::output::{
    clear_destination, file_size, format_size, place_placeholder, prepare_output_dir,
};
use crate::params::AssetSpec;
use crate::ports::RenderRequest;

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Produced by a real backend.
    Rendered,
    /// No backend was available; the source was placed as-is.
    Placeholder,
    /// The backend failed; the source was placed as-is.
    Fallback {
        /// Why the backend failed.
        reason: String,
    },
    /// Neither the backend nor the fallback produced the file.
    Failed {
        /// Why the file is missing.
        reason: String,
    },
}

/// Result for one planned asset.
#[derive(Debug, Clone)]
pub struct AssetResult {
    /// Full output path.
    pub path: PathBuf,
    /// What happened.
    pub outcome: Outcome,
    /// Size on disk afterwards, if the file exists.
    pub bytes: Option<u64>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Report {
    /// Backend the run used.
    pub backend: BackendKind,
    /// One entry per planned asset, in plan order.
    pub results: Vec<AssetResult>,
}

impl Report {
    /// Number of assets with the given outcome kind.
    #[must_use]
    pub fn count(&self, matches: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| matches(&r.outcome)).count()
    }

    /// True when every planned file exists.
    #[must_use]
    pub fn all_present(&self) -> bool {
        self.results.iter().all(|r| !matches!(r.outcome, Outcome::Failed { .. }))
    }

    /// Lines for the end-of-run listing, one per asset plus a totals line.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .results
            .iter()
            .map(|r| {
                let size = r.bytes.map_or_else(|| "missing".to_string(), format_size);
                let note = match r.outcome {
                    Outcome::Rendered => String::new(),
                    Outcome::Placeholder => " [placeholder]".to_string(),
                    Outcome::Fallback { ref reason } => format!(" [fallback copy: {reason}]"),
                    Outcome::Failed { ref reason } => format!(" [failed: {reason}]"),
                };
                format!("  {}: {size}{note}", r.path.display())
            })
            .collect();
        lines.push(format!(
            "{} rendered, {} placeholder, {} fallback, {} failed (backend: {})",
            self.count(|o| *o == Outcome::Rendered),
            self.count(|o| *o == Outcome::Placeholder),
            self.count(|o| matches!(o, Outcome::Fallback { .. })),
            self.count(|o| matches!(o, Outcome::Failed { .. })),
            self.backend.name(),
        ));
        lines
    }
}

/// Render every asset of `plan` from `source` into `output_dir`.
///
/// # Errors
///
/// Returns [`AssetError::SourceMissing`] if the source is not a file, or an
/// I/O error if the output directory cannot be created. Per-asset failures
/// are recorded in the report instead.
pub fn generate(
    ctx: &BackendContext,
    source: &Path,
    output_dir: &Path,
    plan: &[AssetSpec],
) -> Result<Report, AssetError> {
    if !source.is_file() {
        return Err(AssetError::SourceMissing(source.to_path_buf()));
    }
    if let Ok((width, height)) = image::image_dimensions(source) {
        tracing::info!(source = %source.display(), width, height, "source image");
    }

    prepare_output_dir(output_dir)?;
    let canonical_source = source.canonicalize()?;
    let canonical_dir = output_dir.canonicalize()?;
    let backend_kind = ctx.backend.kind();

    let results = plan
        .iter()
        .map(|spec| {
            let dest = output_dir.join(&spec.file_name);
            let outcome = if canonical_dir.join(&spec.file_name) == canonical_source {
                let reason = "output name is the source image itself".to_string();
                tracing::error!(file = %spec.file_name, "{reason}");
                Outcome::Failed { reason }
            } else {
                produce(ctx, source, spec, &dest)
            };
            AssetResult { bytes: file_size(&dest), path: dest, outcome }
        })
        .collect();

    Ok(Report { backend: backend_kind, results })
}

fn produce(ctx: &BackendContext, source: &Path, spec: &AssetSpec, dest: &Path) -> Outcome {
    let request = RenderRequest { source, spec, dest };
    let attempt = clear_destination(dest).and_then(|()| ctx.backend.render(&request));

    match attempt {
        Ok(()) if ctx.backend.kind() == BackendKind::Placeholder => Outcome::Placeholder,
        Ok(()) => {
            tracing::info!(file = %spec.file_name, shape = %spec.shape, tone = ?spec.tone, "created");
            Outcome::Rendered
        }
        Err(e) => {
            tracing::warn!(
                file = %spec.file_name,
                error = %e,
                "transform failed, placing source instead"
            );
            match place_placeholder(source, dest, ctx.fallback) {
                Ok(()) => Outcome::Fallback { reason: e.to_string() },
                Err(fallback_err) => {
                    tracing::error!(file = %spec.file_name, error = %fallback_err, "fallback failed");
                    Outcome::Failed { reason: format!("{e}; fallback: {fallback_err}") }
                }
            }
        }
    }
}
