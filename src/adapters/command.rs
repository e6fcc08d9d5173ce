//! Backends that shell out to `ImageMagick` (`convert`, `magick`) or `sips`.

use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

use crate::error::AssetError;
use crate::model::BackendKind;
use crate::params::{fit_within, Shape, Tone};
use crate::ports::{ImageBackend, RenderRequest, ToolProbe};

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT: usize = 300;

/// Backend that runs an external converter once per asset.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    kind: BackendKind,
    program: OsString,
}

impl CommandBackend {
    /// Backend for a tool kind, invoking the tool by its usual name.
    ///
    /// Returns `None` for kinds that do not shell out.
    #[must_use]
    pub fn new(kind: BackendKind) -> Option<Self> {
        kind.program().map(|p| Self::with_program(kind, p))
    }

    /// Backend for a tool kind, invoking a specific executable.
    #[must_use]
    pub fn with_program(kind: BackendKind, program: impl Into<OsString>) -> Self {
        Self { kind, program: program.into() }
    }

    /// Argument vector for one request.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Unsupported`] when the tool cannot express the
    /// requested shape or tone.
    pub fn arguments(&self, request: &RenderRequest<'_>) -> Result<Vec<OsString>, AssetError> {
        match self.kind {
            BackendKind::Sips => sips_args(request),
            _ => Ok(magick_args(request)),
        }
    }
}

impl ImageBackend for CommandBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<(), AssetError> {
        let args = self.arguments(request)?;
        let tool = self.program.to_string_lossy().into_owned();
        tracing::debug!(%tool, ?args, "running external tool");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AssetError::Tool { tool: tool.clone(), message: e.to_string() })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let excerpt: String = stderr.chars().take(STDERR_EXCERPT).collect();
        let message = if excerpt.is_empty() {
            format!("exited with {}", output.status)
        } else {
            format!("exited with {}: {excerpt}", output.status)
        };
        Err(AssetError::Tool { tool, message })
    }
}

/// `ImageMagick` arguments; identical for `convert` (v6) and `magick` (v7).
fn magick_args(request: &RenderRequest<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![request.source.into()];

    match request.spec.shape {
        Shape::Original => {}
        Shape::Exact { width, height } => {
            args.extend(strs(["-resize", &format!("{width}x{height}!")]));
        }
        Shape::Contain { width, height } => {
            args.extend(extent_args(&format!("{width}x{height}"), &format!("{width}x{height}")));
        }
        Shape::Icon { canvas, margin } => {
            let (inner, _) = fit_within((canvas, canvas), canvas, canvas, margin);
            args.extend(extent_args(&format!("{inner}x{inner}"), &format!("{canvas}x{canvas}")));
        }
        Shape::Favicon { ref sizes } => {
            let list: Vec<String> = sizes.iter().map(u32::to_string).collect();
            args.extend(strs([
                "-background",
                "none",
                "-define",
                &format!("icon:auto-resize={}", list.join(",")),
            ]));
        }
    }

    if request.spec.tone == Tone::Inverted {
        args.extend(strs(["-channel", "RGB", "-negate", "+channel"]));
    }

    if matches!(request.spec.shape, Shape::Favicon { .. }) {
        args.push(request.dest.into());
    } else {
        let mut dest = OsString::from("png:");
        dest.push(request.dest);
        args.push(dest);
    }
    args
}

fn extent_args(resize: &str, extent: &str) -> Vec<OsString> {
    strs(["-resize", resize, "-background", "none", "-gravity", "center", "-extent", extent])
}

/// `sips` arguments. It has no negate and cannot write `.ico`; boxed shapes
/// are resized to the box without padding.
fn sips_args(request: &RenderRequest<'_>) -> Result<Vec<OsString>, AssetError> {
    let unsupported = |operation: &str| AssetError::Unsupported {
        backend: "sips".to_string(),
        operation: operation.to_string(),
    };

    if request.spec.tone == Tone::Inverted {
        return Err(unsupported("invert colours"));
    }

    let mut args = strs(["-s", "format", "png"]);
    match request.spec.shape {
        Shape::Original => {}
        Shape::Exact { width, height } | Shape::Contain { width, height } => {
            args.extend(strs(["-z", &height.to_string(), &width.to_string()]));
        }
        Shape::Icon { canvas, .. } => {
            args.extend(strs(["-z", &canvas.to_string(), &canvas.to_string()]));
        }
        Shape::Favicon { .. } => return Err(unsupported("write .ico bundles")),
    }
    args.push(request.source.into());
    args.push("--out".into());
    args.push(request.dest.into());
    Ok(args)
}

fn strs<const N: usize>(items: [&str; N]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

/// Probe that runs `<program> --version` and checks the exit status.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionProbe;

impl ToolProbe for VersionProbe {
    fn responds(&self, program: &str) -> bool {
        let ok = run_version(OsStr::new(program));
        tracing::debug!(program, ok, "probed tool");
        ok
    }
}

fn run_version(program: &OsStr) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
