//! Backend resolution: decide once per run which backend renders assets.

use crate::adapters::command::CommandBackend;
use crate::adapters::library::LibraryBackend;
use crate::adapters::placeholder::PlaceholderBackend;
use crate::model::{BackendKind, FallbackMode, Preference, TOOL_ORDER};
use crate::ports::{ImageBackend, ToolProbe};

/// Bundles the chosen backend with the fallback placement mode.
pub struct BackendContext {
    /// Backend that renders every asset of the run.
    pub backend: Box<dyn ImageBackend>,
    /// How failed or untransformable outputs are placed.
    pub fallback: FallbackMode,
}

impl BackendContext {
    /// Resolve the backend for a run, probing external tools as needed.
    #[must_use]
    pub fn resolve(preference: Preference, fallback: FallbackMode, probe: &dyn ToolProbe) -> Self {
        let kind = select_kind(preference, probe);
        Self { backend: instantiate(kind, fallback), fallback }
    }
}

/// Pick the backend kind for a preference.
///
/// `Auto` takes the in-process library. `Tools` takes the first external tool
/// in [`TOOL_ORDER`] that answers its version query. A named tool that does
/// not answer, or `Tools` with nothing installed, degrades to placeholders.
#[must_use]
pub fn select_kind(preference: Preference, probe: &dyn ToolProbe) -> BackendKind {
    match preference {
        Preference::Auto => BackendKind::Library,
        Preference::Tools => {
            let found = TOOL_ORDER
                .into_iter()
                .find(|kind| kind.program().is_some_and(|p| probe.responds(p)));
            if let Some(kind) = found {
                tracing::info!(tool = kind.name(), "using external tool for image processing");
                kind
            } else {
                tracing::warn!(
                    "no image processing tool found (tried convert, magick, sips); \
                     outputs will be placeholders"
                );
                BackendKind::Placeholder
            }
        }
        Preference::Only(kind) => match kind.program() {
            Some(program) if !probe.responds(program) => {
                tracing::warn!(tool = program, "tool did not answer --version; outputs will be placeholders");
                BackendKind::Placeholder
            }
            _ => kind,
        },
    }
}

fn instantiate(kind: BackendKind, fallback: FallbackMode) -> Box<dyn ImageBackend> {
    match kind {
        BackendKind::Library => Box::new(LibraryBackend::new()),
        BackendKind::Placeholder => Box::new(PlaceholderBackend::new(fallback)),
        tool => match CommandBackend::new(tool) {
            Some(backend) => Box::new(backend),
            None => Box::new(PlaceholderBackend::new(fallback)),
        },
    }
}
