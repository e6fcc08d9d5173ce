//! Backend used when nothing can transform pixels: every output is the
//! source itself, copied or linked under the expected name.

use crate::error::AssetError;
use crate::model::{BackendKind, FallbackMode};
use crate::output::place_placeholder;
use crate::ports::{ImageBackend, RenderRequest};

/// Places the untouched source under each requested name.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderBackend {
    mode: FallbackMode,
}

impl PlaceholderBackend {
    /// Create a placeholder backend using the given placement mode.
    #[must_use]
    pub fn new(mode: FallbackMode) -> Self {
        Self { mode }
    }
}

impl ImageBackend for PlaceholderBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Placeholder
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<(), AssetError> {
        tracing::warn!(
            file = %request.spec.file_name,
            shape = %request.spec.shape,
            "no image backend available, placing source unchanged"
        );
        place_placeholder(request.source, request.dest, self.mode)
    }
}
