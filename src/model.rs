//! Backend names, aliases and the preference order used when probing.

/// Concrete backends that can produce assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process `image` crate.
    Library,
    /// `ImageMagick` 6 `convert`.
    Convert,
    /// `ImageMagick` 7 `magick`.
    Magick,
    /// macOS `sips`.
    Sips,
    /// No transform; the source is copied or linked under each name.
    Placeholder,
}

impl BackendKind {
    /// Name used in logs and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Convert => "convert",
            Self::Magick => "magick",
            Self::Sips => "sips",
            Self::Placeholder => "none",
        }
    }

    /// Executable to spawn, for backends that shell out.
    #[must_use]
    pub fn program(self) -> Option<&'static str> {
        match self {
            Self::Convert => Some("convert"),
            Self::Magick => Some("magick"),
            Self::Sips => Some("sips"),
            Self::Library | Self::Placeholder => None,
        }
    }
}

/// External tools in the order they are probed.
pub const TOOL_ORDER: [BackendKind; 3] = [BackendKind::Convert, BackendKind::Magick, BackendKind::Sips];

/// How the backend for a run should be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// In-process library.
    Auto,
    /// First external tool that answers a version query.
    Tools,
    /// A specific backend, no probing beyond checking the tool exists.
    Only(BackendKind),
}

/// How placeholder outputs are placed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    /// Byte copy of the source.
    Copy,
    /// Symbolic link to the source.
    Symlink,
}

/// Short name aliases accepted for `--backend`.
const ALIASES: &[(&str, &str)] = &[
    ("builtin", "library"),
    ("imagemagick", "convert"),
    ("im", "convert"),
    ("magick7", "magick"),
    ("placeholder", "none"),
    ("off", "none"),
];

/// Resolve a backend name (alias or exact) to its canonical name.
#[must_use]
pub fn resolve_backend_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    for &(alias, full) in ALIASES {
        if lower == alias {
            return full.to_string();
        }
    }
    lower
}

/// Parse a backend preference from a CLI or config value.
///
/// # Errors
///
/// Returns an error if the name is not a known backend or alias.
pub fn parse_preference(name: &str) -> Result<Preference, String> {
    match resolve_backend_name(name).as_str() {
        "auto" => Ok(Preference::Auto),
        "tools" => Ok(Preference::Tools),
        "library" => Ok(Preference::Only(BackendKind::Library)),
        "convert" => Ok(Preference::Only(BackendKind::Convert)),
        "magick" => Ok(Preference::Only(BackendKind::Magick)),
        "sips" => Ok(Preference::Only(BackendKind::Sips)),
        "none" => Ok(Preference::Only(BackendKind::Placeholder)),
        _ => Err(format!(
            "Unknown backend '{name}'. Valid: auto, tools, library, convert, magick, sips, none"
        )),
    }
}

/// Parse a fallback mode from a CLI or config value.
///
/// # Errors
///
/// Returns an error if the mode is neither `copy` nor `symlink`.
pub fn parse_fallback(mode: &str) -> Result<FallbackMode, String> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "copy" => Ok(FallbackMode::Copy),
        "symlink" | "link" => Ok(FallbackMode::Symlink),
        _ => Err(format!("Unsupported fallback '{mode}'. Valid: copy, symlink")),
    }
}
