//! Adapter implementations for port traits.
//!
//! - `library` — in-process `image` crate
//! - `command` — `ImageMagick` and `sips` subprocesses, plus version probing
//! - `placeholder` — copies or links the source when nothing can transform it

pub mod command;
pub mod library;
pub mod placeholder;
