//! Filesystem utilities for promptfmt.
//!
//! Output files are always written through staged atomic writes so a reader
//! never sees a half-written artifact.

pub mod atomic;
pub mod dirs;

pub use atomic::{SetAside, StagedFile, atomic_write, set_aside, stage};
pub use dirs::{CreatedDirs, create_parent_dirs};
