//! Opt-in diagnostics, configured through environment variables.
//!
//! Set `CDT2D_SVG_OUTPUT_PATH` to an existing directory and `CDT2D_SVG_OUTPUT_LEVEL` to `1` (result only),
//! `2` (each stage) or `3` (every constraint) to dump SVG snapshots of each triangulation.
//! `CDT2D_SVG_HIDE_LABELS` suppresses vertex labels.

pub(crate) mod env;
pub(crate) mod svg;
