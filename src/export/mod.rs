//! Batch export: rasterize slides in order, encode PNGs, bundle a zip.

pub mod archive;
pub mod pipeline;
