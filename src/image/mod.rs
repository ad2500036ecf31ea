//! Raster image batch tools.
//!
//! # Modules
//!
//! - [`scan`]: image discovery in a folder
//! - [`resize`]: resize/convert a folder into a mirrored output folder
//! - [`webp`]: `.webp` copies next to the originals

pub mod resize;
pub mod scan;
pub mod webp;
