//! cubefaces - gnomonic cube faces from an equirectangular planet image
//!
//! Reprojects a WGS84 equirectangular raster onto the six faces of a cube
//! (+X, -X, +Y, -Y, +Z, -Z) with `gdalwarp`, then converts each face to PNG
//! with ImageMagick, tagging the requested colorspace.

pub mod config;
pub mod convert;
pub mod error;
pub mod faces;
pub mod generator;
pub mod reproject;

#[cfg(test)]
mod test_support;

pub use config::{Config, FailurePolicy};
pub use convert::{ConvertJob, Flavor, ImageConverter, Magick};
pub use error::CubefaceError;
pub use faces::{FaceSpec, FACES};
pub use generator::{FaceGenerator, FaceResult, FaceStatus, GenerationReport, Options, Request};
pub use reproject::{Extent, Gdalwarp, ReprojectionEngine, WarpJob};
