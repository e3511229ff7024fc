//! Cube face table
//!
//! Six gnomonic projection centres, one per cube face, in the order
//! +X, -X, +Y, -Y, +Z, -Z.

use std::path::{Path, PathBuf};

/// Projection centre and file suffix for one cube face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceSpec {
    /// Centre longitude in degrees
    pub longitude: i32,
    /// Centre latitude in degrees
    pub latitude: i32,
    /// Short name used in output filenames
    pub suffix: &'static str,
}

/// All faces, in generation order
pub const FACES: [FaceSpec; 6] = [
    FaceSpec { longitude: 90, latitude: 0, suffix: "px" },
    FaceSpec { longitude: -90, latitude: 0, suffix: "nx" },
    FaceSpec { longitude: 0, latitude: 90, suffix: "py" },
    FaceSpec { longitude: 0, latitude: -90, suffix: "ny" },
    FaceSpec { longitude: 0, latitude: 0, suffix: "pz" },
    FaceSpec { longitude: 180, latitude: 0, suffix: "nz" },
];

impl FaceSpec {
    /// Filename stem, e.g. `mars_px`
    pub fn stem(&self, output_name: &str) -> String {
        format!("{}_{}", output_name, self.suffix)
    }

    /// Intermediate reprojected raster
    pub fn tif_path(&self, output_path: &Path, output_name: &str) -> PathBuf {
        output_path.join(format!("{}.tif", self.stem(output_name)))
    }

    /// Final image
    pub fn png_path(&self, output_path: &Path, output_name: &str) -> PathBuf {
        output_path.join(format!("{}.png", self.stem(output_name)))
    }

    /// Cube axis label, e.g. `+X`
    pub fn axis(&self) -> &'static str {
        match self.suffix {
            "px" => "+X",
            "nx" => "-X",
            "py" => "+Y",
            "ny" => "-Y",
            "pz" => "+Z",
            "nz" => "-Z",
            _ => "?",
        }
    }
}
