//! Conversion of reprojected rasters into PNG with a colorspace tag

use std::path::{Path, PathBuf};

use cubefaces_core::process::find_tool;
use cubefaces_core::Invocation;

/// One conversion request
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub source: PathBuf,
    pub colorspace: String,
    pub destination: PathBuf,
}

/// A converter from raster to image file
pub trait ImageConverter {
    /// Tool name for messages
    fn name(&self) -> &str;

    /// Build the command for one job
    fn command(&self, job: &ConvertJob) -> Invocation;
}

/// Which ImageMagick entry point to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// ImageMagick 7 `magick`
    ImageMagick7,
    /// ImageMagick 6 `convert`
    Legacy,
}

impl Flavor {
    pub fn command(&self) -> &'static str {
        match self {
            Flavor::ImageMagick7 => "magick",
            Flavor::Legacy => "convert",
        }
    }

    /// Guess the flavor from a configured binary path
    pub fn from_path(path: &Path) -> Self {
        match path.file_stem().and_then(|s| s.to_str()) {
            Some("convert") => Flavor::Legacy,
            _ => Flavor::ImageMagick7,
        }
    }
}

/// ImageMagick
#[derive(Debug, Clone)]
pub struct Magick {
    pub flavor: Flavor,
    pub program: PathBuf,
}

impl Magick {
    pub fn new(flavor: Flavor, program: impl Into<PathBuf>) -> Self {
        Self {
            flavor,
            program: program.into(),
        }
    }

    /// Prefer `magick`, fall back to the version 6 `convert`
    pub fn detect() -> Option<Self> {
        [Flavor::ImageMagick7, Flavor::Legacy]
            .into_iter()
            .find_map(|flavor| find_tool(flavor.command()).map(|p| Self::new(flavor, p)))
    }
}

impl Default for Magick {
    fn default() -> Self {
        Self::new(Flavor::ImageMagick7, Flavor::ImageMagick7.command())
    }
}

impl ImageConverter for Magick {
    fn name(&self) -> &str {
        self.flavor.command()
    }

    fn command(&self, job: &ConvertJob) -> Invocation {
        Invocation::new(&self.program)
            .arg(&job.source)
            .args(["-set", "colorspace", &job.colorspace])
            .arg(&job.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> ConvertJob {
        ConvertJob {
            source: PathBuf::from("/tmp/out/mars_px.tif"),
            colorspace: "sRGB".to_string(),
            destination: PathBuf::from("/tmp/out/mars_px.png"),
        }
    }

    #[test]
    fn test_magick_arguments() {
        let inv = Magick::default().command(&job());
        assert_eq!(inv.program_name(), "magick");
        assert_eq!(
            inv.args_lossy(),
            vec![
                "/tmp/out/mars_px.tif",
                "-set",
                "colorspace",
                "sRGB",
                "/tmp/out/mars_px.png",
            ]
        );
    }

    #[test]
    fn test_legacy_flavor_uses_same_arguments() {
        let legacy = Magick::new(Flavor::Legacy, "/usr/bin/convert");
        let inv = legacy.command(&job());

        assert_eq!(legacy.name(), "convert");
        assert_eq!(inv.program_name(), "/usr/bin/convert");
        assert_eq!(inv.args, Magick::default().command(&job()).args);
    }

    #[test]
    fn test_flavor_from_path() {
        assert_eq!(Flavor::from_path(Path::new("/usr/bin/convert")), Flavor::Legacy);
        assert_eq!(Flavor::from_path(Path::new("/usr/local/bin/magick")), Flavor::ImageMagick7);
        assert_eq!(Flavor::from_path(Path::new("magick.exe")), Flavor::ImageMagick7);
    }

    #[test]
    fn test_colorspace_is_single_argument() {
        let mut j = job();
        j.colorspace = "Linear RGB; echo".to_string();
        let args = Magick::default().command(&j).args_lossy();
        assert_eq!(args.len(), 5);
        assert_eq!(args[3], "Linear RGB; echo");
    }
}
