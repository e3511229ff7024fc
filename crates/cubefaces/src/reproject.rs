//! Reprojection of the source raster onto a gnomonic cube face

use std::path::PathBuf;

use cubefaces_core::process::find_tool;
use cubefaces_core::Invocation;

use crate::faces::FaceSpec;

/// WGS84 semi-major axis in metres
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// Target bounds in projected metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Square extent of one sphere radius around the tangent point
    pub const CUBE_FACE: Extent = Extent {
        xmin: -WGS84_SEMI_MAJOR_AXIS,
        ymin: -WGS84_SEMI_MAJOR_AXIS,
        xmax: WGS84_SEMI_MAJOR_AXIS,
        ymax: WGS84_SEMI_MAJOR_AXIS,
    };

    /// Bounds as `xmin ymin xmax ymax` words
    pub fn to_args(&self) -> [String; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax].map(|v| v.to_string())
    }
}

/// PROJ string for a gnomonic projection centred on the face
pub fn gnomonic_srs(face: &FaceSpec) -> String {
    format!(
        "+proj=gnom +lon_0={} +lat_0={} +datum=WGS84",
        face.longitude, face.latitude
    )
}

/// One reprojection request
#[derive(Debug, Clone)]
pub struct WarpJob {
    pub face: FaceSpec,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size: u32,
    pub extent: Extent,
    /// Extra source pixels read around each chunk
    pub source_extra: u32,
    /// Sample a full grid of points when computing source windows
    pub sample_grid: bool,
    pub overwrite: bool,
}

/// An engine that can reproject a raster onto a face
pub trait ReprojectionEngine {
    /// Tool name for messages
    fn name(&self) -> &str;

    /// Build the command for one job
    fn command(&self, job: &WarpJob) -> Invocation;
}

/// GDAL's `gdalwarp`
#[derive(Debug, Clone)]
pub struct Gdalwarp {
    pub program: PathBuf,
}

impl Gdalwarp {
    pub const PROGRAM: &'static str = "gdalwarp";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find `gdalwarp` on PATH
    pub fn detect() -> Option<Self> {
        find_tool(Self::PROGRAM).map(Self::new)
    }
}

impl Default for Gdalwarp {
    fn default() -> Self {
        Self::new(Self::PROGRAM)
    }
}

impl ReprojectionEngine for Gdalwarp {
    fn name(&self) -> &str {
        Self::PROGRAM
    }

    fn command(&self, job: &WarpJob) -> Invocation {
        let size = job.size.to_string();
        let sample_grid = if job.sample_grid { "YES" } else { "NO" };

        let mut inv = Invocation::new(&self.program)
            .arg("-wo")
            .arg(format!("SOURCE_EXTRA={}", job.source_extra))
            .arg("-wo")
            .arg(format!("SAMPLE_GRID={}", sample_grid))
            .arg("-te")
            .args(job.extent.to_args())
            .arg("-t_srs")
            .arg(gnomonic_srs(&job.face))
            .args(["-ts", &size, &size]);

        if job.overwrite {
            inv = inv.arg("-overwrite");
        }

        inv.arg(&job.source).arg(&job.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faces::FACES;

    fn job(face: FaceSpec) -> WarpJob {
        WarpJob {
            face,
            source: PathBuf::from("32k.Mars.Surface.tif"),
            destination: PathBuf::from("/tmp/out/mars_px.tif"),
            size: 512,
            extent: Extent::CUBE_FACE,
            source_extra: 500,
            sample_grid: true,
            overwrite: true,
        }
    }

    #[test]
    fn test_gnomonic_srs() {
        assert_eq!(
            gnomonic_srs(&FACES[1]),
            "+proj=gnom +lon_0=-90 +lat_0=0 +datum=WGS84"
        );
        assert_eq!(
            gnomonic_srs(&FACES[3]),
            "+proj=gnom +lon_0=0 +lat_0=-90 +datum=WGS84"
        );
    }

    #[test]
    fn test_cube_face_extent_args() {
        assert_eq!(
            Extent::CUBE_FACE.to_args(),
            ["-6378137", "-6378137", "6378137", "6378137"]
        );
    }

    #[test]
    fn test_gdalwarp_arguments() {
        let inv = Gdalwarp::default().command(&job(FACES[0]));

        assert_eq!(inv.program_name(), "gdalwarp");
        assert_eq!(
            inv.args_lossy(),
            vec![
                "-wo",
                "SOURCE_EXTRA=500",
                "-wo",
                "SAMPLE_GRID=YES",
                "-te",
                "-6378137",
                "-6378137",
                "6378137",
                "6378137",
                "-t_srs",
                "+proj=gnom +lon_0=90 +lat_0=0 +datum=WGS84",
                "-ts",
                "512",
                "512",
                "-overwrite",
                "32k.Mars.Surface.tif",
                "/tmp/out/mars_px.tif",
            ]
        );
    }

    #[test]
    fn test_gdalwarp_options_follow_job() {
        let mut j = job(FACES[5]);
        j.sample_grid = false;
        j.overwrite = false;
        j.source_extra = 0;

        let args = Gdalwarp::new("/opt/gdal/bin/gdalwarp").command(&j).args_lossy();
        assert!(args.contains(&"SAMPLE_GRID=NO".to_string()));
        assert!(args.contains(&"SOURCE_EXTRA=0".to_string()));
        assert!(!args.contains(&"-overwrite".to_string()));
    }
}
