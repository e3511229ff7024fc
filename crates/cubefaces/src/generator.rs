//! Face generation
//!
//! For each cube face, in table order: reproject the source raster with the
//! face's gnomonic projection, then convert the result to PNG. Faces are
//! independent of one another and processed one at a time.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use cubefaces_core::process::{self, ProcessError};
use cubefaces_core::Invocation;
use tracing::{debug, info, warn};

use crate::config::{Config, FailurePolicy};
use crate::convert::{ConvertJob, Flavor, ImageConverter, Magick};
use crate::error::CubefaceError;
use crate::faces::{FaceSpec, FACES};
use crate::reproject::{Extent, Gdalwarp, ReprojectionEngine, WarpJob};

/// Lines of stderr kept per failed step
const STDERR_LINES: usize = 10;

/// What to generate and where
#[derive(Debug, Clone)]
pub struct Request {
    /// Equirectangular WGS84 source raster
    pub input_image: PathBuf,
    /// Filename prefix for every output
    pub output_name: String,
    /// Width and height of each face in pixels
    pub size: u32,
    /// Colorspace tag passed to the converter
    pub colorspace: String,
    /// Existing directory receiving all outputs
    pub output_path: PathBuf,
}

impl Request {
    /// Reject requests that cannot produce any output
    ///
    /// The input image is deliberately not inspected.
    pub fn validate(&self) -> Result<(), CubefaceError> {
        if self.size == 0 {
            return Err(CubefaceError::InvalidArguments(
                "size must be a positive integer".to_string(),
            ));
        }
        if self.output_name.is_empty() {
            return Err(CubefaceError::InvalidArguments(
                "output name must not be empty".to_string(),
            ));
        }
        if !self.output_path.is_dir() {
            return Err(CubefaceError::InvalidArguments(format!(
                "output path is not a directory: {}",
                self.output_path.display()
            )));
        }
        Ok(())
    }

    fn warp_job(&self, face: FaceSpec, options: &Options) -> WarpJob {
        WarpJob {
            face,
            source: self.input_image.clone(),
            destination: face.tif_path(&self.output_path, &self.output_name),
            size: self.size,
            extent: Extent::CUBE_FACE,
            source_extra: options.source_extra,
            sample_grid: options.sample_grid,
            overwrite: true,
        }
    }

    fn convert_job(&self, face: FaceSpec) -> ConvertJob {
        ConvertJob {
            source: face.tif_path(&self.output_path, &self.output_name),
            colorspace: self.colorspace.clone(),
            destination: face.png_path(&self.output_path, &self.output_name),
        }
    }
}

/// Tunables for a run
#[derive(Debug, Clone)]
pub struct Options {
    pub source_extra: u32,
    pub sample_grid: bool,
    pub timeout: Option<Duration>,
    pub on_failure: FailurePolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        Self {
            source_extra: config.source_extra,
            sample_grid: config.sample_grid,
            timeout: config.timeout_secs.map(Duration::from_secs),
            on_failure: config.on_failure,
        }
    }
}

/// Step of a face that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Reproject,
    Convert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceStatus {
    Done,
    Failed,
    /// Not attempted because an earlier face failed under the abort policy
    Skipped,
}

/// Outcome of one face
#[derive(Debug, Clone, Serialize)]
pub struct FaceResult {
    pub face: &'static str,
    pub longitude: i32,
    pub latitude: i32,
    pub tif: PathBuf,
    pub png: PathBuf,
    pub status: FaceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl FaceResult {
    fn new(face: FaceSpec, request: &Request, status: FaceStatus) -> Self {
        Self {
            face: face.suffix,
            longitude: face.longitude,
            latitude: face.latitude,
            tif: face.tif_path(&request.output_path, &request.output_name),
            png: face.png_path(&request.output_path, &request.output_name),
            status,
            stage: None,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn success(&self) -> bool {
        self.status == FaceStatus::Done
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub success: bool,
    pub duration_ms: u64,
    pub faces: Vec<FaceResult>,
}

impl GenerationReport {
    /// Suffixes of faces that did not complete
    pub fn failed_faces(&self) -> Vec<&'static str> {
        self.faces
            .iter()
            .filter(|f| !f.success())
            .map(|f| f.face)
            .collect()
    }

    /// Turn an unsuccessful report into a `PartialOutput` error
    pub fn into_result(self) -> Result<Self, CubefaceError> {
        if self.success {
            Ok(self)
        } else {
            Err(CubefaceError::PartialOutput {
                failed: self.failed_faces(),
            })
        }
    }
}

/// The two commands needed for one face
#[derive(Debug, Clone)]
pub struct PlannedFace {
    pub face: FaceSpec,
    pub reproject: Invocation,
    pub convert: Invocation,
}

/// Drives the reprojection engine and image converter over all faces
pub struct FaceGenerator<R, C> {
    reprojector: R,
    converter: C,
    options: Options,
}

impl<R: ReprojectionEngine, C: ImageConverter> FaceGenerator<R, C> {
    pub fn new(reprojector: R, converter: C, options: Options) -> Self {
        Self {
            reprojector,
            converter,
            options,
        }
    }

    /// Every command a run would execute, in order
    pub fn plan(&self, request: &Request) -> Vec<PlannedFace> {
        FACES
            .iter()
            .map(|&face| PlannedFace {
                face,
                reproject: self
                    .reprojector
                    .command(&request.warp_job(face, &self.options)),
                convert: self.converter.command(&request.convert_job(face)),
            })
            .collect()
    }

    /// Generate all six faces
    ///
    /// Face failures are recorded in the report. Only a missing tool aborts
    /// the run with an error. `on_face` is called as each face finishes.
    pub async fn generate<F>(
        &self,
        request: &Request,
        mut on_face: F,
    ) -> Result<GenerationReport, CubefaceError>
    where
        F: FnMut(&FaceResult),
    {
        request.validate()?;

        let start = Instant::now();
        let mut faces = Vec::with_capacity(FACES.len());
        let mut aborted = false;

        for planned in self.plan(request) {
            let face = planned.face;

            if aborted {
                let result = FaceResult::new(face, request, FaceStatus::Skipped);
                on_face(&result);
                faces.push(result);
                continue;
            }

            let face_start = Instant::now();
            let mut result = FaceResult::new(face, request, FaceStatus::Done);

            let outcome = match self
                .run_step(&face, self.reprojector.name(), &planned.reproject, &result.tif)
                .await
            {
                Ok(()) => self
                    .run_step(&face, self.converter.name(), &planned.convert, &result.png)
                    .await
                    .map_err(|e| (Stage::Convert, e)),
                Err(e) => Err((Stage::Reproject, e)),
            };

            match outcome {
                Ok(()) => info!(face = face.suffix, "face generated"),
                Err((_, e @ CubefaceError::ToolMissing { .. })) => return Err(e),
                Err((stage, e)) => {
                    warn!(face = face.suffix, "{}", e);
                    result.status = FaceStatus::Failed;
                    result.stage = Some(stage);
                    result.error = Some(e.to_string());
                    aborted = self.options.on_failure == FailurePolicy::Abort;
                }
            }

            result.duration_ms = face_start.elapsed().as_millis() as u64;
            on_face(&result);
            faces.push(result);
        }

        Ok(GenerationReport {
            success: faces.iter().all(FaceResult::success),
            duration_ms: start.elapsed().as_millis() as u64,
            faces,
        })
    }

    /// Run one external step and check that it produced `expected`
    async fn run_step(
        &self,
        face: &FaceSpec,
        tool: &str,
        invocation: &Invocation,
        expected: &Path,
    ) -> Result<(), CubefaceError> {
        debug!(face = face.suffix, tool, "{}", invocation);

        let output = process::run(invocation, self.options.timeout)
            .await
            .map_err(|e| match e {
                ProcessError::NotFound { .. } => CubefaceError::ToolMissing {
                    tool: tool.to_string(),
                    face: face.suffix,
                },
                ProcessError::TimedOut { secs, .. } => CubefaceError::TimedOut {
                    tool: tool.to_string(),
                    face: face.suffix,
                    secs,
                },
                ProcessError::Spawn { source, .. } => CubefaceError::Spawn {
                    tool: tool.to_string(),
                    face: face.suffix,
                    reason: source.to_string(),
                },
            })?;

        if !output.success {
            return Err(CubefaceError::ToolFailed {
                tool: tool.to_string(),
                face: face.suffix,
                code: output.code,
                stderr: output.stderr_tail(STDERR_LINES),
            });
        }

        if !expected.exists() {
            return Err(CubefaceError::OutputMissing {
                tool: tool.to_string(),
                face: face.suffix,
                path: expected.to_path_buf(),
            });
        }

        debug!(face = face.suffix, tool, "finished in {}ms", output.duration_ms);
        Ok(())
    }
}

/// Configured gdalwarp, or the one on PATH
pub fn find_reprojector(config: &Config) -> Option<Gdalwarp> {
    match &config.gdalwarp {
        Some(path) => Some(Gdalwarp::new(path)),
        None => Gdalwarp::detect(),
    }
}

/// Configured ImageMagick binary, or whichever flavor is on PATH
pub fn find_converter(config: &Config) -> Option<Magick> {
    match &config.magick {
        Some(path) => Some(Magick::new(Flavor::from_path(path), path)),
        None => Magick::detect(),
    }
}
