//! CLI command definitions and handlers

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use cubefaces::generator::{find_converter, find_reprojector, PlannedFace};
use cubefaces::{
    Config, CubefaceError, FaceGenerator, FaceResult, FaceStatus, FailurePolicy, Gdalwarp,
    GenerationReport, Magick, Options, Request, FACES,
};

/// cubefaces - gnomonic cube faces from an equirectangular planet image
#[derive(Parser, Debug)]
#[command(name = "cubefaces")]
#[command(version)]
#[command(about = "Make gnomonic cube faces (+X, -X, +Y, -Y, +Z, -Z) from a WGS84 image")]
#[command(after_help = "\
EXAMPLES:
    cubefaces 32k.Mars.Surface.tif mars_basecolor 2048 sRGB .
    cubefaces mars.tif mars 512 sRGB out --dry-run
    cubefaces mars.tif mars 512 sRGB out --fail-fast --json

OUTPUT:
    <output_path>/<output_name>_{px,nx,py,ny,pz,nz}.tif   reprojected rasters
    <output_path>/<output_name>_{px,nx,py,ny,pz,nz}.png   final faces

REQUIRES:
    gdalwarp (GDAL) and magick or convert (ImageMagick) on PATH,
    or their paths set in ~/.config/cubefaces/config.yaml")]
pub struct Cli {
    /// Equirectangular WGS84 (EPSG:4326) source image
    pub input_image: PathBuf,

    /// Filename prefix for all outputs
    pub output_name: String,

    /// Width and height of each face in pixels
    #[arg(allow_negative_numbers = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,

    /// Colorspace tag for the converter (e.g. sRGB)
    pub colorspace: String,

    /// Existing directory for all outputs
    pub output_path: PathBuf,

    /// Config file (default: ~/.config/cubefaces/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop at the first failed face
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-step timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn request(&self) -> Request {
        Request {
            input_image: self.input_image.clone(),
            output_name: self.output_name.clone(),
            size: self.size,
            colorspace: self.colorspace.clone(),
            output_path: self.output_path.clone(),
        }
    }

    /// Config file merged with command line overrides
    fn config(&self) -> Result<Config, CubefaceError> {
        let mut config = Config::load(self.config.as_deref())?;

        if self.fail_fast {
            config.on_failure = FailurePolicy::Abort;
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }
}

/// Run the CLI
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.config()?;
    let request = cli.request();
    request.validate()?;

    if cli.dry_run {
        return cmd_dry_run(&cli, &config, &request);
    }

    let reprojector = find_reprojector(&config).ok_or_else(|| CubefaceError::ToolMissing {
        tool: Gdalwarp::PROGRAM.to_string(),
        face: FACES[0].suffix,
    })?;
    let converter = find_converter(&config).ok_or_else(|| CubefaceError::ToolMissing {
        tool: "magick".to_string(),
        face: FACES[0].suffix,
    })?;

    tracing::debug!(
        "Using {} and {}",
        reprojector.program.display(),
        converter.program.display()
    );

    let generator = FaceGenerator::new(reprojector, converter, Options::from(&config));
    let show_progress = !cli.quiet && !cli.json;

    let report = generator
        .generate(&request, |result| {
            if show_progress {
                print_face_result(result);
            }
        })
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_summary(&report);
    }

    report.into_result()?;
    Ok(())
}

/// Print the commands a run would execute
fn cmd_dry_run(cli: &Cli, config: &Config, request: &Request) -> Result<()> {
    let generator = FaceGenerator::new(
        find_reprojector(config).unwrap_or_default(),
        find_converter(config).unwrap_or_else(Magick::default),
        Options::from(config),
    );
    let plan = generator.plan(request);

    if cli.json {
        let items: Vec<_> = plan
            .iter()
            .map(|p| {
                serde_json::json!({
                    "face": p.face.suffix,
                    "reproject": argv(&p.reproject),
                    "convert": argv(&p.convert),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for PlannedFace {
            face,
            reproject,
            convert,
        } in &plan
        {
            println!("# {} ({})", face.suffix, face.axis());
            println!("{}", reproject);
            println!("{}", convert);
        }
    }

    Ok(())
}

fn argv(invocation: &cubefaces_core::Invocation) -> Vec<String> {
    std::iter::once(invocation.program_name())
        .chain(invocation.args_lossy())
        .collect()
}

// Output formatting functions

fn print_face_result(result: &FaceResult) {
    let duration_str = format_duration(result.duration_ms);

    match result.status {
        FaceStatus::Done => println!(
            "[\x1b[2m{:>5}\x1b[0m] \x1b[32mok\x1b[0m {} -> {}",
            duration_str,
            result.face,
            result.png.display()
        ),
        FaceStatus::Failed => {
            println!(
                "[\x1b[2m{:>5}\x1b[0m] \x1b[31mFAIL\x1b[0m {}",
                duration_str, result.face
            );
            if let Some(error) = &result.error {
                print_errors(error);
            }
        }
        FaceStatus::Skipped => println!(
            "[\x1b[2m  -  \x1b[0m] \x1b[33mskip\x1b[0m {} \x1b[2m(earlier face failed)\x1b[0m",
            result.face
        ),
    }
}

fn print_errors(output: &str) {
    for line in output.lines() {
        println!("     \x1b[2m{}\x1b[0m", line);
    }
}

fn print_summary(report: &GenerationReport) {
    println!("----------------------------");
    let duration_str = format_duration(report.duration_ms);
    if report.success {
        println!("Total: {} All {} faces generated", duration_str, report.faces.len());
    } else {
        println!(
            "Total: {} {} face(s) failed: {}",
            duration_str,
            report.failed_faces().len(),
            report.failed_faces().join(", ")
        );
    }
}

/// Format duration in milliseconds to human-readable string
fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60000;
        let secs = (ms % 60000) / 1000;
        format!("{}m{}s", mins, secs)
    }
}
