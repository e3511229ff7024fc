//! cubefaces - gnomonic cube faces for cube-mapping
//!
//! Reprojects an equirectangular WGS84 planet image onto the six faces of a
//! cube with gdalwarp and converts each face to PNG with ImageMagick.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use cubefaces::CubefaceError;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(async { cli::run(cli).await }) {
        let code = e
            .downcast_ref::<CubefaceError>()
            .map(CubefaceError::exit_code)
            .unwrap_or(1);
        eprintln!("ERROR: {:#}", e);
        std::process::exit(code);
    }

    Ok(())
}
