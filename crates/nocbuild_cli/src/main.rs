//! nocbuild CLI — compiles an image description into its build artifacts.
//!
//! Reads a YAML image description, resolves it against the io-signature
//! catalog, the device descriptor, and the available block descriptors,
//! then writes the static routing table and the image core source.

#![warn(missing_docs)]

mod build;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

/// nocbuild — static-routing and image-core builder for RFNoC designs.
#[derive(Parser, Debug)]
#[command(name = "nocbuild", version, about = "RFNoC image builder")]
pub struct Cli {
    /// Path to the image description YAML file.
    pub source: PathBuf,

    /// Directory holding `io_signatures.yml`, the device BSP descriptors,
    /// and a `blocks/` subdirectory of block descriptors.
    #[arg(short = 'c', long)]
    pub config_dir: PathBuf,

    /// Target device name (selects `<device>_bsp.yml`).
    #[arg(short, long)]
    pub device: String,

    /// Additional directories to search for block descriptors.
    #[arg(short = 'I', long = "include-dir")]
    pub include_dirs: Vec<PathBuf>,

    /// Output path for the image core source.
    ///
    /// Defaults to the source file with a `.v` extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output path for the static routing table.
    ///
    /// Defaults to `<device>_static_router.hex` next to the source file.
    #[arg(long)]
    pub router_hex: Option<PathBuf>,

    /// Write the routing table only; skip image-core rendering.
    #[arg(long)]
    pub generate_only: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored diagnostic output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

fn main() {
    let cli = Cli::parse();
    let renderer = render::ImageCoreStub;

    match build::run(&cli, &renderer) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
