//! Trellis CLI
//!
//! Usage:
//!   trellis [OPTIONS] [FILE]
//!
//! Options:
//!   --width <W>    Canvas width offered to the root node
//!   --height <H>   Canvas height offered to the root node
//!   -c, --compact  Write the SVG on a single line
//!   -d, --debug    Log every node's resolved box
//!   -h, --help     Print help

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trellis::{render_scene, RenderConfig, Scene, SceneError, SvgConfig};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Lay out a TOML scene and write it as SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Canvas width, overriding the scene
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height, overriding the scene
    #[arg(long)]
    height: Option<f64>,

    /// Single-line output without the XML declaration
    #[arg(short, long)]
    compact: bool,

    /// Debug mode: log the resolved layout tree
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut scene = match load_scene(cli.input.as_deref()) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    scene.width = cli.width.or(scene.width);
    scene.height = cli.height.or(scene.height);

    let svg = SvgConfig::new()
        .with_pretty_print(!cli.compact)
        .with_standalone(!cli.compact);
    let config = RenderConfig::new().with_svg(svg).with_debug(cli.debug);
    match render_scene(&scene, config) {
        Ok(svg) => {
            println!("{}", svg);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Read the scene from `path`, or from stdin when no path is given
fn load_scene(path: Option<&Path>) -> Result<Scene, SceneError> {
    match path {
        Some(path) => Scene::from_file(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Scene::parse(&buffer)
        }
    }
}
