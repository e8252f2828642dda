//! posekit - combine animation clips and export poses from rigged models
//!
//! Reads .glb/.gltf models (or JSON rig documents), stitches clips together
//! and writes pose snapshots as animation scripts (`<NAME>.js`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod input;

#[derive(Parser)]
#[command(name = "posekit")]
#[command(about = "Combine animation clips and export poses from rigged models")]
#[command(version)]
struct Cli {
    /// JSON config overriding quantizer/combiner defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bones and clips of a model
    Inspect {
        /// Input model (.glb/.gltf/.json)
        model: PathBuf,

        /// Additional animation files to import
        #[arg(short, long = "import")]
        imports: Vec<PathBuf>,
    },

    /// Concatenate clips (in the given order) into one clip
    Combine {
        /// Input model (.glb/.gltf/.json)
        model: PathBuf,

        /// Clip names, in playback order (repeat the flag)
        #[arg(short, long = "clip", required = true)]
        clips: Vec<String>,

        /// Additional animation files to import
        #[arg(short, long = "import")]
        imports: Vec<PathBuf>,

        /// Output .json file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the current pose as an animation script
    Export {
        /// Input model (.glb/.gltf/.json)
        model: PathBuf,

        /// Pose the skeleton from this clip first
        #[arg(short, long)]
        clip: Option<String>,

        /// Playback time in seconds (default: config pose_sample_time)
        #[arg(short, long, requires = "clip")]
        time: Option<f32>,

        /// Export name (default: model file name without extension)
        #[arg(short, long)]
        name: Option<String>,

        /// Additional animation files to import
        #[arg(short, long = "import")]
        imports: Vec<PathBuf>,

        /// Output directory for <NAME>.js (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let cfg = input::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { model, imports } => {
            let session = commands::open_session(&model, &imports, cfg)?;
            print!("{}", commands::inspect(&session));
        }

        Commands::Combine {
            model,
            clips,
            imports,
            output,
        } => {
            let mut session = commands::open_session(&model, &imports, cfg)?;
            tracing::info!("Combining {:?}", clips);
            let json = commands::combine(&mut session, &clips)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!("Wrote {:?}", path);
                }
                None => println!("{json}"),
            }
        }

        Commands::Export {
            model,
            clip,
            time,
            name,
            imports,
            output,
        } => {
            let mut session = commands::open_session(&model, &imports, cfg)?;
            let (file_name, text) =
                commands::export(&mut session, clip.as_deref(), time, name.as_deref())?;
            if let Some(path) = commands::deliver(output.as_deref(), &file_name, &text)? {
                tracing::info!("Wrote {:?}", path);
            }
        }
    }

    Ok(())
}
