//! Triband Render - offline three-band compression of WAV files
//!
//! ## Usage
//!
//! ```text
//! triband-render render in.wav out.wav --set "Threshold Low Band=-18" --set "Ratio Low Band=4"
//! triband-render params
//! ```
//!
//! Engine settings come from `--config`, or from the default config file
//! (`~/.config/triband/config.yaml`) when it exists.

mod render;
mod wav;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;

use render::{render_file, RenderOptions};
use triband_core::config::{default_config_path, load_config, read_config, save_config, EngineConfig};
use triband_core::dsp::gain_to_db;
use triband_core::params::{ParamId, ParamKind, ParameterStore};
use triband_core::Band;

/// Three-band crossover compressor for WAV files
#[derive(Parser, Debug)]
#[command(name = "triband-render")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a WAV file through the compressor
    Render {
        /// Input WAV file (mono or stereo)
        input: PathBuf,

        /// Output WAV file (32-bit float)
        output: PathBuf,

        /// Engine config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Parameter assignment, e.g. "Gain Out=-3" (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Bypass compression on every band
        #[arg(long)]
        bypass_all: bool,

        /// Write the effective settings to this config file after rendering
        #[arg(long, value_name = "PATH")]
        save_config: Option<PathBuf>,
    },

    /// List every parameter with its range and default
    Params,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            set,
            bypass_all,
            save_config: save_path,
        } => {
            let config: EngineConfig = match config {
                Some(path) => read_config(&path)?,
                None => load_config(&default_config_path()),
            };
            let options = RenderOptions {
                config,
                assignments: set,
                bypass_all,
            };
            run_render(&input, &output, &options, save_path)
        }
        Commands::Params => {
            print_params();
            Ok(())
        }
    }
}

fn run_render(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
    save_path: Option<PathBuf>,
) -> Result<()> {
    log::info!("triband-render v{}", env!("CARGO_PKG_VERSION"));

    let summary = render_file(input, output, options)
        .with_context(|| format!("Failed to render {:?}", input))?;

    println!(
        "Rendered {} frames at {} Hz in {} blocks",
        summary.frames, summary.sample_rate, summary.blocks
    );
    println!(
        "Peak: in {:.2} dB, out {:.2} dB",
        gain_to_db(summary.input_peak),
        gain_to_db(summary.output_peak)
    );
    for band in Band::ALL {
        let levels = summary.levels[band.index()];
        println!(
            "  {:<10} in {:>7.1} dB  out {:>7.1} dB",
            band.name(),
            levels.input_rms_db,
            levels.output_rms_db
        );
    }

    if let Some(path) = save_path {
        let store = render::build_store(options)?;
        let mut config = options.config.clone();
        config.capture_params(&store);
        save_config(&config, &path)?;
        println!("Saved settings to {:?}", path);
    }
    Ok(())
}

fn print_params() {
    let store = ParameterStore::new();
    println!("{:<30} {:<22} {}", "Parameter", "Range", "Default");
    for id in ParamId::ALL {
        let spec = id.spec();
        let range = match spec.kind {
            ParamKind::Float { min, max, .. } => format!("{} .. {}", spec.display(min), spec.display(max)),
            ParamKind::Choice { choices } => format!(
                "{} .. {}",
                spec.display(0.0),
                spec.display(choices.len().saturating_sub(1) as f32)
            ),
            ParamKind::Bool => "Off / On".to_string(),
        };
        println!("{:<30} {:<22} {}", spec.name, range, spec.display(store.get(id)));
    }
}
