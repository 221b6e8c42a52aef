//! wav2usf - WAV to UGSF sound converter
//!
//! Converts PCM WAV files (8/16-bit, mono/stereo, any rate) to .usf sound
//! files holding 11025 Hz mono IMA ADPCM.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use wav2usf::formats::{USF_MAGIC, split_sound};
use wav2usf::{ConvertOptions, NibblePacking, convert_file, manifest};

#[derive(Parser)]
#[command(name = "wav2usf")]
#[command(about = "Convert WAV audio to UGSF (.usf) ADPCM sounds")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input WAV file
    input: Option<PathBuf>,

    /// Sound name stored in the header (default: input file name up to the first '.')
    #[arg(long)]
    name: Option<String>,

    /// Output .usf file (default: <name>.usf in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Placement of the first sample of each pair within a payload byte
    #[arg(long, value_enum, default_value_t = NibblePacking::LowFirst)]
    nibble_order: NibblePacking,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single WAV file
    Convert(ConvertArgs),

    /// Convert every sound listed in a manifest file
    Build {
        /// Path to sounds.toml manifest
        #[arg(default_value = "sounds.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to sounds.toml manifest
        #[arg(default_value = "sounds.toml")]
        manifest: PathBuf,
    },

    /// Print the header of a .usf file
    Inspect {
        /// Input .usf file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => run_convert(cli.convert)?,

        Some(Commands::Convert(args)) => run_convert(args)?,

        Some(Commands::Build { manifest, output }) => {
            tracing::info!("Building sounds from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let converted = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} sound(s) converted", converted.len());
        }

        Some(Commands::Check { manifest }) => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Some(Commands::Inspect { input }) => inspect(&input)?,
    }

    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let Some(input) = args.input else {
        anyhow::bail!("No input file given (usage: wav2usf <input.wav>)");
    };

    let options = ConvertOptions {
        name: args.name,
        nibble_order: args.nibble_order,
    };
    let converted = convert_file(&input, args.output.as_deref(), &options)
        .with_context(|| format!("Failed to convert {:?}", input))?;
    tracing::info!("Done! Wrote {:?}", converted.output);
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let (header, payload) =
        split_sound(&data).with_context(|| format!("Failed to parse {:?}", input))?;

    println!("File:            {}", input.display());
    println!("Magic:           {}", String::from_utf8_lossy(USF_MAGIC));
    println!("Version:         {}", header.version);
    println!("Name:            {}", header.name_str());
    println!(
        "Codec flags:     {} ({})",
        header.codec_flags,
        if header.is_adpcm() { "ADPCM" } else { "PCM" }
    );
    println!("Bits per sample: {}", header.bits_per_sample);
    println!("Channels:        {}", header.channels);
    println!("Sample rate:     {} Hz", header.sample_rate);
    println!("Loop count:      {}", header.loop_count);
    println!("Num samples:     {:#010X}", header.num_samples);
    println!("Payload:         {} bytes", payload.len());
    println!(
        "Samples:         {} ({:.3} s)",
        header.sample_count(payload.len()),
        header.sample_count(payload.len()) as f64 / header.sample_rate.max(1) as f64
    );
    Ok(())
}
