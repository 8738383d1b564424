use clap::{Parser, Subcommand};
use score2midi::{validate_input, Config, ScoreToMidi};
use std::path::PathBuf;

/// Score-to-MIDI Transcription System
#[derive(Parser)]
#[command(name = "score2midi")]
#[command(about = "Convert photographed single-staff scores to MIDI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a score image and generate MIDI output
    Analyze {
        /// Input score image (PNG/JPEG)
        input: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Custom configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Playback tempo override in BPM
        #[arg(long)]
        bpm: Option<f64>,

        /// Clef override (treble, bass, alto)
        #[arg(long)]
        clef: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Quiet output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config: PathBuf,
    },
    /// Show default configuration
    ShowConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            config,
            bpm,
            clef,
            verbose,
            quiet,
        } => {
            if verbose && quiet {
                anyhow::bail!("Cannot specify both --verbose and --quiet");
            }

            // Load configuration
            let mut config = if let Some(config_path) = config {
                score2midi::config::load_config(config_path)?
            } else {
                Config::default()
            };

            // Apply command-line overrides
            if let Some(bpm) = bpm {
                if bpm <= 0.0 {
                    anyhow::bail!("--bpm must be positive");
                }
                config.midi.bpm = bpm;
            }
            if let Some(clef) = clef {
                if score2midi::notation::Clef::parse(&clef).is_none() {
                    anyhow::bail!("unknown clef '{}', expected treble, bass, or alto", clef);
                }
                config.clef.default_clef = clef;
            }

            // Validate input
            validate_input(&input, &config)?;

            // Create processor
            let processor = ScoreToMidi::new(config);

            // Process image
            if !quiet {
                println!("Processing {}...", input.display());
            }

            processor.process(&input, &output)?;

            if !quiet {
                println!("Results saved to {}", output.display());
            }
        }
        Commands::ValidateConfig { config } => {
            let config = score2midi::config::load_config(config)?;
            println!("Configuration is valid");
            if let Ok(json) = serde_json::to_string_pretty(&config) {
                println!("{}", json);
            }
        }
        Commands::ShowConfig => {
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
    }

    Ok(())
}
