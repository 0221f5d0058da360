mod config;
mod decode_cmd;
mod list_cmd;
mod show_cmd;
mod terminal_output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use sampleview_config::{apply_merge_patch, load_and_prepare, prepare, validate, ViewerConfig};
use sampleview_core::{load_jsonl, Sample, ViewerError};
use sampleview_logging::{init_logger, EventLogger, ViewerEvent};

use config::{override_patch, use_color, CliConfig};

#[derive(Parser)]
#[command(name = "sampleview")]
#[command(about = "Inspect evaluation transcript exports in the terminal")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.sampleview/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the samples in a JSONL export
    List { file: PathBuf },
    /// Render one sample: status, summary, conversation and payloads
    Show {
        file: PathBuf,
        /// Zero-based sample index
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Force ANSI colour
        #[arg(long)]
        ansi: bool,
        /// Show payloads as JSON dumps instead of rendering text fields
        #[arg(long)]
        raw: bool,
    },
    /// Decode a marker-annotated payload (`-` reads stdin)
    Decode {
        input: String,
        /// Print the decoded sections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Expand JSON serialised inside strings of a JSON document (`-` reads stdin)
    Expand {
        input: String,
        /// Nesting budget
        #[arg(long)]
        depth: Option<u32>,
        /// Show expanded strings in place instead of wrapped
        #[arg(long)]
        inline: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        terminal_output::note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cli_config = CliConfig::resolve(cli.config, cli.log_level);

    let (depth, inline) = match &cli.command {
        Commands::Expand { depth, inline, .. } => (*depth, *inline),
        _ => (None, false),
    };
    let config = load_config(&cli_config, depth, inline).await?;

    let logging = config.logging.clone().unwrap_or_default();
    let log_dir = logging.dir.as_deref().map(str::trim).filter(|d| !d.is_empty());
    init_logger(log_dir.map(Path::new), config.log_level(), logging.json.unwrap_or(true));
    info!(config = %cli_config.config_path.display(), "Starting sampleview");
    // Validation ran before the logger existed.
    for warning in validate(&config).warnings {
        terminal_output::note_warn(&warning.to_string());
    }

    let options = config.render_options();

    match cli.command {
        Commands::List { file } => {
            let samples = load_samples(&file).await?;
            let color = use_color(&config, false);
            terminal_output::write_stdout(&list_cmd::render_list(&samples, color))?;
        }
        Commands::Show { file, index, ansi, raw } => {
            let samples = load_samples(&file).await?;
            let text = show_cmd::show_sample(&samples, index, raw, &options, use_color(&config, ansi))?;
            terminal_output::write_stdout(&text)?;
        }
        Commands::Decode { input, json } => {
            let text = decode_cmd::read_input(&input).await?;
            let out = decode_cmd::decode_text(&text, &options, json, use_color(&config, false))?;
            terminal_output::write_stdout(&out)?;
        }
        Commands::Expand { input, .. } => {
            let text = decode_cmd::read_input(&input).await?;
            terminal_output::write_stdout(&decode_cmd::expand_text(&text, &options)?)?;
        }
    }

    Ok(())
}

/// Config file, then command-line overrides, validated together.
async fn load_config(cli_config: &CliConfig, depth: Option<u32>, inline: bool) -> Result<ViewerConfig, ViewerError> {
    let as_config_error = |e: anyhow::Error| ViewerError::Config(format!("{e:#}"));

    let config = load_and_prepare(&cli_config.config_path).await.map_err(as_config_error)?;
    let patch = override_patch(cli_config.log_level.as_deref(), depth, inline);
    let config = apply_merge_patch(&config, &patch).map_err(as_config_error)?;
    prepare(config).map_err(as_config_error)
}

/// Load a JSONL export, reporting skipped lines.
async fn load_samples(path: &Path) -> Result<Vec<Sample>> {
    let source = path.display().to_string();
    let (samples, errors) = match load_jsonl(path).await {
        Ok(loaded) => loaded,
        Err(e) => {
            EventLogger::log_event(
                "load",
                ViewerEvent::LoadFailure {
                    path: source,
                    line: None,
                    message: e.to_string(),
                },
            );
            return Err(e.into());
        }
    };

    for error in &errors {
        let line = match error {
            ViewerError::Parse { line, .. } => Some(*line),
            _ => None,
        };
        EventLogger::log_event(
            "load",
            ViewerEvent::LoadFailure {
                path: source.clone(),
                line,
                message: error.to_string(),
            },
        );
    }
    if !errors.is_empty() {
        terminal_output::note_warn(&format!("Skipped {} unreadable line(s) in {source}", errors.len()));
    }

    EventLogger::log_event(
        "load",
        ViewerEvent::SampleLoaded {
            path: source,
            samples: samples.len(),
            errors: errors.len(),
        },
    );
    if samples.is_empty() {
        terminal_output::note_info("No samples found");
    }
    Ok(samples)
}
