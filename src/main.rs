use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use speak_confident::app::{Controller, SubmitError, ViewState};
use speak_confident::config::{mask_key, Config};
use speak_confident::ui::{loading, report};
use speak_confident::{AnalysisGateway, RawFile};

#[derive(Parser, Debug)]
#[command(name = "speak-confident", version, about = "Get AI coaching feedback on a practice presentation")]
struct Cli {
    /// Config file (defaults to ~/.config/speak-confident/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze an audio or video recording
    Analyze(AnalyzeArgs),
    /// Show or update saved settings
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Recording to analyze (max 20MB)
    file: PathBuf,

    /// Override the MIME type inferred from the file extension
    #[arg(long)]
    mime: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    fallback_model: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the raw result as JSON instead of the report
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(long)]
    api_key: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    fallback_model: Option<String>,

    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        Command::Analyze(args) => run_analyze(&config_path, args).await,
        Command::Config(args) => run_config(&config_path, args),
    }
}

async fn run_analyze(config_path: &Path, args: AnalyzeArgs) -> ExitCode {
    let mut config = Config::load_from(config_path);
    config.apply_env(|var| std::env::var(var).ok());
    if let Some(model) = args.model {
        config.primary_model = model;
    }
    if let Some(model) = args.fallback_model {
        config.fallback_model = model;
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }
    log::debug!("Using {config:?}");

    let mut raw = match RawFile::from_path(&args.file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Could not read {}: {e}", args.file.display());
            return ExitCode::from(2);
        }
    };
    if let Some(mime) = args.mime {
        raw.mime_type = mime;
    }

    let gateway = match AnalysisGateway::new(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Could not set up the Gemini client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut controller = Controller::new(gateway);
    if let Err(e) = controller.start() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let submitted = loading::with_progress(
        controller.submit(raw),
        loading::MESSAGE_INTERVAL,
        |msg| eprintln!("{msg}"),
    )
    .await;

    let code = match submitted {
        Err(SubmitError::Invalid(e)) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Ok(()) => print_outcome(&controller, args.json),
    };

    // Releases the preview copy.
    if let Err(e) = controller.reset() {
        log::warn!("{e}");
    }
    code
}

fn print_outcome(controller: &Controller, json: bool) -> ExitCode {
    match (controller.state(), controller.result()) {
        (ViewState::Results, Some(result)) => {
            if json {
                match serde_json::to_string_pretty(result) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("Could not serialize result: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", report::render_report(result, chrono::Local::now()));
            }
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Analysis Failed");
            eprintln!("{}", controller.error_message());
            ExitCode::FAILURE
        }
    }
}

fn run_config(config_path: &Path, args: ConfigArgs) -> ExitCode {
    let mut config = Config::load_from(config_path);
    let changed = args.api_key.is_some()
        || args.model.is_some()
        || args.fallback_model.is_some()
        || args.timeout.is_some();

    if let Some(key) = args.api_key {
        config.gemini_api_key = key.trim().to_string();
    }
    if let Some(model) = args.model {
        config.primary_model = model;
    }
    if let Some(model) = args.fallback_model {
        config.fallback_model = model;
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }

    if changed {
        if let Err(e) = config.save_to(config_path) {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
        log::info!("Saved config to {}", config_path.display());
    }

    println!("config file:      {}", config_path.display());
    println!("api key:          {}", mask_key(&config.gemini_api_key));
    println!("primary model:    {}", config.primary_model);
    println!("fallback model:   {}", config.fallback_model);
    println!("api base:         {}", config.api_base);
    println!("timeout (secs):   {}", config.request_timeout_secs);
    ExitCode::SUCCESS
}
