//! Resume screener: rank resumes against a job description

use clap::Parser;
use log::{error, info, warn};
use resume_screener::cli::{self, Cli, Commands, ConfigAction};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::InputManager;
use resume_screener::output::formatter::{save_report_to_file, ReportGenerator};
use resume_screener::processing::screener::{CancellationFlag, Screener};
use resume_screener::summary::{NoSummary, OpenAiSummarizer, Summarizer};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    // Load configuration
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        match e {
            ScreenerError::InputMissing(message) => warn!("{}", message),
            e => error!("Command failed: {}", e),
        }
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Options for a screening run gathered from the command line
struct ScreenOptions {
    job_description: String,
    resumes: Vec<PathBuf>,
    format: OutputFormat,
    save: Option<PathBuf>,
    detailed: bool,
    use_colors: bool,
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Screen {
            resumes,
            job,
            job_text,
            api_key,
            output,
            save,
            detailed,
            no_color,
        } => {
            let format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?,
                None => config.output.format,
            };

            let job_description = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, &["txt"])
                        .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
                    InputManager::new().load_job_description(&path).await?
                }
                (None, Some(text)) => text,
                (None, None) => String::new(),
            };

            let options = ScreenOptions {
                job_description,
                resumes,
                format,
                save,
                detailed,
                use_colors: config.output.color_output && !no_color,
            };

            match api_key.filter(|key| !key.is_empty()) {
                Some(key) => {
                    info!("Resume summaries enabled ({})", config.summary.model);
                    let summarizer = OpenAiSummarizer::new(key, config.summary.clone())?;
                    screen(&config, summarizer, options).await?;
                }
                None => screen(&config, NoSummary, options).await?,
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    println!("Scoring:");
                    println!("  Boost per shared skill: {:.2}", config.scoring.boost_per_skill);
                    println!("  Maximum score: {:.2}", config.scoring.max_score);
                    println!("\nSummaries:");
                    println!("  Endpoint: {}", config.summary.api_base);
                    println!("  Model: {}", config.summary.model);
                    println!("  Timeout: {}s", config.summary.timeout_secs);
                    println!("\nOutput:");
                    println!("  Format: {:?}", config.output.format);
                    println!("  Colors: {}", config.output.color_output);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

async fn screen<S: Summarizer>(config: &Config, summarizer: S, options: ScreenOptions) -> Result<()> {
    let show_progress = matches!(options.format, OutputFormat::Console);
    let screener = Screener::new(config, summarizer)?.with_progress(show_progress);

    // Ctrl-C stops after the resume currently being scored
    let cancel = CancellationFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current resume");
            signal_flag.cancel();
        }
    });

    let report = screener
        .screen_paths(&options.job_description, &options.resumes, &cancel)
        .await?;

    let generator = ReportGenerator::with_options(options.use_colors, options.detailed, true, true);
    let rendered = generator.generate_report(&report, &options.format)?;

    match &options.save {
        Some(path) => {
            // Files never get terminal color codes
            let plain = ReportGenerator::with_options(false, options.detailed, true, true)
                .generate_report(&report, &options.format)?;
            save_report_to_file(&plain, path)?;
            println!("{}", rendered);
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if let Some(top) = report.top() {
        info!("Best match: {} ({:.2}%)", top.filename, top.final_score_percent);
    }
    Ok(())
}
