mod cli;

use clap::Parser;
use prscore::config;
use prscore::model;
use prscore::report;
use prscore::{ChangeRequest, PrScoreError, Rating, ScoringConfig, ScoringEngine};
use std::io::Read;
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const BELOW_MIN_RATING: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn load(args: &cli::ConfigArgs) -> Result<ScoringConfig, PrScoreError> {
    if !args.root.exists() {
        return Err(PrScoreError::PathNotFound(args.root.display().to_string()));
    }
    config::load_config(&args.root, args.config.as_deref())
}

fn read_request(path: &Path) -> Result<ChangeRequest, PrScoreError> {
    let payload = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !path.exists() {
            return Err(PrScoreError::PathNotFound(path.display().to_string()));
        }
        std::fs::read_to_string(path)?
    };
    ChangeRequest::from_json(&payload)
}

fn run() -> Result<i32, PrScoreError> {
    let cli = cli::Cli::parse();
    prscore::telemetry::init(cli.verbose, cli.quiet)?;

    match cli.command {
        cli::Commands::Score(cmd) => {
            let loaded = load(&cmd.config)?;
            let request = read_request(&cmd.request)?;
            let client = model::from_settings(&loaded.model_settings(), cmd.offline);
            if client.is_none() && !cmd.offline {
                tracing::info!("no model command configured; scoring with heuristics only");
            }
            let engine = ScoringEngine::new(&loaded, client)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(engine.score(&request))?;

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            let rendered = report::render(&result, output_format)?;
            println!("{rendered}");

            match cmd.min_rating.map(Rating::from) {
                Some(min) if result.rating < min => {
                    if !cli.quiet {
                        eprintln!(
                            "rating {} is below the required {}",
                            result.rating, min
                        );
                    }
                    Ok(exit_code::BELOW_MIN_RATING)
                }
                _ => Ok(exit_code::SUCCESS),
            }
        }
        cli::Commands::Check(cmd) => {
            let loaded = load(&cmd.config)?;
            loaded.validate()?;

            let weights = loaded.weights();
            let thresholds = loaded.thresholds();
            let model_settings = loaded.model_settings();
            println!("config: ok");
            println!(
                "weights: clarity={:.2} context={:.2} completeness={:.2} ticket_link={:.2}",
                weights.clarity, weights.context, weights.completeness, weights.ticket_link
            );
            println!(
                "thresholds: excellent={:.2} good={:.2} needs_improvement={:.2}",
                thresholds.excellent, thresholds.good, thresholds.needs_improvement
            );
            println!(
                "suggestion threshold: {:.2}",
                loaded.suggestion_settings().threshold
            );
            println!(
                "model: {}",
                model_settings.command.as_deref().unwrap_or("none")
            );

            if let Some(warning) = loaded.weight_sum_warning() {
                if !cli.quiet {
                    eprintln!("warning: {warning}");
                }
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
