use clap::{Args, Parser, Subcommand, ValueEnum};
use prscore::Rating;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prscore",
    version,
    about = "Composite quality scoring for code change requests"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a change request read from a JSON file
    Score(ScoreCommand),
    /// Validate the effective configuration
    Check(CheckCommand),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file used instead of ./prscore.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory searched for prscore.toml and .prscore/local.toml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Change request JSON, or `-` for stdin
    pub request: PathBuf,
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
    /// Never call the language model
    #[arg(long)]
    pub offline: bool,
    /// Exit with status 1 when the rating is below this band
    #[arg(long, value_enum)]
    pub min_rating: Option<MinRating>,
}

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MinRating {
    Poor,
    NeedsImprovement,
    Good,
    Excellent,
}

impl From<MinRating> for Rating {
    fn from(value: MinRating) -> Self {
        match value {
            MinRating::Poor => Rating::Poor,
            MinRating::NeedsImprovement => Rating::NeedsImprovement,
            MinRating::Good => Rating::Good,
            MinRating::Excellent => Rating::Excellent,
        }
    }
}
