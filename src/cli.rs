use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "casefile",
    about = "Casefile - Threat analysis report renderer for content scan results",
    version
)]
pub struct Args {
    /// Scan-results JSON file to render
    #[arg(value_name = "REPORT_JSON")]
    pub input: PathBuf,

    /// Write an HTML report to this path instead of printing to the terminal
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable colored terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging of all operations
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log critical errors
    #[arg(short, long)]
    pub quiet: bool,
}
