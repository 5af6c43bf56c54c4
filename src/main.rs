use casefile::cli::Args;
use casefile::models::ReportInput;
use casefile::reporter::HtmlReporter;
use casefile::summary::tally_categories;
use casefile::terminal::TerminalReporter;
use clap::Parser;
use env_logger::Env;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize logging based on verbosity and quiet flags
    let log_level = if args.quiet {
        "error"  // Only show critical errors when quiet
    } else if args.verbose {
        "debug"  // Show all debug info when verbose
    } else {
        "info"   // Default info level
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    log::info!("Casefile starting with args: {:?}", args);

    let input = ReportInput::from_file(&args.input)?;
    log::debug!(
        "Loaded {} scan result(s) from {}",
        input.data.len(),
        args.input.display()
    );

    match &args.output {
        Some(path) => {
            let reporter = HtmlReporter::new();
            reporter.generate_report(&input, path)?;

            // Completion summary with subtle styling
            println!("    \x1b[38;5;46m▶\x1b[0m \x1b[1;37mReport rendered successfully\x1b[0m \x1b[38;5;46m✓\x1b[0m");
            if input.threats_found {
                let tally = tally_categories(&input.data);
                println!("    \x1b[38;5;240m├─\x1b[0m Files flagged: \x1b[1;37m{}\x1b[0m", input.data.len());
                println!("    \x1b[38;5;240m├─\x1b[0m Threat categories: \x1b[1;37m{}\x1b[0m", tally.len());
            } else {
                println!("    \x1b[38;5;240m├─\x1b[0m No threats detected");
            }
            println!("    \x1b[38;5;240m└─\x1b[0m Output: \x1b[1;37m{}\x1b[0m", path.display());
        }
        None => {
            let reporter = if args.no_color {
                TerminalReporter::plain()
            } else {
                TerminalReporter::colored()
            };
            reporter.print(&input);
        }
    }

    Ok(())
}
