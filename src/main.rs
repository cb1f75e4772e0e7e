use clap::Parser;
use extarrange::cli::run_cli;
use extarrange::config::Settings;
use extarrange::output::OutputFormatter;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Move files with a given extension into one folder", long_about = None)]
struct Args {
    /// Settings file to use instead of the default lookup
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "extarrange=debug"
    } else {
        "extarrange=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let settings = match Settings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            process::exit(1);
        }
    };
    OutputFormatter::set_color(settings.output.color);

    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            OutputFormatter::error(&format!("Cannot determine current directory: {}", e));
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let exit_code = match run_cli(&base_dir, &settings, stdin.lock(), io::stdout()) {
        Ok(report) if report.has_errors() => 1,
        Ok(_) => 0,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            1
        }
    };
    process::exit(exit_code);
}
