use anyhow::Result;
use catalog_fetch::cli::{CliArgs, Command, QuerySource};
use catalog_fetch::config::Config;
use catalog_fetch::utils::logging::init_tracing;
use catalog_fetch::{ApiClient, FetchOutcome};
use crossterm::style::Stylize;

fn print_help() {
    println!("{}", "Catalog Fetch - query a component catalog".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  catalog-fetch [OPTIONS] [QUERY]");
    println!();
    println!("{}", "Query:".yellow());
    println!("  {}  - Inline JSON", "'{\"query\": ...}'".green());
    println!("  {}       - Read JSON from a file", "@FILE".green());
    println!("  {}           - Read JSON from stdin (default)", "-".green());
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}   - Use this config file", "--config PATH".green());
    println!("  {}       - Override the API URL for this run", "--url URL".green());
    println!("  {}   - Override the auth token for this run", "--token TOKEN".green());
    println!("  {}   - Write the response here", "--output PATH".green());
    println!("  {}   - Initialize configuration with wizard", "--init-config".green());
    println!("  {} - Generate config file with defaults", "--generate-config".green());
    println!("  {}     - Print where the response is saved", "--show-path".green());
    println!("  {}       - Debug logging", "--verbose".green());
    println!("  {}          - Show this help", "--help".green());
    println!();
}

fn usage_error(e: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red(), e);
    eprintln!("Run with --help for usage.");
    std::process::exit(2);
}

/// Returns whether the response was saved
fn run_fetch(cli: &CliArgs, source: &QuerySource) -> Result<bool> {
    // A query we cannot read is the caller's mistake, not a failed request
    let query = match source.read_query() {
        Ok(query) => query,
        Err(e) => usage_error(format!("{:#}", e)),
    };
    let config = cli.resolve_config()?;
    let client = ApiClient::from_config(&config)?;

    Ok(match client.fetch(&query)? {
        FetchOutcome::Saved { path, .. } => {
            println!("{}", path.display());
            true
        }
        FetchOutcome::HttpStatus(_) | FetchOutcome::Transport(_) => false,
    })
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args).unwrap_or_else(|e| usage_error(e));

    init_tracing(cli.verbose);

    match &cli.command {
        Command::Help => print_help(),
        Command::InitConfig => {
            Config::init_wizard()?;
            println!("\nConfiguration initialized successfully!");
        }
        Command::GenerateConfig => {
            let path = match &cli.config_path {
                Some(path) => path.clone(),
                None => Config::get_config_path()?,
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, Config::create_default_with_comments())?;
            println!("Configuration file created at: {:?}", path);
            println!("Edit this file to set the catalog URL and token.");
        }
        Command::ShowPath => {
            println!("{}", cli.resolve_config()?.response_path()?.display());
        }
        Command::Fetch(source) => {
            if !run_fetch(&cli, source)? {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
