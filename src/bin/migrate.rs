//! CLI for moving repositories and stars between GitHub accounts.

use account_migrate::config::DEFAULT_REPO_FILE;
use account_migrate::prelude::*;
use account_migrate::telemetry::init_subscriber;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "migrate")]
#[command(author, version, about = "Move repositories and stars between GitHub accounts", long_about = None)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ApiArgs {
    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = account_migrate::config::DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Retries for transient (5xx, 429, network) failures
    #[arg(long, default_value_t = 2, global = true)]
    max_retries: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// List a user's repositories into a CSV file
    List {
        /// Account whose repositories are listed
        #[arg(long, env = "GITHUB_USERNAME")]
        username: String,

        /// Token; private repositories are included when it belongs to the user
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_REPO_FILE)]
        output: PathBuf,
    },

    /// Transfer every repository in a CSV file to a new owner
    TransferRepos {
        /// Token with admin rights on the repositories
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Current owner
        #[arg(long, env = "OLD_OWNER")]
        old_owner: String,

        /// Receiving user or organization
        #[arg(long, env = "NEW_OWNER")]
        new_owner: String,

        /// Input file written by `list`
        #[arg(short, long, default_value = DEFAULT_REPO_FILE)]
        input: PathBuf,

        /// Minimum seconds between two transfers
        #[arg(long, default_value_t = 2.0)]
        interval_secs: f64,
    },

    /// Star, as a new account, everything an old account has starred
    TransferStars {
        #[arg(long, env = "OLD_GITHUB_USERNAME")]
        source_user: String,

        #[arg(long, env = "OLD_GITHUB_TOKEN", hide_env_values = true)]
        source_token: String,

        #[arg(long, env = "NEW_GITHUB_USERNAME")]
        dest_user: String,

        #[arg(long, env = "NEW_GITHUB_TOKEN", hide_env_values = true)]
        dest_token: String,

        /// Minimum seconds between two stars
        #[arg(long, default_value_t = 0.0)]
        interval_secs: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_subscriber(if cli.verbose { "debug" } else { "info" });

    let settings = settings(&cli.api);

    match cli.command {
        Commands::List {
            username,
            token,
            output,
        } => cmd_list(&settings, username, token, output),
        Commands::TransferRepos {
            token,
            old_owner,
            new_owner,
            input,
            interval_secs,
        } => cmd_transfer_repos(&settings, token, old_owner, new_owner, input, interval_secs),
        Commands::TransferStars {
            source_user,
            source_token,
            dest_user,
            dest_token,
            interval_secs,
        } => cmd_transfer_stars(
            &settings,
            Credential::new(source_user, source_token),
            Credential::new(dest_user, dest_token),
            interval_secs,
        ),
    }
}

fn settings(args: &ApiArgs) -> Settings {
    Settings::new()
        .api_url(&args.api_url)
        .timeout(Duration::from_secs(args.timeout_secs))
        .retry(RetryPolicy {
            max_retries: args.max_retries,
            ..RetryPolicy::default()
        })
}

fn interval(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).context("Interval must be a non-negative number of seconds")
}

fn cmd_list(
    settings: &Settings,
    username: String,
    token: Option<String>,
    output: PathBuf,
) -> Result<()> {
    let mut config = ListConfig::new(username).output(output);
    if let Some(token) = token {
        config = config.token(token);
    }

    let report = ListRepos::from_settings(config, settings)
        .context("Invalid list configuration")?
        .run()
        .context("Listing failed")?;

    if let PageEnd::Failed { page, reason } = &report.end {
        println!("Listing stopped early at page {}: {}", page, reason);
    }
    println!("Wrote {} of {} repositories", report.written, report.fetched);

    Ok(())
}

fn cmd_transfer_repos(
    settings: &Settings,
    token: String,
    old_owner: String,
    new_owner: String,
    input: PathBuf,
    interval_secs: f64,
) -> Result<()> {
    let config = RepoTransferConfig::new(token, old_owner, new_owner)
        .input(input)
        .interval(interval(interval_secs)?);

    let report = TransferRepos::from_settings(config, settings)
        .context("Invalid transfer configuration")?
        .run();
    report.log_summary("Transfer");

    Ok(())
}

fn cmd_transfer_stars(
    settings: &Settings,
    source: Credential,
    destination: Credential,
    interval_secs: f64,
) -> Result<()> {
    let config = StarTransferConfig::new(source, destination).interval(interval(interval_secs)?);

    let report = TransferStars::from_settings(config, settings)
        .context("Invalid star transfer configuration")?
        .run();
    report.log_summary("Star transfer");

    Ok(())
}
