// repo-stats command-line entry point.
// Prints repository info, contributors, stats, or the README for one repository.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use repo_stats::{
    AggregateStats, Config, Contributor, Error, GitHubClient, RepoDataClient, RepositoryInfo,
};

/// Cached GitHub repository stats.
#[derive(Parser, Debug)]
#[command(name = "repo-stats", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Repository owner.
    #[arg(long, global = true)]
    owner: Option<String>,

    /// Repository name.
    #[arg(long, global = true)]
    repo: Option<String>,

    /// Cache window in seconds.
    #[arg(long, global = true)]
    ttl_secs: Option<u64>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Repository metadata.
    Info,
    /// Contributors, most active first.
    Contributors,
    /// Aggregate stars, forks, contributors, commits, and issues.
    Stats,
    /// Raw README text.
    Readme,
    /// The bundled fallback dataset.
    Fallback,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, Error> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(owner) = &cli.owner {
        config.owner = owner.clone();
    }
    if let Some(repo) = &cli.repo {
        config.repo = repo.clone();
    }
    if let Some(ttl) = cli.ttl_secs {
        config.cache_ttl_secs = ttl;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = load_config(&cli)?;
    let client = RepoDataClient::new(GitHubClient::new(&config)?, config.cache_ttl());

    match cli.cmd {
        Command::Info => {
            let info = client.repository_info().await?;
            emit(cli.json, &info, print_info)
        }
        Command::Contributors => {
            let contributors = match client.contributors().await {
                Err(err) if err.is_remote_unavailable() => {
                    warn!("{err}; showing bundled contributors");
                    client.static_fallback_contributors()
                }
                other => other?,
            };
            emit(cli.json, &contributors, |c| print_contributors(c))
        }
        Command::Stats => {
            let stats = match client.aggregate_stats().await {
                Err(err) if err.is_remote_unavailable() => {
                    warn!("{err}; showing bundled stats");
                    client.static_fallback_stats()
                }
                other => other?,
            };
            emit(cli.json, &stats, print_stats)
        }
        Command::Readme => {
            let readme = client.readme().await?;
            emit(cli.json, &readme, |r| println!("{}", r.content))
        }
        Command::Fallback => {
            let contributors = client.static_fallback_contributors();
            let stats = client.static_fallback_stats();
            if cli.json {
                let payload = serde_json::json!({
                    "contributors": contributors,
                    "stats": stats,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print_stats(&stats);
                print_contributors(&contributors);
            }
            Ok(())
        }
    }
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl Fn(&T)) -> Result<(), Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_info(info: &RepositoryInfo) {
    println!("{}/{}", info.owner, info.name);
    if let Some(description) = &info.description {
        println!("  {description}");
    }
    println!("  url:      {}", info.html_url);
    println!("  language: {}", info.language.as_deref().unwrap_or("-"));
    println!("  stars:    {}", info.stargazers_count);
    println!("  forks:    {}", info.forks_count);
    println!("  issues:   {}", info.open_issues_count);
    println!("  created:  {}", info.created_at.format("%Y-%m-%d"));
    println!("  updated:  {}", info.updated_at.format("%Y-%m-%d"));
    if !info.topics.is_empty() {
        let topics: Vec<&str> = info.topics.iter().map(String::as_str).collect();
        println!("  topics:   {}", topics.join(", "));
    }
}

fn print_contributors(contributors: &[Contributor]) {
    for contributor in contributors {
        println!("{:>7}  {}", contributor.contributions, contributor.login);
    }
}

fn print_stats(stats: &AggregateStats) {
    println!("stars:        {}", stats.stars);
    println!("forks:        {}", stats.forks);
    println!("contributors: {}", stats.contributors);
    println!("commits:      {}", stats.commits);
    println!("issues:       {}", stats.issues);
}
