//! CLI for starkit.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use starkit::config::{
    DEFAULT_API_URL, DEFAULT_CLONE_TIMEOUT_SECS, DEFAULT_LOGIN_TIMEOUT_SECS, DEFAULT_PAGE_DELAY_MS,
    STARRED_PAGE_SIZE,
};
use starkit::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "starkit")]
#[command(author, version, about = "List starred GitHub repositories and bulk-clone them", long_about = None)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a user's starred repositories through the GitHub API
    Api {
        /// GitHub username
        #[arg(long)]
        user: String,

        /// API token; raises the anonymous rate limit
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// API root, for GitHub Enterprise
        #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Directory for the dated output file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Scrape starred repositories from your GitHub account in a browser
    Scrape {
        /// Save browser session after login for future use
        #[arg(long)]
        save_session: bool,

        /// Ignore saved session and start fresh (forces new login)
        #[arg(long)]
        fresh: bool,

        /// Where the browser session is kept
        #[arg(long, default_value = "session.json")]
        session_file: PathBuf,

        /// Seconds to wait for the login to complete
        #[arg(long, default_value_t = DEFAULT_LOGIN_TIMEOUT_SECS)]
        login_timeout: u64,

        /// Milliseconds to wait after moving to the next page
        #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS)]
        page_delay_ms: u64,

        /// Chrome/Chromium executable
        #[arg(long)]
        chrome: Option<PathBuf>,

        /// Directory for the dated output file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Clone every repository URL listed in a file
    Clone {
        /// File with one URL per line; blank lines and '#' comments are skipped
        input: PathBuf,

        /// Seconds before a single clone is abandoned
        #[arg(long, default_value_t = DEFAULT_CLONE_TIMEOUT_SECS)]
        timeout: u64,

        /// Git executable
        #[arg(long, default_value = "git")]
        git: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "starkit=debug"
    } else {
        "starkit=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Api {
            user,
            token,
            api_url,
            output_dir,
        } => cmd_api(
            user,
            ListerConfig {
                api_url,
                token,
                per_page: STARRED_PAGE_SIZE,
                output_dir,
            },
        ),
        Commands::Scrape {
            save_session,
            fresh,
            session_file,
            login_timeout,
            page_delay_ms,
            chrome,
            output_dir,
        } => cmd_scrape(ScraperConfig {
            session_file,
            save_session,
            fresh,
            login_timeout: Duration::from_secs(login_timeout),
            page_delay: Duration::from_millis(page_delay_ms),
            chrome,
            output_dir,
        }),
        Commands::Clone { input, timeout, git } => cmd_clone(
            input,
            ClonerConfig {
                program: git,
                timeout: Duration::from_secs(timeout),
            },
        ),
    }
}

fn cmd_api(user: String, config: ListerConfig) -> Result<()> {
    let client = GitHubClient::from_config(&config);
    let listing = client.list_starred(&user, config.per_page);

    if let Some(ref e) = listing.error {
        eprintln!("An error occurred: {}", e);
    }

    let written = write_todays_list(&config.output_dir, &listing.urls)
        .context("Failed to write starred list")?;
    if let Some(path) = written {
        println!("Wrote {} repos to {}", listing.urls.len(), path.display());
    }

    println!("All done!");
    Ok(())
}

fn cmd_scrape(config: ScraperConfig) -> Result<()> {
    println!("GitHub Starred Repositories Scraper");
    println!("{}", "=".repeat(40));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let repos = runtime
        .block_on(scrape_starred(&config))
        .context("Scraping failed")?;

    let written = write_todays_list(&config.output_dir, &repos)
        .context("Failed to write starred list")?;

    println!("{}", "=".repeat(40));
    println!("Successfully scraped {} starred repositories", repos.len());
    if let Some(path) = written {
        println!("Output saved to: {}", path.display());
    }
    Ok(())
}

fn cmd_clone(input: PathBuf, config: ClonerConfig) -> Result<()> {
    let cloner = GitCloner::from_config(&config);
    let tally = clone_all(&input, &cloner)?;

    println!("\nCloning complete!");
    println!("{}", tally);
    Ok(())
}
