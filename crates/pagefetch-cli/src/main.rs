use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use pagefetch::{CacheStore, ConnectionMode, FetchOptions, Fetcher, TcpConnector};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Clone, Debug, Parser)]
#[command(name = "pagefetch", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
    /// URL to fetch: http(s)://, file://, data: or view-source:
    url: String,

    /// Print raw source instead of tag-stripped text
    #[arg(short = 's', long)]
    view_source: bool,

    /// Cache root directory
    #[arg(long, default_value = "cache")]
    cache_dir: PathBuf,

    /// Disable the disk cache
    #[arg(long)]
    no_cache: bool,

    /// fsync cache files before renaming them into place
    #[arg(long)]
    sync_cache: bool,

    /// Redirect budget
    #[arg(long, default_value_t = pagefetch::DEFAULT_REDIRECT_BUDGET)]
    max_redirects: u32,

    /// Socket timeout in seconds; 0 waits forever
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// User-Agent header
    #[arg(long)]
    user_agent: Option<String>,

    /// Send `Connection: keep-alive`
    #[arg(long)]
    keep_alive: bool,

    /// Raise log verbosity; RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> FetchOptions {
        let mut options = FetchOptions::default()
            .redirect_budget(self.max_redirects)
            .timeout((self.timeout > 0).then(|| Duration::from_secs(self.timeout)));
        if let Some(agent) = &self.user_agent {
            options = options.user_agent(agent.clone());
        }
        if self.keep_alive {
            options = options.connection(ConnectionMode::KeepAlive);
        }
        options
    }

    fn cache(&self) -> Option<CacheStore> {
        (!self.no_cache).then(|| CacheStore::new(&self.cache_dir).sync(self.sync_cache))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<String> {
    let mut fetcher = Fetcher::new(TcpConnector).with_options(args.options());
    if let Some(cache) = args.cache() {
        fetcher = fetcher.with_cache(cache);
    }

    let page = fetcher
        .fetch_with(&args.url, args.view_source, args.max_redirects)
        .with_context(|| format!("failed to fetch {}", args.url))?;
    tracing::info!(url = %page.effective_url, bytes = page.body.len(), "fetched");

    Ok(render::show(&page.body, page.view_source))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
