use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

mod error;
mod generate;
mod prelude;
mod server;
mod service;
mod stats;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generalized FizzBuzz over HTTP, with request statistics"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Statistics file
    #[clap(
        long,
        env = "FIZZBUZZ_STATS_FILE",
        global = true,
        default_value = "var/statistics.json"
    )]
    stats_file: PathBuf,

    /// Seconds the statistics table is served from memory before re-reading the file
    #[clap(long, env = "FIZZBUZZ_CACHE_TTL", global = true, default_value = "3600")]
    cache_ttl: u64,

    /// Whether to display additional information.
    #[clap(long, env = "FIZZBUZZ_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Serve the HTTP API
    Serve(crate::server::ServeOptions),

    /// Print a sequence
    Generate(crate::generate::App),

    /// Show request statistics
    Stats(crate::stats::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::server::run(options, app.global).await,
        SubCommands::Generate(sub_app) => crate::generate::run(sub_app, app.global).await,
        SubCommands::Stats(sub_app) => crate::stats::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
