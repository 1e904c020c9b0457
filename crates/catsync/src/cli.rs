use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use catsync_fetch::ReqwestClient;
use catsync_fs::FsStore;
use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigLayer, SyncConfig};
use crate::error::SyncError;
use crate::sync::{Syncer, compare_files, report_differences};

#[derive(Debug, Parser)]
#[command(name = "catsync", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd:    Option<Commands>,
    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "s", name = "sync", about = "Fetch the catalog and reconcile it with the local snapshot (default)")]
    Sync,
    #[command(alias = "d", name = "diff", about = "Compare two local JSON documents after normalization")]
    Diff(DiffArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// TOML file with url, catalog, etag, timeout_secs and user_agent keys
    #[arg(long, global = true, env = "CATSYNC_CONFIG")]
    pub config:  Option<PathBuf>,
    /// Catalog endpoint
    #[arg(long, global = true, env = "CATSYNC_URL")]
    pub url:     Option<String>,
    /// Where the catalog snapshot is kept
    #[arg(long, global = true, env = "CATSYNC_CATALOG")]
    pub catalog: Option<PathBuf>,
    /// Where the ETag of the snapshot is kept
    #[arg(long, global = true, env = "CATSYNC_ETAG")]
    pub etag:    Option<PathBuf>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn load_config(&self) -> anyhow::Result<SyncConfig> {
        let file = match &self.config {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::default(),
        };
        let flags = ConfigLayer {
            url:          self.url.clone(),
            catalog:      self.catalog.clone(),
            etag:         self.etag.clone(),
            timeout_secs: self.timeout,
            user_agent:   None,
        };
        SyncConfig::resolve(file.merge(flags)).context("invalid configuration")
    }
}

#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Existing document
    pub left:  PathBuf,
    /// New document
    pub right: PathBuf,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let Cli { cmd, global } = self;
        match cmd.unwrap_or(Commands::Sync) {
            Commands::Sync => sync(&global).await,
            Commands::Diff(args) => diff(&args),
        }
    }
}

async fn sync(global: &GlobalArgs) -> anyhow::Result<ExitCode> {
    let config = global.load_config()?;
    let client = ReqwestClient::with_settings(config.client_settings())
        .context("failed to set up HTTP client")?;
    let syncer = Syncer::new(client, FsStore::new(), &config);

    match syncer.run().await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "sync finished");
            Ok(ExitCode::SUCCESS)
        }
        // differences were already reported block by block
        Err(SyncError::Diverged(_)) => Ok(ExitCode::FAILURE),
        Err(e) => {
            tracing::error!("error fetching data: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn diff(args: &DiffArgs) -> anyhow::Result<ExitCode> {
    let differences = compare_files(&FsStore::new(), &args.left, &args.right)?;
    if differences.is_empty() {
        tracing::info!("documents are equivalent");
        return Ok(ExitCode::SUCCESS);
    }
    report_differences(&differences);
    Ok(ExitCode::FAILURE)
}
