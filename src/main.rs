//! Photoblog Harvester main entry point
//!
//! This is the command-line interface for the news-archive harvester.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use photoblog_harvester::config::{load_config_with_hash, Config};
use photoblog_harvester::crawler::{crawl, merge_crawl, HttpFetcher, TokioPacer};
use photoblog_harvester::download::download_all;
use photoblog_harvester::enrich::EnrichmentDriver;
use photoblog_harvester::model::Collection;
use photoblog_harvester::output::{print_summary, CrawlCounts, RunSummary};
use photoblog_harvester::render::render_site;
use photoblog_harvester::site::StandardAdapter;
use photoblog_harvester::storage::{CollectionStore, JsonFileStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Photoblog Harvester: a polite news-archive mirror
///
/// Crawls a paginated news index, enriches every article with its body
/// content, mirrors the images into date buckets and renders a static site.
#[derive(Parser, Debug)]
#[command(name = "photoblog-harvester")]
#[command(version)]
#[command(about = "A polite news-archive mirror", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the index and merge new articles into the collection
    Crawl,

    /// Fetch article pages and fill in body content
    Enrich {
        /// Re-process articles that are already enriched
        #[arg(long)]
        force: bool,
    },

    /// Download every referenced image not yet on disk
    Download,

    /// Render the static archive site
    Render,

    /// Enrich, download and render in one go
    Run {
        /// Re-process articles that are already enriched
        #[arg(long)]
        force: bool,

        /// Crawl the index first
        #[arg(long)]
        crawl: bool,
    },
}

/// Long-lived collaborators shared by every stage
struct Harvester {
    config: Config,
    fetcher: HttpFetcher,
    pacer: TokioPacer,
    adapter: StandardAdapter,
    store: JsonFileStore,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let harvester = Harvester::new(config)?;
    let mut summary = RunSummary::start(config_hash);

    let outcome = match cli.command {
        Command::Crawl => harvester.crawl(&mut summary).await,
        Command::Enrich { force } => harvester.enrich(&mut summary, force).await,
        Command::Download => harvester.download(&mut summary).await,
        Command::Render => harvester.render(&mut summary),
        Command::Run { force, crawl } => harvester.run(&mut summary, force, crawl).await,
    };

    summary.finish();
    if let Err(e) = outcome {
        tracing::error!("Run aborted: {:#}", e);
        return Err(e);
    }

    print_summary(&summary);
    if summary.has_failures() {
        tracing::warn!("Some articles or images could not be fetched; rerun to retry them");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("photoblog_harvester=info,warn"),
            1 => EnvFilter::new("photoblog_harvester=debug,info"),
            2 => EnvFilter::new("photoblog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

impl Harvester {
    fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.request).context("failed to build HTTP client")?;
        let adapter = StandardAdapter::new().context("failed to compile site selectors")?;
        let store = JsonFileStore::new(&config.output.collection_path);

        Ok(Self {
            config,
            fetcher,
            pacer: TokioPacer,
            adapter,
            store,
        })
    }

    /// Loads the committed collection, which must exist
    fn load_collection(&self) -> Result<Collection> {
        self.store.load().with_context(|| {
            format!(
                "no collection at {}; run the crawl command first",
                self.store.durable_path().display()
            )
        })
    }

    async fn crawl(&self, summary: &mut RunSummary) -> Result<()> {
        let start_url = &self.config.site.start_url;
        tracing::info!("Starting crawl at {}", start_url);

        let outcome = crawl(&self.fetcher, &self.pacer, &self.adapter, start_url)
            .await
            .context("crawl failed")?;

        let merged = merge_crawl(&self.store, outcome.stubs).context("failed to save collection")?;
        if merged.resumed {
            tracing::info!("Kept progress from an interrupted enrichment run");
        }

        summary.crawl = Some(CrawlCounts {
            pages: outcome.pages,
            articles_found: merged.found,
            articles_added: merged.added,
        });
        Ok(())
    }

    async fn enrich(&self, summary: &mut RunSummary, force: bool) -> Result<()> {
        if force {
            tracing::info!("Force re-extraction enabled, processing all articles");
        }

        let report = EnrichmentDriver::new(&self.fetcher, &self.pacer, &self.adapter, &self.store)
            .run(force)
            .await
            .with_context(|| {
                format!(
                    "enrichment of {} failed",
                    self.store.durable_path().display()
                )
            })?;

        summary.enrich = Some(report);
        Ok(())
    }

    async fn download(&self, summary: &mut RunSummary) -> Result<()> {
        let collection = self.load_collection()?;

        let report = download_all(
            &self.fetcher,
            &self.pacer,
            &collection,
            &self.config.output.image_dir,
            self.config.download.file_naming,
        )
        .await
        .context("failed to prepare image directories")?;

        summary.download = Some(report);
        Ok(())
    }

    fn render(&self, summary: &mut RunSummary) -> Result<()> {
        let collection = self.load_collection()?;

        let pages = render_site(
            &collection,
            &self.config.output.site_dir,
            self.config.download.file_naming,
        )
        .context("failed to render site")?;

        summary.rendered_pages = Some(pages);
        Ok(())
    }

    async fn run(&self, summary: &mut RunSummary, force: bool, crawl_first: bool) -> Result<()> {
        if crawl_first {
            self.crawl(summary).await?;
        }
        self.enrich(summary, force).await?;
        self.download(summary).await?;
        self.render(summary)
    }
}
