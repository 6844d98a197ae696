//! accountfacts-report: user/group inventory reports from PuppetDB facts.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use accountfacts_core::config::{self, OutputFormat, ReportKind};
use accountfacts_core::errors::ReportResult;
use accountfacts_core::models::{FactFragment, SortKey};
use accountfacts_core::puppetdb::{cache, client::PuppetDbClient, query, query::FactFamily};
use accountfacts_core::render;
use accountfacts_core::report::fragments::FragmentIndex;
use accountfacts_core::report::{denormalize, normalize, reconcile, reconstruct};

#[derive(Parser)]
#[command(
    name = "accountfacts-report",
    about = "Report on user and group accounts collected as PuppetDB facts"
)]
struct Cli {
    /// Report to produce
    #[arg(value_enum)]
    report: ReportKind,

    /// PuppetDB base URL, e.g. https://puppetdb.example.com:8081
    #[arg(long)]
    url: String,

    /// Client certificate (PEM) for mutual TLS
    #[arg(long)]
    cert: Option<PathBuf>,

    /// Client private key (PEM) for mutual TLS
    #[arg(long)]
    key: Option<PathBuf>,

    /// CA certificate (PEM) for mutual TLS
    #[arg(long)]
    ca_cert: Option<PathBuf>,

    /// Regular expression restricting which certnames are queried
    #[arg(long)]
    node_filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Sort key for the final report
    #[arg(long, value_enum, default_value = "name")]
    sort: SortKey,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reuse the previous run's fetched facts instead of querying
    #[arg(long)]
    use_cache: bool,

    /// Directory holding cached fetch results
    #[arg(long, default_value = cache::DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Where fact fragments come from for this run: the live query API or
/// the previous run's cache.
enum FragmentSource {
    Cached {
        dir: PathBuf,
    },
    Live {
        client: PuppetDbClient,
        node_filter: Option<String>,
        cache_dir: PathBuf,
    },
}

impl FragmentSource {
    fn fetch(&self, family: FactFamily) -> ReportResult<Vec<FactFragment>> {
        match self {
            FragmentSource::Cached { dir } => cache::load(dir, family),
            FragmentSource::Live {
                client,
                node_filter,
                cache_dir,
            } => {
                let query = query::fact_contents_query(family, node_filter.as_deref());
                let fragments = client.fact_contents(&query)?;
                cache::store(cache_dir, family, &fragments)?;
                Ok(fragments)
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    config::validate_url(&cli.url)?;
    let tls = config::tls_material(cli.cert, cli.key, cli.ca_cert)?;

    let source = if cli.use_cache {
        FragmentSource::Cached {
            dir: cli.cache_dir.clone(),
        }
    } else {
        FragmentSource::Live {
            client: PuppetDbClient::new(&cli.url, tls.as_ref())?,
            node_filter: cli.node_filter.clone(),
            cache_dir: cli.cache_dir.clone(),
        }
    };

    let title = cli.report.title();
    let rendered = match cli.report {
        ReportKind::Users => {
            let index = FragmentIndex::build(source.fetch(cli.report.family())?);
            let users = reconstruct::reconstruct_users(&index)?;
            match cli.format {
                OutputFormat::Json => {
                    render::json::render(title, &normalize::normalize_users(&users, cli.sort))?
                }
                OutputFormat::Html => {
                    render::html::render(title, &normalize::normalize_users(&users, cli.sort))?
                }
                OutputFormat::Csv => {
                    render::csv::render(&denormalize::denormalize_users(&users, cli.sort))
                }
            }
        }
        ReportKind::Groups => {
            let group_index = FragmentIndex::build(source.fetch(FactFamily::Groups)?);
            let user_index = FragmentIndex::build(source.fetch(FactFamily::Users)?);
            let mut groups = reconstruct::reconstruct_groups(&group_index)?;
            let users = reconstruct::reconstruct_users(&user_index)?;
            reconcile::reconcile_groups(&mut groups, &users);
            match cli.format {
                OutputFormat::Json => {
                    render::json::render(title, &normalize::normalize_groups(&groups, cli.sort))?
                }
                OutputFormat::Html => {
                    render::html::render(title, &normalize::normalize_groups(&groups, cli.sort))?
                }
                OutputFormat::Csv => {
                    render::csv::render(&denormalize::denormalize_groups(&groups, cli.sort))
                }
            }
        }
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("wrote {title} report to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
