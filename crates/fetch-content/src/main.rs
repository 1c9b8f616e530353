mod sections;
use crate::sections::{Entry, Section};
use anyhow::Context;
use clap::Parser;
use patharg::OutputArg;
use serde_jsonlines::WriteExt;
use std::io::Write;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing_subscriber::filter::EnvFilter;
use wpgql::{Client, OnPageError, PaginationOptions};

/// Fetch site content from the WordPress GraphQL API and dump it as JSON Lines
#[derive(Clone, Debug, Eq, Parser, PartialEq)]
struct Arguments {
    /// URL of the GraphQL endpoint
    #[arg(long, env = wpgql::ENDPOINT_ENV_VAR, default_value = wpgql::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Stop fetching a section after this many pages
    #[arg(long)]
    max_pages: Option<NonZeroUsize>,

    /// Stop requesting further pages of a section once this much time has
    /// passed (e.g., "90s" or "5m")
    #[arg(long, value_parser = humantime::parse_duration)]
    max_elapsed: Option<Duration>,

    /// Write records to the given file
    #[arg(short, long, default_value = "-")]
    outfile: OutputArg,

    /// Number of items to request per page of results
    #[arg(short = 'P', long, default_value = "100")]
    page_size: NonZeroUsize,

    /// Fail if any page request fails instead of writing the records fetched
    /// before the failure
    #[arg(long)]
    strict: bool,

    /// Sections of the site to fetch content for [default: all]
    #[arg(value_enum)]
    sections: Vec<Section>,
}

impl Arguments {
    fn pagination_options(&self) -> PaginationOptions {
        let on_error = if self.strict {
            OnPageError::Propagate
        } else {
            OnPageError::Truncate
        };
        PaginationOptions::default()
            .on_error(on_error)
            .max_pages(self.max_pages)
            .max_elapsed(self.max_elapsed)
    }

    fn sections(&self) -> Vec<Section> {
        if self.sections.is_empty() {
            Section::ALL.to_vec()
        } else {
            self.sections.clone()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::try_from_default_env().context("invalid `RUST_LOG` provided")?,
        None => EnvFilter::new("info"),
    };
    tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let args = Arguments::parse();
    let client = Client::new(&args.endpoint)?;
    let options = args.pagination_options();
    let mut fp = args
        .outfile
        .clone()
        .create()
        .with_context(|| format!("failed to open {:#}", args.outfile))?;

    let big_start = Instant::now();
    let mut total = 0;
    for section in args.sections() {
        tracing::info!("Fetching {section} …");
        let start = Instant::now();
        let fetched = section
            .fetch(&client, args.page_size, options)
            .with_context(|| format!("failed to fetch {section}"))?;
        tracing::info!(
            "Fetched {} items ({} pages) for {section} in {:?}",
            fetched.items.len(),
            fetched.pages,
            start.elapsed()
        );
        if !fetched.complete {
            tracing::warn!("Listing for {section} is incomplete");
        }
        total += fetched.items.len();
        fp.write_json_lines(fetched.items.iter().map(|item| Entry { section, item }))
            .context("failed to dump records")?;
    }
    fp.flush().context("failed to flush filehandle")?;
    tracing::info!(
        "Fetched {total} items from {} in {:?}",
        client.endpoint(),
        big_start.elapsed()
    );
    Ok(())
}
