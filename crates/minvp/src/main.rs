//! minvp: Minimum Viewport Width Preview
//!
//! Runs the polyfill against a viewport `content` string or an HTML page
//! with a simulated screen width and prints the resulting tag.

use anyhow::{Context, Result};
use clap::Parser;
use minvp_core::{AdjusterConfig, MemoryDocument, ViewportAdjuster};
use std::path::PathBuf;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

mod report;

use report::Report;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "minvp", version, about = "Preview the viewport min-width rewrite for a screen width")]
struct Args {
    /// Simulated screen width in CSS pixels
    #[arg(short = 'w', long)]
    screen_width: u32,

    /// Viewport content, e.g. "width=device-width, min-width=400"
    #[arg(long, conflicts_with = "html", required_unless_present = "html")]
    content: Option<String>,

    /// HTML page containing the viewport meta tag
    #[arg(long)]
    html: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the meta tag name
    #[arg(long)]
    meta_name: Option<String>,

    /// Override the minimum width directive key
    #[arg(long)]
    min_width_key: Option<String>,

    /// Print a JSON report instead of the tag
    #[arg(long)]
    json: bool,

    /// Log adjuster decisions
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<AdjusterConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AdjusterConfig::from_json(&json)?
        }
        None => AdjusterConfig::default(),
    };

    if let Some(name) = &args.meta_name {
        config.meta_name = name.clone();
    }
    if let Some(key) = &args.min_width_key {
        config.min_width_key = key.clone();
    }
    config.validate()?;
    Ok(config)
}

fn load_document(args: &Args, config: &AdjusterConfig) -> Result<MemoryDocument> {
    let mut doc = match (&args.html, &args.content) {
        (Some(path), _) => {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MemoryDocument::from_html(&html).with_context(|| format!("parsing {}", path.display()))?
        }
        (None, Some(content)) => {
            let mut doc = MemoryDocument::new();
            doc.push_meta(vec![
                (String::from("name"), config.meta_name.clone()),
                (String::from("content"), content.clone()),
            ]);
            doc
        }
        (None, None) => anyhow::bail!("either --content or --html is required"),
    };
    doc.set_screen_width(args.screen_width);
    Ok(doc)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(&args)?;
    debug!("Using {}", config.selector());

    let mut doc = load_document(&args, &config)?;
    let mut adjuster = ViewportAdjuster::initialize(&doc, config);
    let outcome = adjuster.adjust(&mut doc);
    let report = Report::new(&doc, &adjuster, &outcome, args.screen_width);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.html.is_some() {
        println!("{}", doc.outer_html());
    } else if let Some(content) = &report.content {
        println!("{}", content);
    }

    Ok(())
}
