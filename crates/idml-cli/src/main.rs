//! idml-inspect - print the resolved layout of an IDML package as JSON

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use idml_layout::{DocumentSummary, IdmlLoader, LoadOptions, PageRange};

#[derive(Parser, Debug)]
#[command(
    name = "idml-inspect",
    about = "Print the resolved layout of an IDML package",
    long_about = "Load an IDML package (or an extracted package directory) and print\n\
                  spreads, pages, margins and the frames placed on each page as JSON.",
    version
)]
struct Args {
    /// `.idml` file or extracted package directory
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(short, long)]
    pretty: bool,

    /// First printed page number to include
    #[arg(long, value_name = "N")]
    from: Option<u32>,

    /// Last printed page number to include
    #[arg(long, value_name = "N")]
    to: Option<u32>,

    /// Skip story parsing (page geometry only)
    #[arg(long)]
    layout_only: bool,

    /// Skip placing inline graphics (they are dropped from the output)
    #[arg(long, conflicts_with = "layout_only")]
    no_inline: bool,

    /// Distance beyond which inline graphics are treated as frame-relative
    #[arg(long, value_name = "POINTS")]
    inline_threshold: Option<f64>,

    /// Show detailed processing information
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::default()
            .with_stories(!self.layout_only)
            .with_inline_graphics(!self.no_inline);
        if let Some(threshold) = self.inline_threshold {
            options = options.with_inline_distance_threshold(threshold);
        }
        options
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    let loader = IdmlLoader::with_options(args.load_options());
    let mut document = loader
        .load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let range = PageRange::new(args.from, args.to);
    let json = DocumentSummary::for_pages(&document, &range)
        .to_json(args.pretty)
        .context("Failed to serialize summary")?;

    match &args.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    document
        .release()
        .context("Failed to remove temporary extraction directory")?;
    log::debug!("Done");
    Ok(())
}
