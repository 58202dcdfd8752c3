use allcode::{ExportConfig, Manifest, check, run};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Export project files into a single Markdown document", long_about = None)]
struct Args {
    /// Project root (defaults to the current directory)
    root: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read the file list from a manifest file (one path per line)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Title line for the exported document
    #[arg(long)]
    title: Option<String>,

    /// List missing manifest entries without writing output
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Diagnostics go to stderr so stdout carries only the export summary.
fn init_tracing(verbose: bool) {
    let default = if verbose { "allcode=debug" } else { "allcode=warn" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let root = match args.root {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    // 1. Load from file or default
    let mut config = ExportConfig::load_from_file(&root).unwrap_or_else(|| ExportConfig {
        root,
        ..Default::default()
    });

    // 2. Override with CLI args
    if let Some(o) = args.output {
        config.output = o;
    }
    if let Some(t) = args.title {
        config.title = t;
    }
    if let Some(path) = args.manifest {
        let manifest = Manifest::load(&path)?;
        config.files = Some(manifest.entries().to_vec());
    }
    if args.verbose {
        config.verbose = true;
    }

    if args.check {
        let missing = check(&config)?;
        for entry in &missing {
            println!("Warning: File not found: {}", entry);
        }
        println!(
            "{} of {} files missing",
            missing.len(),
            config.manifest()?.len()
        );
        return Ok(());
    }

    run(config)?;
    Ok(())
}
