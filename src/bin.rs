use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use kinship::drawing::dot_label;
use kinship::family::FamilyFile;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "kinship",
    about = "Build a genealogy tree from a JSON family file and report on its shape."
)]
struct Cli {
    /// Family file to load.
    file: PathBuf,
    /// Print the tree with box-drawing connectors.
    #[arg(long)]
    draw: bool,
    /// Print Graphviz DOT source for the tree.
    #[arg(long)]
    dot: bool,
    /// Print the character ids in enumeration order.
    #[arg(long)]
    ids: bool,
    /// Include mates when listing ids.
    #[arg(long)]
    with_mates: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let data = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read family file {}", cli.file.display()))?;
    let family: FamilyFile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse family file {}", cli.file.display()))?;
    info!(members = family.members.len(), "loaded family file");

    let tree = family
        .build()
        .with_context(|| format!("failed to build tree from {}", cli.file.display()))?;
    tree.validate().context("built tree is inconsistent")?;

    println!(
        "nodes: {}, depth: {}, width: {}",
        tree.len(),
        tree.depth(),
        tree.width()
    );

    if cli.draw {
        print!("{}", tree.debug_draw(|c| c.to_string()));
    }
    if cli.dot {
        print!("{}", tree.dot(&|c| dot_label(&c.name)));
    }
    if cli.ids {
        let ids = if cli.with_mates {
            tree.current_ids_with_mates()
        } else {
            tree.current_ids()
        };
        println!("ids: {}", ids.iter().join(", "));
    }
    Ok(())
}
