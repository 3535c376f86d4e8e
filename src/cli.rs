use crate::config::load_config;
use crate::ir::NodeTree;
use crate::layout::{Layout, compute_layout};
use crate::layout_dump::{write_dump_to, write_layout_dump};
use crate::measure::{EstimatedMeasurements, FixtureMeasurements, MeasurementProvider};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nlay", version, about = "Lay out diagram node trees")]
pub struct Args {
    /// Input tree (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Layout from the previous pass (raw layout or a dump written by nlay)
    #[arg(short = 'p', long = "previous")]
    pub previous: Option<PathBuf>,

    /// Measured label and stroke sizes; estimated from label text when omitted
    #[arg(short = 'm', long = "measurements")]
    pub measurements: Option<PathBuf>,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON written to stdout
    #[arg(long)]
    pub pretty: bool,

    /// Log pass details (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let (tree, reference) = NodeTree::from_json(&input).context("invalid node tree")?;
    let previous = args
        .previous
        .as_deref()
        .map(read_previous)
        .transpose()?;

    let measurements: Box<dyn MeasurementProvider> = match args.measurements.as_deref() {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Box::new(FixtureMeasurements::from_json(&contents).context("invalid measurements")?)
        }
        None => Box::new(EstimatedMeasurements::from_tree(&tree, &config.text)),
    };

    let layout = compute_layout(
        &tree,
        previous.as_ref(),
        reference.as_ref(),
        measurements.as_ref(),
        &config.layout,
    );
    for diagnostic in &layout.diagnostics {
        tracing::info!(node = %diagnostic.node_id, kind = ?diagnostic.kind, "diagnostic");
    }

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &layout, &tree)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_dump_to(&mut handle, &layout, &tree, args.pretty)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PreviousFile {
    Layout(Layout),
    Dump { layout: Layout },
}

fn parse_previous(contents: &str) -> Result<Layout> {
    let parsed: PreviousFile = serde_json::from_str(contents)?;
    Ok(match parsed {
        PreviousFile::Layout(layout) | PreviousFile::Dump { layout } => layout,
    })
}

fn read_previous(path: &Path) -> Result<Layout> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_previous(&contents).with_context(|| format!("invalid previous layout {}", path.display()))
}
