//! CLI binary for impath: show every import path from Go packages to the
//! packages matching a pattern.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use impath_core::config::{ColorChoice, ImpathConfig};
use impath_core::graph::ImportGraph;
use impath_loader::GraphLoader;
use impath_loader::golist::GoList;
use impath_loader::snapshot::SnapshotFile;
use impath_nav::render::RenderOptions;
use impath_nav::walk::WalkContext;
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "impath",
    version,
    about = "Show every import path from Go packages to packages matching a pattern"
)]
struct Cli {
    /// Package patterns passed to `go list` (defaults to ".")
    packages: Vec<String>,

    /// Regex matched against package paths; a match ends its path
    #[arg(short, long, default_value = "")]
    pattern: String,

    /// Build tags (comma separated, repeatable)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Include test packages (`--tests=false` to exclude)
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    tests: Option<bool>,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Read the import graph from a snapshot instead of running `go list`
    #[arg(long, conflicts_with_all = ["packages", "tags", "tests"])]
    graph: Option<PathBuf>,

    /// Write the loaded import graph to a snapshot file
    #[arg(long)]
    save_graph: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Highlight matched packages: auto, always, never
    #[arg(long)]
    color: Option<ColorChoice>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tree,
    Json,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Bad patterns fail before anything is loaded.
    let pattern = Regex::new(&cli.pattern)
        .with_context(|| format!("invalid --pattern {:?}", cli.pattern))?;

    let project_root = get_project_root(&cli)?;
    let config = ImpathConfig::load(&project_root)?;

    let loader = build_loader(&cli, &config, project_root.clone());
    let graph = load_graph(loader.as_ref())?;
    tracing::info!(
        packages = graph.len(),
        imports = graph.edge_count(),
        roots = graph.roots().len(),
        "import graph ready"
    );

    if let Some(path) = &cli.save_graph {
        let path = project_root.join(path);
        impath_core::storage::save(&path, &graph)?;
        tracing::info!(path = %path.display(), "saved import graph");
    }

    let mut ctx = WalkContext::new();
    let branches = impath_nav::walk::find_all(&graph, &pattern, &mut ctx);
    if branches.is_empty() {
        tracing::info!(pattern = %cli.pattern, "no import paths matched");
        // JSON output still prints `[]`.
        if cli.format == OutputFormat::Tree {
            return Ok(());
        }
    }

    let forest = impath_nav::merge::merge(&graph, &branches);
    let color = cli.color.unwrap_or(config.render.color);
    print_forest(&graph, &forest, cli.format, use_color(color))
}

fn build_loader(cli: &Cli, config: &ImpathConfig, project_root: PathBuf) -> Box<dyn GraphLoader> {
    if let Some(path) = &cli.graph {
        return Box::new(SnapshotFile::new(project_root.join(path)));
    }

    let mut tags = config.load.tags.clone();
    tags.extend(cli.tags.iter().filter(|t| !t.trim().is_empty()).cloned());

    let mut list = GoList::new(project_root);
    list.go = config.load.go.clone();
    list.tests = cli.tests.unwrap_or(config.load.tests);
    list.tags = tags;
    list.patterns = cli.packages.clone();
    Box::new(list)
}

fn load_graph(loader: &dyn GraphLoader) -> Result<ImportGraph> {
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading {}...", loader.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = loader.load();
    spinner.finish_and_clear();

    result.with_context(|| format!("failed to load import graph ({})", loader.describe()))
}

fn use_color(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::colors_enabled(),
    }
}

fn print_forest(
    graph: &ImportGraph,
    forest: &impath_nav::merge::Forest,
    format: OutputFormat,
    color: bool,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Tree => {
            impath_nav::render::write_forest(&mut out, graph, forest, &RenderOptions { color })
                .context("failed to write output")?;
        }
        OutputFormat::Json => {
            let json = impath_nav::render::render_json(graph, forest)
                .context("failed to serialize forest")?;
            out.write_all(json.as_bytes())
                .and_then(|()| out.flush())
                .context("failed to write output")?;
        }
    }
    Ok(())
}
