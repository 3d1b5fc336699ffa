use crate::config::{SolverKind, load_config};
use crate::ir::{FamilyTree, UnknownFields};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "famtree", version, about = "Family tree layout engine")]
pub struct Args {
    /// Input family document (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON/SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Position solver, overriding the config file
    #[arg(long = "solver", value_enum)]
    pub solver: Option<SolverArg>,

    /// Reject person/relationship fields outside the documented shape
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SolverArg {
    Tree,
    Dagre,
}

impl From<SolverArg> for SolverKind {
    fn from(value: SolverArg) -> Self {
        match value {
            SolverArg::Tree => SolverKind::Tree,
            SolverArg::Dagre => SolverKind::Dagre,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(solver) = args.solver {
        config.layout.solver = solver.into();
    }

    let input = read_input(args.input.as_deref())?;
    let unknown = if args.strict {
        UnknownFields::Reject
    } else {
        UnknownFields::Ignore
    };
    let tree = FamilyTree::from_json(&input, unknown)?;
    tracing::info!(
        persons = tree.persons.len(),
        relationships = tree.relationships.len(),
        "family document loaded"
    );

    let layout = compute_layout(&tree, &config.layout)?;
    if layout.is_empty() {
        tracing::info!("no persons in input, emitting empty layout");
    }

    match args.output_format {
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), &layout)?,
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &tree, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &tree, &config.theme, &config.render);
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
