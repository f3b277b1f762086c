use crate::config::load_config;
use crate::input::read_people;
use crate::layout::{compute_layout, related_ids};
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use crate::stats::FamilyStats;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kinship", version, about = "Generational family-tree layout and rendering")]
pub struct Args {
    /// Input JSON (array of people or {"people": [...]}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. SVG and JSON go to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Person id to emphasise together with parents, children and spouse
    #[arg(long = "highlight")]
    pub highlight: Option<String>,

    /// Print family statistics instead of rendering
    #[arg(long = "stats")]
    pub stats: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let people = read_people(args.input.as_deref())?;
    log::info!(people = people.len(); "Loaded family records");

    let layout = compute_layout(&people, &config.layout);
    if layout.nodes.len() < people.len() {
        log::warn!(
            placed = layout.nodes.len(),
            total = people.len();
            "Some people are not reachable from any root and were left out"
        );
    }

    if args.stats {
        let stats = FamilyStats::from_people(&people).with_layout(&layout);
        println!("{stats}");
        return Ok(());
    }

    let highlight = match args.highlight.as_deref().or(config.render.highlight.as_deref()) {
        Some(id) => {
            let related = related_ids(&people, id);
            if related.is_empty() {
                log::warn!(person = id; "Highlighted person not found");
            }
            related
        }
        None => BTreeSet::new(),
    };

    match args.output_format {
        OutputFormat::Json => write_layout_dump(&layout, args.output.as_deref())?,
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.layout, &config.render, &highlight);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&layout, &config, &highlight, args.output.as_ref())?,
    }
    log::info!(format:? = args.output_format; "Output written");
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(
    layout: &crate::layout::FamilyLayout<'_>,
    config: &crate::config::Config,
    highlight: &BTreeSet<String>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    let svg = render_svg(layout, &config.theme, &config.layout, &config.render, highlight);
    crate::render::write_output_png(&svg, output, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(
    _layout: &crate::layout::FamilyLayout<'_>,
    _config: &crate::config::Config,
    _highlight: &BTreeSet<String>,
    _output: Option<&PathBuf>,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}
