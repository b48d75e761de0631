use crate::canvas_input::canvas_from_value;
#[cfg(feature = "server")]
use crate::config::ServerConfig;
use crate::config::{Config, load_config};
use crate::icons::IconSet;
use crate::ir::{DocumentKind, ParsedDocument};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_document;
use crate::render::{Renderer, write_output_png, write_output_svg};
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "infogr",
    version,
    about = "Render SWOT, Business Model Canvas and priority matrix infographics"
)]
pub struct Args {
    /// Config JSON file (themeVariables, layout, render, server)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a document to PNG or SVG
    Render(RenderArgs),
    /// Print the parsed sections as JSON
    Parse(InputArgs),
    /// Run the HTTP service
    #[cfg(feature = "server")]
    Serve(ServeArgs),
}

#[derive(ClapArgs, Debug)]
pub struct InputArgs {
    /// Document kind
    #[arg(short = 'k', long = "kind", value_enum)]
    pub kind: KindArg,

    /// Input text file, a .json canvas object, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file. Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "png")]
    pub output_format: OutputFormat,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[cfg(feature = "server")]
#[derive(ClapArgs, Debug)]
pub struct ServeArgs {
    /// Listen host, overrides the config file and HOST
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Listen port, overrides the config file and PORT
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Swot,
    Bmc,
    Matrix,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Swot => DocumentKind::Swot,
            KindArg::Bmc => DocumentKind::BusinessModelCanvas,
            KindArg::Matrix => DocumentKind::PriorityMatrix,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Render(render) => run_render(render, &config),
        Command::Parse(input) => {
            let doc = read_document(&input)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
        #[cfg(feature = "server")]
        Command::Serve(serve) => run_serve(serve, config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_render(args: RenderArgs, config: &Config) -> Result<()> {
    let doc = read_document(&args.input)?;
    let renderer = Renderer::new(config);
    let icons = load_icons(doc.kind(), config)?;

    match args.output_format {
        OutputFormat::Svg => {
            let (layout, svg) = renderer.render_svg(&doc, &icons);
            if let Some(path) = args.dump_layout.as_deref() {
                write_layout_dump(path, &layout, &doc)?;
            }
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let rendered = renderer.render(&doc, &icons)?;
            if let Some(path) = args.dump_layout.as_deref() {
                write_layout_dump(path, &rendered.layout, &doc)?;
            }
            write_output_png(&rendered.png, &output)?;
        }
    }
    Ok(())
}

#[cfg(feature = "server")]
fn run_serve(args: ServeArgs, config: Config) -> Result<()> {
    let flags = ServerConfig {
        host: args.host,
        port: args.port,
        body_limit_bytes: None,
    };
    let settings = config
        .server
        .resolve(&flags, |name| std::env::var(name).ok());
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(crate::server::serve(config, settings))
}

fn load_icons(kind: DocumentKind, config: &Config) -> Result<IconSet> {
    if kind != DocumentKind::BusinessModelCanvas {
        return Ok(IconSet::empty());
    }
    match config.render.icon_dir.as_deref() {
        Some(dir) if dir.is_dir() => Ok(IconSet::load_dir(dir)?),
        _ => Ok(IconSet::empty()),
    }
}

fn read_document(args: &InputArgs) -> Result<ParsedDocument> {
    let kind = DocumentKind::from(args.kind);
    let (input, is_json) = read_input(args.input.as_deref())?;
    document_from_input(kind, &input, is_json)
}

/// Canvas input may be a JSON object; everything else is heading text.
fn document_from_input(kind: DocumentKind, input: &str, is_json: bool) -> Result<ParsedDocument> {
    let looks_like_json = is_json || input.trim_start().starts_with('{');
    if kind == DocumentKind::BusinessModelCanvas && looks_like_json {
        let value: serde_json::Value =
            serde_json::from_str(input).context("invalid canvas JSON")?;
        let canvas = value.get("bmc").unwrap_or(&value);
        return Ok(canvas_from_value(Some(canvas))?);
    }
    Ok(parse_document(input, kind))
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        return Ok((content, is_json));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
