use folio::FolioConfig;
use folio::render::raster::{self, RasterError, RasterOptions};
use folio::render::{FolioError, MapRenderer, sanitize_svg_id};
use folio::storage::{MemoryStore, Storage};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Folio(FolioError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Folio(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FolioError> for CliError {
    fn from(value: FolioError) -> Self {
        Self::Folio(value)
    }
}

impl From<folio::Error> for CliError {
    fn from(value: folio::Error) -> Self {
        Self::Folio(value.into())
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Parse,
    Layout,
    Render,
    Outline,
    Maps,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    render_format: RenderFormat,
    render_scale: Option<f32>,
    background: Option<String>,
    diagram_id: Option<String>,
    book: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapSummary<'a> {
    id: &'a str,
    title: &'a str,
    book_id: Option<&'a str>,
    nodes: usize,
}

fn usage() -> &'static str {
    "folio-cli\n\
\n\
USAGE:\n\
  folio-cli [parse] [--pretty] [--config <json>] [<path>|-]\n\
  folio-cli layout [--pretty] [--config <json>] [<path>|-]\n\
  folio-cli render [--format svg|png] [--scale <n>] [--background <css-color>] [--id <svg-id>] [--out <path>] [--config <json>] [<path>|-]\n\
  folio-cli outline --book <book-id> [--config <json>] [<backup.json>|-]\n\
  folio-cli maps [--book <book-id>] [--pretty] [<backup.json>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - parse/layout/render take an indented outline (tabs, or two spaces per level).\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to 2x on white, written next to the input file (or ./out.png for stdin).\n\
  - outline prints the outline generated from a book's highlights in a backup file.\n\
  - maps lists the mind maps in a backup file with their node counts.\n\
  - Set RUST_LOG (e.g. RUST_LOG=folio=debug) for diagnostics on stderr.\n\
"
}

fn bad_usage() -> CliError {
    CliError::Usage(usage())
}

/// The value following a flag, e.g. the path after `--out`.
fn flag_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a str, CliError> {
    it.next().map(String::as_str).ok_or_else(bad_usage)
}

fn set_input(args: &mut Args, input: &str) -> Result<(), CliError> {
    if args.input.replace(input.to_string()).is_some() {
        return Err(bad_usage());
    }
    Ok(())
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut it = argv.iter().skip(1);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "parse" => args.command = Command::Parse,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "outline" => args.command = Command::Outline,
            "maps" => args.command = Command::Maps,
            "--help" | "-h" => return Err(bad_usage()),
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(flag_value(&mut it)?.to_string()),
            "--format" => {
                args.render_format = flag_value(&mut it)?.parse().map_err(|_| bad_usage())?;
            }
            "--scale" => {
                let scale: f32 = flag_value(&mut it)?.parse().map_err(|_| bad_usage())?;
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(bad_usage());
                }
                args.render_scale = Some(scale);
            }
            "--background" => {
                let color = flag_value(&mut it)?.trim();
                args.background = (!color.is_empty()).then(|| color.to_string());
            }
            "--id" => args.diagram_id = Some(flag_value(&mut it)?.to_string()),
            "--book" => args.book = Some(flag_value(&mut it)?.to_string()),
            "--out" => args.out = Some(flag_value(&mut it)?.to_string()),
            "--" => {
                if let Some(rest) = it.next() {
                    set_input(&mut args, rest)?;
                }
                if it.next().is_some() {
                    return Err(bad_usage());
                }
            }
            other if other.starts_with('-') && other != "-" => return Err(bad_usage()),
            path => set_input(&mut args, path)?,
        }
    }

    if matches!(args.command, Command::Outline) && args.book.is_none() {
        return Err(bad_usage());
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_png_out_path(input: Option<&str>) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension("png"),
        _ => std::path::PathBuf::from("out.png"),
    }
}

fn load_renderer(config: Option<&str>) -> Result<MapRenderer, CliError> {
    let Some(path) = config else {
        return Ok(MapRenderer::default());
    };
    let config = FolioConfig::from_json(&std::fs::read_to_string(path)?)?;
    Ok(MapRenderer::with_config(config)?)
}

fn load_store(text: &str, renderer: &MapRenderer) -> Result<MemoryStore, CliError> {
    let mut store = MemoryStore::new();
    let summary = renderer.import_backup(&mut store, text)?;
    tracing::info!(
        books = summary.books,
        mindmaps = summary.mindmaps,
        "loaded backup"
    );
    Ok(store)
}

fn run(args: Args) -> Result<(), CliError> {
    let mut renderer = load_renderer(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Parse => write_json(&folio::render::parse(&text), args.pretty),
        Command::Layout => write_json(&renderer.layout_text(&text), args.pretty),
        Command::Render => {
            if let Some(id) = args.diagram_id.as_deref() {
                renderer.svg.diagram_id = sanitize_svg_id(id);
            }
            match args.render_format {
                RenderFormat::Svg => {
                    write_text(&renderer.render_svg_text(&text), args.out.as_deref())
                }
                RenderFormat::Png => {
                    let defaults = RasterOptions::default();
                    let options = RasterOptions {
                        scale: args.render_scale.unwrap_or(defaults.scale),
                        background: args.background.or(defaults.background),
                    };
                    let bytes = raster::render_png(&renderer, &text, &options)?;
                    let out = args
                        .out
                        .map(std::path::PathBuf::from)
                        .unwrap_or_else(|| default_png_out_path(args.input.as_deref()));
                    std::fs::write(&out, bytes)?;
                    Ok(())
                }
            }
        }
        Command::Outline => {
            let store = load_store(&text, &renderer)?;
            let book_id = args.book.as_deref().unwrap_or_default();
            let book = store
                .get_book(book_id)
                .ok_or_else(|| folio::Error::BookNotFound {
                    id: book_id.to_string(),
                })?;
            let outline = folio::outline_from_book(&book, &renderer.config.generate)?;
            write_text(&outline, args.out.as_deref())
        }
        Command::Maps => {
            let store = load_store(&text, &renderer)?;
            let maps = match args.book.as_deref() {
                Some(id) => store.mind_maps_for_book(id),
                None => store.mind_maps(),
            };
            let out: Vec<MapSummary<'_>> = maps
                .iter()
                .map(|m| MapSummary {
                    id: &m.id,
                    title: &m.title,
                    book_id: m.book_id.as_deref(),
                    nodes: m.root.as_ref().map_or(0, |r| r.node_count()),
                })
                .collect();
            write_json(&out, args.pretty)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
