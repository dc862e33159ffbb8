use canvasflow::{CanvasConfig, RenderStyle, Session, SessionOptions};
use canvasflow_core::geom::size;
use canvasflow_render::scene::compute_content_bounds;
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Canvas(canvasflow::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Canvas(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<canvasflow::Error> for CliError {
    fn from(value: canvasflow::Error) -> Self {
        Self::Canvas(value)
    }
}

impl From<canvasflow_core::Error> for CliError {
    fn from(value: canvasflow_core::Error) -> Self {
        Self::Canvas(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Layout,
    Render,
    Fit,
    Bounds,
}

#[derive(Debug)]
struct Args {
    command: Option<Command>,
    input: Option<String>,
    config: Option<String>,
    out: Option<String>,
    pretty: bool,
    style: RenderStyle,
    viewport_width: f64,
    viewport_height: f64,
    margin: Option<f64>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: None,
            input: None,
            config: None,
            out: None,
            pretty: false,
            style: RenderStyle::Vector,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            margin: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoundsOut {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    width: f64,
    height: f64,
}

fn usage() -> &'static str {
    "canvasflow-cli\n\
\n\
USAGE:\n\
  canvasflow-cli layout [--config <path>] [--out <path>] [<path>|-]\n\
  canvasflow-cli render [--style vector|sketch] [--viewport-width <w>] [--viewport-height <h>] [--config <path>] [--out <path>] [<path>|-]\n\
  canvasflow-cli fit [--viewport-width <w>] [--viewport-height <h>] [--config <path>] [--pretty] [--out <path>] [<path>|-]\n\
  canvasflow-cli bounds [--margin <m>] [--config <path>] [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the canvas JSON is read from stdin.\n\
  - layout runs the force-directed pass and prints the updated document.\n\
  - every command prints to stdout by default; use --out to write a file.\n\
  - --config takes a JSON object, e.g. {\"layout\": {\"iterations\": 80}}.\n\
  - Set CANVASFLOW_LOG (e.g. debug) to see diagnostics on stderr.\n\
"
}

fn parse_positive(value: Option<&String>) -> Result<f64, CliError> {
    let Some(raw) = value else {
        return Err(CliError::Usage(usage()));
    };
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" if args.command.is_none() => args.command = Some(Command::Layout),
            "render" if args.command.is_none() => args.command = Some(Command::Render),
            "fit" if args.command.is_none() => args.command = Some(Command::Fit),
            "bounds" if args.command.is_none() => args.command = Some(Command::Bounds),
            "--pretty" => args.pretty = true,
            "--style" => {
                let Some(style) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.style = style
                    .parse::<RenderStyle>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--viewport-width" => args.viewport_width = parse_positive(it.next())?,
            "--viewport-height" => args.viewport_height = parse_positive(it.next())?,
            "--margin" => {
                let Some(m) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let m = m.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(m.is_finite() && m >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.margin = Some(m);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "-" if args.input.is_none() => args.input = Some("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.command.is_none() {
        return Err(CliError::Usage(usage()));
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

fn read_config(path: Option<&str>) -> Result<CanvasConfig, CliError> {
    match path {
        None => Ok(CanvasConfig::empty_object()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let mut config = CanvasConfig::empty_object();
            config.deep_merge(CanvasConfig::from_json_str(&text)?.as_value());
            Ok(config)
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    write_text(&text, out)
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

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("CANVASFLOW_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = read_config(args.config.as_deref())?;
    let options = SessionOptions::from_config(&config);
    let margin = args.margin.unwrap_or(options.render.scene.margin);
    let mut session = Session::new(options, size(args.viewport_width, args.viewport_height));

    let text = read_input(args.input.as_deref())?;
    session.load_str(&text)?;
    tracing::debug!(command = ?args.command, nodes = session.document().nodes.len(), "running");

    match args.command {
        Some(Command::Layout) => {
            session.set_auto_layout(true)?;
            let mut doc = session.save_string()?;
            doc.push('\n');
            write_text(&doc, args.out.as_deref())
        }
        Some(Command::Render) => {
            session.set_style(args.style);
            let svg = session.render_svg()?;
            write_text(&svg, args.out.as_deref())
        }
        Some(Command::Fit) => write_json(&session.viewport().state(), args.pretty, args.out.as_deref()),
        Some(Command::Bounds) => {
            let b = compute_content_bounds(&session.document().nodes, margin);
            let out = BoundsOut {
                min_x: b.min_x(),
                min_y: b.min_y(),
                max_x: b.max_x(),
                max_y: b.max_y(),
                width: b.width(),
                height: b.height(),
            };
            write_json(&out, args.pretty, args.out.as_deref())
        }
        None => Err(CliError::Usage(usage())),
    }
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
