//! Command-line interface of the `tagscript` binary.
//!
//! Usage:
//!   tagscript [-f <bindings>] [-D name=value]… [-c <template>] [--full] [-d]
//!
//! Without `-c` the template is read from stdin.  `{dm}` / `{delete}`
//! markers are stripped before rendering and reported on stderr.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{parse_scalar, Config};
use crate::error::ConfigError;
use crate::markers::{strip_markers, Markers};
use crate::script::{RenderOptions, Renderer, MAX_SUBSTITUTIONS};

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tagscript", version, about = "Render a tag script template")]
pub struct CliArgs {
    /// Bindings file to seed the render with.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub bindings_file: Option<PathBuf>,

    /// Extra binding; applied after the bindings file.  Repeatable.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,

    /// Template to render.  Read from stdin when absent.
    #[arg(short = 'c', long = "command", value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Print the whole substituted template instead of the last
    /// substitution.
    #[arg(long)]
    pub full: bool,

    /// Cap on expression evaluations.
    #[arg(long, value_name = "N", default_value_t = MAX_SUBSTITUTIONS)]
    pub max_substitutions: usize,

    /// Debug logging (overridden by `RUST_LOG`).
    #[arg(short = 'd', long)]
    pub debug: bool,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub markers: Markers,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse a slice of argument strings (exposed for testing).  The first
/// element is the program name.
pub fn parse_argv<I, T>(argv: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CliArgs::try_parse_from(argv)
}

/// `name=value` for `-D`.
pub fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Install the global tracing subscriber.  Logs go to stderr.
pub fn init_tracing(debug: bool) {
    let default = if debug { "tagscript=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load bindings, read the template and render it.
pub fn run(args: &CliArgs, stdin: &mut dyn Read) -> Result<Output, ConfigError> {
    let mut config = match &args.bindings_file {
        Some(path) => {
            let (config, errors) = Config::load_file(path)?;
            for err in &errors {
                warn!(file = %path.display(), "{err}");
            }
            config
        }
        None => Config::new(),
    };
    for (name, value) in &args.defines {
        config.set(name.as_str(), parse_scalar(value));
    }

    let source = match &args.template {
        Some(t) => t.clone(),
        None => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).map_err(ConfigError::Template)?;
            // A trailing newline from `echo` is not part of the template.
            buf.truncate(buf.trim_end_matches(['\r', '\n']).len());
            buf
        }
    };

    let (template, markers) = strip_markers(&source);
    if markers.any() {
        info!(dm = markers.dm, delete = markers.delete, "control markers stripped");
    }

    let renderer = Renderer::with_options(RenderOptions { max_substitutions: args.max_substitutions });
    let bindings = config.into_bindings();
    let text = if args.full {
        renderer.expand(&template, bindings)
    } else {
        renderer.render(&template, bindings)
    };
    Ok(Output { text, markers })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
