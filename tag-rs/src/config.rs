//! Bindings file parser.
//!
//! Seeds the bindings of a render from a small rc-style file:
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | bind a scalar |
//! | `/set <name>:<key>[:<key>…]=<value>` | set a field of a declared object |
//! | `/vector <name>[=a,b,c]` | bind an array of strings |
//! | `/object <name>` | bind an empty object |
//! | Lines starting with `;` | comment, ignored |
//!
//! Scalars are typed on load: `true`/`false` become booleans, `null` is
//! null, finite numbers are numbers, and anything else (or anything in
//! double quotes) is a string.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::context::Bindings;
use crate::error::ConfigError;
use crate::script::expr::assign_path;
use crate::script::Value;

// ── Public API ────────────────────────────────────────────────────────────────

/// Bindings loaded from a file, in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    bindings: Vec<(String, Value)>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bindings file.
    ///
    /// Problems on individual lines are collected and returned alongside the
    /// bindings that did load.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            // blank lines and comments (`;` or `;;` prefix)
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some(rest) = line.strip_prefix('/') else {
                errors.push(ConfigError::line(lineno, "expected a /directive"));
                continue;
            };

            // split off the directive name
            let (cmd, args) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));
            let args = args.trim();

            let result = match cmd {
                "set" => config.parse_set(args),
                "vector" => config.parse_vector(args),
                "object" => config.parse_object(args),
                other => Err(format!("unknown directive /{other}")),
            };
            if let Err(message) = result {
                errors.push(ConfigError::line(lineno, message));
            }
        }

        debug!(bindings = config.len(), errors = errors.len(), "bindings file loaded");
        (config, errors)
    }

    /// Read and parse a bindings file from disk.
    pub fn load_file(path: &Path) -> Result<(Self, Vec<ConfigError>), ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::load_str(&s))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Bind `name`, replacing an earlier binding in place.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.bindings.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.bindings.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_bindings(self) -> Bindings {
        self.bindings.into_iter().collect()
    }

    // ── Directives ────────────────────────────────────────────────────────────

    /// `/set <name>=<value>` or `/set <name> <value>`.
    fn parse_set(&mut self, args: &str) -> Result<(), String> {
        if args.is_empty() {
            return Err("/set: requires an argument".into());
        }

        let (name, value) = match args.find(|c: char| c == '=' || c.is_ascii_whitespace()) {
            Some(at) => {
                let value = args[at..].trim_start();
                let value = value.strip_prefix('=').unwrap_or(value);
                (args[..at].trim(), value.trim())
            }
            None => return Err(format!("/set: missing value for '{args}'")),
        };

        if name.is_empty() {
            return Err("/set: variable name cannot be empty".into());
        }

        let value = parse_scalar(value);
        match name.split_once(':') {
            Some((root, path)) => {
                let target = self
                    .bindings
                    .iter_mut()
                    .find(|(k, _)| k == root)
                    .map(|(_, v)| v)
                    .ok_or_else(|| format!("/set: '{root}' is not declared"))?;
                assign_path(target, path, value).map_err(|e| format!("/set: {e}"))
            }
            None => {
                self.set(name, value);
                Ok(())
            }
        }
    }

    /// `/vector <name>` or `/vector <name>=a,b,c`.
    fn parse_vector(&mut self, args: &str) -> Result<(), String> {
        let (name, seed) = match args.split_once('=') {
            Some((name, seed)) => (name.trim(), seed.trim()),
            None => (args, ""),
        };
        if name.is_empty() {
            return Err("/vector: requires a name".into());
        }
        let items = if seed.is_empty() {
            Vec::new()
        } else {
            seed.split(',').map(|s| Value::from(s.trim())).collect()
        };
        self.set(name, Value::List(items));
        Ok(())
    }

    /// `/object <name>`.
    fn parse_object(&mut self, args: &str) -> Result<(), String> {
        if args.is_empty() || args.contains(char::is_whitespace) {
            return Err(format!("/object: expected a single name, got '{args}'"));
        }
        self.set(args, Value::Dict(HashMap::new()));
        Ok(())
    }
}

/// Type a scalar from its source text.
pub fn parse_scalar(s: &str) -> Value {
    if let Some(inner) = s.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return Value::from(inner);
    }
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => match s.parse::<f64>() {
            Ok(x) if x.is_finite() => Value::Num(x),
            _ => Value::from(s),
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
