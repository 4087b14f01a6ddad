//! Built-in tag functions.
//!
//! Each handler receives the raw expression data (everything after the first
//! `:`) and the store of the render in progress, and returns the replacement
//! text.  Handlers are written against `Result<String, EvalError>` and
//! collapsed to an empty string at the boundary, so a mistake in a template
//! blanks one substitution instead of aborting the render.
//!
//! The table is built once per process ([`REGISTRY`]) and shared read-only
//! by every [`BindingStore`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use tracing::trace;

use super::cond::eval_if;
use super::store::BindingStore;
use super::value::{format_number, Builtin, Value};
use crate::error::EvalError;

/// Every built-in, in no particular order.
pub const STANDARD: &[Builtin] = &[
    Builtin::new("round", round),
    Builtin::new("floor", floor),
    Builtin::new("random", random),
    Builtin::new("object", object),
    Builtin::new("vector", vector),
    Builtin::new("in", contains),
    Builtin::new("if", conditional),
    Builtin::new("isNaN", is_nan),
    Builtin::new("push", push),
];

/// The process-wide built-in table.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::new(STANDARD));

/// Read-only name → built-in table.
#[derive(Debug, Default)]
pub struct Registry {
    table: HashMap<&'static str, Value>,
}

impl Registry {
    pub fn new(builtins: &[Builtin]) -> Self {
        let table = builtins.iter().map(|b| (b.name, Value::Builtin(*b))).collect();
        Self { table }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.table.get(name)
    }
}

/// Collapse a handler result to replacement text.
fn collapse(builtin: &'static str, result: Result<String, EvalError>) -> String {
    result.unwrap_or_else(|err| {
        trace!(builtin, %err, "built-in produced no text");
        String::new()
    })
}

// ── Numeric parsing ───────────────────────────────────────────────────────────

/// Parse a finite number, ignoring surrounding whitespace.
pub fn parse_number(s: &str) -> Result<f64, EvalError> {
    let t = s.trim();
    match t.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(EvalError::NotANumber(t.to_owned())),
    }
}

/// The optionally-signed run of digits at the start of `s` (after leading
/// whitespace), if there is at least one digit.
fn leading_digits(s: &str) -> Option<&str> {
    let t = s.trim_start();
    let unsigned = t.strip_prefix(['+', '-']).unwrap_or(t);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let sign = t.len() - unsigned.len();
    Some(&t[..sign + digits])
}

/// Parse the integer prefix of `s`: `"12abc"` is 12, `"abc"` is nothing.
pub fn leading_int(s: &str) -> Option<i64> {
    leading_digits(s)?.parse().ok()
}

/// Optional sign, then `Infinity` or a decimal with optional exponent.
static FLOAT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

/// Parse the numeric prefix of `s`: `"5px"` is 5, `"1e3x"` is 1000,
/// `"abc"` is nothing.
pub fn leading_float(s: &str) -> Option<f64> {
    let m = FLOAT_PREFIX_RE.find(s.trim_start())?;
    m.as_str().parse().ok()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

fn round(data: &str, _: &mut BindingStore) -> String {
    // Halves round towards positive infinity.
    collapse("round", parse_number(data).map(|x| format_number((x + 0.5).floor())))
}

fn floor(data: &str, _: &mut BindingStore) -> String {
    collapse("floor", parse_number(data).map(|x| format_number(x.floor())))
}

fn random(data: &str, _: &mut BindingStore) -> String {
    let bounds = || -> Result<(i64, i64), EvalError> {
        let bad = || EvalError::BadArgument { builtin: "random", arg: data.to_owned() };
        let (lo, hi) = data.split_once(',').ok_or_else(bad)?;
        let lo = leading_int(lo).ok_or_else(bad)?;
        let hi = leading_int(hi).ok_or_else(bad)?;
        Ok(if lo <= hi { (lo, hi) } else { (hi, lo) })
    };
    collapse(
        "random",
        bounds().map(|(lo, hi)| rand::thread_rng().gen_range(lo..=hi).to_string()),
    )
}

fn object(data: &str, store: &mut BindingStore) -> String {
    let name = data.trim();
    if name.is_empty() {
        return collapse(
            "object",
            Err(EvalError::BadArgument { builtin: "object", arg: data.to_owned() }),
        );
    }
    store.set(name, Value::Dict(HashMap::new()));
    String::new()
}

fn vector(data: &str, store: &mut BindingStore) -> String {
    let (name, seed) = match data.split_once('=') {
        Some((name, seed)) => (name.trim(), Some(seed.trim())),
        None => (data.trim(), None),
    };
    if name.is_empty() {
        return collapse(
            "vector",
            Err(EvalError::BadArgument { builtin: "vector", arg: data.to_owned() }),
        );
    }
    let items = match seed {
        Some(seed) if !seed.is_empty() => seed.split(',').map(|s| Value::from(s.trim())).collect(),
        _ => Vec::new(),
    };
    store.set(name, Value::List(items));
    String::new()
}

/// `in:<literal>,<array name>`.  The name is after the last comma so the
/// literal may itself contain commas.
fn contains(data: &str, store: &mut BindingStore) -> String {
    let check = || -> Result<bool, EvalError> {
        let (needle, name) = data
            .rsplit_once(',')
            .ok_or_else(|| EvalError::BadArgument { builtin: "in", arg: data.to_owned() })?;
        let needle = needle.trim();
        Ok(match store.get(name.trim()) {
            Some(Value::List(items)) => items.iter().any(|item| item.to_string() == needle),
            _ => false,
        })
    };
    collapse("in", check().map(|found| found.to_string()))
}

fn conditional(data: &str, _: &mut BindingStore) -> String {
    collapse("if", eval_if(data))
}

fn is_nan(data: &str, _: &mut BindingStore) -> String {
    leading_digits(data).is_none().to_string()
}

/// `push:<array name>-><value>`.  The value is copied from the store when it
/// names a binding, otherwise pushed as literal text.
fn push(data: &str, store: &mut BindingStore) -> String {
    let mut apply = || -> Result<(), EvalError> {
        let (target, item) = data
            .split_once("->")
            .ok_or_else(|| EvalError::BadArgument { builtin: "push", arg: data.to_owned() })?;
        let (target, item) = (target.trim(), item.trim());
        let value = store.get(item).cloned().unwrap_or_else(|| Value::from(item));
        match store.get_mut(target) {
            Some(Value::List(items)) => {
                items.push(value);
                Ok(())
            }
            _ => Err(EvalError::NotAList(target.to_owned())),
        }
    };
    collapse("push", apply().map(|()| String::new()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
