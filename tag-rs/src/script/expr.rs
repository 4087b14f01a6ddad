//! Expression analyzer: evaluates the content of one `{...}` pair.
//!
//! An expression is `name` or `name:data`.  What happens next depends on
//! what `name` resolves to:
//!
//! | Resolved to              | Behaviour                                        |
//! |--------------------------|--------------------------------------------------|
//! | built-in                 | called with `data`                               |
//! | array/object, `data` has `=` | element or key path assigned; no output; a path that cannot be assigned (e.g. through a built-in entry) is read instead |
//! | array, `data`            | `n`, `a-b` (half-open) or `n+` indexing          |
//! | object, `data`           | `key[:rest]` lookup, calling built-in entries    |
//! | anything, no `data`      | the value's text                                 |
//! | string/number/…, `data`  | rebound to `data`; no output                     |
//! | nothing                  | `key:value` / `key=value` creates a binding      |

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::store::BindingStore;
use super::value::{Builtin, Value};
use crate::error::EvalError;

/// `n`, `a-b` or `n+`.
static INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:-(\d+)|(\+))?$").expect("index pattern is valid"));

/// What an expression's name refers to, detached from the store borrow.
enum Target {
    Call(Builtin),
    Container,
    Scalar(String),
    Unbound,
}

/// Result of reading through a container: either finished text or a
/// built-in that still has to run against the (mutable) store.
enum Lookup<'a> {
    Text(String),
    Call(Builtin, &'a str),
}

/// Evaluate one expression against `store`.
///
/// Never fails: anything that cannot be resolved evaluates to `""`.
pub fn evaluate(content: &str, store: &mut BindingStore) -> String {
    analyze(content, store).unwrap_or_else(|err| {
        trace!(expr = content, %err, "expression produced no text");
        String::new()
    })
}

fn analyze(content: &str, store: &mut BindingStore) -> Result<String, EvalError> {
    let content = content.trim();
    let (name, data) = match content.split_once(':') {
        Some((name, data)) => (name.trim(), Some(data.trim())),
        None => (content, None),
    };

    let target = match store.resolve(name) {
        Some(Value::Builtin(builtin)) => Target::Call(*builtin),
        Some(value) if value.is_container() => Target::Container,
        Some(value) => Target::Scalar(value.to_string()),
        None => Target::Unbound,
    };

    match (target, data) {
        (Target::Call(builtin), data) => Ok(builtin.call(data.unwrap_or(""), store)),
        (Target::Container, Some(data)) => {
            // A path ending in a function entry is a call, not an assignment.
            if data.contains('=') {
                match assign(name, data, store) {
                    Ok(out) => return Ok(out),
                    Err(err) => trace!(expr = content, %err, "not assignable, reading instead"),
                }
            }
            let lookup = match store.get(name) {
                Some(value) => read(value, data)?,
                None => return Err(EvalError::MissingKey(name.to_owned())),
            };
            Ok(match lookup {
                Lookup::Text(text) => text,
                Lookup::Call(builtin, arg) => builtin.call(arg, store),
            })
        }
        (Target::Container, None) => Ok(store.get(name).map(Value::to_string).unwrap_or_default()),
        (Target::Scalar(text), None) => Ok(text),
        (Target::Scalar(_), Some(data)) => {
            store.set(name, data);
            Ok(String::new())
        }
        (Target::Unbound, _) => bind(content, store),
    }
}

/// Create a binding from `key:value` or `key=value`, splitting at whichever
/// separator comes first.  A bare unknown name binds nothing.
fn bind(content: &str, store: &mut BindingStore) -> Result<String, EvalError> {
    if let Some(at) = content.find([':', '=']) {
        let key = content[..at].trim();
        if key.is_empty() {
            return Err(EvalError::BadTarget(content.to_owned()));
        }
        store.set(key, content[at + 1..].trim());
    }
    Ok(String::new())
}

// ── Reading ───────────────────────────────────────────────────────────────────

fn read<'a>(value: &Value, data: &'a str) -> Result<Lookup<'a>, EvalError> {
    match value {
        Value::List(items) => index(items, data).map(Lookup::Text),
        Value::Dict(map) => {
            let (key, rest) = match data.split_once(':') {
                Some((key, rest)) => (key.trim(), Some(rest.trim())),
                None => (data.trim(), None),
            };
            let entry = map.get(key).ok_or_else(|| EvalError::MissingKey(key.to_owned()))?;
            match (entry, rest) {
                (Value::Builtin(builtin), rest) => Ok(Lookup::Call(*builtin, rest.unwrap_or(""))),
                (nested, Some(rest)) if nested.is_container() => read(nested, rest),
                (other, _) => Ok(Lookup::Text(other.to_string())),
            }
        }
        other => Ok(Lookup::Text(other.to_string())),
    }
}

/// Array indexing: `n` is one element, `a-b` the half-open slice `[a, b)`
/// and `n+` the tail from `n`.  Slices are joined with spaces.
fn index(items: &[Value], data: &str) -> Result<String, EvalError> {
    let spec = data.trim();
    let caps = INDEX_RE.captures(spec).ok_or_else(|| EvalError::BadIndex(spec.to_owned()))?;
    let parse = |m: regex::Match<'_>| {
        m.as_str().parse::<usize>().map_err(|_| EvalError::BadIndex(spec.to_owned()))
    };
    let start = match caps.get(1) {
        Some(m) => parse(m)?,
        None => return Err(EvalError::BadIndex(spec.to_owned())),
    };

    let end = match (caps.get(2), caps.get(3)) {
        (Some(end), _) => parse(end)?.min(items.len()),
        (None, Some(_)) => items.len(),
        (None, None) => {
            return items
                .get(start)
                .map(Value::to_string)
                .ok_or_else(|| EvalError::OutOfRange(spec.to_owned()));
        }
    };

    match items.get(start..end) {
        Some(slice) if !slice.is_empty() => Ok(join_spaced(slice)),
        _ => Err(EvalError::OutOfRange(spec.to_owned())),
    }
}

fn join_spaced(items: &[Value]) -> String {
    items.iter().map(Value::to_string).collect::<Vec<_>>().join(" ")
}

// ── Mutation ──────────────────────────────────────────────────────────────────

/// `name:<path>=<literal>` on an array or object binding.
fn assign(name: &str, data: &str, store: &mut BindingStore) -> Result<String, EvalError> {
    let (path, literal) = data
        .split_once('=')
        .ok_or_else(|| EvalError::BadTarget(data.to_owned()))?;
    let value = store
        .get_mut(name)
        .ok_or_else(|| EvalError::BadTarget(name.to_owned()))?;
    assign_path(value, path.trim(), Value::from(literal.trim()))?;
    Ok(String::new())
}

pub(crate) fn assign_path(target: &mut Value, path: &str, value: Value) -> Result<(), EvalError> {
    let (head, rest) = match path.split_once(':') {
        Some((head, rest)) => (head.trim(), Some(rest.trim())),
        None => (path.trim(), None),
    };
    match (target, rest) {
        (Value::List(items), rest) => {
            let i: usize = head.parse().map_err(|_| EvalError::BadIndex(head.to_owned()))?;
            match rest {
                Some(rest) => match items.get_mut(i) {
                    Some(nested) => assign_path(nested, rest, value),
                    None => Err(EvalError::OutOfRange(head.to_owned())),
                },
                None if i < items.len() => {
                    items[i] = value;
                    Ok(())
                }
                None if i == items.len() => {
                    items.push(value);
                    Ok(())
                }
                None => Err(EvalError::OutOfRange(head.to_owned())),
            }
        }
        (Value::Dict(map), Some(rest)) => match map.get_mut(head) {
            Some(nested) => assign_path(nested, rest, value),
            None => Err(EvalError::MissingKey(head.to_owned())),
        },
        (Value::Dict(map), None) => {
            if head.is_empty() {
                return Err(EvalError::BadTarget(path.to_owned()));
            }
            map.insert(head.to_owned(), value);
            Ok(())
        }
        _ => Err(EvalError::BadTarget(path.to_owned())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
