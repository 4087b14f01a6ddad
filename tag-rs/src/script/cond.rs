//! The `if` built-in.
//!
//! Shape: `(<left><op><right>)=><then>(else)<otherwise>`.  The condition is
//! everything before the first `=>`; the branches are split at the first
//! `(else)` marker.  Operators are searched for in a fixed order and the
//! first one present splits the condition, so `3<=5` splits at `<` and its
//! right operand `=5` is not a number.

use super::builtins::leading_float;
use crate::error::EvalError;

const ARROW: &str = "=>";
const ELSE: &str = "(else)";

/// Comparison operators, in the order they are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
}

impl CompareOp {
    pub const SEARCH_ORDER: [CompareOp; 4] =
        [CompareOp::Eq, CompareOp::Ne, CompareOp::Lt, CompareOp::Gt];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }

    /// Equality compares text; ordering compares the numeric prefix of each
    /// side and is false when either has none.
    pub fn apply(self, left: &str, right: &str) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => numeric(left, right, |a, b| a < b),
            CompareOp::Gt => numeric(left, right, |a, b| a > b),
        }
    }
}

fn numeric(left: &str, right: &str, cmp: fn(f64, f64) -> bool) -> bool {
    match (leading_float(left), leading_float(right)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// A parsed `if` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional<'a> {
    pub left: &'a str,
    pub op: CompareOp,
    pub right: &'a str,
    pub then: &'a str,
    pub otherwise: Option<&'a str>,
}

impl<'a> Conditional<'a> {
    pub fn parse(data: &'a str) -> Result<Self, EvalError> {
        let data = data.trim();
        let malformed = || EvalError::MalformedCondition(data.to_owned());

        let (cond, branches) = data.split_once(ARROW).ok_or_else(malformed)?;
        let cond = cond.trim();
        let cond = cond.strip_prefix('(').unwrap_or(cond);
        let cond = cond.strip_suffix(')').unwrap_or(cond);

        let (op, at) = CompareOp::SEARCH_ORDER
            .iter()
            .find_map(|&op| cond.find(op.symbol()).map(|at| (op, at)))
            .ok_or_else(malformed)?;
        let left = operand(&cond[..at]);
        let right = operand(&cond[at + op.symbol().len()..]);

        let (then, otherwise) = match branches.split_once(ELSE) {
            Some((then, otherwise)) => (then, Some(otherwise.trim())),
            None => (branches, None),
        };

        Ok(Conditional { left, op, right, then: then.trim(), otherwise })
    }

    pub fn holds(&self) -> bool {
        self.op.apply(self.left, self.right)
    }

    /// The branch selected by the condition.
    pub fn select(&self) -> &'a str {
        if self.holds() {
            self.then
        } else {
            self.otherwise.unwrap_or("")
        }
    }
}

/// Empty operands compare as the literal `null`.
fn operand(s: &str) -> &str {
    let s = s.trim();
    if s.is_empty() { "null" } else { s }
}

/// Evaluate the data of an `if` expression to its selected branch.
pub fn eval_if(data: &str) -> Result<String, EvalError> {
    Conditional::parse(data).map(|c| c.select().to_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
