//! Template evaluator: brace substitution over a whole template.
//!
//! The template is scanned once, left to right, with a stack of open-brace
//! buffers.  A `}` pops the innermost buffer, evaluates it as an expression
//! and appends the result to the enclosing buffer, so nested expressions are
//! resolved innermost-first and siblings in order of their closing braces.
//!
//! | Input                 | Treatment                                         |
//! |-----------------------|---------------------------------------------------|
//! | `{expr}`              | evaluated, replaced by its text                   |
//! | `{outer {inner}}`     | `inner` first, its text becomes part of `outer`   |
//! | `}` with nothing open | literal                                           |
//! | unclosed `{…`         | literal, after any complete expressions inside it |
//! | past the cap          | literal `{expr}`, not evaluated                   |
//!
//! Substituted text is never rescanned, so a binding whose value contains
//! braces is printed verbatim rather than evaluated.

use tracing::{debug, trace, warn};

use super::expr::evaluate;
use super::store::BindingStore;
use super::value::Value;

/// Hard cap on expression evaluations per render.
pub const MAX_SUBSTITUTIONS: usize = 100;

/// Tunables for a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_substitutions: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_substitutions: MAX_SUBSTITUTIONS }
    }
}

/// Everything a render produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The template with every evaluated expression substituted.
    pub text: String,
    /// Output of the last substitution performed, if any.
    pub last: Option<String>,
    /// Number of expressions evaluated.
    pub substitutions: usize,
    /// Whether the cap left expressions unevaluated.
    pub truncated: bool,
}

impl Rendered {
    /// The value `render` returns: the last substitution's output, or `""`
    /// when nothing was substituted.
    pub fn into_last(self) -> String {
        self.last.unwrap_or_default()
    }
}

/// Renders templates with a fixed set of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render `template` against a fresh store seeded from `pairs` and
    /// return the output of the last substitution.
    pub fn render<I, K>(&self, template: &str, pairs: I) -> String
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut store = BindingStore::from_pairs(pairs);
        self.run(template, &mut store).into_last()
    }

    /// Like [`render`](Self::render) but return the fully substituted
    /// template.
    pub fn expand<I, K>(&self, template: &str, pairs: I) -> String
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut store = BindingStore::from_pairs(pairs);
        self.run(template, &mut store).text
    }

    /// Evaluate every expression in `template` against `store`.
    pub fn run(&self, template: &str, store: &mut BindingStore) -> Rendered {
        let cap = self.options.max_substitutions;
        let mut frames = Frames::new(template.len());
        let mut last = None;
        let mut substitutions = 0usize;
        let mut truncated = false;

        for ch in template.chars() {
            match ch {
                '{' => frames.open(),
                '}' => match frames.close() {
                    Some(content) if substitutions < cap => {
                        substitutions += 1;
                        let out = evaluate(&content, store);
                        trace!(expr = %content, out = %out, "substituted");
                        frames.push_str(&out);
                        last = Some(out);
                    }
                    Some(content) => {
                        truncated = true;
                        frames.push('{');
                        frames.push_str(&content);
                        frames.push('}');
                    }
                    None => frames.push('}'),
                },
                c => frames.push(c),
            }
        }

        if truncated {
            warn!(cap, "substitution cap reached; remaining expressions left as text");
        }
        debug!(substitutions, truncated, "render finished");

        Rendered { text: frames.finish(), last, substitutions, truncated }
    }
}

/// Stack of text buffers: the template body at the bottom, one buffer per
/// currently open `{` above it.
struct Frames {
    stack: Vec<String>,
}

impl Frames {
    fn new(capacity: usize) -> Self {
        Self { stack: vec![String::with_capacity(capacity)] }
    }

    fn open(&mut self) {
        self.stack.push(String::new());
    }

    /// Pop the innermost open buffer, or `None` if no brace is open.
    fn close(&mut self) -> Option<String> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    fn push(&mut self, c: char) {
        if let Some(top) = self.stack.last_mut() {
            top.push(c);
        }
    }

    fn push_str(&mut self, s: &str) {
        if let Some(top) = self.stack.last_mut() {
            top.push_str(s);
        }
    }

    /// Fold unclosed buffers back into their parents as literal text.
    fn finish(mut self) -> String {
        while let Some(content) = self.close() {
            self.push('{');
            self.push_str(&content);
        }
        self.stack.pop().unwrap_or_default()
    }
}

/// Render with default options, returning the last substitution's output.
pub fn render<I, K>(template: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    Renderer::new().render(template, pairs)
}

/// Render with default options, returning the whole substituted template.
pub fn expand<I, K>(template: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    Renderer::new().expand(template, pairs)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
