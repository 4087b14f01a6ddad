//! Tag script interpreter.
//!
//! Templates are plain text with `{...}` expressions:
//!
//! - Binding lookup and indexing (`{reason}`, `{user:username}`, `{args:1+}`)
//! - Ad-hoc bindings (`{greeting=hi}`, `{myVar: hello}`)
//! - Built-ins: `round`, `floor`, `random`, `object`, `vector`, `in`, `if`,
//!   `isNaN`, `push`
//! - Array/object mutation (`{args:0=first}`, `{user:nick=bob}`)
//!
//! # Quick start
//!
//! ```rust
//! use tagscript::script::{expand, render, Value};
//!
//! let user = Value::dict([("username", "bob")]);
//! let out = expand("Hi {user:username}! {if:(3>2)=>yes(else)no}", [("user", user)]);
//! assert_eq!(out, "Hi bob! yes");
//!
//! // `render` returns only the last substitution.
//! assert_eq!(render("{name}", [("name", Value::from("hello"))]), "hello");
//! ```

pub mod builtins;
pub mod cond;
pub mod expand;
pub mod expr;
pub mod store;
pub mod value;

// Re-exports for convenience.
pub use expand::{expand, render, RenderOptions, Rendered, Renderer, MAX_SUBSTITUTIONS};
pub use expr::evaluate;
pub use store::BindingStore;
pub use value::{Builtin, Value};
