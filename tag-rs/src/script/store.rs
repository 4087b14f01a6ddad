//! Per-render binding store.
//!
//! A store is created for every render, seeded from the caller's
//! `[name, value]` pairs and mutated in place by assignments, `object` /
//! `vector` declarations and `push`. Built-ins are not part of the mapping;
//! the store only holds a reference to the process-wide registry and falls
//! back to it on lookup.

use std::collections::HashMap;

use super::builtins::{Registry, REGISTRY};
use super::value::Value;

/// Named values visible to expression evaluation.
#[derive(Debug)]
pub struct BindingStore {
    vars: HashMap<String, Value>,
    builtins: &'static Registry,
}

impl Default for BindingStore {
    fn default() -> Self {
        Self::with_registry(&REGISTRY)
    }
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store backed by a specific built-in registry.
    pub fn with_registry(builtins: &'static Registry) -> Self {
        Self { vars: HashMap::new(), builtins }
    }

    /// Build a store from ordered pairs.  Later duplicates overwrite earlier
    /// ones.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut store = Self::new();
        for (name, value) in pairs {
            store.set(name, value);
        }
        store
    }

    /// Plain lookup of a binding; built-ins are not consulted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.vars.get_mut(name)
    }

    /// Look up a binding, falling back to the built-in of the same name.
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).or_else(|| self.builtins.get(name))
    }

    /// Set (or overwrite) a binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Drop every binding.  The registry is untouched.
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for BindingStore {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut store = BindingStore::new();
        store.set("reason", "spam");
        assert_eq!(store.get("reason"), Some(&Value::from("spam")));
    }

    #[test]
    fn overwrite() {
        let mut store = BindingStore::new();
        store.set("x", "old");
        store.set("x", "new");
        assert_eq!(store.get("x"), Some(&Value::from("new")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_pairs_last_write_wins() {
        let store = BindingStore::from_pairs([
            ("level", Value::Num(1.0)),
            ("level", Value::Num(2.0)),
        ]);
        assert_eq!(store.get("level"), Some(&Value::Num(2.0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut store: BindingStore =
            [("a", Value::from("1")), ("b", Value::from("2"))].into_iter().collect();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b"), None);
    }

    #[test]
    fn get_ignores_builtins_but_resolve_does_not() {
        let store = BindingStore::new();
        assert_eq!(store.get("round"), None);
        assert!(matches!(store.resolve("round"), Some(Value::Builtin(_))));
    }

    #[test]
    fn bindings_shadow_builtins() {
        let mut store = BindingStore::new();
        store.set("round", "mine");
        assert_eq!(store.resolve("round"), Some(&Value::from("mine")));
    }

    #[test]
    fn get_mut_allows_in_place_edits() {
        let mut store = BindingStore::new();
        store.set("arr", Value::List(vec![]));
        if let Some(Value::List(items)) = store.get_mut("arr") {
            items.push(Value::from("x"));
        }
        assert_eq!(store.get("arr"), Some(&Value::list(["x"])));
    }
}
