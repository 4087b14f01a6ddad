/// End-to-end rendering tests against the public library API.
///
/// Each test drives a whole template through `render`/`expand` the way a
/// bot command handler would, with bindings built from `context` helpers
/// where that reads naturally.
use tagscript::context::{Bindings, ServerInfo, UserInfo};
use tagscript::markers::strip_markers;
use tagscript::script::{evaluate, BindingStore, RenderOptions, Renderer, MAX_SUBSTITUTIONS};
use tagscript::{expand, render, Value};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn no_bindings() -> Vec<(&'static str, Value)> {
    Vec::new()
}

fn store() -> BindingStore {
    BindingStore::from_pairs([
        ("list", Value::list(["a", "b", "c"])),
        ("user", Value::dict([("id", "123"), ("username", "bob")])),
        ("arr", Value::list(["x", "y"])),
        ("empty", Value::List(vec![])),
    ])
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

#[test]
fn literal_text_has_no_substitutions() {
    let mut s = BindingStore::new();
    let out = Renderer::new().run("no braces here", &mut s);
    assert_eq!(out.text, "no braces here");
    assert_eq!(out.substitutions, 0);
    assert_eq!(render("no braces here", no_bindings()), "");
}

#[test]
fn variable_roundtrip() {
    assert_eq!(render("{name}", [("name", Value::from("hello"))]), "hello");
}

#[test]
fn assignment_then_reference() {
    let mut s = BindingStore::new();
    let out = Renderer::new().run("{greeting=hi}{greeting}", &mut s);
    assert_eq!(out.text, "hi");
    assert_eq!(out.last.as_deref(), Some("hi"));
    assert_eq!(s.get("greeting"), Some(&Value::from("hi")));
    assert_eq!(render("{greeting=hi}{greeting}", no_bindings()), "hi");
}

#[test]
fn render_returns_only_the_last_substitution() {
    let bindings = [
        ("user", Value::dict([("username", "bob")])),
        ("level", Value::Num(7.0)),
    ];
    let template = "Hello {user:username}, you are level {level}";
    assert_eq!(render(template, bindings.clone()), "7");
    assert_eq!(expand(template, bindings), "Hello bob, you are level 7");
}

#[test]
fn cap_leaves_later_expressions_literal() {
    let template = "{x}".repeat(MAX_SUBSTITUTIONS + 1);
    let mut s = BindingStore::from_pairs([("x", Value::from("."))]);
    let out = Renderer::new().run(&template, &mut s);
    assert!(out.truncated);
    assert_eq!(out.substitutions, MAX_SUBSTITUTIONS);
    assert_eq!(out.text, format!("{}{{x}}", ".".repeat(MAX_SUBSTITUTIONS)));
}

#[test]
fn custom_cap() {
    let renderer = Renderer::with_options(RenderOptions { max_substitutions: 2 });
    assert_eq!(renderer.expand("{a}{a}{a}", [("a", Value::from("1"))]), "11{a}");
}

#[test]
fn substituted_braces_are_not_rescanned() {
    let out = expand("{tricky}", [("tricky", Value::from("{round:1.5}"))]);
    assert_eq!(out, "{round:1.5}");
}

#[test]
fn nested_expressions_resolve_innermost_first() {
    let bindings = [("which", Value::from("username")), ("user", Value::dict([("username", "bob")]))];
    assert_eq!(expand("hi {user:{which}}", bindings), "hi bob");
    assert_eq!(expand("{round:{floor:2.9}.6}", no_bindings()), "3");
}

#[test]
fn unbalanced_braces_stay_literal() {
    assert_eq!(expand("a } b", no_bindings()), "a } b");
    assert_eq!(expand("{open {x}", [("x", Value::from("1"))]), "{open 1");
}

// ── Analyzer ──────────────────────────────────────────────────────────────────

#[test]
fn arithmetic_builtins() {
    let mut s = BindingStore::new();
    assert_eq!(evaluate("round:3.7", &mut s), "4");
    assert_eq!(evaluate("floor:3.7", &mut s), "3");
    assert_eq!(evaluate("round:abc", &mut s), "");
}

#[test]
fn conditional_branching() {
    let mut s = BindingStore::new();
    assert_eq!(evaluate("if:(5>3)=>yes(else)no", &mut s), "yes");
    assert_eq!(evaluate("if:(2>3)=>yes(else)no", &mut s), "no");
    assert_eq!(evaluate("if:(2>3)=>yes", &mut s), "");
}

#[test]
fn conditional_on_bindings() {
    let bindings = Bindings::new().levels(10, 9);
    assert_eq!(bindings.render("{if:({level}=={oldLevel})=>same(else)up}"), "up");
}

#[test]
fn array_indexing() {
    let mut s = store();
    assert_eq!(evaluate("list:1", &mut s), "b");
    assert_eq!(evaluate("list:0-2", &mut s), "a b");
    assert_eq!(evaluate("list:5", &mut s), "");
}

#[test]
fn object_field_access() {
    assert_eq!(evaluate("user:username", &mut store()), "bob");
}

#[test]
fn membership() {
    let mut s = store();
    assert_eq!(evaluate("in:x,arr", &mut s), "true");
    assert_eq!(evaluate("in:z,arr", &mut s), "false");
}

#[test]
fn push_mutates_array() {
    let mut s = store();
    assert_eq!(evaluate("push:empty->val", &mut s), "");
    assert_eq!(s.get("empty"), Some(&Value::list(["val"])));
}

#[test]
fn builtins_build_state_across_a_template() {
    let template = "{vector:seen}{push:seen->a}{push:seen->b}{in:b,seen} {seen}";
    assert_eq!(expand(template, no_bindings()), "true a,b");
}

// ── Caller context ────────────────────────────────────────────────────────────

#[test]
fn welcome_message() {
    let user = UserInfo::new("42", "bob", "0001");
    let server = ServerInfo {
        id: "1".into(),
        name: "Rustaceans".into(),
        icon_url: None,
        owner_id: "7".into(),
        member_count: 1200,
    };
    let out = Bindings::new()
        .user(&user)
        .server(&server)
        .expand("Welcome {user:mention} to {server:name}! Member #{server:memberCount}.");
    assert_eq!(out, "Welcome <@42> to Rustaceans! Member #1200.");
}

#[test]
fn moderation_dm_with_markers() {
    let (template, markers) = strip_markers("{dm}You were warned by {moderator:tag}: {reason}");
    assert!(markers.dm);
    let moderator = UserInfo::new("9", "mod", "1234");
    let out = Bindings::new().moderator(&moderator).reason("spam").expand(&template);
    assert_eq!(out, "You were warned by mod#1234: spam");
}

#[test]
fn tag_arguments() {
    let out = Bindings::new().args(["ban", "bob", "for", "spam"]).expand("{args:0} -> {args:2+}");
    assert_eq!(out, "ban -> for spam");
}
