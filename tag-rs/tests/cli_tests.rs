/// Binary tests: run templates through the `tagscript` executable and check
/// stdout, exit status and stderr.
use std::io::Write;
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `tagscript` binary built by this Cargo workspace.
fn binary() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_tagscript"))
}

/// Run the binary with `args`, feeding `stdin` to it.
fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(binary())
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tagscript");
    child
        .stdin
        .take()
        .expect("stdin not open")
        .write_all(stdin.as_bytes())
        .expect("write to stdin");
    child.wait_with_output().expect("wait failed")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).trim_end_matches('\n').to_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn renders_command_template() {
    let out = run(&["-D", "name=hello", "-c", "{name}"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "hello");
}

#[test]
fn last_substitution_by_default() {
    let out = run(&["-D", "a=1", "-D", "b=2", "-c", "{a} and {b}"], "");
    assert_eq!(stdout(&out), "2");
}

#[test]
fn full_flag_prints_whole_template() {
    let out = run(&["--full", "-D", "a=1", "-D", "b=2", "-c", "{a} and {b}"], "");
    assert_eq!(stdout(&out), "1 and 2");
}

#[test]
fn template_from_stdin() {
    let out = run(&["--full"], "{round:2.5} is {if:(3>2)=>three(else)two}\n");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "3 is three");
}

#[test]
fn bindings_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, ";; test bindings\n/object user\n/set user:username=bob\n/vector args=a,b").unwrap();
    let path = file.path().to_str().unwrap().to_owned();
    let out = run(&["-f", &path, "--full", "-c", "{user:username} {args:1}"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "bob b");
}

#[test]
fn bad_bindings_line_warns_but_renders() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "/set ok=yes\n/bogus line").unwrap();
    let path = file.path().to_str().unwrap().to_owned();
    let out = run(&["-f", &path, "-c", "{ok}"], "");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "yes");
    assert!(String::from_utf8_lossy(&out.stderr).contains("line 2"));
}

#[test]
fn missing_bindings_file_fails() {
    let out = run(&["-f", "/definitely/not/here.tsrc", "-c", "{x}"], "");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("tagscript: cannot read"));
}

#[test]
fn bad_define_is_usage_error() {
    let out = run(&["-D", "novalue", "-c", "{x}"], "");
    assert!(!out.status.success());
}
