// Integration tests for the `neo` driver commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use neo::frontend::{Decl, Node, ParsedFile};

/// Returns the path to the cargo-built `neo` binary.
fn neo_binary() -> PathBuf {
    // `cargo test` sets this env var to the path of the built binary
    let path = PathBuf::from(env!("CARGO_BIN_EXE_neo"));
    assert!(path.exists(), "neo binary not found at {}", path.display());
    path
}

/// A temp directory holding Neo sources, cleaned up on drop.
struct TempProject {
    dir: tempfile::TempDir,
}

impl TempProject {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&path, content).expect("failed to write temp file");
        path
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn neo(args: &[&str]) -> Output {
    Command::new(neo_binary())
        .arg("--color")
        .arg("never")
        .args(args)
        .env_remove("NEO_LOG")
        .output()
        .expect("failed to execute neo")
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn check_clean_directory_succeeds() {
    let project = TempProject::new();
    project.file("a.neo", "module a; var x : int = 1;");
    project.file("nested/b.neo", "import a; fun f(v : int) int { return v + 1; }");

    let output = neo(&["check", &arg(project.path())]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).is_empty(), "stderr: {}", stderr(&output));
}

#[test]
fn check_reports_errors_in_short_format() {
    let project = TempProject::new();
    let bad = project.file("bad.neo", "var x;");

    let output = neo(&["check", &arg(&bad), "--format", "short"]);
    assert!(!output.status.success());
    let expected = format!(
        "{}:1:6 | variable 'x' is declared without a type hint or an initializer",
        arg(&bad)
    );
    assert!(stderr(&output).contains(&expected), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("1 of 1 files failed"));
}

#[test]
fn check_warnings_do_not_fail() {
    let project = TempProject::new();
    let warn = project.file("warn.neo", "static static var x = 1;");

    let output = neo(&["check", &arg(&warn), "--format", "short"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("duplicate modifier 'static'"));
}

#[test]
fn check_with_jobs_reports_in_input_order() {
    let project = TempProject::new();
    let mut files = Vec::new();
    for i in 0..6 {
        let name = format!("f{i}.neo");
        files.push(arg(&project.file(&name, "var x;")));
    }

    let mut args = vec!["check", "--format", "short", "--jobs", "3"];
    args.extend(files.iter().map(String::as_str));
    let output = neo(&args);
    assert!(!output.status.success());

    let err = stderr(&output);
    let positions: Vec<usize> = files
        .iter()
        .map(|f| err.find(&format!("{f}:1:6")).expect("missing diagnostic"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "stderr: {err}");
    assert!(err.contains("6 of 6 files failed"));
}

#[test]
fn check_accepts_src_dir_lists() {
    let first = TempProject::new();
    let second = TempProject::new();
    first.file("a.neo", "var a = 1;");
    second.file("b.neo", "var b : int;");

    let dirs = format!("{};{}", arg(first.path()), arg(second.path()));
    let output = neo(&["check", "--src-dir", &dirs]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn check_without_sources_is_an_error() {
    let project = TempProject::new();
    project.file("notes.txt", "hello");

    let output = neo(&["check", &arg(project.path())]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no .neo files found"));
}

#[test]
fn inspect_tokens_prints_one_token_per_line() {
    let project = TempProject::new();
    let file = project.file("t.neo", "var x = 1;");

    let output = neo(&["inspect", "tokens", &arg(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines.first().map(String::as_str), Some("{ KwVar : var }"));
    assert_eq!(lines.len(), 6, "stdout: {}", stdout(&output));
}

#[test]
fn inspect_ast_dumps_declarations() {
    let project = TempProject::new();
    let file = project.file("m.neo", "module demo; var x : int = 1;");

    let output = neo(&["inspect", "ast", &arg(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("ModuleDecl: name = demo"), "stdout: {out}");
    assert!(out.contains("VarDecl: name = x"), "stdout: {out}");
}

#[test]
fn emit_writes_loadable_ast() {
    let project = TempProject::new();
    let file = project.file("app.neo", "class A { var n : int = 0; }");
    let out_dir = project.path().join("out");

    let output = neo(&["emit", &arg(&file), "--out", &arg(&out_dir)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let loaded = ParsedFile::load(&out_dir.join("app.neoast")).expect("load emitted ast");
    assert_eq!(loaded.nodes.len(), 1);
    match &loaded.nodes[0] {
        Node::Decl(Decl::Class(class)) => assert_eq!(class.name, "A"),
        _ => panic!("expected class"),
    }
}

#[test]
fn emit_skips_failed_files() {
    let project = TempProject::new();
    let file = project.file("bad.neo", "var x;");
    let out_dir = project.path().join("out");

    let output = neo(&["emit", &arg(&file), "--out", &arg(&out_dir)]);
    assert!(!output.status.success());
    assert!(!out_dir.join("bad.neoast").exists());
}

#[test]
fn version_prints_package_version() {
    let output = neo(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with(&format!("neo {}", env!("CARGO_PKG_VERSION"))));
}
