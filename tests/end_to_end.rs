//! End-to-end scenarios driven through the actual CLI entry point
//! (`flowc::cli::run`), the way `foundry-compilers` exercises its project
//! compiler through `tests/project.rs` rather than only at module level.

use clap::Parser;
use flowc::cli::run;
use flowc::frontend::ToyFrontend;
use flowc::options::Cli;
use std::sync::Arc;

fn write(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn single_file_emits_host_source_and_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write(tmp.path(), "Hello.flow", "module Hello\nlet main = 1");
    let out = tmp.path().join("out");

    let cli = Cli::parse_from(["flowc", "-d", out.to_str().unwrap(), file.to_str().unwrap()]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);

    assert_eq!(code, 0);
    let generated = std::fs::read_to_string(out.join("Hello.java")).unwrap();
    assert!(generated.contains("class Hello"));
}

#[test]
fn parse_error_exits_nonzero_and_writes_no_output() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write(tmp.path(), "Bad.flow", "module Bad\n#error oops");
    let out = tmp.path().join("out");

    let cli = Cli::parse_from(["flowc", "-d", out.to_str().unwrap(), file.to_str().unwrap()]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);

    assert_eq!(code, 1);
    assert!(!out.exists());
    let printed = String::from_utf8(stderr).unwrap();
    assert!(printed.contains("2:1"));
}

#[test]
fn make_mode_builds_transitive_dependencies_through_cli() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "Base.flow", "module Base\nlet x = 1");
    write(tmp.path(), "Mid.flow", "module Mid\nimport Base\nlet y = 2");
    let top = write(tmp.path(), "Top.flow", "module Top\nimport Mid\nlet z = 3");
    let out = tmp.path().join("out");

    let cli = Cli::parse_from([
        "flowc",
        "--make",
        "-d",
        out.to_str().unwrap(),
        "-i",
        tmp.path().to_str().unwrap(),
        top.to_str().unwrap(),
    ]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);

    assert_eq!(code, 0);
    for name in ["Base", "Mid", "Top"] {
        assert!(out.join(format!("{name}.java")).exists());
    }
}

#[test]
fn make_mode_reports_circular_dependency_through_cli() {
    let tmp = tempfile::tempdir().unwrap();
    let a = write(tmp.path(), "A.flow", "module A\nimport B\nlet x = 1");
    write(tmp.path(), "B.flow", "module B\nimport A\nlet y = 2");
    let out = tmp.path().join("out");

    let cli = Cli::parse_from([
        "flowc",
        "--make",
        "-d",
        out.to_str().unwrap(),
        "-i",
        tmp.path().to_str().unwrap(),
        a.to_str().unwrap(),
    ]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);

    assert_eq!(code, 1);
    let printed = String::from_utf8(stderr).unwrap();
    assert!(printed.contains("circular dependency"));
}

#[test]
fn project_config_file_supplies_default_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write(tmp.path(), "Hello.flow", "module Hello\nlet main = 1");
    let out = tmp.path().join("configured-out");
    let config = write(
        tmp.path(),
        "flowc.toml",
        &format!("output_dir = \"{}\"\n", out.to_str().unwrap().replace('\\', "\\\\")),
    );

    let cli = Cli::parse_from([
        "flowc",
        "--config",
        config.to_str().unwrap(),
        file.to_str().unwrap(),
    ]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);

    assert_eq!(code, 0);
    assert!(out.join("Hello.java").exists());
}

#[test]
fn host_compiler_failure_is_reported_as_a_nonzero_exit() {
    let tmp = tempfile::tempdir().unwrap();
    let file = write(tmp.path(), "Hello.flow", "module Hello\nlet main = 1");
    let out = tmp.path().join("out");

    std::env::set_var("FLOWC_JAVAC", "false");
    let cli = Cli::parse_from([
        "flowc",
        "--runjavac",
        "-d",
        out.to_str().unwrap(),
        file.to_str().unwrap(),
    ]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);
    std::env::remove_var("FLOWC_JAVAC");

    assert_eq!(code, 1);
    let printed = String::from_utf8(stderr).unwrap();
    assert!(printed.contains("non-zero"));
}

#[test]
fn directory_argument_compiles_every_module_in_it() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "One.flow", "module One\nlet a = 1");
    write(tmp.path(), "Two.flow", "module Two\nlet b = 2");
    let out = tmp.path().join("out");

    let cli = Cli::parse_from(["flowc", "-d", out.to_str().unwrap(), tmp.path().to_str().unwrap()]);
    let mut stderr = Vec::new();
    let code = run(cli, Arc::new(ToyFrontend), &mut stderr);

    assert_eq!(code, 0);
    assert!(out.join("One.java").exists());
    assert!(out.join("Two.java").exists());
}
