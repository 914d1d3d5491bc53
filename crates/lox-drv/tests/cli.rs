//! End-to-end tests driving the `loxi` binary as a subprocess.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn loxi() -> Command {
    Command::new(env!("CARGO_BIN_EXE_loxi"))
}

fn script(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).expect("fixture script writes");
    path
}

#[test]
fn running_a_script_prints_its_output() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "hello.lox", r#"print "hello" + " " + "world";"#);

    loxi().arg(&path).assert().success().stdout(predicate::str::contains("hello world"));
}

#[test]
fn missing_script_exits_74() {
    loxi().arg("/no/such/file.lox").assert().code(74);
}

#[test]
fn parse_error_exits_65_and_reports_every_error() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "bad.lox", "1 + ; 2 + ;");

    loxi()
        .arg(&path)
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Erro").count(2));
}

#[test]
fn runtime_error_is_reported_but_does_not_change_the_exit_code() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "div_zero.lox", "print 1 / 0;");

    loxi().arg(&path).assert().success().stderr(predicate::str::contains("Division by zero."));
}

#[test]
fn too_many_arguments_is_a_usage_error() {
    loxi().arg("a.lox").arg("b.lox").assert().code(64);
}

#[test]
fn closures_and_classes_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    let source = r#"
        class Counter {
            init() { this.n = 0; }
            next() { this.n = this.n + 1; return this.n; }
        }
        var c = Counter();
        print c.next();
        print c.next();
    "#;
    let path = script(&dir, "counter.lox", source);

    loxi().arg(&path).assert().success().stdout(predicate::str::contains("1\n2"));
}
