use std::process::{Command, Output};

fn resolve(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_resolve"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run resolve")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn invalid_domain_exits_before_querying() {
    let output = resolve(&["iterative", "bad..domain"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Invalid domain"));
    assert!(!stdout(&output).contains("Time taken"));
}

#[test]
fn unknown_mode_is_rejected() {
    let output = resolve(&["foo", "example.com"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("First argument must be 'iterative' or 'recursive'."));
}

#[test]
fn wrong_argument_count_prints_usage() {
    for args in [&["iterative"][..], &[][..], &["iterative", "example.com", "extra"][..]] {
        let output = resolve(args);
        assert_eq!(output.status.code(), Some(1), "args: {:?}", args);
        assert!(stderr(&output).contains("Usage: resolve <iterative|recursive> <domain>"));
    }
}

#[test]
fn help_exits_cleanly() {
    let output = resolve(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Usage: resolve"));
}
