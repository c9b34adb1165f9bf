use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const GOOD: &str = r#"
fn main() {
    let x = 42.0;
    show!(foo(bar(x)));
    show!(
        // a comment
        label = foo(x),
    );
}
"#;

#[test]
fn test_clean_project() -> Result<()> {
    let test = CliTest::with_file("src/main.rs", GOOD)?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 2 reporting calls in 1 file - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_broken_call() -> Result<()> {
    let test = CliTest::with_file(
        "src/main.rs",
        "fn main() {\n    let x = 1;\n    show!(foo(x);\n}\n",
    )?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    error: call to show on line 3 in src/main.rs never parses as a complete expression
     --> src/main.rs:3:5
      |
    3 |     show!(foo(x);
      |     ^

    ✘ 1 reporting call could not be templated

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::with_file("src/main.rs", GOOD)?;
    test.write_file("src/generated/broken.rs", "fn f() { show!(x; }\n")?;
    test.write_file("src/trace.rs", "fn f() { trace!(a b); }\n")?;
    test.write_file(".showcallrc.json", r#"{ "ignores": ["**/generated/**"] }"#)?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 2 reporting calls in 2 files - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_extra_names() -> Result<()> {
    let test = CliTest::with_file("src/main.rs", GOOD)?;
    test.write_file("src/trace.rs", "fn f() { trace!(a b); }\n")?;

    assert_cmd_snapshot!(test.check_command().args(["--name", "trace"]), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    error: call to trace on line 1 in src/trace.rs never parses as a complete expression
     --> src/trace.rs:1:10
      |
    1 | fn f() { trace!(a b); }
      |          ^

    ✘ 1 reporting call could not be templated

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_invalid_config() -> Result<()> {
    let test = CliTest::with_file("src/main.rs", GOOD)?;
    test.write_file(".showcallrc.json", r#"{ "ignores": ["**/["] }"#)?;

    insta::with_settings!({filters => vec![
        (r"Pattern syntax error.*", "[PATTERN ERROR]"),
    ]}, {
        assert_cmd_snapshot!(test.check_command(), @r#"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: Invalid glob pattern in 'ignores': "**/[": [PATTERN ERROR]
        "#);
    });

    Ok(())
}

#[test]
fn test_missing_path() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.check_command().arg("nowhere"), @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    Error: Path does not exist: nowhere
    ");

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("--help"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Print a call's own source text with the value of every argument and sub-expression

    Usage: showcall [COMMAND]

    Commands:
      check     Check that every reporting call can be located and parsed
      template  Print the template built for one reporting call
      help      Print this message or the help of the given subcommand(s)

    Options:
      -h, --help     Print help
      -V, --version  Print version

    ----- stderr -----
    ");

    Ok(())
}
