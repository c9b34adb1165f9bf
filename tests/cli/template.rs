use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

#[test]
fn test_text_template() -> Result<()> {
    let test = CliTest::with_file(
        "src/main.rs",
        "fn main() {\n    show!(foo(bar(x)), n = 1);\n}\n",
    )?;

    assert_cmd_snapshot!(test.template_command("src/main.rs", 2), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    verbatim "foo(bar(x"
    evaluate x
    verbatim ")"
    evaluate bar(x)
    verbatim ")"
    positional 0
    verbatim ", n"
    keyword n

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_json_template() -> Result<()> {
    let test = CliTest::with_file("lib.rs", "fn f() { try_show!(x) }\n")?;

    assert_cmd_snapshot!(
        test.template_command("lib.rs", 1)
            .args(["--name", "try_show", "--format", "json"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    [
      {
        "kind": "verbatim",
        "text": "x"
      },
      {
        "kind": "positional",
        "index": 0
      }
    ]

    ----- stderr -----
    "#
    );

    Ok(())
}

#[test]
fn test_call_not_found() -> Result<()> {
    let test = CliTest::with_file("lib.rs", "fn f() {}\n")?;

    assert_cmd_snapshot!(test.template_command("lib.rs", 1), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    error: could not find call to show on line 1 in lib.rs
     --> lib.rs:1:1
      |
    1 | fn f() {}
      | ^

    ✘ 1 reporting call could not be templated

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_unreadable_file() -> Result<()> {
    let test = CliTest::new()?;

    insta::with_settings!({filters => vec![
        (r": [^:\n]+ \(os error \d+\)", ": [OS ERROR]"),
    ]}, {
        assert_cmd_snapshot!(test.template_command("missing.rs", 1), @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: Failed to read source file: missing.rs: [OS ERROR]
        ");
    });

    Ok(())
}
