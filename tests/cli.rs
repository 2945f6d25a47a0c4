use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const RULES: &str = r#"
surround-regexp:
  - start: "if|while"
    endings: ["end$0", "$0_end"]
  - start: "def"
    endings: ["enddef", "end"]
  - start: "<(\\w+)>"
    end: "</(\\w+)>"
    endings: ["</$1>"]
simple-label-regexp: ["then", "do"]
compound-label-regexp: ["else"]
form-prefix-regexp: ["@\\w+"]
operator-regexp:
  - pattern: "[-+]"
    prefix-prec: 10
    infix-prec: 20
  - pattern: "!"
    postfix-prec: 5
variable-regexp: ["[a-z]\\w*"]
"#;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn classify_tokens_from_stdin() {
    let config = config_file(RULES);
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg(config.path()).write_stdin(
        "if\n  x  \n+\nthen\nelse\n\n@inline\ndef\nend\n<div>\n</div>\n!\n42\nendif\n",
    );

    cmd.assert().success().stdout(
        "S endif if_end\nV\nO 10 20 0\nL\nC\nP\nS enddef end\nE\nS </div>\nE\nO 0 0 5\nU\nE\n",
    );
}

#[test]
fn empty_config_classifies_everything_as_unclassified() {
    let config = config_file("");
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg(config.path()).write_stdin("if\n+\nx\n");

    cmd.assert().success().stdout("U\nU\nU\n");
}

#[test]
fn check_reports_valid_config_without_reading_stdin() {
    let config = config_file(RULES);
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("--check").arg(config.path()).write_stdin("if\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("Configuration syntax is valid\n"));
}

#[test]
fn check_rejects_surround_without_end() {
    let config = config_file("surround-regexp:\n  - start: if\n");
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("--check").arg(config.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("surround-regexp[0]"));
}

#[test]
fn check_rejects_capture_reference_without_end() {
    let config = config_file("surround-regexp:\n  - start: \"(a)\"\n    endings: [\"end$1\"]\n");
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("--check").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("backreferences"));
}

#[test]
fn check_reports_invalid_start_pattern() {
    let config = config_file("surround-regexp:\n  - start: \"(\"\n    endings: [x]\n");
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("--check").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("surround-regexp[0].start"));
}

#[test]
fn invalid_pattern_produces_no_output() {
    let config = config_file("variable-regexp: [\"[a-\"]\n");
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg(config.path()).write_stdin("x\n");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error:").and(predicate::str::contains("variable-regexp[0]")));
}

#[test]
fn missing_config_file_is_an_error() {
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("/nonexistent/rules.yaml").write_stdin("x\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn version_needs_no_config() {
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("re-classify version "));
}

#[test]
fn missing_config_argument_prints_usage() {
    let mut cmd = cargo_bin_cmd!("re-classify");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_ignores_other_arguments() {
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg("--version").arg("--check").arg("a.yaml").arg("b.yaml");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("re-classify version "));
}

#[test]
fn extra_positional_argument_prints_usage() {
    let config = config_file(RULES);
    let mut cmd = cargo_bin_cmd!("re-classify");
    cmd.arg(config.path()).arg("extra").write_stdin("x\n");

    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("exactly one config file")
                .and(predicate::str::contains("Usage")),
        );
}
