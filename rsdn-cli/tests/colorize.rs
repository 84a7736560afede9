use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn colorizes_by_tag() {
    let mut cmd = cargo_bin_cmd!("rsdn");
    cmd.arg("colorize")
        .arg("-")
        .arg("--lang")
        .arg("cs")
        .write_stdin("int x = 1;");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<span class='kw'>int</span> x = 1;"));
}

#[test]
fn colorizes_by_language_name() {
    let mut cmd = cargo_bin_cmd!("rsdn");
    cmd.arg("colorize")
        .arg("-")
        .arg("--lang")
        .arg("CSharp")
        .write_stdin("if (a < b) return;");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<span class='kw'>if</span> (a &lt; b)"));
}

#[test]
fn plain_tag_only_escapes() {
    let mut cmd = cargo_bin_cmd!("rsdn");
    cmd.arg("colorize")
        .arg("-")
        .arg("--lang")
        .arg("code")
        .write_stdin("int <x>");

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("int &lt;x&gt;\n"));
}

#[test]
fn unknown_language_fails() {
    let mut cmd = cargo_bin_cmd!("rsdn");
    cmd.arg("colorize")
        .arg("-")
        .arg("--lang")
        .arg("cobol")
        .write_stdin("MOVE A TO B.");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cobol"));
}

#[test]
fn languages_are_listed_as_json() {
    let mut cmd = cargo_bin_cmd!("rsdn");
    cmd.arg("languages");

    let output = cmd.assert().success().get_output().stdout.clone();
    let listed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = listed.as_array().unwrap();

    let csharp = entries
        .iter()
        .find(|entry| entry["name"] == "CSharp")
        .unwrap();
    assert_eq!(csharp["display_name"], "C#");
    assert!(csharp["tags"].as_array().unwrap().iter().any(|tag| tag == "cs"));
}
