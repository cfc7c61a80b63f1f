use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn handover() -> Command {
    let mut cmd = Command::cargo_bin("handover").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("HANDOVER_SESSIONS")
        .env_remove("HANDOVER_STATS_URL");
    cmd
}

fn new_doc(path: &Path) {
    handover()
        .args(["new", "-o"])
        .arg(path)
        .assert()
        .success();
}

#[test]
fn new_writes_empty_document() {
    handover()
        .arg("new")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""priorities":[]"#))
        .stdout(predicate::str::contains(r#""jobStatus""#));
}

#[test]
fn append_set_get_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    new_doc(&doc);

    handover()
        .args(["append", "--path", "priorities", "-i"])
        .arg(&doc)
        .arg("-o")
        .arg(&doc)
        .assert()
        .success();
    handover()
        .args(["set", "--path", "priorities.0.title", "--value", "Migrate DB", "-i"])
        .arg(&doc)
        .arg("-o")
        .arg(&doc)
        .assert()
        .success();

    handover()
        .args(["get", "--path", "priorities.0.title", "-i"])
        .arg(&doc)
        .assert()
        .success()
        .stdout("Migrate DB\n");
    handover()
        .args(["get", "--path", "priorities", "-i"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title":"Migrate DB""#));
}

#[test]
fn set_reads_stdin_and_clamps_progress() {
    handover()
        .args(["set", "--path", "ongoingProjects.0.progress", "--value", "150"])
        .write_stdin(r#"{"ongoingProjects":[{"name":"Billing"}]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""progress":100"#));
}

#[test]
fn unknown_path_fails() {
    handover()
        .args(["get", "--path", "overview.nickname"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field `nickname`"));
}

#[test]
fn remove_out_of_range_fails() {
    handover()
        .args(["remove", "--path", "checklist", "--index", "0"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn composite_keeps_position_without_delimiter() {
    handover()
        .args([
            "composite",
            "--path",
            "teamMembers.0",
            "--kind",
            "name-position",
            "--text",
            "Kim Jisoo",
        ])
        .write_stdin(r#"{"teamMembers":[{"name":"Kim","position":"Manager"}]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"Kim Jisoo""#))
        .stdout(predicate::str::contains(r#""position":"Manager""#));
}

#[test]
fn template_for_list() {
    handover()
        .args(["template", "--path", "priorities"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""deadline":"""#));
    handover()
        .args(["template", "--path", "risks.issues"])
        .assert()
        .failure();
}

#[test]
fn validate_reports_summary() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.json");
    std::fs::write(&doc, r#"{"priorities":[{"title":"a"},{"title":"b"}]}"#).unwrap();

    handover()
        .args(["validate", "-i"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Valid:").and(predicate::str::contains("2 priorities")));
}

#[test]
fn render_prints_fallbacks() {
    handover()
        .args(["render", "--lines-per-page", "0"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transferor: (name) ((position))"))
        .stdout(predicate::str::contains("Reason: No details"));
}

#[test]
fn session_flow() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("sessions.json");

    let out = handover()
        .args(["session", "new", "--title", "Billing"])
        .env("HANDOVER_SESSIONS", &store)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let id = String::from_utf8(out).unwrap().trim().to_string();
    assert_eq!(id.len(), 36);

    handover()
        .args(["session", "append", "Who owns invoicing?"])
        .env("HANDOVER_SESSIONS", &store)
        .assert()
        .success();
    handover()
        .args(["session", "select", "nonexistent"])
        .env("HANDOVER_SESSIONS", &store)
        .assert()
        .success();

    handover()
        .args(["session", "list"])
        .env("HANDOVER_SESSIONS", &store)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("* {}", id)))
        .stdout(predicate::str::contains("(1 messages)"))
        .stdout(predicate::str::contains("Who owns invoicing?"));

    handover()
        .args(["session", "show", &id])
        .env("HANDOVER_SESSIONS", &store)
        .assert()
        .success()
        .stdout(predicate::str::contains("[user] Who owns invoicing?"));
}

#[test]
fn session_append_unknown_fails() {
    let dir = tempfile::tempdir().unwrap();
    handover()
        .args(["session", "--store"])
        .arg(dir.path().join("sessions.json"))
        .args(["append", "--id", "nonexistent", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session not found"));
}
