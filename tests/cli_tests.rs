//! End-to-end runs of the yangbind binary against schema documents on disk.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const SCHEMA: &str = r#"{ "modules": [
    { "name": "shared", "namespace": "urn:shared", "prefix": "sh", "body": [
        { "kind": "grouping", "name": "endpoint", "children": [
            { "kind": "leaf", "name": "address", "type": { "builtin": "string" } } ] } ] },
    { "name": "svc", "namespace": "urn:svc", "revision": "2024-05-20",
      "imports": [ { "module": "shared", "prefix": "sh" } ],
      "body": [
        { "kind": "container", "name": "server", "description": "Server settings.", "children": [
            { "kind": "uses", "grouping": "sh:endpoint" } ] },
        { "kind": "rpc", "name": "restart", "children": [
            { "kind": "input", "children": [
                { "kind": "leaf", "name": "delay", "type": { "builtin": "uint32" } } ] } ] } ] } ] }"#;

fn workspace(schema: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("schema.json"), schema).expect("write schema");
    dir
}

fn yangbind(cwd: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_yangbind"))
        .args(args)
        .current_dir(cwd)
        .env_remove("YANGBIND_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run yangbind")
}

fn report(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "yangbind failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("report is JSON")
}

fn names(report: &serde_json::Value) -> Vec<String> {
    report["types"]
        .as_array()
        .expect("types")
        .iter()
        .filter_map(|t| t["name"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_reports_modules_in_dependency_order() {
    let dir = workspace(SCHEMA);
    let report = report(&yangbind(dir.path(), &["--schema", "schema.json"]));

    let modules: Vec<&str> = report["modules"]
        .as_array()
        .expect("modules")
        .iter()
        .filter_map(|m| m["name"].as_str())
        .collect();
    assert_eq!(modules, ["shared", "svc"]);

    let names = names(&report);
    assert!(names.contains(&"yangbind.gen.v1.urn.svc.rev240520.Server".to_string()));
    assert!(names.contains(&"yangbind.gen.v1.urn.svc.rev240520.restart.RestartInput".to_string()));
    assert!(names.contains(&"yangbind.gen.v1.urn.shared.Endpoint".to_string()));
}

#[test]
fn test_config_file_in_working_directory_is_used() {
    let dir = workspace(SCHEMA);
    std::fs::write(
        dir.path().join("yangbind.json"),
        r#"{ "schema": "schema.json", "output": "types" }"#,
    )
    .expect("write config");
    let report = report(&yangbind(dir.path(), &[]));
    let server = report["types"]
        .as_array()
        .expect("types")
        .iter()
        .find(|t| t["name"]["simple_names"] == serde_json::json!(["Server"]))
        .expect("server type");
    assert!(server.to_string().contains("Server settings."));
}

#[test]
fn test_runtime_flag_drops_documentation() {
    let dir = workspace(SCHEMA);
    let output = yangbind(dir.path(), &["-s", "schema.json", "--format", "types", "--runtime"]);
    let report = report(&output);
    assert!(!report.to_string().contains("Server settings."));
}

#[test]
fn test_missing_schema_fails_with_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = yangbind(dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no schema document given"), "{stderr}");
}

#[test]
fn test_unresolvable_grouping_fails_the_run() {
    let dir = workspace(
        r#"{ "modules": [ { "name": "m", "namespace": "urn:m", "body": [
            { "kind": "container", "name": "c", "children": [
                { "kind": "uses", "grouping": "nowhere" } ] } ] } ] }"#,
    );
    let output = yangbind(dir.path(), &["-s", "schema.json"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_driver_runs_in_process() {
    use clap::Parser;
    let dir = workspace(SCHEMA);
    let args = yangbind::cli::args::CliArgs::try_parse_from(["yangbind", "-s", "schema.json"])
        .expect("args");
    let report = yangbind::cli::driver::run(&args, dir.path()).expect("run");
    assert_eq!(report["modules"][1]["dataRoot"], "yangbind.gen.v1.urn.svc.rev240520.SvcData");
}
