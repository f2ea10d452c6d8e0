use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("inpmap-parser")
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies a fixture into `dir` so tests can edit it.
fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let target = dir.path().join(name);
    fs::copy(fixture_path(name), &target).unwrap();
    target
}

const BROKEN_WEIR: &str = "\
[JUNCTIONS]
J1 100
[OUTFALLS]
OUT1 90 FREE
[WEIRS]
W1 J1 OUT1 TRANSVERSE 8 3.33
[XSECTIONS]
W1 RECT_OPEN 1 5 0
";

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn generate_writes_document_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.json");

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("generate")
        .arg(fixture_path("single_gage.inp"))
        .arg("-f")
        .arg(&out);
    cmd.assert().success().stdout(
        predicate::str::contains("[1] RG1 (GAGE -> RAINFALL)")
            .and(predicate::str::contains("[3] SC2 (SUBCATCH -> RUNOFF)"))
            .and(predicate::str::contains("[RAINGAGES]: 1 entries")),
    );

    let json = read_json(&out);
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["input_count"], 2);
    assert_eq!(json["output_count"], 4);
    assert_eq!(json["inputs"][0]["name"], "ElapsedTime");
    assert_eq!(json["outputs"][0]["swmm_index"], 0);
    assert_eq!(json["inp_file_hash"].as_str().unwrap().len(), 32);
}

#[test]
fn generate_defaults_to_bridge_file_name() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.current_dir(dir.path())
        .arg("generate")
        .arg(fixture_path("full_network.inp"));
    cmd.assert().success();

    let json = read_json(&dir.path().join("SwmmGoldSimBridge.json"));
    assert_eq!(json["input_count"], 7);
    assert_eq!(json["output_count"], 6);
}

#[test]
fn generate_refuses_models_with_errors() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("broken.inp");
    let out = dir.path().join("map.json");
    fs::write(&model, BROKEN_WEIR).unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("generate").arg(&model).arg("-f").arg(&out);
    cmd.assert().failure().stderr(
        predicate::str::contains("ERROR:").and(predicate::str::contains("--allow-errors")),
    );
    assert!(!out.exists());
}

#[test]
fn allow_errors_writes_anyway() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("broken.inp");
    let out = dir.path().join("map.json");
    fs::write(&model, BROKEN_WEIR).unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("generate")
        .arg(&model)
        .arg("-f")
        .arg(&out)
        .arg("--allow-errors");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("has 3 parameters"));
    assert_eq!(read_json(&out)["output_count"], 2);
}

const GHOST_ORIFICE: &str = "\
[OUTFALLS]
OUT1 90 FREE
[ORIFICES]
OR1 OUT1 OUT1 SIDE 0 0.65
[CONTROLS]
RULE R1
IF SIMULATION TIME > 0
THEN ORIFICE GHOST SETTING = CURVE DUMMY
";

#[test]
fn skipped_references_print_even_when_logging_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("ghost.inp");
    let out = dir.path().join("map.json");
    fs::write(&model, GHOST_ORIFICE).unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.args(["--log-level", "error", "generate"])
        .arg(&model)
        .arg("-f")
        .arg(&out);
    cmd.assert().success().stderr(predicate::str::contains(
        "WARNING: Skipping DUMMY reference to orifice 'GHOST' - not found in [ORIFICES] section",
    ));
    assert_eq!(read_json(&out)["input_count"], 1);
}

#[test]
fn explicit_selection_flags() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.json");

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("generate")
        .arg(fixture_path("full_network.inp"))
        .args(["-i", "P2", "-i", "J1", "-o", "C1"])
        .arg("-f")
        .arg(&out);
    cmd.assert().success();

    let json = read_json(&out);
    assert_eq!(json["input_count"], 3);
    assert_eq!(json["inputs"][1]["name"], "P2");
    assert_eq!(json["inputs"][2]["property"], "LATFLOW");
    assert_eq!(json["outputs"][0]["object_type"], "CONDUIT");
}

#[test]
fn unknown_selection_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.json");

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("generate")
        .arg(fixture_path("full_network.inp"))
        .args(["-o", "GHOST"])
        .arg("-f")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Output element 'GHOST' not found"));
}

#[test]
fn config_file_sets_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("from-config.json");
    let config = dir.path().join("inpmap-test.toml");
    fs::write(
        &config,
        format!(
            "[generate]\noutput_file = {:?}\n[summary]\nlist_sections = false\n",
            out.display().to_string()
        ),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("--config")
        .arg(&config)
        .arg("generate")
        .arg(fixture_path("single_gage.inp"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[RAINGAGES]").not());
    assert!(out.exists());
}

#[test]
fn local_config_in_working_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("inpmap.toml"),
        "[generate]\noutput_file = \"local.json\"\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.current_dir(dir.path())
        .arg("generate")
        .arg(fixture_path("single_gage.inp"));
    cmd.assert().success();
    assert!(dir.path().join("local.json").exists());
    assert!(!dir.path().join("SwmmGoldSimBridge.json").exists());
}

#[test]
fn validate_clean_model() {
    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("validate").arg(fixture_path("full_network.inp"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No validation issues found"));
}

#[test]
fn validate_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("broken.inp");
    fs::write(&model, BROKEN_WEIR).unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("validate").arg(&model);
    cmd.assert().failure().stdout(
        predicate::str::contains("ERROR: Weir 'W1'")
            .and(predicate::str::contains("Fix: W1 RECT_OPEN"))
            .and(predicate::str::contains("1 error(s)")),
    );
}

#[test]
fn validate_missing_file() {
    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("validate").arg("/nonexistent/model.inp");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot load model"));
}

#[test]
fn check_tracks_model_edits() {
    let dir = tempfile::tempdir().unwrap();
    let model = copy_fixture(&dir, "single_gage.inp");
    let out = dir.path().join("map.json");

    cargo_bin_cmd!("inpmap")
        .arg("generate")
        .arg(&model)
        .arg("-f")
        .arg(&out)
        .assert()
        .success();

    cargo_bin_cmd!("inpmap")
        .arg("check")
        .arg(&model)
        .arg("--mapping")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("is up to date (2 inputs, 4 outputs)"));

    // Layout-only edit keeps the document fresh.
    let source = fs::read_to_string(&model).unwrap();
    fs::write(&model, format!("; reformatted\n\n{}", source.replace("  ", "\t"))).unwrap();
    cargo_bin_cmd!("inpmap")
        .arg("check")
        .arg(&model)
        .arg("--mapping")
        .arg(&out)
        .assert()
        .success();

    // Token edit makes it stale.
    let source = fs::read_to_string(&model).unwrap();
    fs::write(&model, source.replace("FREE", "FIXED 89")).unwrap();
    cargo_bin_cmd!("inpmap")
        .arg("check")
        .arg(&model)
        .arg("--mapping")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is stale"));
}

#[test]
fn check_rejects_invalid_document() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("map.json");
    fs::write(
        &out,
        r#"{"version":"2.0","inp_file_hash":"x","input_count":0,"output_count":0,"inputs":[],"outputs":[]}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("inpmap");
    cmd.arg("check")
        .arg(fixture_path("single_gage.inp"))
        .arg("--mapping")
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported mapping version '2.0'"));
}

#[test]
fn requires_a_subcommand() {
    cargo_bin_cmd!("inpmap").assert().failure();
}
