mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use pnl_merge::config::{MERGED_OUTPUT, PNL_PROCESSED, PROJECT_PROCESSED, PipelineConfig};
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn bin() -> Command {
    Command::cargo_bin("pnl-merge").expect("binary exists")
}

#[test]
fn anonymize_then_merge_writes_final_workbook() {
    let workspace = TestWorkspace::new();
    workspace.write_raw_pnl();
    workspace.write_raw_projects();
    let dir = workspace.path().to_str().unwrap();

    bin()
        .args(["anonymize", "--dir", dir])
        .assert()
        .success()
        .stdout(contains("Processed files saved:"))
        .stdout(contains(PNL_PROCESSED))
        .stdout(contains(PROJECT_PROCESSED));
    assert!(workspace.file(PNL_PROCESSED).exists());
    assert!(workspace.file(PROJECT_PROCESSED).exists());

    bin()
        .args(["merge", "--dir", dir])
        .assert()
        .success()
        .stdout(contains("Processed file saved as:"))
        .stdout(contains(MERGED_OUTPUT));
    assert!(workspace.file(MERGED_OUTPUT).exists());
}

#[test]
fn merge_honours_output_override() {
    let workspace = TestWorkspace::new();
    workspace.write_raw_pnl();
    workspace.write_raw_projects();
    let dir = workspace.path().to_str().unwrap();
    bin().args(["anonymize", "-d", dir]).assert().success();

    let custom = workspace.file("june.xlsx");
    bin()
        .args(["merge", "-d", dir, "-o", custom.to_str().unwrap()])
        .assert()
        .success();
    assert!(custom.exists());
    assert!(!workspace.file(MERGED_OUTPUT).exists());
}

#[test]
fn relative_output_lands_inside_dir() {
    let workspace = TestWorkspace::new();
    workspace.write_raw_pnl();
    workspace.write_raw_projects();
    let dir = workspace.path().to_str().unwrap();
    bin().args(["anonymize", "-d", dir]).assert().success();

    let elsewhere = tempfile::tempdir().expect("cwd");
    bin()
        .current_dir(elsewhere.path())
        .args(["merge", "-d", dir, "-o", "relative.xlsx"])
        .assert()
        .success();
    assert!(workspace.file("relative.xlsx").exists());
    assert!(!elsewhere.path().join("relative.xlsx").exists());

    bin()
        .args(["merge", "--help"])
        .assert()
        .success()
        .stdout(contains("relative paths resolve against --dir"));
}

#[test]
fn anonymize_reports_missing_input_on_stdout() {
    let workspace = TestWorkspace::new();
    workspace.write_raw_projects();
    bin()
        .args(["anonymize", "--dir", workspace.path().to_str().unwrap()])
        .assert()
        .failure()
        .stdout(contains("was not found"))
        .stdout(contains("P L By Account Manager _PL By AM.xlsx"));
    assert!(!workspace.file(PNL_PROCESSED).exists());
    assert!(!workspace.file(PROJECT_PROCESSED).exists());
}

#[test]
fn merge_reports_missing_pnl_export() {
    let workspace = TestWorkspace::new();
    bin()
        .args(["merge", "--dir", workspace.path().to_str().unwrap()])
        .assert()
        .failure()
        .stdout(contains("Processed_PNL"));
    assert!(!workspace.file(MERGED_OUTPUT).exists());
}

#[test]
fn config_profile_drives_custom_file_names() {
    let workspace = TestWorkspace::new();
    let profile = workspace.file("profile.yaml");
    bin()
        .args(["config", "-o", profile.to_str().unwrap()])
        .assert()
        .success();

    let mut config = PipelineConfig::load(&profile).expect("load profile");
    assert_eq!(config, PipelineConfig::default());
    config.anonymize.pnl.input = "pnl-raw.xlsx".into();
    config.merge.output = "final.xlsx".into();
    config.save(&profile).expect("save profile");

    workspace.write_workbook("pnl-raw.xlsx", common::PNL_HEADERS, &common::raw_pnl_rows());
    workspace.write_raw_projects();
    let dir = workspace.path().to_str().unwrap();
    let config_arg = profile.to_str().unwrap();
    bin()
        .args(["anonymize", "-d", dir, "-c", config_arg])
        .assert()
        .success();
    bin()
        .args(["merge", "-d", dir, "-c", config_arg])
        .assert()
        .success()
        .stdout(contains("final.xlsx"));
    assert!(workspace.file("final.xlsx").exists());
}

#[test]
fn config_without_output_prints_yaml() {
    bin()
        .arg("config")
        .assert()
        .success()
        .stdout(contains("PL_By_AM_Final.xlsx"))
        .stdout(contains("ACCOUNT MANAGER"));
}

#[test]
fn preview_prints_header_and_rows() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_raw_projects();
    bin()
        .args(["preview", "-i", path.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success()
        .stdout(contains("Project Name"))
        .stdout(contains("Alpha"))
        .stdout(contains("Beta"))
        .stdout(contains("Delta").not());
}
