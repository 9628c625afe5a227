use std::path::PathBuf;
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_schoolinst"))
}

fn country_fixture() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/country.csv")
        .canonicalize()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn figure_json_artifact() {
    let out = run(&["figure", "--country", &country_fixture()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["schema_version"], "figure_v0");
    assert_eq!(value["meta"]["tool"], "schoolinst");
    let panels = value["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 3);
    // Rows 5, 22, ... lack schooling; HKG is row 7, the seventh kept point.
    assert_eq!(panels[0]["points"][6]["label"], "HKG");
    assert_eq!(panels[0]["schema_version"], "scatter_fit_v0");
}

#[test]
fn figure_svg_with_config() {
    let cfg = std::env::temp_dir().join(format!("schoolinst_viz_{}.yaml", std::process::id()));
    std::fs::write(&cfg, "colors:\n  fit_line: \"#00aa00\"\n").unwrap();
    let out = run(&["figure", "--country", &country_fixture(), "--format", "svg", "--config", cfg.to_string_lossy().as_ref()]);
    std::fs::remove_file(&cfg).ok();
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let svg = String::from_utf8_lossy(&out.stdout);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">HKG</text>"));
    assert!(svg.contains(r##"stroke="#00aa00""##));
    assert_eq!(svg.matches("<polyline").count(), 3);
}

#[test]
fn figure_rejects_unknown_format() {
    let out = run(&["figure", "--country", &country_fixture(), "--format", "png"]);
    assert!(!out.status.success());
}
