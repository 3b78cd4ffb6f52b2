//! End-to-end test of the `masonry-sim` binary.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("masonry-sim-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

fn sim() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_masonry-sim"));
    command
        .env_remove("MASONRY_CONFIG")
        .env_remove("MASONRY_GAP")
        .env_remove("MASONRY_COLUMNS");
    command
}

#[test]
fn prints_settled_layout_as_json() {
    let dir = scratch_dir("layout");
    let items = dir.join("items.json");
    let config = dir.join("config.toml");
    fs::write(
        &items,
        r#"[
            {"id": "a", "height": 100},
            {"id": "b", "height": 200},
            {"id": "c", "height": 150},
            {"id": "d", "height": 50}
        ]"#,
    )
    .unwrap();
    fs::write(
        &config,
        format!("log_file_path = {:?}\n", dir.join("sim.log").to_string_lossy()),
    )
    .unwrap();

    let output = sim()
        .arg(&items)
        .args(["--width", "410", "--columns", "2", "--gap", "10"])
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["column_count"], 2);
    assert_eq!(report["column_width"].as_f64(), Some(200.0));
    assert_eq!(report["container_height"].as_f64(), Some(260.0));

    let placed: Vec<(&str, u64)> = report["positions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["id"].as_str().unwrap(), p["column"].as_u64().unwrap()))
        .collect();
    assert_eq!(placed, [("a", 0), ("b", 1), ("c", 0), ("d", 1)]);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_items_file_fails() {
    let dir = scratch_dir("missing");
    let config = dir.join("config.toml");
    fs::write(
        &config,
        format!("log_file_path = {:?}\n", dir.join("sim.log").to_string_lossy()),
    )
    .unwrap();

    let output = sim()
        .arg(dir.join("nope.json"))
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute binary");
    assert!(!output.status.success());

    fs::remove_dir_all(dir).ok();
}
