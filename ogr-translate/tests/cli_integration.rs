//! Tests d'intégration de la CLI
//!
//! Exécute le binaire `ogr-translate` sur les fixtures de tests/fixtures.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ogr-translate"))
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn nas_fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../ogr-drivers/tests/fixtures")
        .join(name)
}

#[test]
fn test_to_mapinfo() {
    let output = std::env::temp_dir().join(format!("ogr-translate-cli-{}.geojson", std::process::id()));

    let status = bin()
        .args(["-q", "to-mapinfo", "--charset", "WindowsLatin1", "--input"])
        .arg(fixture("parcelles.geojson"))
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let features = json["features"].as_array().unwrap();

    // polygone + 2 points issus du multipoint + feature sans géométrie
    assert_eq!(features.len(), 4);
    assert_eq!(json["charset"], "WindowsLatin1");

    let natives: Vec<&str> = features
        .iter()
        .map(|f| f["properties"]["_native"].as_str().unwrap())
        .collect();
    assert_eq!(natives, vec!["Region", "Point", "Point", "None"]);

    let region = &features[0]["properties"];
    assert_eq!(region["_brush"]["fg_color"], 0xFFFF00);
    assert_eq!(region["idu"], "39001000AB0001");
    // liste sans équivalent MapInfo: champ ignoré
    assert!(features[1]["properties"].get("voisins").is_none());
    assert_eq!(features[2]["properties"]["contenance"], 80.5);

    std::fs::remove_file(output).ok();
}

#[test]
fn test_nas_info_with_relations() {
    // pas de cache .gfs écrit à côté des fixtures
    let config = std::env::temp_dir().join(format!("ogr-translate-cli-{}.json", std::process::id()));
    std::fs::write(&config, r#"{"save_schema_cache": false}"#).unwrap();

    let output = bin()
        .args(["-q", "nas-info", "--relations", "--path"])
        .arg(nas_fixture("alkis_undeclared.json"))
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    let layers: Vec<&str> = summary["layers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(layers, vec!["AX_Gebaeude", "AX_Person", "ALKIS_beziehungen"]);
    assert_eq!(summary["relations"].as_array().map(|r| r.len()), Some(3));

    assert!(!nas_fixture("alkis_undeclared.gfs").exists());

    std::fs::remove_file(config).ok();
}

#[test]
fn test_sniff() {
    let output = bin()
        .args(["sniff", "--path"])
        .arg(nas_fixture("view.tab"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("View"));
}
