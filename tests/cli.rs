//! Tests of the `smellcorr` binary.

use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

const SMELLS: &str = indoc! {"
    Name;God_Class;Complex_Class;Large_Class;Data_Class;Feature_Envy;Brain_Class
    org.app.web.Login;1;0;0;0;0;0
    org.app.web.Admin;1;0;0;0;0;0
    org.app.web.Home;0;0;0;0;0;0
    org.app.web.About;0;0;0;0;0;0
"};

const SEMGREP: &str = indoc! {r#"
    {
      "results": [
        {
          "path": "src/main/java/org/app/web/Login.java",
          "extra": {"metadata": {"vulnerability_class": ["SQL Injection"], "cwe": ["CWE-89"]}}
        },
        {
          "path": "src/main/java/org/app/web/Home.java",
          "extra": {"metadata": {"vulnerability_class": ["SQL Injection"]}}
        }
      ],
      "paths": {
        "scanned": [
          "src/main/java/org/app/web/Login.java",
          "src/main/java/org/app/web/Admin.java",
          "src/main/java/org/app/web/Home.java",
          "src/main/java/org/app/web/About.java"
        ]
      }
    }
"#};

fn smellcorr() -> Command {
    Command::cargo_bin("smellcorr").expect("binary should build")
}

#[test]
fn test_extract_then_analyze() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.json"), SEMGREP).unwrap();
    fs::write(dir.path().join("design_smells.csv"), SMELLS).unwrap();

    smellcorr()
        .current_dir(dir.path())
        .args(["extract", "app.json"])
        .assert()
        .success();
    assert!(dir.path().join("app_results.csv").exists());
    assert!(dir.path().join("app_scanned.csv").exists());

    let output = smellcorr()
        .current_dir(dir.path())
        .args([
            "analyze",
            "--project",
            "app=design_smells.csv,app_results.csv,app_scanned.csv",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["project_count"], 1);
    assert_eq!(report["projects"][0]["class_count"], 4);
    assert_eq!(report["projects"][0]["percentages"]["flawed_percentage"], 50.0);
    let login = &report["projects"][0]["vulnerable_classes"][1];
    assert_eq!(login["name"], "web.Login");
    assert_eq!(login["cwes"][0], "CWE-89");
}

#[test]
fn test_analyze_without_projects_fails() {
    let dir = TempDir::new().unwrap();
    let output = smellcorr()
        .current_dir(dir.path())
        .args(["analyze", "--plain"])
        .env_remove("SMELLCORR_CONFIG")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no projects"));
}

#[test]
fn test_analyze_fails_when_every_project_fails() {
    let dir = TempDir::new().unwrap();
    let output = smellcorr()
        .current_dir(dir.path())
        .args(["analyze", "--plain", "-p", "ghost=a.csv,b.csv,c.csv"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}

#[test]
fn test_init_writes_template_once() {
    let dir = TempDir::new().unwrap();
    smellcorr()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    assert!(dir.path().join("study.toml").exists());

    smellcorr()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure();
    smellcorr()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
