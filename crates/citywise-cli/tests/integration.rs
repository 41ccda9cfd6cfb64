#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn citywise(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("citywise").unwrap();
    cmd.current_dir(dir.path()).env("CITYWISE_ROOT", dir.path());
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn json_stdout(cmd: &mut Command) -> Value {
    let out = cmd.arg("--json").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn names(requirements: &Value) -> Vec<String> {
    requirements
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

const ADU_FORM: &str = r#"{
  "kind": "form",
  "projectType": "ADU",
  "jurisdiction": "Phoenix",
  "squareFootage": 900,
  "structuralChanges": true,
  "plumbingWork": "yes",
  "electricalWork": true,
  "electricalServiceAmps": "200 amps"
}"#;

const ADU_TRANSCRIPT: &str = r#"
kind: transcript
turns:
  - role: user
    content: We'd like a casita out back, roughly 900 sq ft.
  - role: assistant
    content: Any plumbing, electrical or structural work?
  - role: user
    content: A bathroom and kitchenette, a new 200 amp panel, and a load-bearing wall comes out.
"#;

// ---------------------------------------------------------------------------
// citywise init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_seed_tables() {
    let dir = TempDir::new().unwrap();
    citywise(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .citywise/config.yaml"));

    assert!(dir.path().join(".citywise/config.yaml").exists());
    assert!(dir.path().join(".citywise/rules/phoenix.yaml").exists());
    assert!(dir.path().join(".citywise/zoning/phoenix.yaml").exists());
}

#[test]
fn init_is_idempotent_and_keeps_local_edits() {
    let dir = TempDir::new().unwrap();
    citywise(&dir).arg("init").assert().success();

    let rules = dir.path().join(".citywise/rules/phoenix.yaml");
    let edited = std::fs::read_to_string(&rules)
        .unwrap()
        .replace("Pool Barrier Plan", "Pool Safety Barrier Plan");
    std::fs::write(&rules, &edited).unwrap();

    citywise(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .citywise/config.yaml"));
    assert_eq!(std::fs::read_to_string(&rules).unwrap(), edited);
}

// ---------------------------------------------------------------------------
// citywise extract
// ---------------------------------------------------------------------------

#[test]
fn extract_transcript_reads_user_turns() {
    let dir = TempDir::new().unwrap();
    let intake = write(&dir, "intake.yaml", ADU_TRANSCRIPT);

    let attrs = json_stdout(citywise(&dir).arg("extract").arg(&intake));
    assert_eq!(attrs["projectType"], "ADU");
    assert_eq!(attrs["jurisdiction"], "Phoenix");
    assert_eq!(attrs["squareFootage"], 900.0);
    assert_eq!(attrs["plumbingWork"], true);
    assert_eq!(attrs["electricalWork"], true);
    assert_eq!(attrs["structuralChanges"], true);
    assert_eq!(attrs["electricalServiceAmps"], 200.0);
}

#[test]
fn extract_missing_file_fails_with_context() {
    let dir = TempDir::new().unwrap();
    citywise(&dir)
        .args(["extract", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read intake"));
}

// ---------------------------------------------------------------------------
// citywise resolve
// ---------------------------------------------------------------------------

#[test]
fn resolve_adu_form_lists_nine_requirements() {
    let dir = TempDir::new().unwrap();
    let intake = write(&dir, "adu.json", ADU_FORM);

    let out = json_stdout(citywise(&dir).arg("resolve").arg(&intake));
    assert_eq!(
        names(&out["requirements"]),
        [
            "Topographic Survey",
            "Structural Engineering Plans",
            "Soils Report",
            "Civil Engineering Plans",
            "Plumbing Plans",
            "Electrical Plans",
            "Electrical Service Upgrade",
            "HVAC Plans",
            "Energy Code Compliance",
        ]
    );
    assert_eq!(out["permit"]["path"], "PLAN_REVIEW");
}

#[test]
fn resolve_transcript_matches_form() {
    let dir = TempDir::new().unwrap();
    let form = write(&dir, "adu.json", ADU_FORM);
    let transcript = write(&dir, "adu.yaml", ADU_TRANSCRIPT);

    let a = json_stdout(citywise(&dir).arg("resolve").arg(&form));
    let b = json_stdout(citywise(&dir).arg("resolve").arg(&transcript));
    assert_eq!(a["requirements"], b["requirements"]);
}

#[test]
fn resolve_small_remodel_goes_over_the_counter() {
    let dir = TempDir::new().unwrap();
    let intake = write(
        &dir,
        "remodel.json",
        r#"{"kind":"form","projectType":"REMODEL","squareFootage":300}"#,
    );

    citywise(&dir)
        .arg("resolve")
        .arg(&intake)
        .assert()
        .success()
        .stdout(predicate::str::contains("Topographic Survey"))
        .stdout(predicate::str::contains("HVAC Plans").not())
        .stdout(predicate::str::contains("Permit path: OVER_THE_COUNTER"));
}

#[test]
fn resolve_respects_existing_entries() {
    let dir = TempDir::new().unwrap();
    let intake = write(&dir, "adu.json", ADU_FORM);
    let existing = write(
        &dir,
        "existing.yaml",
        "- name: Structural Engineering\n  type: structural\n  description: already engaged\n",
    );

    let out = json_stdout(
        citywise(&dir)
            .arg("resolve")
            .arg(&intake)
            .arg("--existing")
            .arg(&existing),
    );
    let reqs = out["requirements"].as_array().unwrap();
    assert!(reqs.iter().all(|r| r["discipline"] != "structural"));
    assert!(names(&out["requirements"]).contains(&"Civil Engineering Plans".to_string()));
}

#[test]
fn resolve_with_district_appends_zoning() {
    let dir = TempDir::new().unwrap();
    let intake = write(&dir, "adu.json", ADU_FORM);

    let out = json_stdout(
        citywise(&dir)
            .arg("resolve")
            .arg(&intake)
            .args(["--district", "r1-6"]),
    );
    let names = names(&out["requirements"]);
    assert_eq!(names.len(), 9 + 9);
    assert_eq!(names[9], "Permitted Use");
    assert!(names.contains(&"ADU Maximum Floor Area".to_string()));
    assert!(!names.contains(&"Pool Setback".to_string()));
}

#[test]
fn resolve_unknown_district_fails() {
    let dir = TempDir::new().unwrap();
    let intake = write(&dir, "adu.json", ADU_FORM);
    citywise(&dir)
        .arg("resolve")
        .arg(&intake)
        .args(["--district", "C-2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zoning district not found: C-2"));
}

#[test]
fn resolve_unknown_jurisdiction_is_a_hard_error() {
    let dir = TempDir::new().unwrap();
    let intake = write(
        &dir,
        "tucson.json",
        r#"{"kind":"form","projectType":"ADU","jurisdiction":"Tucson","squareFootage":900}"#,
    );
    citywise(&dir)
        .arg("resolve")
        .arg(&intake)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rule set unavailable for jurisdiction 'Tucson'"));
}

#[test]
fn resolve_uses_edited_tables_after_init() {
    let dir = TempDir::new().unwrap();
    citywise(&dir).arg("init").assert().success();

    let rules = dir.path().join(".citywise/rules/phoenix.yaml");
    let edited = std::fs::read_to_string(&rules)
        .unwrap()
        .replace("Pool Barrier Plan", "Pool Safety Barrier Plan");
    std::fs::write(&rules, edited).unwrap();

    let intake = write(&dir, "pool.json", r#"{"kind":"form","projectType":"POOL"}"#);
    citywise(&dir)
        .arg("resolve")
        .arg(&intake)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pool Safety Barrier Plan"));
}

#[test]
fn resolve_fails_when_configured_table_is_missing() {
    let dir = TempDir::new().unwrap();
    citywise(&dir).arg("init").assert().success();
    std::fs::remove_file(dir.path().join(".citywise/rules/phoenix.yaml")).unwrap();

    let intake = write(&dir, "adu.json", ADU_FORM);
    citywise(&dir)
        .arg("resolve")
        .arg(&intake)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rule set unavailable"));
}

// ---------------------------------------------------------------------------
// citywise reconcile
// ---------------------------------------------------------------------------

const ASSESSOR: &str = r#"{
  "streetAddress": "123 W Main St",
  "city": "PHOENIX",
  "livingArea": 1850,
  "yearBuilt": 1998,
  "lotSize": 7200,
  "taxYear": 2025
}"#;

const REGRID: &str = r#"{
  "streetAddress": "123 w main st",
  "city": "Phoenix",
  "livingArea": 1200,
  "yearBuilt": 1998,
  "lotSize": 7250,
  "zoning": "R1-6",
  "ownerName": "SMITH JOHN"
}"#;

#[test]
fn reconcile_flags_area_conflict() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "assessor.json", ASSESSOR);
    let r = write(&dir, "regrid.json", REGRID);

    let report = json_stdout(
        citywise(&dir)
            .arg("reconcile")
            .arg("--assessor")
            .arg(&a)
            .arg("--regrid")
            .arg(&r),
    );
    assert_eq!(report["livingArea"]["value"], 1850.0);
    assert_eq!(report["livingArea"]["source"], "assessor");
    assert_eq!(report["livingArea"]["hasConflict"], true);
    assert_eq!(report["yearBuilt"]["hasConflict"], false);
    assert_eq!(report["lotSize"]["hasConflict"], false);
    assert_eq!(report["city"]["hasConflict"], false);
    assert_eq!(report["zoning"]["value"], "R1-6");
    assert_eq!(report["zoning"]["source"], "regrid");
}

#[test]
fn reconcile_fail_on_conflict_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "assessor.json", ASSESSOR);
    let r = write(&dir, "regrid.json", REGRID);

    citywise(&dir)
        .arg("reconcile")
        .arg("--assessor")
        .arg(&a)
        .arg("--regrid")
        .arg(&r)
        .arg("--fail-on-conflict")
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 field(s) need review."))
        .stderr(predicate::str::contains("conflicting fields: livingArea"));
}

#[test]
fn reconcile_honours_config_overrides() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".citywise")).unwrap();
    write(
        &dir,
        ".citywise/config.yaml",
        "reconcile:\n  overrides:\n    livingArea:\n      precedence: regrid\n      tolerance:\n        type: absolute\n        value: 1000\n",
    );
    let a = write(&dir, "assessor.json", ASSESSOR);
    let r = write(&dir, "regrid.json", REGRID);

    let report = json_stdout(
        citywise(&dir)
            .arg("reconcile")
            .arg("--assessor")
            .arg(&a)
            .arg("--regrid")
            .arg(&r),
    );
    assert_eq!(report["livingArea"]["value"], 1200.0);
    assert_eq!(report["livingArea"]["hasConflict"], false);
}

// ---------------------------------------------------------------------------
// citywise edges
// ---------------------------------------------------------------------------

#[test]
fn edges_labels_rectangle_and_estimates_buildable_area() {
    let dir = TempDir::new().unwrap();
    // Roughly 60 ft east-west by 120 ft north-south, north edge first.
    let parcel = write(
        &dir,
        "parcel.json",
        r#"{"boundary":[
            [-112.07, 33.45033],
            [-112.069804, 33.45033],
            [-112.069804, 33.45],
            [-112.07, 33.45]
        ]}"#,
    );

    let out = json_stdout(
        citywise(&dir)
            .arg("edges")
            .arg(&parcel)
            .args(["--district", "R1-6"]),
    );
    let sides: Vec<&str> = out["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["side"].as_str().unwrap())
        .collect();
    assert_eq!(sides, ["front", "right", "rear", "left"]);
    assert_eq!(out["setbacks"]["front"], 20.0);
    assert_eq!(out["setbacks"]["left"], 10.0);
    let buildable = out["buildable"]["buildable_sq_ft"].as_f64().unwrap();
    assert!(buildable > 3_000.0 && buildable < 3_800.0, "{buildable}");
    let gross = out["buildable"]["gross_sq_ft"].as_f64().unwrap();
    assert!(gross > 6_800.0 && gross < 7_600.0, "{gross}");
}

#[test]
fn edges_without_district_skips_estimate() {
    let dir = TempDir::new().unwrap();
    let parcel = write(
        &dir,
        "parcel.yaml",
        "boundary:\n  - [-112.07, 33.45]\n  - [-112.0698, 33.45]\n  - [-112.0698, 33.4503]\n  - [-112.07, 33.4503]\n",
    );
    let out = json_stdout(citywise(&dir).arg("edges").arg(&parcel));
    assert_eq!(out["edges"].as_array().unwrap().len(), 4);
    assert!(out.get("buildable").is_none());
}

// ---------------------------------------------------------------------------
// citywise rules / zoning / config
// ---------------------------------------------------------------------------

#[test]
fn rules_show_lists_rules_in_order() {
    let dir = TempDir::new().unwrap();
    citywise(&dir)
        .args(["rules", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("structural-changes"))
        .stdout(predicate::str::contains("squareFootage > 200"));
}

#[test]
fn rules_export_writes_loadable_yaml() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("export/phoenix.yaml");
    citywise(&dir)
        .args(["rules", "export", "--out"])
        .arg(&out)
        .assert()
        .success();

    let yaml = std::fs::read_to_string(&out).unwrap();
    assert!(yaml.contains("jurisdiction: Phoenix"));
    assert!(yaml.contains("id: hvac-conditioned-space"));
}

#[test]
fn rules_show_unknown_jurisdiction_fails() {
    let dir = TempDir::new().unwrap();
    citywise(&dir)
        .args(["rules", "show", "--jurisdiction", "Flagstaff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rule set unavailable"));
}

#[test]
fn zoning_show_district() {
    let dir = TempDir::new().unwrap();
    citywise(&dir)
        .args(["zoning", "show", "R1-6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Front Setback"))
        .stdout(predicate::str::contains("20 ft"));

    let districts = json_stdout(citywise(&dir).args(["zoning", "list"]));
    assert_eq!(districts.as_array().unwrap().len(), 4);
}

#[test]
fn config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = json_stdout(citywise(&dir).args(["config", "show"]));
    assert_eq!(cfg["jurisdiction"], "Phoenix");
    assert_eq!(cfg["permits"]["otc_max_square_feet"], 500.0);
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    citywise(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));

    std::fs::create_dir_all(dir.path().join(".citywise")).unwrap();
    write(
        &dir,
        ".citywise/config.yaml",
        "jurisdiction: \"\"\npermits:\n  otc_max_square_feet: 0\n",
    );
    citywise(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] jurisdiction is empty"))
        .stdout(predicate::str::contains("[warning] permits.otc_max_square_feet=0"))
        .stderr(predicate::str::contains("config validation found errors"));
}
