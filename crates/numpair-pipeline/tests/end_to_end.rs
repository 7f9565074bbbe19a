use std::fs;
use std::path::{Path, PathBuf};

use numpair_adapters::load_numbers_document;
use numpair_core::{AspectMap, Nature};
use numpair_pipeline::{run_categorize, run_extract, PipelineConfig};
use tempfile::TempDir;

fn sample_dump() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/sample/numbers.sql")
}

fn workspace_with_sample_dump() -> (TempDir, PipelineConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(sample_dump(), dir.path().join("numbers.sql")).expect("copy sample dump");
    let config = PipelineConfig {
        workspace_root: dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };
    (dir, config)
}

#[test]
fn extraction_is_byte_identical_across_runs() {
    let (_dir, config) = workspace_with_sample_dump();

    let first = run_extract(&config).expect("first extract");
    let first_bytes = fs::read(&first.output.path).unwrap();
    let second = run_extract(&config).expect("second extract");
    let second_bytes = fs::read(&second.output.path).unwrap();

    assert_eq!(first.output.content_hash, second.output.content_hash);
    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first.statements, 6);
    assert_eq!(first.records, 5);
    assert_eq!(first.skipped, 1);
    assert_eq!(first.replaced, 0);
    assert_eq!(first.sample.as_ref().map(|r| r.pairnumber.as_str()), Some("24"));
}

#[test]
fn extracted_records_hold_their_invariants() {
    let (_dir, config) = workspace_with_sample_dump();
    let report = run_extract(&config).expect("extract");
    let doc = load_numbers_document(&report.output.path)
        .expect("reload numbers.json")
        .document;

    let keys: Vec<&str> = doc.numbers.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["24", "45", "07", "19", "56"]);

    for record in doc.numbers.values() {
        let total: i64 = record.shares().iter().map(|(_, p)| *p).sum();
        assert_eq!(total, 100, "pair {}", record.pairnumber);
        assert_eq!(record.nature, Nature::from_pairpoint(Some(record.pairpoint)));
    }

    let balanced = &doc.numbers["19"];
    assert_eq!(balanced.shares(), AspectMap::from_fn(|_| 25));
    assert_eq!(balanced.nature, Nature::Neutral);
    assert_eq!(balanced.miracledesc, "กลาง");
    assert_eq!(
        balanced.summary,
        "เลขกลาง มีความสมดุลทุกด้าน - มีทั้งดีและควรระวังในทุกเรื่อง"
    );
    assert_eq!(doc.numbers["07"].nature, Nature::Negative);
    assert_eq!(doc.numbers["24"].nature, Nature::Positive);
}

#[test]
fn numbers_json_has_the_expected_top_level_shape() {
    let (_dir, config) = workspace_with_sample_dump();
    let report = run_extract(&config).expect("extract");
    let text = fs::read_to_string(&report.output.path).unwrap();

    assert!(text.starts_with("{\n  \"version\": \"1.0\",\n  \"description\": "));
    assert!(text.contains("\"aspectLabels\": {\n    \"health\": {\n      \"th\": \"ด้านสุขภาพ\""));
    assert!(!text.ends_with('\n'));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let record = &value["numbers"]["19"];
    let fields: Vec<&str> = record
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert!(fields.contains(&"miracledetail"));
    assert_eq!(record["aspects"]["love"]["percentage"], 25);
}

#[test]
fn categorizer_reads_extractor_output() {
    let (_dir, config) = workspace_with_sample_dump();
    run_extract(&config).expect("extract");
    let report = run_categorize(&config).expect("categorize");

    assert_eq!(report.records, 5);
    assert_eq!(report.rejected, 0);
    assert!(report.below_threshold >= 1, "the balanced pair has no bucket");
    assert!(report.output.path.ends_with("mobile_app/assets/telephone_type.json"));

    let categories = &report.document.categories;
    let bucketed: usize = [
        &categories.health,
        &categories.career,
        &categories.finance,
        &categories.love,
    ]
    .iter()
    .map(|c| c.total_strong + c.total_moderate)
    .sum();
    assert_eq!(bucketed + report.below_threshold, 5);

    for category in [&categories.health, &categories.career, &categories.finance, &categories.love] {
        assert!(!category.best_pairs.contains(&"07".to_string()));
        assert!(!category.best_pairs.contains(&"19".to_string()));
    }
}

#[test]
fn categorizer_fails_without_numbers_json() {
    let (_dir, config) = workspace_with_sample_dump();
    let err = run_categorize(&config).unwrap_err();
    assert!(format!("{err:#}").contains("numbers.json"));
}

#[test]
fn extractor_fails_without_sql_dump() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = PipelineConfig {
        workspace_root: dir.path().to_path_buf(),
        ..PipelineConfig::default()
    };
    let err = run_extract(&config).unwrap_err();
    assert!(format!("{err:#}").contains("numbers.sql"));
}

#[test]
fn keyword_rules_file_overrides_builtin_lists() {
    let (dir, mut config) = workspace_with_sample_dump();
    fs::write(
        dir.path().join("keywords.yaml"),
        "version: 1\naspects:\n  health: [balanced]\n  career: [zzz]\n  finance: [zzz]\n  love: [zzz]\n",
    )
    .unwrap();
    config.keyword_rules_path = Some(PathBuf::from("keywords.yaml"));

    let report = run_extract(&config).expect("extract");
    let doc = load_numbers_document(&report.output.path).unwrap().document;
    let balanced = &doc.numbers["19"];
    assert_eq!(balanced.aspects.health.percentage, 100);
    assert_eq!(balanced.aspects.love.percentage, 0);
}

#[test]
fn categorizer_skips_an_unreadable_record_and_keeps_the_rest() {
    let (dir, config) = workspace_with_sample_dump();
    let assets = dir.path().join("mobile_app/assets");
    fs::create_dir_all(&assets).unwrap();
    fs::write(
        assets.join("numbers.json"),
        r#"{
  "version": "1.0",
  "numbers": {
    "11": {
      "pairnumber": "11",
      "pairpoint": 70,
      "nature": "positive",
      "aspects": {
        "health": { "th": "ด้านสุขภาพ", "percentage": 10, "insight": "" },
        "career": { "th": "ด้านการงาน", "percentage": 10, "insight": "" },
        "finance": { "th": "ด้านการเงิน", "percentage": 70, "insight": "" },
        "love": { "th": "ด้านความรัก", "percentage": 10, "insight": "" }
      }
    },
    "12": { "pairnumber": "12", "pairpoint": 70, "nature": "Positive" }
  }
}"#,
    )
    .unwrap();

    let report = run_categorize(&config).expect("categorize");
    assert_eq!(report.records, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.document.categories.finance.best_pairs, vec!["11"]);
    assert!(report.output.path.exists());
}
