//! Batch pipeline: SQL dump -> `numbers.json` -> `telephone_type.json`.

pub mod keywords;
pub mod text;

use std::path::PathBuf;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use numpair_adapters::{load_numbers_document, load_sql_dump, parse_sql_dump, RawPairRow};
use numpair_core::{
    Aspect, AspectDetail, AspectMap, AspectShares, CategoryBucket, CategoryRecommendation, Nature,
    NumberPairRecord, NumbersDocument, PairSummary, TelephoneTypeDocument,
};
use numpair_storage::{DocumentStore, StoredDocument};
use tracing::{debug, info, warn};

pub use keywords::{KeywordRules, RulesError};

pub const CRATE_NAME: &str = "numpair-pipeline";

/// Dominant share that places a pair in a strong bucket.
pub const STRONG_SHARE: i64 = 40;
/// Dominant share that places a pair in a moderate bucket.
pub const MODERATE_SHARE: i64 = 30;
pub const EVEN_SHARE: i64 = 25;
pub const RECOMMENDATION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub workspace_root: PathBuf,
    pub sql_path: PathBuf,
    pub numbers_json_path: PathBuf,
    pub telephone_json_path: PathBuf,
    pub keyword_rules_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            sql_path: PathBuf::from("numbers.sql"),
            numbers_json_path: PathBuf::from("mobile_app/assets/numbers.json"),
            telephone_json_path: PathBuf::from("mobile_app/assets/telephone_type.json"),
            keyword_rules_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup; unset or blank values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        Self {
            workspace_root: var("NUMPAIR_WORKSPACE_ROOT").unwrap_or(defaults.workspace_root),
            sql_path: var("NUMPAIR_SQL_PATH").unwrap_or(defaults.sql_path),
            numbers_json_path: var("NUMPAIR_NUMBERS_JSON").unwrap_or(defaults.numbers_json_path),
            telephone_json_path: var("NUMPAIR_TELEPHONE_JSON")
                .unwrap_or(defaults.telephone_json_path),
            keyword_rules_path: var("NUMPAIR_KEYWORD_RULES"),
        }
    }

    pub fn store(&self) -> DocumentStore {
        DocumentStore::new(self.workspace_root.clone())
    }

    pub fn keyword_rules(&self) -> Result<KeywordRules> {
        match &self.keyword_rules_path {
            Some(path) => {
                let path = self.store().resolve(path);
                let rules = KeywordRules::from_yaml_file(&path)?;
                info!(path = %path.display(), "loaded keyword rules override");
                Ok(rules)
            }
            None => Ok(KeywordRules::builtin()),
        }
    }
}

/// Turn raw keyword counts into percentages that sum to exactly 100.
///
/// Each share is rounded half-to-even; any drift is added to the largest share
/// (earliest aspect on ties). No matches at all gives an even split.
pub fn shares_from_counts(counts: &AspectMap<usize>) -> AspectShares {
    let total: usize = counts.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        return AspectMap::from_fn(|_| EVEN_SHARE);
    }
    let mut shares = counts.map(|_, count| {
        ((*count as f64 / total as f64) * 100.0).round_ties_even() as i64
    });
    let drift = 100 - shares.iter().map(|(_, p)| *p).sum::<i64>();
    if drift != 0 {
        let (largest, _) = shares.dominant();
        *shares.get_mut(largest) += drift;
    }
    shares
}

pub fn score_aspects(rules: &KeywordRules, detail_vip: &str, miracledetail: &str) -> AspectShares {
    let combined = format!("{detail_vip} {miracledetail}");
    shares_from_counts(&rules.count_matches(&combined))
}

pub fn build_record(rules: &KeywordRules, row: RawPairRow) -> NumberPairRecord {
    let shares = score_aspects(rules, &row.detail_vip, &row.miracledetail);
    let nature = Nature::from_pairpoint(Some(row.pairpoint));
    let summary = text::summarize(nature, &shares);
    let aspects = shares.map(|aspect, percentage| AspectDetail {
        th: aspect.label_th().to_string(),
        percentage: *percentage,
        insight: text::insight(aspect, nature, *percentage).to_string(),
    });
    NumberPairRecord {
        pairnumber: row.pairnumber,
        pairtype: row.pairtype,
        pairpoint: row.pairpoint,
        nature,
        summary,
        miracledesc: row.miracledesc,
        detail_vip: row.detail_vip,
        miracledetail: row.miracledetail,
        aspects,
    }
}

/// Key records by pair number. A repeated key keeps its first position and takes the later value.
pub fn build_numbers_document(rules: &KeywordRules, rows: Vec<RawPairRow>) -> (NumbersDocument, usize) {
    let mut numbers = IndexMap::with_capacity(rows.len());
    let mut replaced = 0usize;
    for row in rows {
        let record = build_record(rules, row);
        debug!(pair = %record.pairnumber, nature = record.nature.as_str(), "scored pair");
        if numbers.insert(record.pairnumber.clone(), record).is_some() {
            replaced += 1;
        }
    }
    (NumbersDocument::new(numbers), replaced)
}

#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub source: PathBuf,
    pub statements: usize,
    pub records: usize,
    pub skipped: usize,
    pub replaced: usize,
    pub sample: Option<NumberPairRecord>,
    pub output: StoredDocument,
}

pub fn run_extract(config: &PipelineConfig) -> Result<ExtractReport> {
    let store = config.store();
    let rules = config.keyword_rules()?;
    let source = store.resolve(&config.sql_path);
    info!(path = %source.display(), "parsing SQL dump");

    let text = load_sql_dump(&source)?;
    let parse = parse_sql_dump(&text);
    let statements = parse.statements;
    let skipped = parse.skipped.len();

    let (document, replaced) = build_numbers_document(&rules, parse.rows);
    if replaced > 0 {
        warn!(replaced, "duplicate pair numbers replaced earlier records");
    }
    let output = store
        .write_json(&config.numbers_json_path, &document)
        .context("writing numbers document")?;
    info!(
        records = document.numbers.len(),
        skipped,
        hash = %output.content_hash,
        "numbers document written"
    );

    Ok(ExtractReport {
        source,
        statements,
        records: document.numbers.len(),
        skipped,
        replaced,
        sample: document.numbers.values().next().cloned(),
        output,
    })
}

fn pair_summary(pair: &str, record: &NumberPairRecord, percentage: i64) -> PairSummary {
    PairSummary {
        pair: pair.to_string(),
        percentage,
        nature: record.nature,
        pairpoint: record.pairpoint,
        summary: record.summary.clone(),
    }
}

/// Place each record under its single dominant aspect.
///
/// Returns the buckets and the number of records whose dominant share was
/// below [`MODERATE_SHARE`] and therefore landed in no bucket.
pub fn bucketize(document: &NumbersDocument) -> (AspectMap<CategoryBucket>, usize) {
    let mut buckets: AspectMap<CategoryBucket> = AspectMap::default();
    let mut below_threshold = 0usize;

    for (pair, record) in &document.numbers {
        let (aspect, percentage) = record.shares().dominant();
        let bucket = buckets.get_mut(aspect);
        if percentage >= STRONG_SHARE {
            bucket.strong_pairs.push(pair_summary(pair, record, percentage));
        } else if percentage >= MODERATE_SHARE {
            bucket.moderate_pairs.push(pair_summary(pair, record, percentage));
        } else {
            below_threshold += 1;
        }
    }

    for aspect in Aspect::ALL {
        let bucket = buckets.get_mut(aspect);
        for list in [&mut bucket.strong_pairs, &mut bucket.moderate_pairs] {
            list.sort_by(|a, b| {
                b.percentage
                    .cmp(&a.percentage)
                    .then(b.pairpoint.cmp(&a.pairpoint))
            });
        }
    }

    (buckets, below_threshold)
}

/// Top recommendable pairs of one bucket, best pairpoint first.
pub fn recommend(aspect: Aspect, bucket: &CategoryBucket) -> CategoryRecommendation {
    let mut best: Vec<PairSummary> = bucket
        .strong_pairs
        .iter()
        .chain(&bucket.moderate_pairs)
        .filter(|p| p.is_recommendable())
        .cloned()
        .collect();
    best.sort_by(|a, b| {
        b.pairpoint
            .cmp(&a.pairpoint)
            .then(b.percentage.cmp(&a.percentage))
    });
    best.truncate(RECOMMENDATION_LIMIT);

    CategoryRecommendation {
        th: aspect.name_th().to_string(),
        description: format!("เลขที่เสริมด้าน{}", aspect.name_th()),
        best_pairs: best.iter().map(|p| p.pair.clone()).collect(),
        details: best,
        total_strong: bucket.strong_pairs.len(),
        total_moderate: bucket.moderate_pairs.len(),
    }
}

pub fn build_telephone_document(document: &NumbersDocument) -> (TelephoneTypeDocument, usize) {
    let (buckets, below_threshold) = bucketize(document);
    let categories = buckets.map(|aspect, bucket| recommend(aspect, bucket));
    (TelephoneTypeDocument::new(categories), below_threshold)
}

#[derive(Debug, Clone)]
pub struct CategorizeReport {
    pub source: PathBuf,
    pub records: usize,
    /// Entries of `numbers.json` that did not decode and were skipped.
    pub rejected: usize,
    pub below_threshold: usize,
    pub document: TelephoneTypeDocument,
    pub output: StoredDocument,
}

pub fn run_categorize(config: &PipelineConfig) -> Result<CategorizeReport> {
    let store = config.store();
    let source = store.resolve(&config.numbers_json_path);
    info!(path = %source.display(), "loading numbers document");

    let load = load_numbers_document(&source)?;
    let rejected = load.rejected.len();
    if rejected > 0 {
        warn!(rejected, "unreadable records were skipped");
    }
    let numbers = load.document;
    let (document, below_threshold) = build_telephone_document(&numbers);
    if below_threshold > 0 {
        warn!(
            below_threshold,
            "pairs with no aspect at or above {}% were left out of every category",
            MODERATE_SHARE
        );
    }
    let output = store
        .write_json(&config.telephone_json_path, &document)
        .context("writing telephone type document")?;
    info!(hash = %output.content_hash, "telephone type document written");

    Ok(CategorizeReport {
        source,
        records: numbers.numbers.len(),
        rejected,
        below_threshold,
        document,
        output,
    })
}
