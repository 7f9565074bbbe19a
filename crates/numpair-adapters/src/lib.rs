//! SQL dump adapter: quote-aware value-tuple scanning + JSON document loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use numpair_core::{NumberPairRecord, NumbersDocument};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const CRATE_NAME: &str = "numpair-adapters";

/// Statement prefix the dump is split on.
pub const INSERT_MARKER: &str = "INSERT INTO public.numbers";

/// `detail_vip, pairtype, pairnumber, miracledetail, miracledesc, pairnumberid, pairpoint`
pub const FIELD_COUNT: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    #[error("expected {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("value list not closed by ')' after {found} fields")]
    Unterminated { found: usize },
}

/// Scanner position relative to SQL string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    OutsideString,
    InsideString,
    /// A backslash was read; the next character is taken literally.
    EscapePending { in_string: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleScan {
    pub fields: Vec<String>,
    pub terminated: bool,
}

/// Scan one value list starting at its first opening quote, up to the closing `)`.
///
/// Quoted fields keep their content verbatim (`''` collapses to `'`, backslash
/// sequences are kept as written), including any text between the preceding
/// separator and the opening quote. Unquoted fields are trimmed and dropped when blank.
pub fn scan_value_tuple(input: &str) -> TupleScan {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::OutsideString;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        state = match state {
            ScanState::EscapePending { in_string } => {
                current.push(ch);
                if in_string {
                    ScanState::InsideString
                } else {
                    ScanState::OutsideString
                }
            }
            _ if ch == '\\' => {
                current.push(ch);
                ScanState::EscapePending {
                    in_string: state == ScanState::InsideString,
                }
            }
            ScanState::InsideString => {
                if ch != '\'' {
                    current.push(ch);
                    ScanState::InsideString
                } else if chars.peek() == Some(&'\'') {
                    chars.next();
                    current.push('\'');
                    ScanState::InsideString
                } else {
                    fields.push(std::mem::take(&mut current));
                    ScanState::OutsideString
                }
            }
            ScanState::OutsideString => match ch {
                '\'' => ScanState::InsideString,
                ',' => {
                    push_unquoted(&mut fields, &mut current);
                    ScanState::OutsideString
                }
                ')' => {
                    push_unquoted(&mut fields, &mut current);
                    return TupleScan {
                        fields,
                        terminated: true,
                    };
                }
                _ => {
                    current.push(ch);
                    ScanState::OutsideString
                }
            },
        };
    }

    TupleScan {
        fields,
        terminated: false,
    }
}

fn push_unquoted(fields: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        fields.push(trimmed.to_string());
    }
    current.clear();
}

/// Locate the value list of one statement, positioned at its first quote.
fn find_value_list(statement: &str) -> Option<&str> {
    statement.match_indices("VALUES").find_map(|(idx, keyword)| {
        let rest = statement[idx + keyword.len()..].trim_start();
        let list = rest.strip_prefix('(')?;
        list.starts_with('\'').then_some(list)
    })
}

/// One decoded `public.numbers` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPairRow {
    pub detail_vip: String,
    pub pairtype: String,
    pub pairnumber: String,
    pub miracledetail: String,
    pub miracledesc: String,
    pub pairnumberid: u64,
    pub pairpoint: i64,
}

impl RawPairRow {
    pub fn from_scan(scan: TupleScan) -> Result<Self, TupleError> {
        let found = scan.fields.len();
        if found < FIELD_COUNT {
            return Err(if scan.terminated {
                TupleError::TooFewFields {
                    expected: FIELD_COUNT,
                    found,
                }
            } else {
                TupleError::Unterminated { found }
            });
        }
        let mut fields = scan.fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let detail_vip = next();
        let pairtype = next().trim().to_string();
        let pairnumber = next().trim().to_string();
        let miracledetail = next();
        let miracledesc = next().trim().to_string();
        let pairnumberid = parse_unsigned_or_zero(&next());
        let pairpoint = next().trim().parse::<i64>().unwrap_or(0);
        Ok(Self {
            detail_vip,
            pairtype,
            pairnumber,
            miracledetail,
            miracledesc,
            pairnumberid,
            pairpoint,
        })
    }
}

fn parse_unsigned_or_zero(value: &str) -> u64 {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    value.parse().unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStatement {
    /// Zero-based position among the dump's INSERT statements.
    pub index: usize,
    pub error: TupleError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlDumpParse {
    pub statements: usize,
    pub rows: Vec<RawPairRow>,
    pub skipped: Vec<SkippedStatement>,
}

/// Decode every `INSERT INTO public.numbers` statement of a dump.
///
/// Statements without a `VALUES ('` list are ignored; malformed tuples are
/// reported in `skipped` and parsing carries on.
pub fn parse_sql_dump(text: &str) -> SqlDumpParse {
    let mut parse = SqlDumpParse::default();
    for (index, statement) in text.split(INSERT_MARKER).skip(1).enumerate() {
        parse.statements += 1;
        let Some(values) = find_value_list(statement) else {
            debug!(index, "statement has no VALUES list; ignoring");
            continue;
        };
        match RawPairRow::from_scan(scan_value_tuple(values)) {
            Ok(row) => parse.rows.push(row),
            Err(error) => {
                warn!(index, %error, "skipping malformed numbers row");
                parse.skipped.push(SkippedStatement { index, error });
            }
        }
    }
    parse
}

pub fn load_sql_dump(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("reading SQL dump {}", path.display()))
}

/// A `numbers.json` entry that could not be read as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub pair: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumbersLoad {
    pub document: NumbersDocument,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Deserialize)]
struct NumbersFile {
    numbers: IndexMap<String, serde_json::Value>,
}

/// Load `numbers.json`, decoding each record on its own.
///
/// An unreadable file or a missing `numbers` object is an error; a record that
/// does not decode is logged, listed in `rejected`, and left out.
pub fn load_numbers_document(path: impl AsRef<Path>) -> Result<NumbersLoad> {
    let path = path.as_ref();
    let file: NumbersFile = read_json_file(path)?;

    let mut numbers = IndexMap::with_capacity(file.numbers.len());
    let mut rejected = Vec::new();
    for (pair, value) in file.numbers {
        match serde_json::from_value::<NumberPairRecord>(value) {
            Ok(record) => {
                numbers.insert(pair, record);
            }
            Err(err) => {
                warn!(pair = %pair, error = %err, path = %path.display(), "skipping unreadable numbers record");
                rejected.push(RejectedRecord {
                    pair,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(NumbersLoad {
        document: NumbersDocument::new(numbers),
        rejected,
    })
}

fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}
