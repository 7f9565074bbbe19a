//! Keyword lists used to score a pair's description against each aspect.

use std::path::{Path, PathBuf};

use numpair_core::{Aspect, AspectMap};
use serde::Deserialize;
use thiserror::Error;

pub const HEALTH_KEYWORDS: &[&str] = &[
    "สุขภาพ", "โรค", "เจ็บ", "ป่วย", "ผ่าตัด", "อุบัติเหตุ", "ร่างกาย", "เรื้อรัง",
    "มะเร็ง", "กระดูก", "ประสาท", "สมอง", "ตา", "หัวใจ", "ความดัน", "ไมเกรน",
    "ภูมิแพ้", "กระเพาะ", "ลำไส้", "ไต", "ตับ", "ระบบประสาท", "อ่อนแอ", "แข็งแรง",
    "อายุยืน", "ชีวิต", "ตาย", "สิ้น", "แข็งแกร่ง", "ทนทาน", "ผิวหนัง", "เลือด",
    "ซีสต์", "เนื้องอก", "ปวด", "บาดเจ็บ", "เอ็น", "ข้อ", "หลัง", "คอ", "หัว",
    "ฟัน", "ติดเชื้อ", "อัมพาต", "นิ่ว", "ถุงน้ำดี", "มดลูก", "รังไข่", "ต่อมลูกหมาก",
];

pub const CAREER_KEYWORDS: &[&str] = &[
    "การงาน", "หน้าที่", "ตำแหน่ง", "ทำงาน", "อาชีพ", "ธุรกิจ", "กิจการ",
    "ก้าวหน้า", "เลื่อนขั้น", "ผู้บริหาร", "เจ้าของ", "ข้าราชการ", "ทหาร", "ตำรวจ",
    "นักการเมือง", "ผู้จัดการ", "ผู้นำ", "ลูกน้อง", "บริวาร", "สำเร็จ", "ล้มเหลว",
    "สายงาน", "เจ้านาย", "หัวหน้า", "พนักงาน", "ค้าขาย", "พ่อค้า", "แม่ค้า",
    "นักธุรกิจ", "ประสบความสำเร็จ", "รุ่งเรือง", "ก้าวกระโดด", "รุ่งโรจน์",
    "การศึกษา", "เรียน", "สอบ", "แข่งขัน", "ชนะ", "แพ้", "ทนายความ", "ผู้พิพากษา",
    "ศิลปิน", "ดารา", "นักแสดง", "นักเขียน", "นักออกแบบ", "ครู", "อาจารย์",
];

pub const FINANCE_KEYWORDS: &[&str] = &[
    "การเงิน", "เงิน", "ทอง", "ทรัพย์", "สมบัติ", "ร่ำรวย", "รวย", "ยากจน", "จน",
    "หนี้", "ล้มละลาย", "หมดตัว", "ขาดทุน", "กำไร", "โชคลาภ", "ลาภ", "โชค",
    "เศรษฐี", "มั่งคั่ง", "อุดมสมบูรณ์", "ไม่ขาดมือ", "ได้เงิน", "เสียเงิน",
    "ลงทุน", "ทุน", "ขาดแคลน", "ฐานะ", "มีอันจะกิน", "ไหลมา", "ไหลเข้า",
    "หาเงิน", "ใช้เงิน", "สินทรัพย์", "มรดก", "พึ่งพา", "อุปถัมภ์", "ค้าขาย",
    "รายได้", "เงินทอง", "ทรัพย์สิน", "เงินๆทองๆ", "คู่ทรัพย์", "คู่โชค",
];

pub const LOVE_KEYWORDS: &[&str] = &[
    "ความรัก", "รัก", "แฟน", "คู่", "ครอบครัว", "สมรส", "แต่งงาน", "หย่า", "เลิก",
    "คู่ครอง", "ครองคู่", "สามี", "ภรรยา", "เมีย", "ผัว", "พลัดพราก", "อาภัพรัก",
    "เจ้าชู้", "ชู้", "กิ๊ก", "มือที่สาม", "รักสามเศร้า", "นอกใจ", "หลอกลวง",
    "เมียน้อย", "หม้าย", "ขึ้นคาน", "อบอุ่น", "เย็นชา", "ใกล้ชิด", "ห่างเหิน",
    "สวาท", "หลงรัก", "ตกหลุมรัก", "อกหัก", "ผิดหวัง", "เสน่ห์", "ดึงดูด",
    "เพศตรงข้าม", "มีคู่", "ไร้คู่", "โสด", "ลูก", "หลาน", "บ้านแตก", "สาแหรกขาด",
    "ครอบครัวแตกแยก", "ทะเลาะ", "ปากเสียง", "เข้าใจกัน", "มีรัก", "สมหวัง",
];

pub const RULES_FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("reading keyword rules {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing keyword rules: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported keyword rules version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("keyword list for {0:?} is empty")]
    EmptyList(Aspect),
}

#[derive(Debug, Deserialize)]
struct KeywordRulesFile {
    version: u32,
    aspects: AspectMap<Vec<String>>,
}

/// Lower-cased keyword lists, one per aspect. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRules {
    keywords: AspectMap<Vec<String>>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordRules {
    pub fn builtin() -> Self {
        let lists = AspectMap {
            health: HEALTH_KEYWORDS,
            career: CAREER_KEYWORDS,
            finance: FINANCE_KEYWORDS,
            love: LOVE_KEYWORDS,
        };
        Self::from_lists(lists.map(|_, list| list.iter().map(|k| k.to_string()).collect()))
    }

    fn from_lists(lists: AspectMap<Vec<String>>) -> Self {
        Self {
            keywords: lists.map(|_, list| {
                list.iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect()
            }),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, RulesError> {
        let file: KeywordRulesFile = serde_yaml::from_str(text)?;
        if file.version != RULES_FILE_VERSION {
            return Err(RulesError::Version {
                found: file.version,
                expected: RULES_FILE_VERSION,
            });
        }
        let rules = Self::from_lists(file.aspects);
        if let Some((aspect, _)) = rules.keywords.iter().find(|(_, list)| list.is_empty()) {
            return Err(RulesError::EmptyList(aspect));
        }
        Ok(rules)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn keywords(&self, aspect: Aspect) -> &[String] {
        self.keywords.get(aspect)
    }

    /// Case-insensitive, non-overlapping occurrence count of every keyword, per aspect.
    pub fn count_matches(&self, text: &str) -> AspectMap<usize> {
        let text = text.to_lowercase();
        self.keywords
            .map(|_, list| list.iter().map(|k| text.matches(k.as_str()).count()).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_are_populated() {
        let rules = KeywordRules::builtin();
        assert_eq!(rules.keywords(Aspect::Health).len(), HEALTH_KEYWORDS.len());
        assert_eq!(rules.keywords(Aspect::Love).len(), LOVE_KEYWORDS.len());
    }

    #[test]
    fn counts_are_case_insensitive_and_non_overlapping() {
        let rules = KeywordRules::from_yaml_str(
            "version: 1\naspects:\n  health: [Gym]\n  career: [aa]\n  finance: [cash]\n  love: [x]\n",
        )
        .unwrap();
        let counts = rules.count_matches("GYM gym aaaa CASH");
        assert_eq!(counts.health, 2);
        assert_eq!(counts.career, 2);
        assert_eq!(counts.finance, 1);
        assert_eq!(counts.love, 0);
    }

    #[test]
    fn overlapping_keywords_each_count() {
        let counts = KeywordRules::builtin().count_matches("การเงิน");
        // "การเงิน" and "เงิน" both appear in the finance list.
        assert_eq!(counts.finance, 2);
    }

    #[test]
    fn yaml_rules_reject_wrong_version_and_empty_lists() {
        let wrong_version =
            "version: 2\naspects:\n  health: [a]\n  career: [b]\n  finance: [c]\n  love: [d]\n";
        assert!(matches!(
            KeywordRules::from_yaml_str(wrong_version),
            Err(RulesError::Version { found: 2, .. })
        ));

        let blank_list =
            "version: 1\naspects:\n  health: [a]\n  career: ['  ']\n  finance: [c]\n  love: [d]\n";
        assert!(matches!(
            KeywordRules::from_yaml_str(blank_list),
            Err(RulesError::EmptyList(Aspect::Career))
        ));
    }

    #[test]
    fn missing_rules_file_reports_its_path() {
        let err = KeywordRules::from_yaml_file("/nonexistent/keywords.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/keywords.yaml"));
    }
}
