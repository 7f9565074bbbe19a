//! Core domain model for number-pair meaning documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const CRATE_NAME: &str = "numpair-core";

pub const DOCUMENT_VERSION: &str = "1.0";
pub const NUMBERS_DESCRIPTION: &str =
    "Number pair meanings with aspect percentages for ช้อยนิยม พยากรณ์";
pub const TELEPHONE_DESCRIPTION: &str = "ประเภทเบอร์โทรศัพท์ที่เสริมแต่ละด้าน";
pub const USAGE_TH: &str =
    "เลือกเบอร์โทรที่มีคู่เลขในหมวดที่ต้องการเสริม จะช่วยเพิ่ม % ในด้านนั้นอย่างมีนัยสำคัญ";
pub const USAGE_EXAMPLE: &str =
    "ถ้าต้องการเสริมด้านการเงิน ควรเลือกเบอร์ที่มีคู่เลข 24, 42, 19, 91 เป็นต้น";

/// Life domain a pair's description is scored against.
///
/// Declaration order is the canonical order: it fixes JSON key order and
/// resolves every tie between equal percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Health,
    Career,
    Finance,
    Love,
}

impl Aspect {
    pub const ALL: [Aspect; 4] = [Aspect::Health, Aspect::Career, Aspect::Finance, Aspect::Love];

    pub fn key(self) -> &'static str {
        match self {
            Aspect::Health => "health",
            Aspect::Career => "career",
            Aspect::Finance => "finance",
            Aspect::Love => "love",
        }
    }

    /// Short Thai name, used inside sentences ("เด่นด้าน{name}").
    pub fn name_th(self) -> &'static str {
        match self {
            Aspect::Health => "สุขภาพ",
            Aspect::Career => "การงาน",
            Aspect::Finance => "การเงิน",
            Aspect::Love => "ความรัก",
        }
    }

    /// Thai heading shown next to a percentage.
    pub fn label_th(self) -> &'static str {
        match self {
            Aspect::Health => "ด้านสุขภาพ",
            Aspect::Career => "ด้านการงาน",
            Aspect::Finance => "ด้านการเงิน",
            Aspect::Love => "ด้านความรัก",
        }
    }

    pub fn label_en(self) -> &'static str {
        match self {
            Aspect::Health => "Health",
            Aspect::Career => "Career",
            Aspect::Finance => "Finance",
            Aspect::Love => "Love",
        }
    }
}

/// Exactly one value per aspect, serialized in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AspectMap<T> {
    pub health: T,
    pub career: T,
    pub finance: T,
    pub love: T,
}

impl<T> AspectMap<T> {
    pub fn from_fn(mut f: impl FnMut(Aspect) -> T) -> Self {
        Self {
            health: f(Aspect::Health),
            career: f(Aspect::Career),
            finance: f(Aspect::Finance),
            love: f(Aspect::Love),
        }
    }

    pub fn get(&self, aspect: Aspect) -> &T {
        match aspect {
            Aspect::Health => &self.health,
            Aspect::Career => &self.career,
            Aspect::Finance => &self.finance,
            Aspect::Love => &self.love,
        }
    }

    pub fn get_mut(&mut self, aspect: Aspect) -> &mut T {
        match aspect {
            Aspect::Health => &mut self.health,
            Aspect::Career => &mut self.career,
            Aspect::Finance => &mut self.finance,
            Aspect::Love => &mut self.love,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Aspect, &T)> {
        Aspect::ALL.into_iter().map(move |aspect| (aspect, self.get(aspect)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Aspect, &T) -> U) -> AspectMap<U> {
        AspectMap::from_fn(|aspect| f(aspect, self.get(aspect)))
    }
}

impl<T: Copy + Ord> AspectMap<T> {
    /// Aspects ordered by value, highest first; equal values keep canonical order.
    pub fn ranked(&self) -> Vec<(Aspect, T)> {
        let mut ranked: Vec<(Aspect, T)> = self.iter().map(|(a, v)| (a, *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Highest value; the earliest aspect in canonical order wins a tie.
    pub fn dominant(&self) -> (Aspect, T) {
        let mut best = (Aspect::Health, self.health);
        for (aspect, value) in self.iter().skip(1) {
            if *value > best.1 {
                best = (aspect, *value);
            }
        }
        best
    }
}

/// Percentage per aspect. Generated shares always sum to 100.
pub type AspectShares = AspectMap<i64>;

/// Coarse favorability derived from a pair's point score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Nature {
    pub const POSITIVE_THRESHOLD: i64 = 50;
    pub const NEGATIVE_THRESHOLD: i64 = -50;

    pub fn from_pairpoint(pairpoint: Option<i64>) -> Self {
        match pairpoint {
            Some(p) if p >= Self::POSITIVE_THRESHOLD => Nature::Positive,
            Some(p) if p <= Self::NEGATIVE_THRESHOLD => Nature::Negative,
            _ => Nature::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Nature::Positive => "positive",
            Nature::Negative => "negative",
            Nature::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AspectDetail {
    pub th: String,
    pub percentage: i64,
    pub insight: String,
}

/// One enriched pair as stored in `numbers.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberPairRecord {
    pub pairnumber: String,
    pub pairtype: String,
    pub pairpoint: i64,
    pub nature: Nature,
    pub summary: String,
    pub miracledesc: String,
    pub detail_vip: String,
    pub miracledetail: String,
    pub aspects: AspectMap<AspectDetail>,
}

impl NumberPairRecord {
    pub fn shares(&self) -> AspectShares {
        self.aspects.map(|_, detail| detail.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectLabel {
    pub th: String,
    pub en: String,
}

/// `numbers.json`: every pair keyed by its pair number, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumbersDocument {
    pub version: String,
    pub description: String,
    #[serde(rename = "aspectLabels")]
    pub aspect_labels: AspectMap<AspectLabel>,
    pub numbers: IndexMap<String, NumberPairRecord>,
}

impl NumbersDocument {
    pub fn new(numbers: IndexMap<String, NumberPairRecord>) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            description: NUMBERS_DESCRIPTION.to_string(),
            aspect_labels: AspectMap::from_fn(|aspect| AspectLabel {
                th: aspect.label_th().to_string(),
                en: aspect.label_en().to_string(),
            }),
            numbers,
        }
    }
}

/// Lightweight view of a pair placed in a category bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSummary {
    pub pair: String,
    pub percentage: i64,
    pub nature: Nature,
    pub pairpoint: i64,
    pub summary: String,
}

impl PairSummary {
    /// Eligible for recommendation: positive, or neutral with a non-negative point.
    pub fn is_recommendable(&self) -> bool {
        match self.nature {
            Nature::Positive => true,
            Nature::Neutral => self.pairpoint >= 0,
            Nature::Negative => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryBucket {
    pub strong_pairs: Vec<PairSummary>,
    pub moderate_pairs: Vec<PairSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecommendation {
    pub th: String,
    pub description: String,
    pub best_pairs: Vec<String>,
    pub details: Vec<PairSummary>,
    pub total_strong: usize,
    pub total_moderate: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageNote {
    pub th: String,
    pub example: String,
}

impl Default for UsageNote {
    fn default() -> Self {
        Self {
            th: USAGE_TH.to_string(),
            example: USAGE_EXAMPLE.to_string(),
        }
    }
}

/// `telephone_type.json`: curated pairs per aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelephoneTypeDocument {
    pub version: String,
    pub description: String,
    pub categories: AspectMap<CategoryRecommendation>,
    pub usage: UsageNote,
}

impl TelephoneTypeDocument {
    pub fn new(categories: AspectMap<CategoryRecommendation>) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            description: TELEPHONE_DESCRIPTION.to_string(),
            categories,
            usage: UsageNote::default(),
        }
    }
}
