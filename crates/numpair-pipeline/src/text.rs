//! Fixed Thai phrasing for pair summaries and per-aspect insights.

use numpair_core::{Aspect, AspectShares, Nature};

use crate::{MODERATE_SHARE, STRONG_SHARE};

/// Percentage band used to pick an insight sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    High,
    Medium,
    Low,
}

impl Band {
    pub const HIGH_FROM: i64 = 35;
    pub const MEDIUM_FROM: i64 = 20;

    pub fn of(percentage: i64) -> Self {
        if percentage >= Self::HIGH_FROM {
            Band::High
        } else if percentage >= Self::MEDIUM_FROM {
            Band::Medium
        } else {
            Band::Low
        }
    }
}

fn nature_prefix(nature: Nature) -> &'static str {
    match nature {
        Nature::Positive => "เลขมงคล",
        Nature::Negative => "เลขควรระวัง",
        Nature::Neutral => "เลขกลาง",
    }
}

fn nature_tone(nature: Nature) -> &'static str {
    match nature {
        Nature::Positive => "ส่งเสริม",
        Nature::Negative => "ต้องระวัง",
        Nature::Neutral => "มีทั้งดีและควรระวัง",
    }
}

/// One-line outlook for the dominant aspect.
pub fn outlook(aspect: Aspect, nature: Nature) -> &'static str {
    use Aspect::*;
    use Nature::*;
    match (aspect, nature) {
        (Health, Positive) => "สุขภาพแข็งแรง มีพลังชีวิต",
        (Health, Negative) => "ต้องระวังสุขภาพและอุบัติเหตุ",
        (Health, Neutral) => "ควรดูแลสุขภาพให้ดี",
        (Career, Positive) => "หน้าที่การงานรุ่งเรือง ประสบความสำเร็จ",
        (Career, Negative) => "การงานมีอุปสรรค ต้องฝ่าฟัน",
        (Career, Neutral) => "การงานมีขึ้นมีลง",
        (Finance, Positive) => "เงินทองไหลมาเทมา โชคลาภดี",
        (Finance, Negative) => "ต้องระวังเรื่องการเงิน หนี้สิน",
        (Finance, Neutral) => "การเงินไม่แน่นอน",
        (Love, Positive) => "ความรักราบรื่น มีคู่ครองที่ดี",
        (Love, Negative) => "ความรักไม่ราบรื่น อาจพลัดพราก",
        (Love, Neutral) => "ความรักมีทั้งสุขและทุกข์",
    }
}

/// Insight sentence for one aspect.
///
/// High and medium bands read favorably only for positive pairs; neutral pairs
/// share the cautionary wording with negative ones.
pub fn insight(aspect: Aspect, nature: Nature, percentage: i64) -> &'static str {
    use Aspect::*;
    use Band::*;
    let favorable = nature == Nature::Positive;
    match (aspect, Band::of(percentage), favorable) {
        (Health, High, true) => "พลังชีวิตสูง ร่างกายแข็งแรง อายุยืน",
        (Health, High, false) => "ต้องระวังสุขภาพ อุบัติเหตุ โรคเรื้อรัง",
        (Health, Medium, true) => "สุขภาพดี แต่ควรดูแลตัวเอง",
        (Health, Medium, false) => "มีโอกาสเจ็บป่วยบ้าง",
        (Health, Low, _) => "ไม่มีผลกระทบด้านสุขภาพมาก",
        (Career, High, true) => "การงานรุ่งเรือง มีตำแหน่งสูง ประสบความสำเร็จ",
        (Career, High, false) => "การงานมีอุปสรรค ถูกกลั่นแกล้ง ต้องระวัง",
        (Career, Medium, true) => "การงานดี มีความก้าวหน้า",
        (Career, Medium, false) => "การงานมีปัญหาบ้าง",
        (Career, Low, _) => "ไม่มีผลกระทบด้านการงานมาก",
        (Finance, High, true) => "เงินทองไหลมาเทมา ร่ำรวย มีโชคลาภ",
        (Finance, High, false) => "ต้องระวังเรื่องเงิน หนี้สิน ล้มละลาย",
        (Finance, Medium, true) => "การเงินดี มีเงินใช้ไม่ขาดมือ",
        (Finance, Medium, false) => "การเงินมีปัญหาบ้าง ต้องรอบคอบ",
        (Finance, Low, _) => "ไม่มีผลกระทบด้านการเงินมาก",
        (Love, High, true) => "ความรักราบรื่น มีเสน่ห์ มีคู่ครองที่ดี",
        (Love, High, false) => "ความรักไม่สมหวัง อาภัพรัก พลัดพราก",
        (Love, Medium, true) => "ความรักดี มีคนรักใคร่",
        (Love, Medium, false) => "ความรักมีปัญหา ต้องระวัง",
        (Love, Low, _) => "ไม่มีผลกระทบด้านความรักมาก",
    }
}

/// Short summary built from the dominant (and, when moderate, secondary) aspect.
pub fn summarize(nature: Nature, shares: &AspectShares) -> String {
    let ranked = shares.ranked();
    let (dominant, percentage) = ranked[0];
    let (secondary, _) = ranked[1];
    let prefix = nature_prefix(nature);

    if percentage >= STRONG_SHARE {
        format!(
            "{prefix} เด่นด้าน{} ({percentage}%) - {}",
            dominant.name_th(),
            outlook(dominant, nature)
        )
    } else if percentage >= MODERATE_SHARE {
        format!(
            "{prefix} เด่นด้าน{}และ{} - {}",
            dominant.name_th(),
            secondary.name_th(),
            outlook(dominant, nature)
        )
    } else {
        format!("{prefix} มีความสมดุลทุกด้าน - {}ในทุกเรื่อง", nature_tone(nature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numpair_core::AspectMap;

    fn shares(health: i64, career: i64, finance: i64, love: i64) -> AspectShares {
        AspectMap {
            health,
            career,
            finance,
            love,
        }
    }

    #[test]
    fn strong_dominant_summary_quotes_the_percentage() {
        let text = summarize(Nature::Positive, &shares(10, 10, 75, 5));
        assert_eq!(text, "เลขมงคล เด่นด้านการเงิน (75%) - เงินทองไหลมาเทมา โชคลาภดี");
    }

    #[test]
    fn moderate_dominant_summary_names_the_runner_up() {
        let text = summarize(Nature::Negative, &shares(35, 30, 20, 15));
        assert_eq!(
            text,
            "เลขควรระวัง เด่นด้านสุขภาพและการงาน - ต้องระวังสุขภาพและอุบัติเหตุ"
        );
    }

    #[test]
    fn runner_up_tie_follows_canonical_order() {
        let text = summarize(Nature::Neutral, &shares(20, 20, 20, 40));
        assert!(text.starts_with("เลขกลาง เด่นด้านความรัก (40%)"));
        let text = summarize(Nature::Neutral, &shares(25, 30, 20, 25));
        assert_eq!(text, "เลขกลาง เด่นด้านการงานและสุขภาพ - การงานมีขึ้นมีลง");
    }

    #[test]
    fn balanced_summary_uses_the_nature_tone() {
        let text = summarize(Nature::Neutral, &shares(25, 25, 25, 25));
        assert_eq!(text, "เลขกลาง มีความสมดุลทุกด้าน - มีทั้งดีและควรระวังในทุกเรื่อง");
    }

    #[test]
    fn insight_bands_split_at_35_and_20() {
        assert_eq!(Band::of(35), Band::High);
        assert_eq!(Band::of(34), Band::Medium);
        assert_eq!(Band::of(20), Band::Medium);
        assert_eq!(Band::of(19), Band::Low);
    }

    #[test]
    fn neutral_pairs_get_cautionary_insights() {
        assert_eq!(
            insight(Aspect::Love, Nature::Neutral, 50),
            insight(Aspect::Love, Nature::Negative, 50)
        );
        assert_eq!(
            insight(Aspect::Finance, Nature::Positive, 22),
            "การเงินดี มีเงินใช้ไม่ขาดมือ"
        );
        assert_eq!(insight(Aspect::Career, Nature::Positive, 0), "ไม่มีผลกระทบด้านการงานมาก");
    }
}
