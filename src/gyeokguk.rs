//! GyeokGuk (격국) structure classification.
//!
//! Rules are evaluated in a fixed priority order, first match wins: a
//! month-stem transformation combination outranks an hour-stem one, and only
//! when both are broken does the chart fall through to the eight proper
//! patterns read from the month branch's main qi.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pillars::FourPillars;
use crate::strength::BodyStrengthGrade;
use crate::tables::{
    main_qi, stem_combination, EarthlyBranch, FiveElement, HeavenlyStem, Season, TenGod,
};

// ---------------------------
// ## Pattern types
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProperPattern {
    SikSin,
    SangGwan,
    PyeonJae,
    JeongJae,
    PyeonGwan,
    JeongGwan,
    PyeonIn,
    JeongIn,
}

impl ProperPattern {
    pub fn from_ten_god(god: TenGod) -> Option<ProperPattern> {
        match god {
            TenGod::SikSin => Some(ProperPattern::SikSin),
            TenGod::SangGwan => Some(ProperPattern::SangGwan),
            TenGod::PyeonJae => Some(ProperPattern::PyeonJae),
            TenGod::JeongJae => Some(ProperPattern::JeongJae),
            TenGod::PyeonGwan => Some(ProperPattern::PyeonGwan),
            TenGod::JeongGwan => Some(ProperPattern::JeongGwan),
            TenGod::PyeonIn => Some(ProperPattern::PyeonIn),
            TenGod::JeongIn => Some(ProperPattern::JeongIn),
            TenGod::BiGyeon | TenGod::GeopJae => None,
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            ProperPattern::SikSin => "식신격",
            ProperPattern::SangGwan => "상관격",
            ProperPattern::PyeonJae => "편재격",
            ProperPattern::JeongJae => "정재격",
            ProperPattern::PyeonGwan => "편관격",
            ProperPattern::JeongGwan => "정관격",
            ProperPattern::PyeonIn => "편인격",
            ProperPattern::JeongIn => "정인격",
        }
    }
}

impl fmt::Display for ProperPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

/// A stem-combination transformation (화격), the rare structure that
/// pre-empts the proper patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationPattern {
    pub element: FiveElement,
    pub combination: (HeavenlyStem, HeavenlyStem),
    /// Combination found on the hour stem rather than the month stem.
    pub via_hour: bool,
    /// Month branch element matches the transformed element.
    pub complete: bool,
}

impl TransformationPattern {
    pub fn name(&self) -> String {
        format!("화{}격", self.element.korean())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GyeokGuk {
    Transformation(TransformationPattern),
    Proper(ProperPattern),
}

impl GyeokGuk {
    pub fn name(&self) -> String {
        match self {
            GyeokGuk::Transformation(t) => t.name(),
            GyeokGuk::Proper(p) => p.korean().to_string(),
        }
    }

    pub fn is_transformation(&self) -> bool {
        matches!(self, GyeokGuk::Transformation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GyeokGukResult {
    pub day_element: FiveElement,
    pub strength: BodyStrengthGrade,
    pub month_branch: EarthlyBranch,
    pub season: Season,
    pub pattern: GyeokGuk,
    pub rationale: String,
}

// ---------------------------
// ## Classification
// ---------------------------

enum ComboStatus {
    Complete,
    Incomplete,
    Broken,
}

fn combo_status(
    pillars: &FourPillars,
    partner: HeavenlyStem,
    transformed: FiveElement,
) -> ComboStatus {
    if pillars.month.branch.element() == transformed {
        return ComboStatus::Complete;
    }
    // Opposition check over every visible token except the two combining
    // stems themselves (a 갑기 pair would otherwise always self-break 토).
    let day = pillars.day_stem();
    let stem_elements = pillars
        .stems()
        .into_iter()
        .filter(|&s| s != day && s != partner)
        .map(|s| s.element());
    let branch_elements = pillars.branches().into_iter().map(|b| b.element());
    if stem_elements
        .chain(branch_elements)
        .any(|e| e.controls() == transformed)
    {
        ComboStatus::Broken
    } else {
        ComboStatus::Incomplete
    }
}

/// Classifies the chart structure. `strength` is carried into the result for
/// downstream consumers and the rationale text.
pub fn classify(pillars: &FourPillars, strength: BodyStrengthGrade) -> GyeokGukResult {
    let day = pillars.day_stem();
    let month_branch = pillars.month.branch;
    let season = month_branch.season();

    // Ordered transformation candidates: month stem first, hour stem second.
    let candidates = [
        (pillars.month.stem, false),
        (pillars.hour.stem, true),
    ];
    for (partner, via_hour) in candidates {
        let Some(transformed) = stem_combination(day, partner) else {
            continue;
        };
        match combo_status(pillars, partner, transformed) {
            ComboStatus::Complete => {
                let pattern = TransformationPattern {
                    element: transformed,
                    combination: (day, partner),
                    via_hour,
                    complete: true,
                };
                let rationale = format!(
                    "{}간 {}이(가) 일간 {}과 합하여 {}로 화하고, 월지 {}이(가) {} 기운이므로 {}이 완전하게 성립한다.{}",
                    if via_hour { "시" } else { "월" },
                    partner,
                    day,
                    transformed,
                    month_branch,
                    transformed,
                    pattern.name(),
                    if via_hour {
                        " 시간 합은 월간 합보다 후순위로 본다."
                    } else {
                        ""
                    }
                );
                return GyeokGukResult {
                    day_element: day.element(),
                    strength,
                    month_branch,
                    season,
                    pattern: GyeokGuk::Transformation(pattern),
                    rationale,
                };
            }
            ComboStatus::Incomplete => {
                let pattern = TransformationPattern {
                    element: transformed,
                    combination: (day, partner),
                    via_hour,
                    complete: false,
                };
                let rationale = format!(
                    "{}간 {}이(가) 일간 {}과 합하여 {}로 화하나, 월지 {}은(는) {} 계절이라 {}이 불완전하게 성립한다.",
                    if via_hour { "시" } else { "월" },
                    partner,
                    day,
                    transformed,
                    month_branch,
                    season,
                    pattern.name(),
                );
                return GyeokGukResult {
                    day_element: day.element(),
                    strength,
                    month_branch,
                    season,
                    pattern: GyeokGuk::Transformation(pattern),
                    rationale,
                };
            }
            ComboStatus::Broken => {}
        }
    }

    let (pattern, deciding) = proper_pattern(pillars);
    let rationale = format!(
        "월지 {}의 본기 {}을(를) 일간 {} 기준 십성으로 보아 {}으로 정한다.",
        month_branch,
        deciding,
        day,
        pattern.korean(),
    );
    GyeokGukResult {
        day_element: day.element(),
        strength,
        month_branch,
        season,
        pattern: GyeokGuk::Proper(pattern),
        rationale,
    }
}

/// Proper pattern from the month branch's main qi. A peer main qi (비견/겁재)
/// defers to the next-strongest hidden stem, then to the strongest non-peer
/// visible stem, then to the resource pattern.
fn proper_pattern(pillars: &FourPillars) -> (ProperPattern, HeavenlyStem) {
    let day = pillars.day_stem();
    let qi = main_qi(pillars.month.branch);
    if let Some(pattern) = ProperPattern::from_ten_god(TenGod::classify(day, qi)) {
        return (pattern, qi);
    }

    let next = crate::tables::hidden_stems(pillars.month.branch)
        .iter()
        .filter(|&&(s, _)| s.element() != day.element())
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|&(s, _)| s);
    if let Some(stem) = next {
        if let Some(pattern) = ProperPattern::from_ten_god(TenGod::classify(day, stem)) {
            return (pattern, stem);
        }
    }

    let visible = [pillars.year.stem, pillars.month.stem, pillars.hour.stem]
        .into_iter()
        .find(|&s| s.element() != day.element());
    if let Some(stem) = visible {
        if let Some(pattern) = ProperPattern::from_ten_god(TenGod::classify(day, stem)) {
            return (pattern, stem);
        }
    }

    (ProperPattern::PyeonIn, day)
}
