//! 용신/기신 (useful and harmful element) resolution.
//!
//! Three independent sub-theories are computed and composed: suppression and
//! support keyed on the body-strength grade, a seasonal adjustment, and the
//! mediating element for the first structural clash between dominant
//! elements.

use serde::{Deserialize, Serialize};

use crate::elements::ElementBalance;
use crate::pillars::FourPillars;
use crate::strength::{BodyStrength, BodyStrengthGrade};
use crate::tables::{lucky_attributes, FiveElement, Season};

/// Weighted count a single element needs before it participates in the
/// clash/mediation scan.
pub const CLASH_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementAdvice {
    pub elements: Vec<FiveElement>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAdvice {
    pub element: Option<FiveElement>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediatingClash {
    pub controller: FiveElement,
    pub controlled: FiveElement,
    pub mediator: FiveElement,
    pub reason: String,
}

/// Colors/directions/numbers associated with an element set, deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LuckyProfile {
    pub colors: Vec<&'static str>,
    pub directions: Vec<&'static str>,
    pub numbers: Vec<u8>,
}

impl LuckyProfile {
    fn for_elements(elements: &[FiveElement]) -> LuckyProfile {
        let mut profile = LuckyProfile {
            colors: Vec::new(),
            directions: Vec::new(),
            numbers: Vec::new(),
        };
        for &element in elements {
            let attrs = lucky_attributes(element);
            for color in attrs.colors {
                if !profile.colors.contains(&color) {
                    profile.colors.push(color);
                }
            }
            if !profile.directions.contains(&attrs.direction) {
                profile.directions.push(attrs.direction);
            }
            for n in attrs.numbers {
                if !profile.numbers.contains(&n) {
                    profile.numbers.push(n);
                }
            }
        }
        profile
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YongSinResult {
    pub favorable: ElementAdvice,
    pub unfavorable: ElementAdvice,
    pub seasonal: SeasonalAdvice,
    pub mediating: Option<MediatingClash>,
    pub recommendation: String,
    pub lucky: LuckyProfile,
    pub unlucky: LuckyProfile,
}

/// Suppression/support theory (억부론): the strong are drained or opposed,
/// the weak are fed.
fn suppression_support(day: FiveElement, grade: BodyStrengthGrade) -> (ElementAdvice, ElementAdvice) {
    let output = day.produces();
    let officer = day.controlled_by();
    let wealth = day.controls();
    let resource = day.produced_by();

    match grade {
        BodyStrengthGrade::VeryStrong => (
            ElementAdvice {
                elements: vec![officer, output, wealth],
                reason: format!(
                    "극신강한 {} 일간은 우선 {}의 극으로 눌러주고, {}·{}로 기운을 덜어낸다.",
                    day.korean(),
                    officer.korean(),
                    output.korean(),
                    wealth.korean()
                ),
            },
            ElementAdvice {
                elements: vec![day, resource],
                reason: format!(
                    "{}을 더 키우는 {}·{}은 피한다.",
                    day.korean(),
                    day.korean(),
                    resource.korean()
                ),
            },
        ),
        BodyStrengthGrade::Strong => (
            ElementAdvice {
                elements: vec![output, officer, wealth],
                reason: format!(
                    "신강한 {} 일간은 {}로 설기하고 {}·{}로 다스린다.",
                    day.korean(),
                    output.korean(),
                    officer.korean(),
                    wealth.korean()
                ),
            },
            ElementAdvice {
                elements: vec![day, resource],
                reason: format!(
                    "{}을 더 키우는 {}·{}은 피한다.",
                    day.korean(),
                    day.korean(),
                    resource.korean()
                ),
            },
        ),
        BodyStrengthGrade::Balanced => (
            ElementAdvice {
                elements: Vec::new(),
                reason: "중화된 사주라 특별히 더할 오행이 없다.".to_string(),
            },
            ElementAdvice {
                elements: Vec::new(),
                reason: "중화된 사주라 특별히 꺼릴 오행이 없다.".to_string(),
            },
        ),
        BodyStrengthGrade::Weak | BodyStrengthGrade::VeryWeak => (
            ElementAdvice {
                elements: vec![resource, day],
                reason: format!(
                    "신약한 {} 일간은 {}의 생조와 {} 비겁의 도움이 필요하다.",
                    day.korean(),
                    resource.korean(),
                    day.korean()
                ),
            },
            ElementAdvice {
                elements: vec![output, wealth, officer],
                reason: format!(
                    "기운을 빼앗는 {}·{}·{}은 피한다.",
                    output.korean(),
                    wealth.korean(),
                    officer.korean()
                ),
            },
        ),
    }
}

/// Seasonal-adjustment theory (조후론).
fn seasonal_adjustment(season: Season, day: FiveElement) -> SeasonalAdvice {
    match season {
        Season::Winter => SeasonalAdvice {
            element: Some(FiveElement::Fire),
            reason: "겨울 출생은 화 기운으로 한기를 덥혀야 한다.".to_string(),
        },
        Season::Summer => SeasonalAdvice {
            element: Some(FiveElement::Water),
            reason: "여름 출생은 수 기운으로 열기를 식혀야 한다.".to_string(),
        },
        Season::Autumn => {
            if day == FiveElement::Metal {
                SeasonalAdvice {
                    element: Some(FiveElement::Fire),
                    reason: "가을 금 일간은 화 기운으로 단련해야 한다.".to_string(),
                }
            } else {
                SeasonalAdvice {
                    element: Some(FiveElement::Water),
                    reason: "가을 출생은 수 기운으로 맑게 흐르게 한다.".to_string(),
                }
            }
        }
        Season::Spring => SeasonalAdvice {
            element: None,
            reason: "봄 출생은 조후의 필요가 크지 않다.".to_string(),
        },
    }
}

/// Mediating-element theory (통관론): the first controlling pair among
/// dominant elements, bridged along the producing cycle.
fn mediation(balance: &ElementBalance) -> Option<MediatingClash> {
    let dominant = balance.at_least(CLASH_THRESHOLD);
    for &a in &dominant {
        for &b in &dominant {
            if a.controls() == b {
                let mediator = a.produces();
                return Some(MediatingClash {
                    controller: a,
                    controlled: b,
                    mediator,
                    reason: format!(
                        "{}이(가) {}을(를) 극하니 {} 기운으로 통관시킨다.",
                        a.korean(),
                        b.korean(),
                        mediator.korean()
                    ),
                });
            }
        }
    }
    None
}

pub fn resolve(
    pillars: &FourPillars,
    strength: &BodyStrength,
    weighted: &ElementBalance,
) -> YongSinResult {
    let day = pillars.day_stem().element();
    let season = pillars.month.branch.season();

    let (favorable, unfavorable) = suppression_support(day, strength.grade);
    let seasonal = seasonal_adjustment(season, day);
    let mediating = mediation(weighted);

    let mut recommendation = String::new();
    recommendation.push_str(&favorable.reason);
    recommendation.push(' ');
    recommendation.push_str(&seasonal.reason);
    if let Some(clash) = &mediating {
        recommendation.push(' ');
        recommendation.push_str(&clash.reason);
    }

    let lucky = LuckyProfile::for_elements(&favorable.elements);
    let unlucky = LuckyProfile::for_elements(&unfavorable.elements);

    YongSinResult {
        favorable,
        unfavorable,
        seasonal,
        mediating,
        recommendation,
        lucky,
        unlucky,
    }
}
