//! Fortune-cycle sequences: the ten-year 대운 and the annual 세운.
//!
//! Both are pure functions of the chart, gender, birth timing and the
//! useful/harmful element sets. Dates step through the sexagenary cycle with
//! plain modular arithmetic; three days to the nearest month-opening term
//! equal one year of starting age.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{jeol_after, jeol_on_or_before, TermProvider};
use crate::pillars::FourPillars;
use crate::tables::{stem_combination, FiveElement, Polarity, SexagenaryPair};
use crate::yongsin::YongSinResult;
use crate::Gender;

/// Days of solar-term distance per year of starting age.
pub const DAYS_PER_YEAR: f64 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleDirection {
    Forward,
    Backward,
}

impl CycleDirection {
    pub fn offset(self) -> i64 {
        match self {
            CycleDirection::Forward => 1,
            CycleDirection::Backward => -1,
        }
    }
}

/// Forward when day-stem polarity and gender agree (yang+male or yin+female).
pub fn direction(pillars: &FourPillars, gender: Gender) -> CycleDirection {
    let yang = pillars.day_stem().polarity() == Polarity::Yang;
    let male = gender == Gender::Male;
    if yang == male {
        CycleDirection::Forward
    } else {
        CycleDirection::Backward
    }
}

/// Favorability of one cycle pair against the resolved element sets: the
/// stem and branch elements each add or subtract one point.
fn score_pair(pair: SexagenaryPair, yongsin: &YongSinResult) -> i32 {
    let mut score = 0;
    for element in [pair.stem.element(), pair.branch.element()] {
        if yongsin.favorable.elements.contains(&element) {
            score += 1;
        }
        if yongsin.unfavorable.elements.contains(&element) {
            score -= 1;
        }
    }
    score
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaewoonItem {
    pub sequence: u32,
    pub start_age: u32,
    pub end_age: u32,
    pub pair: SexagenaryPair,
    pub element: FiveElement,
    pub score: i32,
    pub favorable: bool,
    pub unfavorable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Daewoon {
    pub direction: CycleDirection,
    pub start_age: u32,
    pub items: Vec<DaewoonItem>,
}

/// Builds `count` decade items. The sequence steps the month pillar through
/// the cycle in the chosen direction; the start age is the solar-term
/// distance in that direction divided by three days, rounded, floored at 1.
pub fn daewoon(
    provider: &dyn TermProvider,
    birth: NaiveDate,
    pillars: &FourPillars,
    gender: Gender,
    yongsin: &YongSinResult,
    count: usize,
) -> Daewoon {
    let dir = direction(pillars, gender);
    let days = match dir {
        CycleDirection::Forward => (jeol_after(provider, birth).date - birth).num_days(),
        CycleDirection::Backward => (birth - jeol_on_or_before(provider, birth).date).num_days(),
    };
    let start_age = ((days as f64 / DAYS_PER_YEAR).round() as u32).max(1);

    let items = (0..count)
        .map(|i| {
            let pair = pillars.month.step(dir.offset() * (i as i64 + 1));
            let score = score_pair(pair, yongsin);
            let start = start_age + 10 * i as u32;
            DaewoonItem {
                sequence: i as u32 + 1,
                start_age: start,
                end_age: start + 9,
                pair,
                element: pair.element(),
                score,
                favorable: score > 0,
                unfavorable: score < 0,
            }
        })
        .collect();

    Daewoon {
        direction: dir,
        start_age,
        items,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SewoonItem {
    pub year: i32,
    pub pair: SexagenaryPair,
    pub element: FiveElement,
    pub score: i32,
    pub favorable: bool,
    pub unfavorable: bool,
    /// Combination or clash against the decade item active that year.
    pub daewoon_note: Option<String>,
}

/// Sexagenary pair of a calendar year (1984 = 갑자).
pub fn year_pair(year: i32) -> SexagenaryPair {
    SexagenaryPair::from_index((year - 1984) as i64)
}

/// One item per year of `[from, from + count)`. Ages are counted in the
/// Korean manner (birth year = age 1) to locate the active decade item.
pub fn sewoon(
    birth_year: i32,
    daewoon: &Daewoon,
    yongsin: &YongSinResult,
    from: i32,
    count: usize,
) -> Vec<SewoonItem> {
    (0..count as i32)
        .map(|offset| {
            let year = from + offset;
            let pair = year_pair(year);
            let score = score_pair(pair, yongsin);
            let age = year - birth_year + 1;
            let active = daewoon
                .items
                .iter()
                .find(|item| age >= item.start_age as i32 && age <= item.end_age as i32);
            let daewoon_note = active.and_then(|item| interaction(pair, item.pair));
            SewoonItem {
                year,
                pair,
                element: pair.element(),
                score,
                favorable: score > 0,
                unfavorable: score < 0,
                daewoon_note,
            }
        })
        .collect()
}

fn interaction(sewoon: SexagenaryPair, daewoon: SexagenaryPair) -> Option<String> {
    if let Some(element) = stem_combination(sewoon.stem, daewoon.stem) {
        return Some(format!(
            "세운 천간 {}이(가) 대운 천간 {}과 합하여 {} 기운을 이룬다.",
            sewoon.stem, daewoon.stem, element
        ));
    }
    if sewoon.branch.clash() == daewoon.branch {
        return Some(format!(
            "세운 지지 {}이(가) 대운 지지 {}과 충한다.",
            sewoon.branch, daewoon.branch
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DirectTerms;
    use crate::elements::ElementBalance;
    use crate::pillars::build;
    use crate::strength;
    use crate::yongsin;

    fn fixture() -> (NaiveDate, FourPillars, YongSinResult) {
        let birth = NaiveDate::from_ymd_opt(1990, 3, 15).unwrap();
        let pillars = build(&DirectTerms, birth.and_hms_opt(12, 30, 0).unwrap());
        let str_ = strength::evaluate(&pillars);
        let weighted = ElementBalance::weighted(&pillars);
        let ys = yongsin::resolve(&pillars, &str_, &weighted);
        (birth, pillars, ys)
    }

    #[test]
    fn direction_is_polarity_xor_gender() {
        let (_, pillars, _) = fixture();
        // 기 is a yin day stem
        assert_eq!(direction(&pillars, Gender::Male), CycleDirection::Backward);
        assert_eq!(direction(&pillars, Gender::Female), CycleDirection::Forward);
    }

    #[test]
    fn reversing_gender_flips_direction_for_any_chart() {
        for date in [
            NaiveDate::from_ymd_opt(1990, 3, 15).unwrap(),
            NaiveDate::from_ymd_opt(1984, 2, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ] {
            let pillars = build(&DirectTerms, date.and_hms_opt(10, 0, 0).unwrap());
            assert_ne!(
                direction(&pillars, Gender::Male),
                direction(&pillars, Gender::Female)
            );
        }
    }

    #[test]
    fn backward_start_age_counts_to_the_previous_jeol() {
        let (birth, pillars, ys) = fixture();
        // 경칩 1990 fell on March 6th: nine days back, so age 3
        let dw = daewoon(&DirectTerms, birth, &pillars, Gender::Male, &ys, 4);
        assert_eq!(dw.start_age, 3);
        assert_eq!(dw.items[0].pair.to_string(), "무인");
        assert_eq!(dw.items[1].pair.to_string(), "정축");
        assert_eq!(dw.items[0].start_age, 3);
        assert_eq!(dw.items[0].end_age, 12);
        assert_eq!(dw.items[1].start_age, 13);
    }

    #[test]
    fn forward_start_age_counts_to_the_next_jeol() {
        let (birth, pillars, ys) = fixture();
        // 청명 1990 fell on April 5th: 21 days ahead, so age 7
        let dw = daewoon(&DirectTerms, birth, &pillars, Gender::Female, &ys, 4);
        assert_eq!(dw.start_age, 7);
        assert_eq!(dw.items[0].pair.to_string(), "경진");
    }

    #[test]
    fn start_age_is_floored_at_one() {
        // born the day after 경칩: backward distance 1 day rounds to 0, floors to 1
        let birth = NaiveDate::from_ymd_opt(1990, 3, 7).unwrap();
        let pillars = build(&DirectTerms, birth.and_hms_opt(10, 0, 0).unwrap());
        let ys = {
            let s = strength::evaluate(&pillars);
            let w = ElementBalance::weighted(&pillars);
            yongsin::resolve(&pillars, &s, &w)
        };
        let gender = match direction(&pillars, Gender::Male) {
            CycleDirection::Backward => Gender::Male,
            CycleDirection::Forward => Gender::Female,
        };
        let dw = daewoon(&DirectTerms, birth, &pillars, gender, &ys, 1);
        assert_eq!(dw.start_age, 1);
    }

    #[test]
    fn sewoon_year_pairs_follow_the_epoch() {
        assert_eq!(year_pair(1984).to_string(), "갑자");
        assert_eq!(year_pair(2024).to_string(), "갑진");
        assert_eq!(year_pair(1983).to_string(), "계해");
    }

    #[test]
    fn sewoon_scores_against_the_element_sets() {
        let (birth, pillars, ys) = fixture();
        let dw = daewoon(&DirectTerms, birth, &pillars, Gender::Male, &ys, 8);
        let items = sewoon(birth.year(), &dw, &ys, 2020, 5);
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].year, 2024);
        assert_eq!(items[4].pair.to_string(), "갑진");
        for item in &items {
            assert_eq!(item.favorable, item.score > 0);
            assert_eq!(item.unfavorable, item.score < 0);
        }
    }
}
