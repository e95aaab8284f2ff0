//! Four-pillars construction from a resolved solar birth instant.
//!
//! Day pillars ride a fixed epoch offset through the 60-cycle; year pillars
//! flip at 입춘 rather than January 1st; month pillars follow the
//! month-opening solar terms; hour pillars divide the day into twelve
//! two-hour slots starting at 23:00 with the night-자 rule at the boundary.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{ipchun, jeol_on_or_before, TermProvider};
use crate::tables::{
    first_hour_stem, first_month_stem, EarthlyBranch, HeavenlyStem, SexagenaryPair,
};

/// 1970-01-01 is cycle position 17 (신사일); anchors the day pillar.
const UNIX_EPOCH_DAY_INDEX: i64 = 17;

/// 1984 opened a cycle with 갑자년; anchors the year pillar.
const EPOCH_YEAR: i32 = 1984;

/// Year/month/day/hour sexagenary pairs of one birth instant. Built once,
/// immutable, consumed by every downstream analysis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FourPillars {
    pub year: SexagenaryPair,
    pub month: SexagenaryPair,
    pub day: SexagenaryPair,
    pub hour: SexagenaryPair,
}

impl FourPillars {
    pub fn pairs(&self) -> [SexagenaryPair; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    pub fn stems(&self) -> [HeavenlyStem; 4] {
        [
            self.year.stem,
            self.month.stem,
            self.day.stem,
            self.hour.stem,
        ]
    }

    pub fn branches(&self) -> [EarthlyBranch; 4] {
        [
            self.year.branch,
            self.month.branch,
            self.day.branch,
            self.hour.branch,
        ]
    }

    pub fn day_stem(&self) -> HeavenlyStem {
        self.day.stem
    }
}

impl fmt::Display for FourPillars {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}년 {}월 {}일 {}시",
            self.year, self.month, self.day, self.hour
        )
    }
}

/// Day pillar of a solar calendar date.
pub fn day_pillar(date: NaiveDate) -> SexagenaryPair {
    let days = (date - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days();
    SexagenaryPair::from_index(days + UNIX_EPOCH_DAY_INDEX)
}

/// Year pillar, with the 입춘 boundary: solar dates before that year's start
/// of spring belong to the previous sexagenary year.
pub fn year_pillar(provider: &dyn TermProvider, date: NaiveDate) -> SexagenaryPair {
    SexagenaryPair::from_index((effective_year(provider, date) - EPOCH_YEAR) as i64)
}

fn effective_year(provider: &dyn TermProvider, date: NaiveDate) -> i32 {
    if date < ipchun(provider, date.year()) {
        date.year() - 1
    } else {
        date.year()
    }
}

/// Month pillar from the month-opening term in effect, stem via the
/// five-tiger correspondence from the (effective) year stem.
pub fn month_pillar(provider: &dyn TermProvider, date: NaiveDate) -> SexagenaryPair {
    let jeol = jeol_on_or_before(provider, date);
    let branch = jeol.month_branch().unwrap();
    // months count from 인월 = 0
    let month_offset = (branch.index() + 12 - EarthlyBranch::In.index()) % 12;
    let year_stem = year_pillar(provider, date).stem;
    let stem =
        HeavenlyStem::from_index((first_month_stem(year_stem).index() + month_offset) % 10)
            .unwrap();
    SexagenaryPair { stem, branch }
}

/// Hour pillar. Slots are two hours wide starting at 23:00 (자시); births in
/// [23:00, 24:00) take the *next* day's stem for the five-rat derivation
/// while [00:00, 01:00) keeps the current day's — a documented policy, not
/// settled doctrine.
pub fn hour_pillar(datetime: NaiveDateTime) -> SexagenaryPair {
    let hour = datetime.hour();
    let slot = ((hour + 1) / 2) as usize % 12;
    let stem_date = if hour == 23 {
        datetime.date() + chrono::Duration::days(1)
    } else {
        datetime.date()
    };
    let day_stem = day_pillar(stem_date).stem;
    let stem = HeavenlyStem::from_index((first_hour_stem(day_stem).index() + slot) % 10).unwrap();
    SexagenaryPair {
        stem,
        branch: EarthlyBranch::from_index(slot).unwrap(),
    }
}

/// Builds all four pillars for a resolved solar birth instant.
pub fn build(provider: &dyn TermProvider, solar: NaiveDateTime) -> FourPillars {
    let date = solar.date();
    FourPillars {
        year: year_pillar(provider, date),
        month: month_pillar(provider, date),
        day: day_pillar(date),
        hour: hour_pillar(solar),
    }
}
