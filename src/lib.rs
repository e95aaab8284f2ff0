//! 사주팔자 computation core.
//!
//! Resolves a birth instant to the solar calendar, erects the four sexagenary
//! pillars, and derives the classical readings on top of them: element
//! balances, body strength, 격국 classification, 용신/기신 resolution, the
//! 대운/세운 fortune cycles and the 신살 pattern battery. [`CompleteResult`]
//! bundles every stage into one serializable report.
//!
//! ```no_run
//! use saju_core::{compute_complete_chart, Gender, SajuInput};
//!
//! let input = SajuInput {
//!     year: 1990,
//!     month: 3,
//!     day: 15,
//!     hour: 12,
//!     minute: Some(30),
//!     gender: Gender::Male,
//!     ..SajuInput::default()
//! };
//! let result = compute_complete_chart(&input).unwrap();
//! println!("{}", result.pillars);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod calendar;
pub mod cycles;
pub mod elements;
pub mod gyeokguk;
pub mod pillars;
pub mod sinsal;
pub mod strength;
pub mod tables;
pub mod yongsin;

pub use calendar::{
    resolve_birth, Degradation, LunarSolarConverter, ResolvedBirth, SolarTerm, TermProvider,
    UnsupportedConverter,
};
pub use cycles::{Daewoon, DaewoonItem, SewoonItem};
pub use elements::ElementBalance;
pub use gyeokguk::{GyeokGuk, GyeokGukResult};
pub use pillars::FourPillars;
pub use sinsal::{SinsalReport, SinsalResult};
pub use strength::{BodyStrength, BodyStrengthGrade};
pub use tables::{EarthlyBranch, FiveElement, HeavenlyStem, SexagenaryPair, TenGod};
pub use yongsin::YongSinResult;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decade items generated per chart.
pub const DAEWOON_COUNT: usize = 8;

/// Annual items generated per chart, starting from the current year.
pub const SEWOON_COUNT: usize = 10;

// ---------------------------
// ## Input
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Male
    }
}

/// Raw birth data as the caller knows it. Dates may be lunar; the resolver
/// normalizes everything to the solar calendar before any pillar arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SajuInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Clock hour 0..=23.
    pub hour: u32,
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub gender: Gender,
    /// The year/month/day above are on the lunar calendar.
    #[serde(default)]
    pub is_lunar: bool,
    #[serde(default)]
    pub is_leap_month: bool,
    /// Apply the longitude-based true-solar-time correction.
    #[serde(default)]
    pub use_true_solar_time: bool,
    /// City name for the correction; unknown names fall back to the
    /// standard meridian.
    #[serde(default)]
    pub birth_place: Option<String>,
}

impl SajuInput {
    pub fn validate(&self) -> Result<(), SajuError> {
        if !(1..=12).contains(&self.month) {
            return Err(SajuError::Validation(format!(
                "month out of range: {}",
                self.month
            )));
        }
        if !(1..=31).contains(&self.day) {
            return Err(SajuError::Validation(format!(
                "day out of range: {}",
                self.day
            )));
        }
        if self.hour > 23 {
            return Err(SajuError::Validation(format!(
                "hour out of range: {}",
                self.hour
            )));
        }
        if let Some(minute) = self.minute {
            if minute > 59 {
                return Err(SajuError::Validation(format!(
                    "minute out of range: {minute}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SajuError {
    #[error("invalid input: {0}")]
    Validation(String),
}

// ---------------------------
// ## Engine
// ---------------------------

/// Shared computation context: the injected lunar-calendar collaborator and a
/// per-year memo of the solar-term table.
pub struct SajuEngine {
    converter: Box<dyn LunarSolarConverter>,
    term_cache: Mutex<HashMap<i32, Vec<SolarTerm>>>,
}

impl SajuEngine {
    pub fn new() -> Self {
        Self::with_converter(Box::new(UnsupportedConverter))
    }

    pub fn with_converter(converter: Box<dyn LunarSolarConverter>) -> Self {
        SajuEngine {
            converter,
            term_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn converter(&self) -> &dyn LunarSolarConverter {
        self.converter.as_ref()
    }
}

impl Default for SajuEngine {
    fn default() -> Self {
        SajuEngine::new()
    }
}

impl TermProvider for SajuEngine {
    fn terms(&self, year: i32) -> Vec<SolarTerm> {
        let mut cache = self.term_cache.lock().unwrap();
        cache
            .entry(year)
            .or_insert_with(|| calendar::solar_terms(year))
            .clone()
    }
}

// ---------------------------
// ## Complete result
// ---------------------------

/// Every derived reading for one birth, computed in dependency order.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteResult {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub input: SajuInput,
    pub birth: ResolvedBirth,
    pub pillars: FourPillars,
    pub simple_balance: ElementBalance,
    pub weighted_balance: ElementBalance,
    pub strength: BodyStrength,
    pub gyeokguk: GyeokGukResult,
    pub yongsin: YongSinResult,
    pub daewoon: Daewoon,
    pub sewoon: Vec<SewoonItem>,
    pub sinsal: SinsalReport,
}

impl CompleteResult {
    pub fn calculate(input: &SajuInput, engine: &SajuEngine) -> Result<Self, SajuError> {
        input.validate()?;

        let birth = resolve_birth(input, engine.converter())?;
        let pillars = pillars::build(engine, birth.solar);

        let simple_balance = ElementBalance::simple(&pillars);
        let weighted_balance = ElementBalance::weighted(&pillars);
        let strength = strength::evaluate(&pillars);
        let gyeokguk = gyeokguk::classify(&pillars, strength.grade);
        let yongsin = yongsin::resolve(&pillars, &strength, &weighted_balance);

        let birth_date = birth.solar.date();
        let daewoon = cycles::daewoon(
            engine,
            birth_date,
            &pillars,
            input.gender,
            &yongsin,
            DAEWOON_COUNT,
        );
        let sewoon = cycles::sewoon(
            birth_date.year(),
            &daewoon,
            &yongsin,
            Utc::now().year(),
            SEWOON_COUNT,
        );

        let sinsal = sinsal::detect(&pillars);

        Ok(CompleteResult {
            version: VERSION.to_string(),
            generated_at: Utc::now(),
            input: input.clone(),
            birth,
            pillars,
            simple_balance,
            weighted_balance,
            strength,
            gyeokguk,
            yongsin,
            daewoon,
            sewoon,
            sinsal,
        })
    }
}

/// One-shot convenience over a default engine.
pub fn compute_complete_chart(input: &SajuInput) -> Result<CompleteResult, SajuError> {
    let engine = SajuEngine::new();
    CompleteResult::calculate(input, &engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(year: i32, month: u32, day: u32, hour: u32) -> SajuInput {
        SajuInput {
            year,
            month,
            day,
            hour,
            minute: Some(0),
            ..SajuInput::default()
        }
    }

    #[test]
    fn engine_memoizes_term_tables() {
        let engine = SajuEngine::new();
        let first = engine.terms(1990);
        let second = engine.terms(1990);
        assert_eq!(first, second);
        assert_eq!(engine.term_cache.lock().unwrap().len(), 1);
    }

    #[test]
    fn calculate_runs_every_stage() {
        let mut inp = input(1990, 3, 15, 12);
        inp.minute = Some(30);
        let result = compute_complete_chart(&inp).unwrap();
        assert_eq!(result.pillars.to_string(), "경오년 기묘월 기묘일 경오시");
        assert!(result.birth.degradations.is_empty());
        assert_eq!(result.daewoon.items.len(), DAEWOON_COUNT);
        assert_eq!(result.sewoon.len(), SEWOON_COUNT);
        assert_eq!(result.sinsal.results.len(), 22);
        assert_eq!(result.version, VERSION);
    }

    #[test]
    fn sewoon_years_are_consecutive_from_the_current_year() {
        let result = compute_complete_chart(&input(1990, 3, 15, 12)).unwrap();
        let first = result.sewoon[0].year;
        assert_eq!(first, Utc::now().year());
        for (offset, item) in result.sewoon.iter().enumerate() {
            assert_eq!(item.year, first + offset as i32);
        }
    }

    #[test]
    fn invalid_input_is_rejected_before_any_computation() {
        assert!(compute_complete_chart(&input(1990, 0, 15, 12)).is_err());
        assert!(compute_complete_chart(&input(1990, 3, 32, 12)).is_err());
        assert!(compute_complete_chart(&input(1990, 3, 15, 24)).is_err());
        let mut inp = input(1990, 3, 15, 12);
        inp.minute = Some(60);
        assert!(compute_complete_chart(&inp).is_err());
    }
}
