//! Birth-instant resolution: lunar→solar conversion, true-solar-time
//! correction and the 24 solar-term (절기) boundary table.
//!
//! The solar-term dates come from the published two-century coefficient
//! approximation (`day = ⌊y·0.2422 + C⌋ − leap-correction`), which is accurate
//! to about a day over 1901–2100. The crate never computes term instants
//! astronomically; outside the table range the same formula is extrapolated
//! with the nearest century's coefficients and the result is flagged.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tables::EarthlyBranch;
use crate::{SajuError, SajuInput};

/// KST standard meridian. True solar time is the clock shifted by four
/// minutes per degree of longitude away from it.
pub const STANDARD_MERIDIAN: f64 = 135.0;

/// Default birthplace longitude (Seoul).
pub const DEFAULT_LONGITUDE: f64 = 126.978;

/// Years covered by the term coefficient table.
pub const TERM_TABLE_MIN_YEAR: i32 = 1901;
pub const TERM_TABLE_MAX_YEAR: i32 = 2100;

// ---------------------------
// ## Degradations
// ---------------------------

/// Non-fatal substitutions applied while resolving a birth instant. The
/// computation continues with a documented default; callers can inspect these
/// on the final result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degradation {
    /// Lunar→solar conversion failed; the raw numbers were used as solar.
    LunarConversionFallback,
    /// Birthplace not in the city table; standard meridian assumed.
    UnknownBirthPlace,
    /// Requested year outside the term table; coefficients extrapolated.
    SolarTermApproximation,
}

// ---------------------------
// ## Lunar calendar collaborator
// ---------------------------

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid lunar date {year}-{month}-{day} (leap: {leap_month})")]
    InvalidLunarDate {
        year: i32,
        month: u32,
        day: u32,
        leap_month: bool,
    },
    #[error("lunar conversion unavailable: {0}")]
    Unavailable(String),
}

/// External lunar↔solar calendar collaborator. The crate ships no conversion
/// tables of its own; callers inject an implementation, and conversion
/// failure falls back to reading the input as a solar date.
pub trait LunarSolarConverter: Send + Sync {
    fn lunar_to_solar(
        &self,
        year: i32,
        month: u32,
        day: u32,
        leap_month: bool,
    ) -> Result<NaiveDate, ConversionError>;
}

/// Default collaborator when none is injected; every conversion errs so the
/// documented solar fallback path is taken.
#[derive(Debug, Default)]
pub struct UnsupportedConverter;

impl LunarSolarConverter for UnsupportedConverter {
    fn lunar_to_solar(
        &self,
        _year: i32,
        _month: u32,
        _day: u32,
        _leap_month: bool,
    ) -> Result<NaiveDate, ConversionError> {
        Err(ConversionError::Unavailable(
            "no lunar calendar converter configured".to_string(),
        ))
    }
}

// ---------------------------
// ## City longitudes
// ---------------------------

/// Longitude of a Korean city, for the true-solar-time correction.
pub fn city_longitude(name: &str) -> Option<f64> {
    match name.trim() {
        "서울" | "seoul" => Some(126.978),
        "부산" | "busan" => Some(129.075),
        "대구" | "daegu" => Some(128.601),
        "인천" | "incheon" => Some(126.705),
        "광주" | "gwangju" => Some(126.852),
        "대전" | "daejeon" => Some(127.385),
        "울산" | "ulsan" => Some(129.311),
        "세종" | "sejong" => Some(127.289),
        "수원" | "suwon" => Some(127.028),
        "춘천" | "chuncheon" => Some(127.730),
        "강릉" | "gangneung" => Some(128.876),
        "청주" | "cheongju" => Some(127.489),
        "전주" | "jeonju" => Some(127.148),
        "포항" | "pohang" => Some(129.365),
        "창원" | "changwon" => Some(128.681),
        "제주" | "jeju" => Some(126.531),
        _ => None,
    }
}

// ---------------------------
// ## Solar terms (절기)
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct SolarTerm {
    /// Position in the annual sequence, 0 = 소한 (early January) .. 23 = 동지.
    pub index: usize,
    pub name: &'static str,
    /// Civil KST date of the term.
    pub date: NaiveDate,
}

impl SolarTerm {
    /// Month-opening terms (절) sit at even indices; the odd ones (중기) do
    /// not open a sexagenary month.
    pub fn is_jeol(&self) -> bool {
        self.index % 2 == 0
    }

    /// Branch of the month this term opens (입춘→인 … 대설→자, 소한→축).
    pub fn month_branch(&self) -> Option<EarthlyBranch> {
        if !self.is_jeol() {
            return None;
        }
        EarthlyBranch::from_index((self.index / 2 + 1) % 12)
    }
}

pub const TERM_NAMES: [&str; 24] = [
    "소한", "대한", "입춘", "우수", "경칩", "춘분", "청명", "곡우", "입하", "소만", "망종", "하지",
    "소서", "대서", "입추", "처서", "백로", "추분", "한로", "상강", "입동", "소설", "대설", "동지",
];

// Century coefficients for the term-day approximation, term order as in
// TERM_NAMES. First table covers 1901–2000, second 2001–2100.
const C_1901_2000: [f64; 24] = [
    6.11, 20.84, 4.6295, 19.4599, 6.3826, 21.4155, 5.59, 20.888, 6.318, 21.86, 6.5, 22.20, 7.928,
    23.65, 8.35, 23.95, 8.44, 23.822, 9.098, 24.218, 8.218, 23.08, 7.9, 22.60,
];
const C_2001_2100: [f64; 24] = [
    5.4055, 20.12, 3.87, 18.73, 5.63, 20.646, 4.81, 20.1, 5.52, 21.04, 5.678, 21.37, 7.108, 22.83,
    7.5, 23.13, 7.646, 23.042, 8.318, 23.438, 7.438, 22.36, 7.18, 21.94,
];

fn term_day(year: i32, index: usize) -> u32 {
    let coeffs = if year >= 2001 {
        &C_2001_2100
    } else {
        &C_1901_2000
    };
    let y = (year.rem_euclid(100)) as f64;
    // January and early-February terms take the leap correction from the
    // previous year.
    let leap = if index < 4 {
        ((y as i64) - 1).div_euclid(4)
    } else {
        (y as i64).div_euclid(4)
    };
    let day = (y * 0.2422 + coeffs[index]).floor() as i64 - leap;
    day.clamp(1, 28) as u32
}

/// All 24 terms of a calendar year, in annual order starting from 소한.
pub fn solar_terms(year: i32) -> Vec<SolarTerm> {
    (0..24)
        .map(|index| {
            let month = (index / 2 + 1) as u32;
            let day = term_day(year, index);
            SolarTerm {
                index,
                name: TERM_NAMES[index],
                // day is clamped into 1..=28, valid for every month
                date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            }
        })
        .collect()
}

/// Whether `year` falls inside the coefficient table.
pub fn within_term_table(year: i32) -> bool {
    (TERM_TABLE_MIN_YEAR..=TERM_TABLE_MAX_YEAR).contains(&year)
}

/// Per-year term lookup, memoizable by the engine. Implementations must be
/// pure: the same year always yields the same list.
pub trait TermProvider {
    fn terms(&self, year: i32) -> Vec<SolarTerm>;
}

/// Cache-less provider; recomputes the table on every call.
#[derive(Debug, Default)]
pub struct DirectTerms;

impl TermProvider for DirectTerms {
    fn terms(&self, year: i32) -> Vec<SolarTerm> {
        solar_terms(year)
    }
}

/// 입춘 (start of spring) of a calendar year, the sexagenary year boundary.
pub fn ipchun(provider: &dyn TermProvider, year: i32) -> NaiveDate {
    provider.terms(year)[2].date
}

/// The month-opening term in effect on `date` (the latest 절 not after it).
pub fn jeol_on_or_before(provider: &dyn TermProvider, date: NaiveDate) -> SolarTerm {
    let year = chrono::Datelike::year(&date);
    let mut candidates: Vec<SolarTerm> = provider
        .terms(year - 1)
        .into_iter()
        .chain(provider.terms(year))
        .filter(|t| t.is_jeol() && t.date <= date)
        .collect();
    candidates.sort_by_key(|t| t.date);
    // 대설 of the previous year always qualifies, so the list is never empty
    *candidates.last().unwrap()
}

/// The first month-opening term strictly after `date`.
pub fn jeol_after(provider: &dyn TermProvider, date: NaiveDate) -> SolarTerm {
    let year = chrono::Datelike::year(&date);
    let mut candidates: Vec<SolarTerm> = provider
        .terms(year)
        .into_iter()
        .chain(provider.terms(year + 1))
        .filter(|t| t.is_jeol() && t.date > date)
        .collect();
    candidates.sort_by_key(|t| t.date);
    candidates[0]
}

// ---------------------------
// ## Birth resolution
// ---------------------------

/// A birth instant resolved to the solar calendar, with every applied
/// substitution on record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBirth {
    pub solar: NaiveDateTime,
    /// Longitude used for the true-solar-time correction, if applied.
    pub longitude: Option<f64>,
    /// Applied clock shift in minutes (negative west of the meridian).
    pub correction_minutes: i64,
    pub degradations: Vec<Degradation>,
}

/// Resolves the raw input to a solar date/time. Lunar dates are converted via
/// the collaborator; conversion failure and unknown cities substitute
/// documented defaults instead of aborting.
pub fn resolve_birth(
    input: &SajuInput,
    converter: &dyn LunarSolarConverter,
) -> Result<ResolvedBirth, SajuError> {
    let minute = input.minute.unwrap_or(0);
    if input.hour > 23 {
        return Err(SajuError::Validation(format!(
            "hour out of range: {}",
            input.hour
        )));
    }
    if minute > 59 {
        return Err(SajuError::Validation(format!(
            "minute out of range: {minute}"
        )));
    }

    let mut degradations = Vec::new();

    let date = if input.is_lunar {
        match converter.lunar_to_solar(
            input.year,
            input.month,
            input.day,
            input.is_leap_month,
        ) {
            Ok(solar) => solar,
            Err(_) => {
                degradations.push(Degradation::LunarConversionFallback);
                civil_date(input.year, input.month, input.day)?
            }
        }
    } else {
        civil_date(input.year, input.month, input.day)?
    };

    let time = NaiveTime::from_hms_opt(input.hour, minute, 0).ok_or_else(|| {
        SajuError::Validation(format!("invalid time {:02}:{minute:02}", input.hour))
    })?;
    let mut solar = NaiveDateTime::new(date, time);

    let mut longitude = None;
    let mut correction_minutes = 0;
    if input.use_true_solar_time {
        let lon = match input.birth_place.as_deref() {
            Some(city) => match city_longitude(city) {
                Some(lon) => lon,
                None => {
                    degradations.push(Degradation::UnknownBirthPlace);
                    STANDARD_MERIDIAN
                }
            },
            None => DEFAULT_LONGITUDE,
        };
        let seconds = ((lon - STANDARD_MERIDIAN) * 240.0).round() as i64;
        // carries across midnight in either direction
        solar = solar + Duration::seconds(seconds);
        longitude = Some(lon);
        correction_minutes = seconds / 60;
    }

    if !within_term_table(chrono::Datelike::year(&solar.date())) {
        degradations.push(Degradation::SolarTermApproximation);
    }

    Ok(ResolvedBirth {
        solar,
        longitude,
        correction_minutes,
        degradations,
    })
}

fn civil_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, SajuError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| SajuError::Validation(format!("invalid date {year}-{month:02}-{day:02}")))
}
