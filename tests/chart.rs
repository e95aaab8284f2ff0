//! End-to-end checks over the full chart pipeline.

use chrono::Datelike;
use saju_core::{
    compute_complete_chart, cycles::CycleDirection, BodyStrengthGrade, CompleteResult, Degradation,
    Gender, SajuEngine, SajuInput,
};

fn input(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> SajuInput {
    SajuInput {
        year,
        month,
        day,
        hour,
        minute: Some(minute),
        ..SajuInput::default()
    }
}

#[test]
fn reference_chart_computes_every_stage() {
    let result = compute_complete_chart(&input(1990, 3, 15, 12, 30)).unwrap();

    assert_eq!(result.pillars.to_string(), "경오년 기묘월 기묘일 경오시");
    assert_eq!(result.strength.grade, BodyStrengthGrade::Balanced);
    assert!(result.birth.degradations.is_empty());

    // backward cycle for a yin day stem and a male chart
    assert_eq!(result.daewoon.direction, CycleDirection::Backward);
    assert_eq!(result.daewoon.start_age, 3);
    assert_eq!(result.daewoon.items[0].pair.to_string(), "무인");

    // 오 year branch puts 도화 on 묘 and 장성 on 오, both present here
    let dohwa = result.sinsal.results.iter().find(|r| r.name == "년살").unwrap();
    assert!(dohwa.present);
}

#[test]
fn year_pillar_flips_at_ipchun_not_new_year() {
    let before = compute_complete_chart(&input(1990, 2, 3, 10, 0)).unwrap();
    let after = compute_complete_chart(&input(1990, 2, 4, 10, 0)).unwrap();
    assert_eq!(before.pillars.year.to_string(), "기사");
    assert_eq!(after.pillars.year.to_string(), "경오");
}

#[test]
fn late_night_hour_uses_the_next_day_stem() {
    let result = compute_complete_chart(&input(2000, 9, 17, 23, 30)).unwrap();
    assert_eq!(result.pillars.day.to_string(), "무인");
    assert_eq!(result.pillars.hour.to_string(), "갑자");
}

#[test]
fn true_solar_time_correction_is_reported() {
    let mut inp = input(1990, 3, 15, 12, 30);
    inp.use_true_solar_time = true;
    inp.birth_place = Some("서울".to_string());
    let result = compute_complete_chart(&inp).unwrap();
    assert_eq!(result.birth.correction_minutes, -32);
    assert_eq!(result.birth.longitude, Some(126.978));
}

#[test]
fn degradations_surface_on_the_final_result() {
    let mut inp = input(1990, 3, 15, 12, 0);
    inp.is_lunar = true;
    inp.use_true_solar_time = true;
    inp.birth_place = Some("고조선".to_string());
    let result = compute_complete_chart(&inp).unwrap();
    assert!(result
        .birth
        .degradations
        .contains(&Degradation::LunarConversionFallback));
    assert!(result
        .birth
        .degradations
        .contains(&Degradation::UnknownBirthPlace));
}

#[test]
fn gender_flips_the_cycle_direction_only() {
    let male = compute_complete_chart(&input(1990, 3, 15, 12, 30)).unwrap();
    let mut inp = input(1990, 3, 15, 12, 30);
    inp.gender = Gender::Female;
    let female = compute_complete_chart(&inp).unwrap();

    assert_eq!(male.pillars, female.pillars);
    assert_ne!(male.daewoon.direction, female.daewoon.direction);
    assert_eq!(female.daewoon.start_age, 7);
}

#[test]
fn both_balances_account_for_all_eight_tokens() {
    let result = compute_complete_chart(&input(1990, 3, 15, 12, 30)).unwrap();
    assert!((result.simple_balance.total() - 8.0).abs() < 1e-9);
    assert!((result.weighted_balance.total() - 8.0).abs() < 1e-9);
}

#[test]
fn shared_engine_serves_multiple_charts() {
    let engine = SajuEngine::new();
    let first = CompleteResult::calculate(&input(1990, 3, 15, 12, 30), &engine).unwrap();
    let second = CompleteResult::calculate(&input(1984, 2, 5, 6, 0), &engine).unwrap();
    assert_eq!(first.pillars.year.to_string(), "경오");
    assert_eq!(second.pillars.to_string(), "갑자년 병인월 기사일 정묘시");
}

#[test]
fn result_serializes_to_json() {
    let result = compute_complete_chart(&input(1990, 3, 15, 12, 30)).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["pillars"]["day"]["stem"], "Gi");
    assert_eq!(value["strength"]["grade"], "Balanced");
    assert_eq!(value["input"]["year"], 1990);
    assert!(value["sinsal"]["results"].as_array().unwrap().len() == 22);
    assert!(value["weighted_balance"]["weights"].is_object());
}

#[test]
fn input_deserializes_with_defaults() {
    let inp: SajuInput =
        serde_json::from_str(r#"{"year":1990,"month":3,"day":15,"hour":12}"#).unwrap();
    assert_eq!(inp.minute, None);
    assert_eq!(inp.gender, Gender::Male);
    assert!(!inp.is_lunar);
    let result = compute_complete_chart(&inp).unwrap();
    assert_eq!(result.birth.solar.date().year(), 1990);
}
