use saju_core::{compute_complete_chart, Gender, SajuInput};

fn main() {
    let input = SajuInput {
        year: 1990,
        month: 3,
        day: 15,
        hour: 12,
        minute: Some(30),
        gender: Gender::Male,
        birth_place: Some("서울".to_string()),
        use_true_solar_time: true,
        ..SajuInput::default()
    };

    match compute_complete_chart(&input) {
        Ok(result) => {
            println!("사주: {}", result.pillars);
            println!("신강약: {} (점수 {})", result.strength.grade, result.strength.score);
            println!("격국: {}", result.gyeokguk.pattern.name());
            println!("용신: {}", result.yongsin.recommendation);
            println!(
                "대운: {}세부터, {:?} 방향",
                result.daewoon.start_age, result.daewoon.direction
            );
            for item in &result.daewoon.items {
                println!(
                    "  {}대운 {}~{}세 {} ({:+})",
                    item.sequence, item.start_age, item.end_age, item.pair, item.score
                );
            }
            println!("{}", result.sinsal.summary);
        }
        Err(err) => eprintln!("계산 실패: {err}"),
    }
}
