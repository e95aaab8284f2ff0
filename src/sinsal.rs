//! 신살 (auspicious/inauspicious pattern) detection.
//!
//! A flat battery of independent positional rules over the four pillars:
//! the twelve rotation sinsal keyed on the year branch's triad group, a set
//! of single-table lookups, the reciprocal 원진 conflict and the 공망 void
//! derived from the day pillar's position in the 60-cycle.

use serde::{Deserialize, Serialize};

use crate::pillars::FourPillars;
use crate::tables::{EarthlyBranch, HeavenlyStem, SexagenaryPair};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectPolarity {
    Good,
    Bad,
    Neutral,
}

/// One evaluated pattern: present or not, with the branch that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinsalResult {
    pub name: &'static str,
    pub present: bool,
    pub trigger: Option<EarthlyBranch>,
    pub description: String,
    pub meaning: &'static str,
    pub polarity: EffectPolarity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinsalReport {
    pub results: Vec<SinsalResult>,
    pub good: Vec<&'static str>,
    pub bad: Vec<&'static str>,
    pub neutral: Vec<&'static str>,
    pub summary: String,
}

// ---------------------------
// ## Twelve rotation sinsal (십이신살)
// ---------------------------

const TWELVE: [(&str, EffectPolarity, &str); 12] = [
    ("겁살", EffectPolarity::Bad, "빼앗기는 기운으로, 손재와 강탈을 조심하라는 살이다."),
    ("재살", EffectPolarity::Bad, "수옥살이라고도 하며 관재와 구설을 뜻한다."),
    ("천살", EffectPolarity::Bad, "하늘이 내리는 재난으로 예측하기 어려운 불운을 뜻한다."),
    ("지살", EffectPolarity::Neutral, "이동과 변동의 기운으로 객지 생활과 인연이 있다."),
    ("년살", EffectPolarity::Neutral, "도화살로, 매력과 인기가 따르나 구설도 함께 온다."),
    ("월살", EffectPolarity::Bad, "고초살이라고도 하며 메마른 땅처럼 결실이 더디다."),
    ("망신살", EffectPolarity::Bad, "체면이 상하는 일을 겪기 쉬운 살이다."),
    ("장성살", EffectPolarity::Good, "통솔력과 승진의 기운을 뜻하는 길한 살이다."),
    ("반안살", EffectPolarity::Good, "말 안장에 오르듯 출세와 안정을 뜻한다."),
    ("역마살", EffectPolarity::Neutral, "떠돌아다니는 기운으로 여행·이주·해외와 인연이 깊다."),
    ("육해살", EffectPolarity::Bad, "여섯 가지 해로움으로 잔병과 지체를 뜻한다."),
    ("화개살", EffectPolarity::Neutral, "예술과 종교의 기운으로 고독하나 재능이 빛난다."),
];

/// 겁살 anchor of each triad group, keyed on `branch index % 4`
/// (신자진→사, 사유축→인, 인오술→해, 해묘미→신).
fn rotation_start(year_branch: EarthlyBranch) -> EarthlyBranch {
    let starts = [
        EarthlyBranch::Sa,
        EarthlyBranch::In,
        EarthlyBranch::Hae,
        EarthlyBranch::Sin,
    ];
    starts[year_branch.index() % 4]
}

fn twelve_sinsal(pillars: &FourPillars, results: &mut Vec<SinsalResult>) {
    let start = rotation_start(pillars.year.branch);
    let branches = pillars.branches();
    for (offset, &(name, polarity, meaning)) in TWELVE.iter().enumerate() {
        let target = EarthlyBranch::from_index((start.index() + offset) % 12).unwrap();
        let present = branches.contains(&target);
        results.push(SinsalResult {
            name,
            present,
            trigger: present.then_some(target),
            description: format!("년지 {} 기준으로 {}이(가) {}에 해당한다.", pillars.year.branch, name, target),
            meaning,
            polarity,
        });
    }
}

// ---------------------------
// ## Single-table lookups
// ---------------------------

/// 천을귀인 target branches of a day stem.
pub fn cheonul_branches(stem: HeavenlyStem) -> [EarthlyBranch; 2] {
    match stem {
        HeavenlyStem::Gap | HeavenlyStem::Mu | HeavenlyStem::Gyeong => {
            [EarthlyBranch::Chuk, EarthlyBranch::Mi]
        }
        HeavenlyStem::Eul | HeavenlyStem::Gi => [EarthlyBranch::Ja, EarthlyBranch::Sin],
        HeavenlyStem::Byeong | HeavenlyStem::Jeong => [EarthlyBranch::Hae, EarthlyBranch::Yu],
        HeavenlyStem::Sin => [EarthlyBranch::In, EarthlyBranch::O],
        HeavenlyStem::Im | HeavenlyStem::Gye => [EarthlyBranch::Sa, EarthlyBranch::Myo],
    }
}

/// 문창귀인 target branch of a day stem.
pub fn munchang_branch(stem: HeavenlyStem) -> EarthlyBranch {
    match stem {
        HeavenlyStem::Gap => EarthlyBranch::Sa,
        HeavenlyStem::Eul => EarthlyBranch::O,
        HeavenlyStem::Byeong | HeavenlyStem::Mu => EarthlyBranch::Sin,
        HeavenlyStem::Jeong | HeavenlyStem::Gi => EarthlyBranch::Yu,
        HeavenlyStem::Gyeong => EarthlyBranch::Hae,
        HeavenlyStem::Sin => EarthlyBranch::Ja,
        HeavenlyStem::Im => EarthlyBranch::In,
        HeavenlyStem::Gye => EarthlyBranch::Myo,
    }
}

/// 양인살 target branch; yang day stems only.
pub fn yangin_branch(stem: HeavenlyStem) -> Option<EarthlyBranch> {
    match stem {
        HeavenlyStem::Gap => Some(EarthlyBranch::Myo),
        HeavenlyStem::Byeong | HeavenlyStem::Mu => Some(EarthlyBranch::O),
        HeavenlyStem::Gyeong => Some(EarthlyBranch::Yu),
        HeavenlyStem::Im => Some(EarthlyBranch::Ja),
        _ => None,
    }
}

/// 홍염살 target branch of a day stem (one of several published variants).
pub fn hongyeom_branch(stem: HeavenlyStem) -> EarthlyBranch {
    match stem {
        HeavenlyStem::Gap | HeavenlyStem::Eul => EarthlyBranch::O,
        HeavenlyStem::Byeong => EarthlyBranch::In,
        HeavenlyStem::Jeong => EarthlyBranch::Mi,
        HeavenlyStem::Mu | HeavenlyStem::Gi => EarthlyBranch::Jin,
        HeavenlyStem::Gyeong => EarthlyBranch::Sul,
        HeavenlyStem::Sin => EarthlyBranch::Yu,
        HeavenlyStem::Im => EarthlyBranch::Ja,
        HeavenlyStem::Gye => EarthlyBranch::Sin,
    }
}

/// 월덕귀인 stem of a month branch's triad group.
fn woldeok_stem(month_branch: EarthlyBranch) -> HeavenlyStem {
    match month_branch.index() % 4 {
        0 => HeavenlyStem::Im,     // 신자진
        1 => HeavenlyStem::Gyeong, // 사유축
        2 => HeavenlyStem::Byeong, // 인오술
        _ => HeavenlyStem::Gap,    // 해묘미
    }
}

const BAEKHO_PAIRS: [(HeavenlyStem, EarthlyBranch); 7] = [
    (HeavenlyStem::Gap, EarthlyBranch::Jin),
    (HeavenlyStem::Eul, EarthlyBranch::Mi),
    (HeavenlyStem::Byeong, EarthlyBranch::Sul),
    (HeavenlyStem::Jeong, EarthlyBranch::Chuk),
    (HeavenlyStem::Mu, EarthlyBranch::Jin),
    (HeavenlyStem::Im, EarthlyBranch::Sul),
    (HeavenlyStem::Gye, EarthlyBranch::Chuk),
];

const GWOEGANG_PAIRS: [(HeavenlyStem, EarthlyBranch); 6] = [
    (HeavenlyStem::Gyeong, EarthlyBranch::Jin),
    (HeavenlyStem::Gyeong, EarthlyBranch::Sul),
    (HeavenlyStem::Im, EarthlyBranch::Jin),
    (HeavenlyStem::Im, EarthlyBranch::Sul),
    (HeavenlyStem::Mu, EarthlyBranch::Jin),
    (HeavenlyStem::Mu, EarthlyBranch::Sul),
];

/// 원진 partner of a branch (자미, 축오, 인유, 묘신, 진해, 사술).
pub fn wonjin_partner(branch: EarthlyBranch) -> EarthlyBranch {
    match branch {
        EarthlyBranch::Ja => EarthlyBranch::Mi,
        EarthlyBranch::Mi => EarthlyBranch::Ja,
        EarthlyBranch::Chuk => EarthlyBranch::O,
        EarthlyBranch::O => EarthlyBranch::Chuk,
        EarthlyBranch::In => EarthlyBranch::Yu,
        EarthlyBranch::Yu => EarthlyBranch::In,
        EarthlyBranch::Myo => EarthlyBranch::Sin,
        EarthlyBranch::Sin => EarthlyBranch::Myo,
        EarthlyBranch::Jin => EarthlyBranch::Hae,
        EarthlyBranch::Hae => EarthlyBranch::Jin,
        EarthlyBranch::Sa => EarthlyBranch::Sul,
        EarthlyBranch::Sul => EarthlyBranch::Sa,
    }
}

/// 공망 void pair of the ten-day block holding the day pillar. Keyed off the
/// combined 60-cycle index: 갑자 and 갑오 share a stem but sit in different
/// blocks and void different branches.
pub fn void_branches(day: SexagenaryPair) -> [EarthlyBranch; 2] {
    let block = day.index() / 10;
    let first = EarthlyBranch::from_index((10 + block * 10) % 12).unwrap();
    let second = EarthlyBranch::from_index((11 + block * 10) % 12).unwrap();
    [first, second]
}

// ---------------------------
// ## Detection battery
// ---------------------------

pub fn detect(pillars: &FourPillars) -> SinsalReport {
    let mut results = Vec::with_capacity(22);
    let day_stem = pillars.day_stem();
    let branches = pillars.branches();
    let stems = pillars.stems();

    twelve_sinsal(pillars, &mut results);

    // 천을귀인: the strongest of the noble-person patterns.
    let targets = cheonul_branches(day_stem);
    let trigger = targets.iter().copied().find(|t| branches.contains(t));
    results.push(SinsalResult {
        name: "천을귀인",
        present: trigger.is_some(),
        trigger,
        description: format!(
            "일간 {} 기준 천을귀인은 {}·{}이다.",
            day_stem, targets[0], targets[1]
        ),
        meaning: "하늘의 도움으로 흉을 길로 바꾸는 으뜸 길신이다.",
        polarity: EffectPolarity::Good,
    });

    // 문창귀인
    let target = munchang_branch(day_stem);
    let present = branches.contains(&target);
    results.push(SinsalResult {
        name: "문창귀인",
        present,
        trigger: present.then_some(target),
        description: format!("일간 {} 기준 문창귀인은 {}이다.", day_stem, target),
        meaning: "학문과 글재주가 빛나는 길신이다.",
        polarity: EffectPolarity::Good,
    });

    // 월덕귀인: a stem-target rule, so no triggering branch is recorded.
    let target_stem = woldeok_stem(pillars.month.branch);
    let present = stems.contains(&target_stem);
    results.push(SinsalResult {
        name: "월덕귀인",
        present,
        trigger: None,
        description: format!(
            "월지 {} 기준 월덕귀인은 천간 {}이다.",
            pillars.month.branch, target_stem
        ),
        meaning: "달의 덕으로 재난을 덜어주는 길신이다.",
        polarity: EffectPolarity::Good,
    });

    // 양인살: yang day stems only.
    let target = yangin_branch(day_stem);
    let trigger = target.filter(|t| branches.contains(t));
    results.push(SinsalResult {
        name: "양인살",
        present: trigger.is_some(),
        trigger,
        description: match target {
            Some(t) => format!("양간 {} 기준 양인은 {}이다.", day_stem, t),
            None => format!("음간 {}에는 양인이 성립하지 않는다.", day_stem),
        },
        meaning: "칼날 같은 강한 기운으로, 큰일을 이루나 다침도 따른다.",
        polarity: EffectPolarity::Bad,
    });

    // 홍염살
    let target = hongyeom_branch(day_stem);
    let present = branches.contains(&target);
    results.push(SinsalResult {
        name: "홍염살",
        present,
        trigger: present.then_some(target),
        description: format!("일간 {} 기준 홍염은 {}이다.", day_stem, target),
        meaning: "은근한 매력으로 정이 많아 이성 문제가 따르기 쉽다.",
        polarity: EffectPolarity::Neutral,
    });

    // 백호살: any pillar on one of the seven 백호 pairs.
    let trigger = pillars
        .pairs()
        .into_iter()
        .find(|p| BAEKHO_PAIRS.contains(&(p.stem, p.branch)))
        .map(|p| p.branch);
    results.push(SinsalResult {
        name: "백호살",
        present: trigger.is_some(),
        trigger,
        description: "갑진·을미·병술·정축·무진·임술·계축 기둥이 있는지 본다.".to_string(),
        meaning: "피를 보는 사고와 급환을 조심하라는 살이다.",
        polarity: EffectPolarity::Bad,
    });

    // 괴강살: the day pillar itself must be a 괴강 pair.
    let present = GWOEGANG_PAIRS.contains(&(pillars.day.stem, pillars.day.branch));
    results.push(SinsalResult {
        name: "괴강살",
        present,
        trigger: present.then_some(pillars.day.branch),
        description: format!("일주 {}이(가) 괴강 기둥인지 본다.", pillars.day),
        meaning: "우두머리의 기상으로 극과 극을 오가는 강한 살이다.",
        polarity: EffectPolarity::Neutral,
    });

    // 현침살: two or more needle-shaped tokens (갑·신 stems, 묘·오·미 branches).
    let needles = stems
        .iter()
        .filter(|s| matches!(s, HeavenlyStem::Gap | HeavenlyStem::Sin))
        .count()
        + branches
            .iter()
            .filter(|b| {
                matches!(b, EarthlyBranch::Myo | EarthlyBranch::O | EarthlyBranch::Mi)
            })
            .count();
    results.push(SinsalResult {
        name: "현침살",
        present: needles >= 2,
        trigger: None,
        description: format!("바늘 모양 글자(갑·신·묘·오·미)가 {needles}개 있다."),
        meaning: "날카로운 기운으로 의술·침술과 인연이 있으나 구설을 부른다.",
        polarity: EffectPolarity::Bad,
    });

    // 원진살: day branch against the year/month/hour branches.
    let partner = wonjin_partner(pillars.day.branch);
    let others = [pillars.year.branch, pillars.month.branch, pillars.hour.branch];
    let present = others.contains(&partner);
    results.push(SinsalResult {
        name: "원진살",
        present,
        trigger: present.then_some(partner),
        description: format!(
            "일지 {}의 원진 상대는 {}이다.",
            pillars.day.branch, partner
        ),
        meaning: "이유 없이 미워하는 기운으로 가까운 인연과 원망이 쌓인다.",
        polarity: EffectPolarity::Bad,
    });

    // 공망
    let void = void_branches(pillars.day);
    let trigger = others.iter().copied().find(|b| void.contains(b));
    results.push(SinsalResult {
        name: "공망",
        present: trigger.is_some(),
        trigger,
        description: format!(
            "일주 {} 기준 공망은 {}·{}이다.",
            pillars.day, void[0], void[1]
        ),
        meaning: "비어 있는 자리로, 해당 기둥의 일이 허무하게 풀리기 쉽다.",
        polarity: EffectPolarity::Neutral,
    });

    build_report(results)
}

fn build_report(results: Vec<SinsalResult>) -> SinsalReport {
    let mut good = Vec::new();
    let mut bad = Vec::new();
    let mut neutral = Vec::new();
    for r in results.iter().filter(|r| r.present) {
        match r.polarity {
            EffectPolarity::Good => good.push(r.name),
            EffectPolarity::Bad => bad.push(r.name),
            EffectPolarity::Neutral => neutral.push(r.name),
        }
    }
    let summary = format!(
        "길신 {}개({}), 흉살 {}개({}), 중립 {}개({})가 나타난다.",
        good.len(),
        good.join("·"),
        bad.len(),
        bad.join("·"),
        neutral.len(),
        neutral.join("·"),
    );
    SinsalReport {
        results,
        good,
        bad,
        neutral,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(stem: &str, branch: &str) -> SexagenaryPair {
        let stem = HeavenlyStem::all().find(|s| s.korean() == stem).unwrap();
        let branch = EarthlyBranch::all().find(|b| b.korean() == branch).unwrap();
        SexagenaryPair { stem, branch }
    }

    fn chart(pairs: [(&str, &str); 4]) -> FourPillars {
        FourPillars {
            year: raw(pairs[0].0, pairs[0].1),
            month: raw(pairs[1].0, pairs[1].1),
            day: raw(pairs[2].0, pairs[2].1),
            hour: raw(pairs[3].0, pairs[3].1),
        }
    }

    fn find<'a>(report: &'a SinsalReport, name: &str) -> &'a SinsalResult {
        report.results.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn twelve_rotation_follows_the_triad_group() {
        // 오 year: 인오술 group, 겁살 anchored at 해
        let report = detect(&chart([("경", "오"), ("기", "묘"), ("기", "묘"), ("경", "오")]));
        let dohwa = find(&report, "년살");
        assert!(dohwa.present);
        assert_eq!(dohwa.trigger, Some(EarthlyBranch::Myo));
        let jangseong = find(&report, "장성살");
        assert!(jangseong.present);
        assert_eq!(jangseong.trigger, Some(EarthlyBranch::O));
        assert!(!find(&report, "역마살").present);
    }

    #[test]
    fn rotation_anchors_per_group() {
        assert_eq!(rotation_start(EarthlyBranch::Ja), EarthlyBranch::Sa);
        assert_eq!(rotation_start(EarthlyBranch::Yu), EarthlyBranch::In);
        assert_eq!(rotation_start(EarthlyBranch::Sul), EarthlyBranch::Hae);
        assert_eq!(rotation_start(EarthlyBranch::Hae), EarthlyBranch::Sin);
    }

    #[test]
    fn cheonul_fixture_triggers_on_chuk() {
        // 갑 day with 축·인·묘 among the branches
        let report = detect(&chart([("을", "축"), ("병", "인"), ("갑", "자"), ("정", "묘")]));
        let noble = find(&report, "천을귀인");
        assert!(noble.present);
        assert_eq!(noble.trigger, Some(EarthlyBranch::Chuk));
    }

    #[test]
    fn yangin_only_for_yang_stems() {
        assert_eq!(yangin_branch(HeavenlyStem::Gap), Some(EarthlyBranch::Myo));
        assert_eq!(yangin_branch(HeavenlyStem::Eul), None);

        let with_myo = detect(&chart([("경", "오"), ("기", "묘"), ("갑", "자"), ("경", "오")]));
        assert!(find(&with_myo, "양인살").present);
        let without = detect(&chart([("경", "오"), ("무", "인"), ("갑", "자"), ("경", "오")]));
        assert!(!find(&without, "양인살").present);
    }

    #[test]
    fn void_depends_on_the_full_day_index() {
        // same day stem, different block, different void pair
        assert_eq!(
            void_branches(raw("갑", "자")),
            [EarthlyBranch::Sul, EarthlyBranch::Hae]
        );
        assert_eq!(
            void_branches(raw("갑", "오")),
            [EarthlyBranch::Jin, EarthlyBranch::Sa]
        );
        assert_eq!(
            void_branches(raw("갑", "인")),
            [EarthlyBranch::Ja, EarthlyBranch::Chuk]
        );
    }

    #[test]
    fn void_checks_the_other_branches() {
        // 갑자 day voids 술·해; the hour branch 술 triggers it
        let report = detect(&chart([("경", "오"), ("기", "묘"), ("갑", "자"), ("갑", "술")]));
        let gongmang = find(&report, "공망");
        assert!(gongmang.present);
        assert_eq!(gongmang.trigger, Some(EarthlyBranch::Sul));
    }

    #[test]
    fn wonjin_is_reciprocal() {
        for branch in EarthlyBranch::all() {
            assert_eq!(wonjin_partner(wonjin_partner(branch)), branch);
        }
        // 묘 day against a 신 year branch
        let report = detect(&chart([("갑", "신"), ("기", "묘"), ("기", "묘"), ("경", "오")]));
        assert!(find(&report, "원진살").present);
    }

    #[test]
    fn baekho_matches_whole_pillars() {
        let report = detect(&chart([("갑", "진"), ("기", "묘"), ("기", "묘"), ("경", "오")]));
        assert!(find(&report, "백호살").present);
        // 갑 stem with a non-백호 branch does not trigger
        let report = detect(&chart([("갑", "자"), ("기", "묘"), ("기", "묘"), ("경", "오")]));
        assert!(!find(&report, "백호살").present);
    }

    #[test]
    fn gwoegang_is_day_pillar_only() {
        let report = detect(&chart([("경", "오"), ("기", "묘"), ("경", "진"), ("경", "오")]));
        assert!(find(&report, "괴강살").present);
        // the same pair in the year pillar does not count
        let report = detect(&chart([("경", "진"), ("기", "묘"), ("기", "묘"), ("경", "오")]));
        assert!(!find(&report, "괴강살").present);
    }

    #[test]
    fn hyeonchim_needs_two_needles() {
        // 갑 stem + 묘 branch = two needle tokens
        let report = detect(&chart([("경", "자"), ("병", "인"), ("갑", "자"), ("병", "묘")]));
        assert!(find(&report, "현침살").present);
        let report = detect(&chart([("경", "자"), ("병", "인"), ("갑", "자"), ("병", "진")]));
        assert!(!find(&report, "현침살").present);
    }

    #[test]
    fn report_partitions_by_polarity() {
        let report = detect(&chart([("경", "오"), ("기", "묘"), ("기", "묘"), ("경", "오")]));
        assert_eq!(report.results.len(), 22);
        for r in report.results.iter().filter(|r| r.present) {
            let bucket = match r.polarity {
                EffectPolarity::Good => &report.good,
                EffectPolarity::Bad => &report.bad,
                EffectPolarity::Neutral => &report.neutral,
            };
            assert!(bucket.contains(&r.name));
        }
        assert!(report.summary.contains("길신"));
    }
}
