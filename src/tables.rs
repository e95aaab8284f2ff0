//! Symbol domains and constant tables for four-pillars computation.
//!
//! Everything cyclical in saju is indexed: stems 0..10, branches 0..12 and the
//! sexagenary cycle 0..60. All other modules look symbols up here; in
//! particular the hidden-stem composition table is defined in this module and
//! nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------
// ## Five elements
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiveElement {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl FiveElement {
    pub fn iter() -> impl Iterator<Item = FiveElement> {
        [
            FiveElement::Wood,
            FiveElement::Fire,
            FiveElement::Earth,
            FiveElement::Metal,
            FiveElement::Water,
        ]
        .iter()
        .copied()
    }

    /// The element this one produces (상생: 목→화→토→금→수→목).
    pub fn produces(self) -> FiveElement {
        match self {
            FiveElement::Wood => FiveElement::Fire,
            FiveElement::Fire => FiveElement::Earth,
            FiveElement::Earth => FiveElement::Metal,
            FiveElement::Metal => FiveElement::Water,
            FiveElement::Water => FiveElement::Wood,
        }
    }

    /// The element this one controls (상극: 목→토, 토→수, 수→화, 화→금, 금→목).
    pub fn controls(self) -> FiveElement {
        match self {
            FiveElement::Wood => FiveElement::Earth,
            FiveElement::Earth => FiveElement::Water,
            FiveElement::Water => FiveElement::Fire,
            FiveElement::Fire => FiveElement::Metal,
            FiveElement::Metal => FiveElement::Wood,
        }
    }

    pub fn produced_by(self) -> FiveElement {
        match self {
            FiveElement::Fire => FiveElement::Wood,
            FiveElement::Earth => FiveElement::Fire,
            FiveElement::Metal => FiveElement::Earth,
            FiveElement::Water => FiveElement::Metal,
            FiveElement::Wood => FiveElement::Water,
        }
    }

    pub fn controlled_by(self) -> FiveElement {
        match self {
            FiveElement::Earth => FiveElement::Wood,
            FiveElement::Water => FiveElement::Earth,
            FiveElement::Fire => FiveElement::Water,
            FiveElement::Metal => FiveElement::Fire,
            FiveElement::Wood => FiveElement::Metal,
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            FiveElement::Wood => "목",
            FiveElement::Fire => "화",
            FiveElement::Earth => "토",
            FiveElement::Metal => "금",
            FiveElement::Water => "수",
        }
    }
}

impl fmt::Display for FiveElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

// ---------------------------
// ## Heavenly stems (천간)
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeavenlyStem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

impl HeavenlyStem {
    pub fn from_index(index: usize) -> Option<HeavenlyStem> {
        match index {
            0 => Some(HeavenlyStem::Gap),
            1 => Some(HeavenlyStem::Eul),
            2 => Some(HeavenlyStem::Byeong),
            3 => Some(HeavenlyStem::Jeong),
            4 => Some(HeavenlyStem::Mu),
            5 => Some(HeavenlyStem::Gi),
            6 => Some(HeavenlyStem::Gyeong),
            7 => Some(HeavenlyStem::Sin),
            8 => Some(HeavenlyStem::Im),
            9 => Some(HeavenlyStem::Gye),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = HeavenlyStem> {
        (0..10).filter_map(HeavenlyStem::from_index)
    }

    pub fn element(self) -> FiveElement {
        match self {
            HeavenlyStem::Gap | HeavenlyStem::Eul => FiveElement::Wood,
            HeavenlyStem::Byeong | HeavenlyStem::Jeong => FiveElement::Fire,
            HeavenlyStem::Mu | HeavenlyStem::Gi => FiveElement::Earth,
            HeavenlyStem::Gyeong | HeavenlyStem::Sin => FiveElement::Metal,
            HeavenlyStem::Im | HeavenlyStem::Gye => FiveElement::Water,
        }
    }

    pub fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            HeavenlyStem::Gap => "갑",
            HeavenlyStem::Eul => "을",
            HeavenlyStem::Byeong => "병",
            HeavenlyStem::Jeong => "정",
            HeavenlyStem::Mu => "무",
            HeavenlyStem::Gi => "기",
            HeavenlyStem::Gyeong => "경",
            HeavenlyStem::Sin => "신",
            HeavenlyStem::Im => "임",
            HeavenlyStem::Gye => "계",
        }
    }
}

impl fmt::Display for HeavenlyStem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

// ---------------------------
// ## Earthly branches (지지)
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EarthlyBranch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

impl EarthlyBranch {
    pub fn from_index(index: usize) -> Option<EarthlyBranch> {
        match index {
            0 => Some(EarthlyBranch::Ja),
            1 => Some(EarthlyBranch::Chuk),
            2 => Some(EarthlyBranch::In),
            3 => Some(EarthlyBranch::Myo),
            4 => Some(EarthlyBranch::Jin),
            5 => Some(EarthlyBranch::Sa),
            6 => Some(EarthlyBranch::O),
            7 => Some(EarthlyBranch::Mi),
            8 => Some(EarthlyBranch::Sin),
            9 => Some(EarthlyBranch::Yu),
            10 => Some(EarthlyBranch::Sul),
            11 => Some(EarthlyBranch::Hae),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = EarthlyBranch> {
        (0..12).filter_map(EarthlyBranch::from_index)
    }

    pub fn element(self) -> FiveElement {
        match self {
            EarthlyBranch::In | EarthlyBranch::Myo => FiveElement::Wood,
            EarthlyBranch::Sa | EarthlyBranch::O => FiveElement::Fire,
            EarthlyBranch::Sin | EarthlyBranch::Yu => FiveElement::Metal,
            EarthlyBranch::Hae | EarthlyBranch::Ja => FiveElement::Water,
            EarthlyBranch::Jin | EarthlyBranch::Sul | EarthlyBranch::Chuk | EarthlyBranch::Mi => {
                FiveElement::Earth
            }
        }
    }

    pub fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub fn season(self) -> Season {
        match self {
            EarthlyBranch::In | EarthlyBranch::Myo | EarthlyBranch::Jin => Season::Spring,
            EarthlyBranch::Sa | EarthlyBranch::O | EarthlyBranch::Mi => Season::Summer,
            EarthlyBranch::Sin | EarthlyBranch::Yu | EarthlyBranch::Sul => Season::Autumn,
            EarthlyBranch::Hae | EarthlyBranch::Ja | EarthlyBranch::Chuk => Season::Winter,
        }
    }

    pub fn animal(self) -> &'static str {
        match self {
            EarthlyBranch::Ja => "쥐",
            EarthlyBranch::Chuk => "소",
            EarthlyBranch::In => "호랑이",
            EarthlyBranch::Myo => "토끼",
            EarthlyBranch::Jin => "용",
            EarthlyBranch::Sa => "뱀",
            EarthlyBranch::O => "말",
            EarthlyBranch::Mi => "양",
            EarthlyBranch::Sin => "원숭이",
            EarthlyBranch::Yu => "닭",
            EarthlyBranch::Sul => "개",
            EarthlyBranch::Hae => "돼지",
        }
    }

    /// The branch directly opposite on the wheel (충 partner).
    pub fn clash(self) -> EarthlyBranch {
        EarthlyBranch::from_index((self.index() + 6) % 12).unwrap()
    }

    pub fn korean(self) -> &'static str {
        match self {
            EarthlyBranch::Ja => "자",
            EarthlyBranch::Chuk => "축",
            EarthlyBranch::In => "인",
            EarthlyBranch::Myo => "묘",
            EarthlyBranch::Jin => "진",
            EarthlyBranch::Sa => "사",
            EarthlyBranch::O => "오",
            EarthlyBranch::Mi => "미",
            EarthlyBranch::Sin => "신",
            EarthlyBranch::Yu => "유",
            EarthlyBranch::Sul => "술",
            EarthlyBranch::Hae => "해",
        }
    }
}

impl fmt::Display for EarthlyBranch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn korean(self) -> &'static str {
        match self {
            Season::Spring => "봄",
            Season::Summer => "여름",
            Season::Autumn => "가을",
            Season::Winter => "겨울",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

// ---------------------------
// ## Sexagenary cycle (육십갑자)
// ---------------------------

/// One of the 60 valid stem/branch pairs. Stem and branch polarity always
/// match, which is why only half of the 120 combinations exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SexagenaryPair {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl SexagenaryPair {
    /// Builds a pair, rejecting polarity-mismatched combinations.
    pub fn new(stem: HeavenlyStem, branch: EarthlyBranch) -> Option<SexagenaryPair> {
        if stem.polarity() == branch.polarity() {
            Some(SexagenaryPair { stem, branch })
        } else {
            None
        }
    }

    /// Pair at canonical cycle position `index mod 60` (0 = 갑자).
    pub fn from_index(index: i64) -> SexagenaryPair {
        let i = index.rem_euclid(60) as usize;
        SexagenaryPair {
            stem: HeavenlyStem::from_index(i % 10).unwrap(),
            branch: EarthlyBranch::from_index(i % 12).unwrap(),
        }
    }

    /// Canonical cycle position 0..60.
    pub fn index(self) -> usize {
        let s = self.stem.index();
        let b = self.branch.index();
        // CRT over the (10, 12) residues; polarity match guarantees a solution.
        (0..60).find(|i| i % 10 == s && i % 12 == b).unwrap()
    }

    /// Steps `offset` positions through the cycle (negative steps backward).
    pub fn step(self, offset: i64) -> SexagenaryPair {
        SexagenaryPair::from_index(self.index() as i64 + offset)
    }

    pub fn element(self) -> FiveElement {
        self.stem.element()
    }

    pub fn all() -> impl Iterator<Item = SexagenaryPair> {
        (0..60).map(SexagenaryPair::from_index)
    }
}

impl fmt::Display for SexagenaryPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

// ---------------------------
// ## Hidden stems (지장간)
// ---------------------------

const D: f64 = 1.0 / 30.0;

/// Hidden-stem composition of each branch, weighted by the classical day
/// counts out of 30. Weights per branch sum to 1.0. The strongest entry (the
/// 정기) is listed last.
pub fn hidden_stems(branch: EarthlyBranch) -> &'static [(HeavenlyStem, f64)] {
    match branch {
        EarthlyBranch::Ja => &[(HeavenlyStem::Im, 10.0 * D), (HeavenlyStem::Gye, 20.0 * D)],
        EarthlyBranch::Chuk => &[
            (HeavenlyStem::Gye, 9.0 * D),
            (HeavenlyStem::Sin, 3.0 * D),
            (HeavenlyStem::Gi, 18.0 * D),
        ],
        EarthlyBranch::In => &[
            (HeavenlyStem::Mu, 7.0 * D),
            (HeavenlyStem::Byeong, 7.0 * D),
            (HeavenlyStem::Gap, 16.0 * D),
        ],
        EarthlyBranch::Myo => &[(HeavenlyStem::Gap, 10.0 * D), (HeavenlyStem::Eul, 20.0 * D)],
        EarthlyBranch::Jin => &[
            (HeavenlyStem::Eul, 9.0 * D),
            (HeavenlyStem::Gye, 3.0 * D),
            (HeavenlyStem::Mu, 18.0 * D),
        ],
        EarthlyBranch::Sa => &[
            (HeavenlyStem::Mu, 7.0 * D),
            (HeavenlyStem::Gyeong, 7.0 * D),
            (HeavenlyStem::Byeong, 16.0 * D),
        ],
        EarthlyBranch::O => &[
            (HeavenlyStem::Byeong, 10.0 * D),
            (HeavenlyStem::Gi, 9.0 * D),
            (HeavenlyStem::Jeong, 11.0 * D),
        ],
        EarthlyBranch::Mi => &[
            (HeavenlyStem::Jeong, 9.0 * D),
            (HeavenlyStem::Eul, 3.0 * D),
            (HeavenlyStem::Gi, 18.0 * D),
        ],
        EarthlyBranch::Sin => &[
            (HeavenlyStem::Mu, 7.0 * D),
            (HeavenlyStem::Im, 7.0 * D),
            (HeavenlyStem::Gyeong, 16.0 * D),
        ],
        EarthlyBranch::Yu => &[
            (HeavenlyStem::Gyeong, 10.0 * D),
            (HeavenlyStem::Sin, 20.0 * D),
        ],
        EarthlyBranch::Sul => &[
            (HeavenlyStem::Sin, 9.0 * D),
            (HeavenlyStem::Jeong, 3.0 * D),
            (HeavenlyStem::Mu, 18.0 * D),
        ],
        EarthlyBranch::Hae => &[
            (HeavenlyStem::Mu, 7.0 * D),
            (HeavenlyStem::Gap, 7.0 * D),
            (HeavenlyStem::Im, 16.0 * D),
        ],
    }
}

/// The dominant hidden stem (본기/정기) of a branch.
pub fn main_qi(branch: EarthlyBranch) -> HeavenlyStem {
    hidden_stems(branch)
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|&(stem, _)| stem)
        .unwrap()
}

// ---------------------------
// ## Ten gods (십성)
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenGod {
    BiGyeon,
    GeopJae,
    SikSin,
    SangGwan,
    PyeonJae,
    JeongJae,
    PyeonGwan,
    JeongGwan,
    PyeonIn,
    JeongIn,
}

impl TenGod {
    /// Relationship of `other` to the day stem.
    pub fn classify(day: HeavenlyStem, other: HeavenlyStem) -> TenGod {
        let same_polarity = day.polarity() == other.polarity();
        let de = day.element();
        let oe = other.element();
        if oe == de {
            if same_polarity {
                TenGod::BiGyeon
            } else {
                TenGod::GeopJae
            }
        } else if de.produces() == oe {
            if same_polarity {
                TenGod::SikSin
            } else {
                TenGod::SangGwan
            }
        } else if de.controls() == oe {
            if same_polarity {
                TenGod::PyeonJae
            } else {
                TenGod::JeongJae
            }
        } else if oe.controls() == de {
            if same_polarity {
                TenGod::PyeonGwan
            } else {
                TenGod::JeongGwan
            }
        } else {
            // oe produces de
            if same_polarity {
                TenGod::PyeonIn
            } else {
                TenGod::JeongIn
            }
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            TenGod::BiGyeon => "비견",
            TenGod::GeopJae => "겁재",
            TenGod::SikSin => "식신",
            TenGod::SangGwan => "상관",
            TenGod::PyeonJae => "편재",
            TenGod::JeongJae => "정재",
            TenGod::PyeonGwan => "편관",
            TenGod::JeongGwan => "정관",
            TenGod::PyeonIn => "편인",
            TenGod::JeongIn => "정인",
        }
    }
}

impl fmt::Display for TenGod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

// ---------------------------
// ## Stem combinations (천간합)
// ---------------------------

/// Transformed element of a stem combination pair (갑기→토, 을경→금, 병신→수,
/// 정임→목, 무계→화), or `None` when the two stems do not combine.
pub fn stem_combination(a: HeavenlyStem, b: HeavenlyStem) -> Option<FiveElement> {
    let (lo, hi) = if a.index() <= b.index() { (a, b) } else { (b, a) };
    if hi.index() != lo.index() + 5 {
        return None;
    }
    Some(match lo {
        HeavenlyStem::Gap => FiveElement::Earth,
        HeavenlyStem::Eul => FiveElement::Metal,
        HeavenlyStem::Byeong => FiveElement::Water,
        HeavenlyStem::Jeong => FiveElement::Wood,
        HeavenlyStem::Mu => FiveElement::Fire,
        _ => unreachable!(),
    })
}

// ---------------------------
// ## Month/hour stem correspondences
// ---------------------------

/// Five-tiger rule (오호둔): stem of the first month (인월) for a year stem.
pub fn first_month_stem(year_stem: HeavenlyStem) -> HeavenlyStem {
    HeavenlyStem::from_index((year_stem.index() % 5) * 2 + 2).unwrap()
}

/// Five-rat rule (오서둔): stem of the first hour (자시) for a day stem.
pub fn first_hour_stem(day_stem: HeavenlyStem) -> HeavenlyStem {
    HeavenlyStem::from_index((day_stem.index() % 5) * 2).unwrap()
}

// ---------------------------
// ## Lucky attributes
// ---------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckyAttributes {
    pub colors: Vec<&'static str>,
    pub direction: &'static str,
    pub numbers: Vec<u8>,
}

pub fn lucky_attributes(element: FiveElement) -> LuckyAttributes {
    match element {
        FiveElement::Wood => LuckyAttributes {
            colors: vec!["청색", "녹색"],
            direction: "동쪽",
            numbers: vec![3, 8],
        },
        FiveElement::Fire => LuckyAttributes {
            colors: vec!["적색", "주황색"],
            direction: "남쪽",
            numbers: vec![2, 7],
        },
        FiveElement::Earth => LuckyAttributes {
            colors: vec!["황색", "갈색"],
            direction: "중앙",
            numbers: vec![5, 10],
        },
        FiveElement::Metal => LuckyAttributes {
            colors: vec!["백색", "은색"],
            direction: "서쪽",
            numbers: vec![4, 9],
        },
        FiveElement::Water => LuckyAttributes {
            colors: vec!["흑색", "남색"],
            direction: "북쪽",
            numbers: vec![1, 6],
        },
    }
}
