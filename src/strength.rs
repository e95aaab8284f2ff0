//! Day-stem body-strength (신강/신약) evaluation.
//!
//! Three classical yes/no supports are checked; seasonal command counts
//! double. The resulting 0..=4 score maps onto five grades with Balanced at
//! the midpoint. The cutoffs are a documented policy (classical sources
//! disagree), kept as named constants rather than inline numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pillars::FourPillars;
use crate::tables::{hidden_stems, FiveElement};

pub const SEASONAL_WEIGHT: u8 = 2;
pub const ROOT_WEIGHT: u8 = 1;
pub const SUPPORT_WEIGHT: u8 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyStrengthGrade {
    VeryWeak,
    Weak,
    Balanced,
    Strong,
    VeryStrong,
}

impl BodyStrengthGrade {
    pub fn is_strong_side(self) -> bool {
        matches!(self, BodyStrengthGrade::Strong | BodyStrengthGrade::VeryStrong)
    }

    pub fn is_weak_side(self) -> bool {
        matches!(self, BodyStrengthGrade::Weak | BodyStrengthGrade::VeryWeak)
    }

    pub fn korean(self) -> &'static str {
        match self {
            BodyStrengthGrade::VeryStrong => "극신강",
            BodyStrengthGrade::Strong => "신강",
            BodyStrengthGrade::Balanced => "중화",
            BodyStrengthGrade::Weak => "신약",
            BodyStrengthGrade::VeryWeak => "극신약",
        }
    }
}

impl fmt::Display for BodyStrengthGrade {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.korean())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyStrength {
    pub grade: BodyStrengthGrade,
    /// Month branch element matches or produces the day element (득령).
    pub seasonal_command: bool,
    /// Some branch hides a stem of the day element (득지/통근).
    pub rooted: bool,
    /// Another visible stem matches or produces the day element (득세).
    pub supported: bool,
    pub score: u8,
}

pub fn evaluate(pillars: &FourPillars) -> BodyStrength {
    let day_element = pillars.day_stem().element();

    let month_element = pillars.month.branch.element();
    let seasonal_command =
        month_element == day_element || month_element.produces() == day_element;

    let rooted = pillars
        .branches()
        .iter()
        .any(|&branch| hidden_stems(branch).iter().any(|&(s, _)| s.element() == day_element));

    let supported = [pillars.year.stem, pillars.month.stem, pillars.hour.stem]
        .iter()
        .any(|&stem| supports(stem.element(), day_element));

    let score = u8::from(seasonal_command) * SEASONAL_WEIGHT
        + u8::from(rooted) * ROOT_WEIGHT
        + u8::from(supported) * SUPPORT_WEIGHT;

    let grade = match score {
        4 => BodyStrengthGrade::VeryStrong,
        3 => BodyStrengthGrade::Strong,
        2 => BodyStrengthGrade::Balanced,
        1 => BodyStrengthGrade::Weak,
        _ => BodyStrengthGrade::VeryWeak,
    };

    BodyStrength {
        grade,
        seasonal_command,
        rooted,
        supported,
        score,
    }
}

fn supports(other: FiveElement, day: FiveElement) -> bool {
    other == day || other.produces() == day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::SexagenaryPair;

    fn pair(s: &str) -> SexagenaryPair {
        SexagenaryPair::all().find(|p| p.to_string() == s).unwrap()
    }

    fn chart(y: &str, m: &str, d: &str, h: &str) -> FourPillars {
        FourPillars {
            year: pair(y),
            month: pair(m),
            day: pair(d),
            hour: pair(h),
        }
    }

    #[test]
    fn midpoint_score_is_balanced() {
        // 기(토) day stem in a 묘 month: no seasonal command, but rooted in 오
        // and supported by the 기 month stem.
        let strength = evaluate(&chart("경오", "기묘", "기묘", "경오"));
        assert!(!strength.seasonal_command);
        assert!(strength.rooted);
        assert!(strength.supported);
        assert_eq!(strength.score, 2);
        assert_eq!(strength.grade, BodyStrengthGrade::Balanced);
    }

    #[test]
    fn full_support_is_very_strong() {
        // 갑(목) day in a 묘 month, rooted everywhere, wood/water stems around
        let strength = evaluate(&chart("갑인", "을묘", "갑인", "갑자"));
        assert!(strength.seasonal_command);
        assert!(strength.rooted);
        assert!(strength.supported);
        assert_eq!(strength.grade, BodyStrengthGrade::VeryStrong);
    }

    #[test]
    fn no_support_is_very_weak() {
        // 갑(목) day stranded in metal and earth with no root: 신유술축 hide
        // no wood at all.
        let strength = evaluate(&chart("경신", "기축", "갑술", "신유"));
        assert!(!strength.seasonal_command);
        assert!(!strength.rooted);
        assert!(!strength.supported);
        assert_eq!(strength.grade, BodyStrengthGrade::VeryWeak);
    }

    #[test]
    fn seasonal_command_counts_double() {
        // 무(토) day, 진 month commands (토==토); rooted in 진/술; the metal
        // stems give no support. Command at double weight lifts this to 3.
        let strength = evaluate(&chart("경신", "경진", "무술", "경신"));
        assert!(strength.seasonal_command);
        assert!(strength.rooted);
        assert!(!strength.supported);
        assert_eq!(strength.score, 3);
        assert_eq!(strength.grade, BodyStrengthGrade::Strong);
    }
}
