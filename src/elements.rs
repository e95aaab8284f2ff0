//! Five-element weight aggregation over the four pillars.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::pillars::FourPillars;
use crate::tables::{hidden_stems, FiveElement};

/// Top weight may not exceed this multiple of the bottom weight for a chart
/// to count as balanced.
pub const BALANCE_RATIO: f64 = 2.0;
/// Floor applied to the bottom weight before the ratio test, so a single
/// absent element does not mark every chart unbalanced.
pub const BALANCE_FLOOR: f64 = 0.5;

/// Element→weight distribution of one chart. Recomputed per request; both
/// counting variants total 8.0 (four stems plus four branches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBalance {
    pub weights: HashMap<FiveElement, f64>,
}

impl ElementBalance {
    /// Simple count: every visible stem and branch adds one unit to its own
    /// element.
    pub fn simple(pillars: &FourPillars) -> ElementBalance {
        let mut balance = ElementBalance::zero();
        for stem in pillars.stems() {
            balance.add(stem.element(), 1.0);
        }
        for branch in pillars.branches() {
            balance.add(branch.element(), 1.0);
        }
        balance
    }

    /// Hidden-stem weighted count: stems add one unit each, branches
    /// distribute one unit over their 지장간 composition.
    pub fn weighted(pillars: &FourPillars) -> ElementBalance {
        let mut balance = ElementBalance::zero();
        for stem in pillars.stems() {
            balance.add(stem.element(), 1.0);
        }
        for branch in pillars.branches() {
            for &(hidden, weight) in hidden_stems(branch) {
                balance.add(hidden.element(), weight);
            }
        }
        balance
    }

    fn zero() -> ElementBalance {
        ElementBalance {
            weights: FiveElement::iter().map(|e| (e, 0.0)).collect(),
        }
    }

    fn add(&mut self, element: FiveElement, weight: f64) {
        *self.weights.entry(element).or_insert(0.0) += weight;
    }

    pub fn get(&self, element: FiveElement) -> f64 {
        self.weights.get(&element).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Heaviest element; ties resolve in canonical element order.
    pub fn dominant(&self) -> FiveElement {
        FiveElement::iter()
            .max_by(|a, b| self.get(*a).partial_cmp(&self.get(*b)).unwrap())
            .unwrap()
    }

    /// Lightest element; ties resolve in canonical element order.
    pub fn weakest(&self) -> FiveElement {
        FiveElement::iter()
            .min_by(|a, b| self.get(*a).partial_cmp(&self.get(*b)).unwrap())
            .unwrap()
    }

    /// Balanced iff the top weight stays within `BALANCE_RATIO` times the
    /// bottom weight (floored at `BALANCE_FLOOR`).
    pub fn is_balanced(&self) -> bool {
        let max = self.get(self.dominant());
        let min = self.get(self.weakest()).max(BALANCE_FLOOR);
        max <= BALANCE_RATIO * min
    }

    /// Elements present with weight of at least `threshold`.
    pub fn at_least(&self, threshold: f64) -> Vec<FiveElement> {
        FiveElement::iter()
            .filter(|&e| self.get(e) >= threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::SexagenaryPair;
    use approx::assert_relative_eq;

    fn pair(s: &str) -> SexagenaryPair {
        SexagenaryPair::all().find(|p| p.to_string() == s).unwrap()
    }

    fn fixture() -> FourPillars {
        FourPillars {
            year: pair("경오"),
            month: pair("기묘"),
            day: pair("기묘"),
            hour: pair("경오"),
        }
    }

    #[test]
    fn simple_count_sums_to_eight() {
        let balance = ElementBalance::simple(&fixture());
        assert_relative_eq!(balance.total(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(balance.get(FiveElement::Metal), 2.0);
        assert_relative_eq!(balance.get(FiveElement::Earth), 2.0);
        assert_relative_eq!(balance.get(FiveElement::Fire), 2.0);
        assert_relative_eq!(balance.get(FiveElement::Wood), 2.0);
        assert_relative_eq!(balance.get(FiveElement::Water), 0.0);
    }

    #[test]
    fn weighted_count_sums_to_eight() {
        let balance = ElementBalance::weighted(&fixture());
        assert_relative_eq!(balance.total(), 8.0, epsilon = 1e-9);
        // 오 leaks 기(토) alongside its fire; 묘 is pure wood
        assert_relative_eq!(balance.get(FiveElement::Fire), 1.4, epsilon = 1e-9);
        assert_relative_eq!(balance.get(FiveElement::Earth), 2.6, epsilon = 1e-9);
        assert_relative_eq!(balance.get(FiveElement::Wood), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn weighted_sums_hold_for_every_branch_combination() {
        for pillars in [
            fixture(),
            FourPillars {
                year: pair("갑자"),
                month: pair("병인"),
                day: pair("기사"),
                hour: pair("정묘"),
            },
        ] {
            assert_relative_eq!(
                ElementBalance::weighted(&pillars).total(),
                8.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn dominant_and_weakest() {
        let balance = ElementBalance::weighted(&fixture());
        assert_eq!(balance.dominant(), FiveElement::Earth);
        assert_eq!(balance.weakest(), FiveElement::Water);
    }

    #[test]
    fn balance_threshold_policy() {
        // 2.6 > 2.0 * max(0.0, 0.5): the fixture is not balanced
        assert!(!ElementBalance::weighted(&fixture()).is_balanced());
        // perfectly even distribution is balanced
        let mut even = ElementBalance::zero();
        for e in FiveElement::iter() {
            even.add(e, 1.6);
        }
        assert!(even.is_balanced());
    }
}
