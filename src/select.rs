use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::classify::StrengthTier;
use crate::scoring::ScoredCombo;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboStats {
    pub total_generated: usize,
    pub per_tier: BTreeMap<StrengthTier, usize>,
    pub existing: usize,
    pub missing: usize,
    pub coverage_percent: f64,
    pub generation_capped: bool,
    pub truncated: bool,
}

impl ComboStats {
    pub fn from_combos(combos: &[ScoredCombo], generation_capped: bool, top_n: usize) -> Self {
        let mut per_tier: BTreeMap<StrengthTier, usize> =
            StrengthTier::ALL.iter().map(|tier| (*tier, 0)).collect();
        let mut existing = 0usize;

        for combo in combos {
            *per_tier.entry(combo.combo.tier).or_insert(0) += 1;
            if combo.combo.exists {
                existing += 1;
            }
        }

        let total = combos.len();
        let coverage_percent = if total == 0 {
            0.0
        } else {
            existing as f64 / total as f64 * 100.0
        };

        Self {
            total_generated: total,
            per_tier,
            existing,
            missing: total - existing,
            coverage_percent,
            generation_capped,
            truncated: total > top_n,
        }
    }

    pub fn limit_reached(&self) -> bool {
        self.generation_capped || self.truncated
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub results: Vec<ScoredCombo>,
    pub total_generated: usize,
    pub limit_reached: bool,
    pub stats: ComboStats,
}

/// Total descending, then tier score descending, then text ascending.
pub fn compare(a: &ScoredCombo, b: &ScoredCombo) -> Ordering {
    b.priority
        .total
        .cmp(&a.priority.total)
        .then_with(|| b.combo.tier.score().cmp(&a.combo.tier.score()))
        .then_with(|| a.text().cmp(b.text()))
}

pub fn select_top(mut combos: Vec<ScoredCombo>, top_n: usize, generation_capped: bool) -> Selection {
    let stats = ComboStats::from_combos(&combos, generation_capped, top_n);
    combos.sort_by(compare);
    combos.truncate(top_n);

    Selection {
        results: combos,
        total_generated: stats.total_generated,
        limit_reached: stats.limit_reached(),
        stats,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComboFilter {
    pub tiers: Option<Vec<StrengthTier>>,
    pub existence: Option<bool>,
    pub min_total: Option<u8>,
}

impl ComboFilter {
    pub fn matches(&self, combo: &ScoredCombo) -> bool {
        if let Some(tiers) = self.tiers.as_ref() {
            if !tiers.contains(&combo.combo.tier) {
                return false;
            }
        }
        if let Some(exists) = self.existence {
            if combo.combo.exists != exists {
                return false;
            }
        }
        if let Some(min_total) = self.min_total {
            if combo.priority.total < min_total {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, combos: &'a [ScoredCombo]) -> Vec<&'a ScoredCombo> {
        combos.iter().filter(|combo| self.matches(combo)).collect()
    }
}
