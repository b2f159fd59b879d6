//! Criteria management: the weighted, typed criteria table the scoring engine consumes.
//!
//! Every edit keeps each non-empty category's subtotal pinned to its fixed target by
//! redistributing weight proportionally across the category's other members.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Criterion, CriterionCategory, CriterionKey, CriterionType};
use super::scoring::{SawEngine, ScoringOptions};

/// Subtotals closer than this to their target count as balanced.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriteriaError {
    #[error("criterion {0} already exists")]
    DuplicateKey(CriterionKey),
    #[error("criterion {0} does not exist")]
    UnknownKey(CriterionKey),
    #[error("criterion {key} has invalid weight {weight} (expected 0..=100)")]
    InvalidWeight { key: CriterionKey, weight: f64 },
    #[error("{} weights sum to {actual:.2}, expected {expected:.2}", .category.label())]
    CategoryDrift {
        category: CriterionCategory,
        expected: f64,
        actual: f64,
    },
}

/// Category whose weights do not add up to the fixed target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryDrift {
    pub category: CriterionCategory,
    pub expected: f64,
    pub actual: f64,
}

/// Report every non-empty category whose subtotal misses its target.
pub fn category_drift(criteria: &[Criterion]) -> Vec<CategoryDrift> {
    CriterionCategory::ordered()
        .into_iter()
        .filter_map(|category| {
            let members = criteria
                .iter()
                .filter(|criterion| criterion.category == category);
            let mut count = 0usize;
            let mut actual = 0.0;
            for criterion in members {
                count += 1;
                actual += criterion.weight;
            }
            let expected = category.target_weight();
            if count == 0 || (actual - expected).abs() <= WEIGHT_TOLERANCE {
                None
            } else {
                Some(CategoryDrift {
                    category,
                    expected,
                    actual,
                })
            }
        })
        .collect()
}

/// Partial edit applied by [`CriteriaCatalog::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub criterion_type: Option<CriterionType>,
    #[serde(default)]
    pub category: Option<CriterionCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaCatalog {
    criteria: Vec<Criterion>,
}

impl CriteriaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load criteria as supplied, without rebalancing.
    pub fn from_criteria(criteria: Vec<Criterion>) -> Result<Self, CriteriaError> {
        let mut catalog = Self::new();
        for criterion in criteria {
            validate_weight(criterion.key, criterion.weight)?;
            if catalog.get(criterion.key).is_some() {
                return Err(CriteriaError::DuplicateKey(criterion.key));
            }
            catalog.criteria.push(criterion);
        }
        Ok(catalog)
    }

    /// All thirteen criteria with equal shares inside each category.
    pub fn standard() -> Self {
        let criteria = CriterionKey::ordered()
            .into_iter()
            .map(|key| {
                let category = key.category();
                let members = CriterionKey::ordered()
                    .into_iter()
                    .filter(|candidate| candidate.category() == category)
                    .count();
                Criterion::standard(key, category.target_weight() / members as f64)
            })
            .collect();
        Self { criteria }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn into_criteria(self) -> Vec<Criterion> {
        self.criteria
    }

    pub fn get(&self, key: CriterionKey) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| criterion.key == key)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn add(&mut self, criterion: Criterion) -> Result<(), CriteriaError> {
        validate_weight(criterion.key, criterion.weight)?;
        if self.get(criterion.key).is_some() {
            return Err(CriteriaError::DuplicateKey(criterion.key));
        }

        let key = criterion.key;
        let category = criterion.category;
        self.criteria.push(criterion);
        self.rebalance(category, Some(key));
        Ok(())
    }

    pub fn update(
        &mut self,
        key: CriterionKey,
        update: CriterionUpdate,
    ) -> Result<(), CriteriaError> {
        if let Some(weight) = update.weight {
            validate_weight(key, weight)?;
        }

        let criterion = self
            .criteria
            .iter_mut()
            .find(|criterion| criterion.key == key)
            .ok_or(CriteriaError::UnknownKey(key))?;

        let previous_category = criterion.category;
        if let Some(name) = update.name {
            criterion.name = name;
        }
        if let Some(criterion_type) = update.criterion_type {
            criterion.criterion_type = criterion_type;
        }
        if let Some(weight) = update.weight {
            criterion.weight = weight;
        }
        if let Some(category) = update.category {
            criterion.category = category;
        }
        let category = criterion.category;

        if category != previous_category {
            self.rebalance(previous_category, None);
        }
        self.rebalance(category, Some(key));
        Ok(())
    }

    pub fn remove(&mut self, key: CriterionKey) -> Result<Criterion, CriteriaError> {
        let index = self
            .criteria
            .iter()
            .position(|criterion| criterion.key == key)
            .ok_or(CriteriaError::UnknownKey(key))?;

        let removed = self.criteria.remove(index);
        self.rebalance(removed.category, None);
        Ok(removed)
    }

    pub fn category_total(&self, category: CriterionCategory) -> f64 {
        self.criteria
            .iter()
            .filter(|criterion| criterion.category == category)
            .map(|criterion| criterion.weight)
            .sum()
    }

    pub fn category_totals(&self) -> Vec<(CriterionCategory, f64)> {
        CriterionCategory::ordered()
            .into_iter()
            .map(|category| (category, self.category_total(category)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), CriteriaError> {
        match category_drift(&self.criteria).first() {
            Some(drift) => Err(CriteriaError::CategoryDrift {
                category: drift.category,
                expected: drift.expected,
                actual: drift.actual,
            }),
            None => Ok(()),
        }
    }

    /// Weight fractions keyed by criterion, as the engine consumes them.
    pub fn weights(&self) -> BTreeMap<CriterionKey, f64> {
        self.criteria
            .iter()
            .map(|criterion| (criterion.key, criterion.weight_fraction()))
            .collect()
    }

    pub fn types(&self) -> BTreeMap<CriterionKey, CriterionType> {
        self.criteria
            .iter()
            .map(|criterion| (criterion.key, criterion.criterion_type))
            .collect()
    }

    pub fn to_engine(&self, options: ScoringOptions) -> SawEngine {
        SawEngine::new(self.weights(), self.types(), options)
    }

    /// Pin `pinned` to its own weight (capped at the target) and scale the remaining members
    /// of `category` so the subtotal equals the target. Without a pin, every member scales.
    fn rebalance(&mut self, category: CriterionCategory, pinned: Option<CriterionKey>) {
        let target = category.target_weight();
        let members: Vec<usize> = self
            .criteria
            .iter()
            .enumerate()
            .filter(|(_, criterion)| criterion.category == category)
            .map(|(index, _)| index)
            .collect();

        if members.is_empty() {
            return;
        }

        let pinned_index = pinned.and_then(|key| {
            members
                .iter()
                .copied()
                .find(|index| self.criteria[*index].key == key)
        });
        let others: Vec<usize> = members
            .iter()
            .copied()
            .filter(|index| Some(*index) != pinned_index)
            .collect();

        if others.is_empty() {
            // A lone member carries the whole category.
            if let Some(index) = pinned_index {
                self.criteria[index].weight = target;
            }
            return;
        }

        let pinned_weight = match pinned_index {
            Some(index) => {
                let weight = self.criteria[index].weight.min(target);
                self.criteria[index].weight = weight;
                weight
            }
            None => 0.0,
        };
        let remaining = target - pinned_weight;
        let others_total: f64 = others
            .iter()
            .map(|index| self.criteria[*index].weight)
            .sum();

        for index in &others {
            let weight = if others_total > 0.0 {
                self.criteria[*index].weight / others_total * remaining
            } else {
                remaining / others.len() as f64
            };
            self.criteria[*index].weight = weight;
        }

        debug!(
            category = category.label(),
            members = members.len(),
            pinned = pinned.map(CriterionKey::as_str),
            "rebalanced category weights"
        );
    }
}

fn validate_weight(key: CriterionKey, weight: f64) -> Result<(), CriteriaError> {
    if weight.is_finite() && (0.0..=100.0).contains(&weight) {
        Ok(())
    } else {
        Err(CriteriaError::InvalidWeight { key, weight })
    }
}
