//! Shopping-list aggregation and rendering.
//!
//! A user's cart expands into ingredient lines (one per recipe ingredient).
//! Lines are merged by `(name, measurement_unit)`: the same name in a different
//! unit stays a separate line. The result is ordered by name, then unit, using
//! plain byte-wise comparison, so ordering is case-sensitive ("Zucchini" sorts
//! before "apple").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use foodgram_core::ValueObject;

/// File name the rendered list is downloaded as.
pub const SHOPPING_LIST_FILENAME: &str = "wishlist.txt";

/// One ingredient line of one recipe, denormalised for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Grouping key: ingredient identity as seen by the shopper.
///
/// Field order matters: the derived `Ord` sorts by name first, unit second.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeasureKey {
    pub name: String,
    pub measurement_unit: String,
}

impl MeasureKey {
    pub fn new(name: &str, measurement_unit: &str) -> Self {
        Self {
            name: name.to_string(),
            measurement_unit: measurement_unit.to_string(),
        }
    }
}

impl ValueObject for MeasureKey {}

/// Total amount of one ingredient across the whole cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

impl ValueObject for AggregatedLine {}

/// Merge ingredient lines by `(name, unit)` and sum their amounts.
///
/// Output holds one entry per distinct key, ascending by name then unit.
/// Sums are accumulated in `u64`; per-line amounts are `u32`.
pub fn aggregate<I>(lines: I) -> Vec<AggregatedLine>
where
    I: IntoIterator<Item = IngredientLine>,
{
    let mut totals: BTreeMap<MeasureKey, u64> = BTreeMap::new();

    for line in lines {
        let key = MeasureKey {
            name: line.name,
            measurement_unit: line.measurement_unit,
        };
        let total = totals.entry(key).or_insert(0);
        *total = total.saturating_add(u64::from(line.amount));
    }

    totals
        .into_iter()
        .map(|(key, amount)| AggregatedLine {
            name: key.name,
            measurement_unit: key.measurement_unit,
            amount,
        })
        .collect()
}

/// Render aggregated lines as a plain-text document.
///
/// One `"<name> - <amount> <unit>\n"` line per entry, in the given order.
/// Empty input renders as an empty document.
pub fn render(lines: &[AggregatedLine]) -> String {
    lines
        .iter()
        .map(|l| format!("{} - {} {}\n", l.name, l.amount, l.measurement_unit))
        .collect()
}
