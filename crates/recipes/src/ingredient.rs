//! Ingredient catalog entries.

use serde::{Deserialize, Serialize};

use foodgram_core::{DomainResult, Entity, IngredientId};

use crate::shopping_list::MeasureKey;
use crate::text::{MAX_SHORT_TEXT, require_text};

/// A catalog ingredient: a name measured in a fixed unit.
///
/// The catalog is unique per `(name, measurement_unit)`; "salt, g" and
/// "salt, pinch" are different ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

impl Ingredient {
    pub fn new(
        id: IngredientId,
        name: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let measurement_unit = measurement_unit.into();
        require_text("name", &name, MAX_SHORT_TEXT)?;
        require_text("measurement_unit", &measurement_unit, MAX_SHORT_TEXT)?;

        Ok(Self {
            id,
            name,
            measurement_unit,
        })
    }

    /// The catalog uniqueness key.
    pub fn measure_key(&self) -> MeasureKey {
        MeasureKey::new(&self.name, &self.measurement_unit)
    }

    /// Case-insensitive prefix match used by the catalog search.
    pub fn matches_name_prefix(&self, query: &str) -> bool {
        self.name.to_lowercase().starts_with(&query.to_lowercase())
    }
}

impl Entity for Ingredient {
    type Id = IngredientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Catalog listing order: by name, then unit.
pub fn sort_catalog(items: &mut [Ingredient]) {
    items.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodgram_core::DomainError;

    fn ingredient(name: &str, unit: &str) -> Ingredient {
        Ingredient::new(IngredientId::new(), name, unit).unwrap()
    }

    #[test]
    fn rejects_blank_name_and_unit() {
        let err = Ingredient::new(IngredientId::new(), "  ", "g").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = Ingredient::new(IngredientId::new(), "flour", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_overlong_name() {
        let name = "a".repeat(201);
        let err = Ingredient::new(IngredientId::new(), name, "g").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn prefix_search_ignores_case() {
        let flour = ingredient("Flour", "g");
        assert!(flour.matches_name_prefix("fl"));
        assert!(flour.matches_name_prefix("FLO"));
        assert!(flour.matches_name_prefix(""));
        assert!(!flour.matches_name_prefix("our"));
    }

    #[test]
    fn catalog_sorts_by_name_then_unit() {
        let mut items = vec![
            ingredient("salt", "pinch"),
            ingredient("flour", "g"),
            ingredient("salt", "g"),
        ];
        sort_catalog(&mut items);

        let keys: Vec<_> = items
            .iter()
            .map(|i| (i.name.as_str(), i.measurement_unit.as_str()))
            .collect();
        assert_eq!(keys, vec![("flour", "g"), ("salt", "g"), ("salt", "pinch")]);
    }
}
