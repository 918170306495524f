//! Start-up provisioning of user profiles and the tag/ingredient catalog.
//!
//! The seed file is JSON:
//!
//! ```json
//! {
//!   "users": [{ "id": "...", "email": "...", "username": "...", "first_name": "...", "last_name": "..." }],
//!   "ingredients": [{ "name": "flour", "measurement_unit": "g" }],
//!   "tags": [{ "name": "Lunch", "color": "#E26C2D", "slug": "lunch" }]
//! }
//! ```
//!
//! Entries that already exist are skipped, so the same file can be applied on
//! every start. Users and ingredients are deduplicated by the store's unique
//! keys; tags by slug.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use foodgram_core::{DomainError, IngredientId, TagId};
use foodgram_infra::store::StoreError;
use foodgram_recipes::{HexColor, Ingredient, Tag, UserProfile};

use crate::app::AppServices;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Read(#[from] std::io::Error),

    #[error("malformed seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid seed entry: {0}")]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub ingredients: Vec<IngredientSeed>,
    #[serde(default)]
    pub tags: Vec<TagSeed>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientSeed {
    #[serde(default)]
    pub id: Option<IngredientId>,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Deserialize)]
pub struct TagSeed {
    #[serde(default)]
    pub id: Option<TagId>,
    pub name: String,
    #[serde(default)]
    pub color: Option<HexColor>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Counts of applied and already-present entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl SeedReport {
    fn record(&mut self, outcome: Result<(), StoreError>) -> Result<(), SeedError> {
        match outcome {
            Ok(()) => self.inserted += 1,
            Err(StoreError::DuplicateEntry(msg)) => {
                tracing::debug!(reason = %msg, "seed entry already present");
                self.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

/// Tags carry no unique column; a seed tag matches by id, then slug, then name.
fn same_tag(a: &Tag, b: &Tag) -> bool {
    a.id == b.id
        || match (&a.slug, &b.slug) {
            (Some(x), Some(y)) => x == y,
            (None, None) => a.name == b.name,
            _ => false,
        }
}

pub fn load_file(path: &Path) -> Result<Seed, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Validate every entry, then insert them; nothing is written if any entry is invalid.
pub async fn apply(services: &AppServices, seed: Seed) -> Result<SeedReport, SeedError> {
    let ingredients = seed
        .ingredients
        .into_iter()
        .map(|i| Ingredient::new(i.id.unwrap_or_default(), i.name, i.measurement_unit))
        .collect::<Result<Vec<_>, _>>()?;
    let tags = seed
        .tags
        .into_iter()
        .map(|t| Tag::new(t.id.unwrap_or_default(), t.name, t.color, t.slug))
        .collect::<Result<Vec<_>, _>>()?;

    let store = services.store();
    let mut report = SeedReport::default();
    for profile in seed.users {
        report.record(store.insert_user(profile).await)?;
    }
    for ingredient in ingredients {
        report.record(store.insert_ingredient(ingredient).await)?;
    }
    let mut existing = store.list_tags().await?;
    for tag in tags {
        if existing.iter().any(|t| same_tag(t, &tag)) {
            report.skipped += 1;
            continue;
        }
        report.record(store.insert_tag(tag.clone()).await)?;
        existing.push(tag);
    }

    tracing::info!(inserted = report.inserted, skipped = report.skipped, "seed applied");
    Ok(report)
}
