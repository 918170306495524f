//! Recipe tags (breakfast, dinner, ...).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use foodgram_core::{DomainError, DomainResult, Entity, TagId};

use crate::text::{MAX_SHORT_TEXT, require_text};

/// A `#RGB` or `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| DomainError::validation(format!("{s} is not a HEX color")))?;

        let well_formed =
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(DomainError::validation(format!("{s} is not a HEX color")));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for HexColor {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl core::fmt::Display for HexColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tag a recipe can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: Option<HexColor>,
    pub slug: Option<String>,
}

impl Tag {
    pub fn new(
        id: TagId,
        name: impl Into<String>,
        color: Option<HexColor>,
        slug: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        require_text("name", &name, MAX_SHORT_TEXT)?;

        if let Some(slug) = &slug {
            require_text("slug", slug, MAX_SHORT_TEXT)?;
            if !slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(DomainError::validation(format!(
                    "slug '{slug}' may only contain letters, digits, '-' and '_'"
                )));
            }
        }

        Ok(Self {
            id,
            name,
            color,
            slug,
        })
    }
}

impl Entity for Tag {
    type Id = TagId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
