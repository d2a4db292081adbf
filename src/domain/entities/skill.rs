use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SKILL_LEVEL: &str = "Intermediate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default = "default_level")]
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_level() -> String {
    DEFAULT_SKILL_LEVEL.to_string()
}

impl Skill {
    /// Catalog order: category ascending, then name ascending.
    ///
    /// Byte-wise so the order does not depend on the database collation.
    pub fn catalog_order(a: &Skill, b: &Skill) -> Ordering {
        a.category
            .cmp(&b.category)
            .then_with(|| a.name.cmp(&b.name))
    }

    /// Canonical form used for case-insensitive name matching.
    pub fn match_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}
