use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::entities::{project::Project, skill::Skill};

pub const TECH_STACK_CATEGORY: &str = "Tech Stack";

/// Identity of an entry in the rendered skill list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SkillKey {
    Stored(Uuid),
    /// Synthetic, derived from the tech tag text.
    Derived(String),
}

/// A skill as presented: either a stored record or one synthesized from a
/// project's tech tag. Derived entries are never written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySkill {
    pub key: SkillKey,
    pub name: String,
    pub category: String,
    pub level: Option<String>,
}

impl DisplaySkill {
    pub fn derived(tag: &str) -> Self {
        DisplaySkill {
            key: SkillKey::Derived(format!("tech-{tag}")),
            name: tag.to_string(),
            category: TECH_STACK_CATEGORY.to_string(),
            level: None,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.key, SkillKey::Derived(_))
    }
}

impl From<&Skill> for DisplaySkill {
    fn from(skill: &Skill) -> Self {
        DisplaySkill {
            key: SkillKey::Stored(skill.id),
            name: skill.name.clone(),
            category: skill.category.clone(),
            level: Some(skill.level.clone()),
        }
    }
}

/// Distinct tech tags across all projects in first-seen order. Tags are
/// trimmed, blanks dropped, and duplicates collapsed case-insensitively
/// keeping the first spelling.
pub fn distinct_tech_tags(projects: &[Project]) -> Vec<&str> {
    let mut seen = HashSet::new();
    projects
        .iter()
        .flat_map(|p| p.tech_stack.iter())
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(Skill::match_key(tag)))
        .collect()
}

/// Fetched skills in server order, followed by one derived entry for every
/// tech tag that no fetched skill names (case-insensitively).
pub fn merge_skills(skills: &[Skill], projects: &[Project]) -> Vec<DisplaySkill> {
    let known: HashSet<String> = skills.iter().map(|s| Skill::match_key(&s.name)).collect();

    let derived = distinct_tech_tags(projects)
        .into_iter()
        .filter(|tag| !known.contains(&Skill::match_key(tag)))
        .map(DisplaySkill::derived);

    skills.iter().map(DisplaySkill::from).chain(derived).collect()
}
