//! Fighter templates and the roster provider.
//!
//! A `FighterTemplate` is the immutable stat blueprint a live combatant is
//! instantiated from. The `Roster` owns the template database, answers
//! lookups by name, and rolls upgraded fighters for battle setup.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of random stat upgrades applied when rolling a fresh fighter.
pub const UPGRADE_POINTS: u32 = 10;

/// Errors from roster lookups and roster-file loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("unknown template: '{0}'")]
    UnknownTemplate(String),

    #[error("duplicate template name: '{0}'")]
    DuplicateTemplate(String),

    #[error("template '{0}' has a non-positive stat")]
    NonPositiveStat(String),

    #[error("malformed roster JSON: {0}")]
    Malformed(String),
}

/// Immutable stat blueprint for a combatant.
///
/// Shared read-only (via `Arc`) among every live entity derived from it;
/// battle logic never mutates a template. `agility` is carried for future
/// evasion/crit mechanics and plays no part in core resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterTemplate {
    pub name: String,
    pub strength: i32,
    pub agility: i32,
    pub speed: i32,
    pub max_health: i32,
}

impl FighterTemplate {
    pub fn new(name: &str, strength: i32, agility: i32, speed: i32, max_health: i32) -> Self {
        FighterTemplate {
            name: name.to_string(),
            strength,
            agility,
            speed,
            max_health,
        }
    }

    /// Returns true if every stat is strictly positive.
    fn is_valid(&self) -> bool {
        self.strength > 0 && self.agility > 0 && self.speed > 0 && self.max_health > 0
    }
}

/// Template database handed to the setup collaborators.
///
/// Explicitly passed wherever templates are needed; there is no global
/// registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    templates: HashMap<String, Arc<FighterTemplate>>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Roster {
            templates: HashMap::new(),
        }
    }

    /// The pregenerated template database.
    pub fn standard() -> Self {
        let mut roster = Roster::new();
        for t in [
            FighterTemplate::new("Goblin", 1, 4, 5, 40),
            FighterTemplate::new("Bandit", 3, 2, 2, 60),
            FighterTemplate::new("Giant", 15, 2, 3, 300),
        ] {
            roster.templates.insert(t.name.clone(), Arc::new(t));
        }
        roster
    }

    /// Loads a roster from a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let templates: Vec<FighterTemplate> =
            serde_json::from_str(json).map_err(|e| RosterError::Malformed(e.to_string()))?;

        let mut roster = Roster::new();
        for t in templates {
            if !t.is_valid() {
                return Err(RosterError::NonPositiveStat(t.name));
            }
            if roster.templates.contains_key(&t.name) {
                return Err(RosterError::DuplicateTemplate(t.name));
            }
            roster.templates.insert(t.name.clone(), Arc::new(t));
        }
        Ok(roster)
    }

    /// Looks up a template by name. A miss is a typed failure, never a
    /// substituted default.
    pub fn get(&self, name: &str) -> Result<Arc<FighterTemplate>, RosterError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| RosterError::UnknownTemplate(name.to_string()))
    }

    /// Rolls a fresh fighter from the named template: a copy of the base
    /// stats plus `UPGRADE_POINTS` random upgrades. Each upgrade roll adds
    /// +1 strength, +1 agility, +1 speed, or +10 max health, so every
    /// rolled stat is >= its base value.
    pub fn create_fighter<R: Rng>(
        &self,
        name: &str,
        rng: &mut R,
    ) -> Result<Arc<FighterTemplate>, RosterError> {
        let base = self.get(name)?;
        let mut rolled = (*base).clone();
        for _ in 0..UPGRADE_POINTS {
            match rng.gen_range(1..=5) {
                1 => rolled.strength += 1,
                2 => rolled.agility += 1,
                3 => rolled.speed += 1,
                _ => rolled.max_health += 10,
            }
        }
        Ok(Arc::new(rolled))
    }

    /// Template names in sorted order, for deterministic listings.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
