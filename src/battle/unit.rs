//! Live battle participants.
//!
//! A `CombatEntity` is instantiated from a `FighterTemplate` at battle
//! setup and owns the mutable per-battle state: current health, the speed
//! gauge, and the alive flag.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::roster::FighterTemplate;

/// Identifies a unit within one battle. Assigned sequentially at setup in
/// join order, which makes it the deterministic tie-break key for the turn
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning handle to the team a unit belongs to. Entities never hold a
/// back-pointer to their team; the team exclusively owns its unit list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TeamId(pub usize);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live combatant.
///
/// `alive` mirrors `current_health > 0` at all times. The flag is kept
/// explicit because removal from the team roster is a separate step (the
/// post-tick elimination sweep), not an instant effect of health reaching
/// zero.
#[derive(Debug, Clone)]
pub struct CombatEntity {
    pub id: UnitId,
    pub team: TeamId,
    pub template: Arc<FighterTemplate>,
    pub current_health: i32,
    /// Speed gauge; reaching 100 makes the unit turn-ready. Reset to 0
    /// immediately after the unit acts.
    pub speed_meter: f64,
    pub alive: bool,
}

impl CombatEntity {
    /// Creates a fresh entity at full health. The id and team are
    /// placeholders until battle setup assigns them in join order.
    pub fn from_template(template: Arc<FighterTemplate>) -> Self {
        CombatEntity {
            id: UnitId(0),
            team: TeamId(0),
            current_health: template.max_health,
            template,
            speed_meter: 0.0,
            alive: true,
        }
    }

    /// Base damage dealt by this unit's action.
    // parry, dodge, block, combo, retaliate would hook in here
    pub fn attack_power(&self) -> i32 {
        self.template.strength
    }

    /// Applies damage. The raw health may go negative; the alive flag
    /// drops the instant health crosses to <= 0 so later actors in the
    /// same tick see this unit as dead. Returns true if the hit was fatal.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        self.current_health -= damage;
        if self.current_health <= 0 {
            self.alive = false;
            true
        } else {
            false
        }
    }

    /// Health clamped at a floor of 0 for reporting.
    pub fn health_display(&self) -> i32 {
        self.current_health.max(0)
    }

    /// Human-readable identity, e.g. `Goblin#3`.
    pub fn label(&self) -> String {
        format!("{}#{}", self.template.name, self.id)
    }
}
