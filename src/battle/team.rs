//! Combat teams.
//!
//! A team exclusively owns its unit list; units are appended in join order
//! and that ordering stays stable for deterministic simulation.

use super::unit::{CombatEntity, TeamId};

/// An ordered set of units owned by one side of a battle.
#[derive(Debug, Clone)]
pub struct CombatTeam {
    pub id: TeamId,
    pub units: Vec<CombatEntity>,
}

impl CombatTeam {
    pub fn new(id: TeamId) -> Self {
        CombatTeam {
            id,
            units: Vec::new(),
        }
    }

    /// Appends a unit; join order is insertion order.
    pub fn add_unit(&mut self, unit: CombatEntity) {
        self.units.push(unit);
    }

    /// A team with no units left is out of the battle.
    pub fn is_eliminated(&self) -> bool {
        self.units.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.units.iter().filter(|u| u.alive).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::FighterTemplate;
    use std::sync::Arc;

    #[test]
    fn add_unit_preserves_join_order() {
        let mut team = CombatTeam::new(TeamId(0));
        for name in ["A", "B", "C"] {
            let t = Arc::new(FighterTemplate::new(name, 1, 1, 1, 10));
            team.add_unit(CombatEntity::from_template(t));
        }
        let names: Vec<&str> = team.units.iter().map(|u| u.template.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_team_is_eliminated() {
        let team = CombatTeam::new(TeamId(1));
        assert!(team.is_eliminated());
        assert_eq!(team.alive_count(), 0);
    }
}
