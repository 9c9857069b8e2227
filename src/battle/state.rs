//! Battle state aggregate.
//!
//! Holds the set of currently-active teams in one encounter plus the tick
//! clock, and validates the setup preconditions. Teams that lose their
//! last unit are dropped from the aggregate entirely by the elimination
//! sweep, which keeps "active teams" and "teams present here" the same
//! set between ticks.

use super::team::CombatTeam;
use super::unit::{CombatEntity, TeamId, UnitId};
use crate::roster::RosterError;

/// Errors from battle setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a battle needs at least two teams, got {0}")]
    NotEnoughTeams(usize),

    #[error("team {0} has no units")]
    EmptyTeam(TeamId),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// All mutable state of one battle.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub teams: Vec<CombatTeam>,
    /// Ticks of simulated time elapsed since setup.
    pub clock: u64,
}

impl BattleState {
    /// Builds a battle from assembled teams.
    ///
    /// Requires at least two teams, each with at least one unit. Team ids
    /// and unit ids are (re)assigned here, sequentially in join order, so
    /// every unit carries the deterministic tie-break key and a consistent
    /// back-handle to its team.
    pub fn new(mut teams: Vec<CombatTeam>) -> Result<Self, SetupError> {
        if teams.len() < 2 {
            return Err(SetupError::NotEnoughTeams(teams.len()));
        }

        let mut next_unit = 0u32;
        for (index, team) in teams.iter_mut().enumerate() {
            let id = TeamId(index);
            team.id = id;
            if team.units.is_empty() {
                return Err(SetupError::EmptyTeam(id));
            }
            for unit in &mut team.units {
                unit.id = UnitId(next_unit);
                unit.team = id;
                next_unit += 1;
            }
        }

        Ok(BattleState { teams, clock: 0 })
    }

    /// Iterates every unit across all teams, in team then join order.
    pub fn units(&self) -> impl Iterator<Item = &CombatEntity> {
        self.teams.iter().flat_map(|t| t.units.iter())
    }

    pub fn unit(&self, id: UnitId) -> Option<&CombatEntity> {
        self.units().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut CombatEntity> {
        self.teams
            .iter_mut()
            .flat_map(|t| t.units.iter_mut())
            .find(|u| u.id == id)
    }

    /// The target pool for a unit on `attacker_team`: every alive unit
    /// belonging to any other team, across all active teams.
    pub fn target_pool(&self, attacker_team: TeamId) -> Vec<UnitId> {
        self.teams
            .iter()
            .filter(|t| t.id != attacker_team)
            .flat_map(|t| t.units.iter())
            .filter(|u| u.alive)
            .map(|u| u.id)
            .collect()
    }

    pub fn active_team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn alive_count(&self) -> usize {
        self.units().filter(|u| u.alive).count()
    }
}
