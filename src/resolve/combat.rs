//! Action resolution.
//!
//! Consumes a tick's turn-ready sequence: each actor re-checks its own
//! liveness, picks a uniform-random target from the opposing alive units,
//! and applies flat strength damage. After the whole sequence resolves,
//! the elimination sweep removes dead units and empty teams, and the
//! terminal check reports a win, a draw, or an ongoing battle.

use rand::Rng;
use serde::Serialize;

use crate::battle::{BattleState, TeamId, UnitId};

/// Errors from tick resolution. These indicate inconsistent scheduler or
/// resolver state, never a normal battle outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("unit {0} has no opposing target; the terminal check was not honored")]
    EmptyTargetPool(UnitId),
}

/// One resolved attack, for the display/reporting sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackEvent {
    pub attacker: UnitId,
    pub attacker_label: String,
    pub target: UnitId,
    pub target_label: String,
    pub damage: i32,
    /// Target health after the hit, clamped at 0.
    pub target_health: i32,
    pub fatal: bool,
}

/// Terminal status of the battle after a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BattleOutcome {
    /// Two or more teams still standing.
    Ongoing,
    /// Exactly one team left; `champion` is its first surviving unit's
    /// template name.
    Won { team: TeamId, champion: String },
    /// Mutual annihilation left zero teams. Reported distinctly, never as
    /// an arbitrary winner.
    Draw,
}

impl BattleOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BattleOutcome::Ongoing)
    }
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub events: Vec<AttackEvent>,
    pub outcome: BattleOutcome,
}

impl TickReport {
    /// A tick that resolved no combat (setup or battle-over phases).
    pub fn quiet(outcome: BattleOutcome) -> Self {
        TickReport {
            events: Vec::new(),
            outcome,
        }
    }
}

/// Resolves one tick's turn-ready sequence in order, then runs the
/// elimination sweep and the terminal check.
///
/// A unit killed earlier in the same tick is skipped via the liveness
/// re-check; it stays in its team's list until the sweep. The actor's
/// gauge resets to 0 whether or not a target existed, so a broken battle
/// cannot re-queue the same actor forever.
pub fn resolve_tick<R: Rng>(
    state: &mut BattleState,
    ready: &[UnitId],
    rng: &mut R,
) -> Result<TickReport, BattleError> {
    let mut events = Vec::new();

    for &actor in ready {
        let (team, damage, attacker_label) = match state.unit(actor) {
            // may have been killed by a previous unit in the sequence
            Some(unit) if unit.current_health > 0 => (unit.team, unit.attack_power(), unit.label()),
            _ => continue,
        };

        if let Some(unit) = state.unit_mut(actor) {
            unit.speed_meter = 0.0;
        }

        let pool = state.target_pool(team);
        if pool.is_empty() {
            return Err(BattleError::EmptyTargetPool(actor));
        }
        let target = pool[rng.gen_range(0..pool.len())];

        if let Some(victim) = state.unit_mut(target) {
            let fatal = victim.take_hit(damage);
            events.push(AttackEvent {
                attacker: actor,
                attacker_label,
                target,
                target_label: victim.label(),
                damage,
                target_health: victim.health_display(),
                fatal,
            });
        }
    }

    eliminate_defeated(state);
    Ok(TickReport {
        events,
        outcome: battle_outcome(state),
    })
}

/// The elimination sweep: drops dead units from every team roster, then
/// drops empty teams from the battle. Idempotent on an unchanged
/// population.
pub fn eliminate_defeated(state: &mut BattleState) {
    for team in &mut state.teams {
        team.units.retain(|u| u.current_health > 0);
    }
    state.teams.retain(|t| !t.is_eliminated());
}

/// Terminal check over the active-team set. Meaningful after the sweep
/// has run.
pub fn battle_outcome(state: &BattleState) -> BattleOutcome {
    match state.teams.as_slice() {
        [] => BattleOutcome::Draw,
        [team] => BattleOutcome::Won {
            team: team.id,
            champion: team
                .units
                .first()
                .map(|u| u.template.name.clone())
                .unwrap_or_default(),
        },
        _ => BattleOutcome::Ongoing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{CombatEntity, CombatTeam};
    use crate::roster::FighterTemplate;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn unit(name: &str, strength: i32, health: i32) -> CombatEntity {
        CombatEntity::from_template(Arc::new(FighterTemplate::new(name, strength, 1, 10, health)))
    }

    fn two_sides(a: Vec<CombatEntity>, b: Vec<CombatEntity>) -> BattleState {
        let mut team_a = CombatTeam::new(TeamId(0));
        for u in a {
            team_a.add_unit(u);
        }
        let mut team_b = CombatTeam::new(TeamId(1));
        for u in b {
            team_b.add_unit(u);
        }
        BattleState::new(vec![team_a, team_b]).unwrap()
    }

    #[test]
    fn attack_deals_template_strength() {
        let mut state = two_sides(vec![unit("A", 5, 40)], vec![unit("B", 3, 40)]);
        let mut rng = SmallRng::seed_from_u64(1);
        let report = resolve_tick(&mut state, &[UnitId(0)], &mut rng).unwrap();

        assert_eq!(report.events.len(), 1);
        let e = &report.events[0];
        assert_eq!(e.attacker, UnitId(0));
        assert_eq!(e.target, UnitId(1));
        assert_eq!(e.damage, 5);
        assert_eq!(e.target_health, 35);
        assert!(!e.fatal);
        assert_eq!(report.outcome, BattleOutcome::Ongoing);
    }

    #[test]
    fn actor_meter_resets_after_acting() {
        let mut state = two_sides(vec![unit("A", 5, 40)], vec![unit("B", 3, 40)]);
        state.unit_mut(UnitId(0)).unwrap().speed_meter = 120.0;
        let mut rng = SmallRng::seed_from_u64(1);
        resolve_tick(&mut state, &[UnitId(0)], &mut rng).unwrap();
        assert_eq!(state.unit(UnitId(0)).unwrap().speed_meter, 0.0);
    }

    #[test]
    fn dead_actor_is_skipped_by_liveness_recheck() {
        // B dies to A's hit before its own slot in the same tick.
        let mut state = two_sides(vec![unit("A", 40, 40)], vec![unit("B", 3, 40)]);
        let mut rng = SmallRng::seed_from_u64(1);
        let report = resolve_tick(&mut state, &[UnitId(0), UnitId(1)], &mut rng).unwrap();

        assert_eq!(report.events.len(), 1);
        assert!(report.events[0].fatal);
        assert_eq!(
            report.outcome,
            BattleOutcome::Won {
                team: TeamId(0),
                champion: "A".to_string()
            }
        );
        assert_eq!(state.unit(UnitId(0)).unwrap().current_health, 40);
    }

    #[test]
    fn sweep_removes_dead_units_and_empty_teams() {
        let mut state = two_sides(
            vec![unit("A", 1, 40), unit("B", 1, 40)],
            vec![unit("C", 1, 40)],
        );
        state.unit_mut(UnitId(1)).unwrap().take_hit(100);
        state.unit_mut(UnitId(2)).unwrap().take_hit(100);

        eliminate_defeated(&mut state);
        assert_eq!(state.active_team_count(), 1);
        assert_eq!(state.teams[0].units.len(), 1);
        assert_eq!(state.teams[0].units[0].id, UnitId(0));
    }

    #[test]
    fn sweep_is_idempotent() {
        let mut state = two_sides(
            vec![unit("A", 1, 40), unit("B", 1, 40)],
            vec![unit("C", 1, 40)],
        );
        state.unit_mut(UnitId(2)).unwrap().take_hit(100);

        eliminate_defeated(&mut state);
        let team_ids: Vec<TeamId> = state.teams.iter().map(|t| t.id).collect();
        let unit_ids: Vec<UnitId> = state.units().map(|u| u.id).collect();

        eliminate_defeated(&mut state);
        assert_eq!(team_ids, state.teams.iter().map(|t| t.id).collect::<Vec<_>>());
        assert_eq!(unit_ids, state.units().map(|u| u.id).collect::<Vec<_>>());
    }

    #[test]
    fn zero_surviving_teams_reports_draw() {
        let mut state = two_sides(vec![unit("A", 5, 10)], vec![unit("B", 5, 10)]);
        state.unit_mut(UnitId(0)).unwrap().take_hit(10);
        state.unit_mut(UnitId(1)).unwrap().take_hit(10);

        let mut rng = SmallRng::seed_from_u64(1);
        let report = resolve_tick(&mut state, &[], &mut rng).unwrap();
        assert_eq!(report.outcome, BattleOutcome::Draw);
        assert_eq!(state.active_team_count(), 0);
    }

    #[test]
    fn empty_target_pool_is_an_error() {
        let mut state = two_sides(vec![unit("A", 5, 40)], vec![unit("B", 5, 10)]);
        // B is dead but unswept, so the pool is empty at resolution time.
        state.unit_mut(UnitId(1)).unwrap().take_hit(10);

        let mut rng = SmallRng::seed_from_u64(1);
        let err = resolve_tick(&mut state, &[UnitId(0)], &mut rng).unwrap_err();
        assert_eq!(err, BattleError::EmptyTargetPool(UnitId(0)));
        // The meter still cleared before the error surfaced.
        assert_eq!(state.unit(UnitId(0)).unwrap().speed_meter, 0.0);
    }

    #[test]
    fn three_team_battle_targets_any_opponent() {
        let mut team_a = CombatTeam::new(TeamId(0));
        team_a.add_unit(unit("A", 1, 40));
        let mut team_b = CombatTeam::new(TeamId(1));
        team_b.add_unit(unit("B", 1, 40));
        let mut team_c = CombatTeam::new(TeamId(2));
        team_c.add_unit(unit("C", 1, 40));
        let mut state = BattleState::new(vec![team_a, team_b, team_c]).unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        let report = resolve_tick(&mut state, &[UnitId(0)], &mut rng).unwrap();
        let target = report.events[0].target;
        assert!(target == UnitId(1) || target == UnitId(2));
        assert_eq!(report.outcome, BattleOutcome::Ongoing);
    }
}
