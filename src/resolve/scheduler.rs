//! Turn scheduling.
//!
//! Each tick every living unit's speed gauge charges by
//! `speed * TICK_RATE`; units at or above the threshold form the tick's
//! turn-ready set, ordered by gauge value descending with join order as
//! the tie-break. A unit with `speed = S` therefore needs
//! `ceil(100 / (0.05 * S))` ticks between actions.

use crate::battle::{BattleState, UnitId};

/// Gauge value at which a unit becomes turn-ready.
pub const METER_THRESHOLD: f64 = 100.0;

/// Fraction of the threshold charged per point of speed per tick.
pub const TICK_RATE: f64 = 0.05;

/// Charges every living unit's gauge and returns the tick's turn-ready
/// sequence in strictly descending speed priority.
///
/// Equal gauges break ties by `UnitId` (original join order), never by an
/// unspecified order, so simulations replay identically under a fixed
/// seed. Each unit appears at most once however far past the threshold
/// its gauge went; the surplus is discarded when the meter resets after
/// acting. Touches nothing but the gauges.
pub fn charge_and_collect(state: &mut BattleState) -> Vec<UnitId> {
    let mut ready: Vec<(f64, UnitId)> = Vec::new();

    for team in &mut state.teams {
        for unit in &mut team.units {
            if !unit.alive {
                continue;
            }
            unit.speed_meter += unit.template.speed as f64 * TICK_RATE;
            if unit.speed_meter >= METER_THRESHOLD {
                ready.push((unit.speed_meter, unit.id));
            }
        }
    }

    ready.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    ready.into_iter().map(|(_, id)| id).collect()
}
