//! Tick resolution.
//!
//! Splits one tick of simulated time into the scheduling pass (gauge
//! charging and turn ordering) and the combat pass (target selection,
//! damage, elimination sweep, terminal check).

pub mod combat;
pub mod scheduler;

pub use combat::{
    battle_outcome, eliminate_defeated, resolve_tick, AttackEvent, BattleError, BattleOutcome,
    TickReport,
};
pub use scheduler::{charge_and_collect, METER_THRESHOLD, TICK_RATE};
