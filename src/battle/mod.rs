//! Battle data model.
//!
//! Contains the live-combatant, team, and battle-aggregate types that the
//! scheduler and resolver mutate in place during a tick.

pub mod state;
pub mod team;
pub mod unit;

pub use state::{BattleState, SetupError};
pub use team::CombatTeam;
pub use unit::{CombatEntity, TeamId, UnitId};
