//! Text rendering of battle events and results for the engine protocol.

use crate::machine::BattleResult;
use crate::resolve::AttackEvent;

/// Renders one attack as a protocol line:
/// `hit <attacker> <target> <damage> <hp>` with a trailing ` slain`
/// marker when the hit was fatal.
pub fn format_event(event: &AttackEvent) -> String {
    let mut line = format!(
        "hit {} {} {} {}",
        event.attacker_label, event.target_label, event.damage, event.target_health
    );
    if event.fatal {
        line.push_str(" slain");
    }
    line
}

/// Renders a finished battle's result as a protocol line.
pub fn format_result(result: &BattleResult) -> String {
    match result {
        BattleResult::Won { team, champion } => format!("result win {} {}", team, champion),
        BattleResult::Draw => "result draw".to_string(),
        BattleResult::Faulted { reason } => format!("result fault {}", reason),
    }
}
