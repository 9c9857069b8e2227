//! Command parser for the engine main loop.
//!
//! Parses incoming text commands into structured `Command` variants.
//! Unrecognized or malformed lines log to stderr and parse to `None`;
//! the loop skips them rather than aborting.

use crate::machine::Matchup;

/// A parsed driver-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the protocol handshake.
    Abp,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Reset engine state for a new session.
    NewGame,

    /// List the roster's templates.
    Roster,

    /// Plan a battle: `matchup <side> vs <side> [vs <side> ...]`.
    Matchup(Matchup),

    /// Advance the battle by one tick.
    Tick,

    /// Tick until the battle is over (bounded by the MaxTicks option).
    Run,

    /// In BattleOver, return to Setup.
    Restart,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to
/// stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "abp" => Some(Command::Abp),
        "isready" => Some(Command::IsReady),
        "newgame" => Some(Command::NewGame),
        "roster" => Some(Command::Roster),
        "tick" => Some(Command::Tick),
        "run" => Some(Command::Run),
        "restart" => Some(Command::Restart),
        "quit" => Some(Command::Quit),

        "setoption" => parse_setoption(&tokens),
        "matchup" => parse_matchup_command(trimmed),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                eprintln!("malformed setoption: empty name");
                return None;
            }
            let name = name_parts.join(" ");
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name, value)
        }
        None => {
            let name = tokens[2..].join(" ");
            (name, None)
        }
    };

    Some(Command::SetOption { name, value })
}

/// Parses `matchup <spec>`, e.g. `matchup Goblin*3 vs Bandit*2,Giant`.
fn parse_matchup_command(full_line: &str) -> Option<Command> {
    let spec = full_line.strip_prefix("matchup").unwrap_or("").trim();
    if spec.is_empty() {
        eprintln!("malformed matchup: expected 'matchup <side> vs <side> [vs <side> ...]'");
        return None;
    }
    parse_matchup(spec).map(Command::Matchup)
}

/// Parses a matchup spec: sides separated by `vs`, entries within a side
/// comma-separated, each entry `Name` or `Name*count`.
pub fn parse_matchup(spec: &str) -> Option<Matchup> {
    let mut sides = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for token in spec.split_whitespace() {
        if token.eq_ignore_ascii_case("vs") {
            sides.push(parse_side(&current.join(""))?);
            current.clear();
        } else {
            current.push(token);
        }
    }
    sides.push(parse_side(&current.join(""))?);

    if sides.len() < 2 {
        eprintln!("malformed matchup: need at least two sides separated by 'vs'");
        return None;
    }
    Some(Matchup { sides })
}

/// Parses one side: comma-separated `Name` or `Name*count` entries.
fn parse_side(side: &str) -> Option<Vec<(String, u32)>> {
    let mut picks = Vec::new();
    for entry in side.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            eprintln!("malformed matchup: empty side entry");
            return None;
        }
        let (name, count) = match entry.split_once('*') {
            Some((name, count_str)) => match count_str.parse::<u32>() {
                Ok(count) if count >= 1 => (name, count),
                _ => {
                    eprintln!("malformed matchup: bad count in '{}'", entry);
                    return None;
                }
            },
            None => (entry, 1),
        };
        if name.is_empty() {
            eprintln!("malformed matchup: empty template name in '{}'", entry);
            return None;
        }
        picks.push((name.to_string(), count));
    }
    if picks.is_empty() {
        eprintln!("malformed matchup: empty side");
        return None;
    }
    Some(picks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_commands() {
        assert_eq!(parse_command("abp"), Some(Command::Abp));
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("roster"), Some(Command::Roster));
        assert_eq!(parse_command("tick"), Some(Command::Tick));
        assert_eq!(parse_command("run"), Some(Command::Run));
        assert_eq!(parse_command("restart"), Some(Command::Restart));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  tick  "), Some(Command::Tick));
    }

    #[test]
    fn parse_setoption_with_value() {
        let cmd = parse_command("setoption name Seed value 42").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "Seed".to_string(),
                value: Some("42".to_string()),
            }
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        let cmd = parse_command("setoption name RollUpgrades").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "RollUpgrades".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
    }

    #[test]
    fn parse_matchup_two_sides() {
        let cmd = parse_command("matchup Goblin*3 vs Bandit*2").unwrap();
        assert_eq!(
            cmd,
            Command::Matchup(Matchup {
                sides: vec![
                    vec![("Goblin".to_string(), 3)],
                    vec![("Bandit".to_string(), 2)],
                ],
            })
        );
    }

    #[test]
    fn parse_matchup_mixed_side_and_implicit_count() {
        let cmd = parse_command("matchup Goblin vs Bandit*2,Giant").unwrap();
        assert_eq!(
            cmd,
            Command::Matchup(Matchup {
                sides: vec![
                    vec![("Goblin".to_string(), 1)],
                    vec![("Bandit".to_string(), 2), ("Giant".to_string(), 1)],
                ],
            })
        );
    }

    #[test]
    fn parse_matchup_three_sides() {
        let cmd = parse_command("matchup Goblin vs Bandit vs Giant").unwrap();
        match cmd {
            Command::Matchup(m) => assert_eq!(m.sides.len(), 3),
            other => panic!("expected matchup, got {:?}", other),
        }
    }

    #[test]
    fn parse_matchup_single_side_returns_none() {
        assert_eq!(parse_command("matchup Goblin*3"), None);
        assert_eq!(parse_command("matchup"), None);
    }

    #[test]
    fn parse_matchup_bad_count_returns_none() {
        assert_eq!(parse_command("matchup Goblin*0 vs Bandit"), None);
        assert_eq!(parse_command("matchup Goblin*x vs Bandit"), None);
    }

    #[test]
    fn parse_matchup_handles_spaces_after_commas() {
        let m = parse_matchup("Bandit*2, Giant vs Goblin*5").unwrap();
        assert_eq!(
            m.sides[0],
            vec![("Bandit".to_string(), 2), ("Giant".to_string(), 1)]
        );
    }
}
