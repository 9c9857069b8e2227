//! Melee -- an auto-battle resolution engine implementing the ABP protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout,
//! following the ABP (Auto-Battle Protocol) convention.

use std::io::{self, BufRead};

use melee::engine::Engine;
use melee::protocol::parser::{parse_command, Command};

/// Runs the main ABP protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Abp => {
                engine.handle_abp(&mut out);
            }
            Command::IsReady => {
                engine.handle_isready(&mut out);
            }
            Command::SetOption { name, value } => {
                engine.set_option(name, value);
            }
            Command::NewGame => {
                engine.new_game();
            }
            Command::Roster => {
                engine.handle_roster(&mut out);
            }
            Command::Matchup(matchup) => {
                engine.set_matchup(matchup);
            }
            Command::Tick => {
                engine.handle_tick(&mut out);
            }
            Command::Run => {
                engine.handle_run(&mut out);
            }
            Command::Restart => {
                engine.handle_restart(&mut out);
            }
            Command::Quit => {
                break;
            }
        }
    }
}
