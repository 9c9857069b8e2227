//! Engine state management.
//!
//! Holds the roster, the planned matchup, engine options, and the battle
//! state machine, and services the protocol commands: `tick` advances one
//! tick, `run` plays the battle out to its result.

use std::collections::HashMap;
use std::io::Write;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::machine::{
    BattlePhase, BattleStateMachine, Matchup, MatchupSource, PlayerCommand,
};
use crate::protocol::{format_event, format_result};
use crate::roster::Roster;

/// Default cap on ticks per `run` command. Base-stat matchups are slow
/// (a Goblin lands 1 damage every 400 ticks), so the cap is generous.
const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub roster: Roster,
    pub matchup: Option<Matchup>,
    pub options: HashMap<String, String>,
    machine: BattleStateMachine,
    rng: SmallRng,
}

impl Engine {
    /// Creates a new engine with the pregenerated roster and no matchup.
    pub fn new() -> Self {
        Engine {
            roster: Roster::standard(),
            matchup: None,
            options: HashMap::new(),
            machine: BattleStateMachine::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Resets battle state for a new session. Options and roster persist.
    pub fn new_game(&mut self) {
        self.matchup = None;
        self.machine = BattleStateMachine::new();
    }

    /// Sets an engine option. `Seed` reseeds the RNG immediately so the
    /// next battle replays deterministically.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        if name == "Seed" {
            if let Some(seed) = value.as_deref().and_then(|v| v.parse::<u64>().ok()) {
                self.rng = SmallRng::seed_from_u64(seed);
            }
        }
        self.options.insert(name, value.unwrap_or_default());
    }

    /// Plans a battle and rewinds the machine to Setup.
    pub fn set_matchup(&mut self, matchup: Matchup) {
        self.matchup = Some(matchup);
        self.machine = BattleStateMachine::new();
    }

    pub fn phase(&self) -> BattlePhase {
        self.machine.phase()
    }

    /// Returns the configured tick cap for `run` (default 100000).
    fn max_ticks(&self) -> u64 {
        self.options
            .get("MaxTicks")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_TICKS)
    }

    /// Handles the ABP handshake: writes id, options, protocol_version,
    /// and abpok.
    pub fn handle_abp<W: Write>(&self, out: &mut W) {
        writeln!(out, "id name melee").unwrap();
        writeln!(out, "id author melee").unwrap();
        writeln!(
            out,
            "option name MaxTicks type spin default 100000 min 1 max 100000000"
        )
        .unwrap();
        writeln!(
            out,
            "option name Seed type spin default 0 min 0 max 18446744073709551615"
        )
        .unwrap();
        writeln!(out, "option name RollUpgrades type check default false").unwrap();
        writeln!(out, "protocol_version 1").unwrap();
        writeln!(out, "abpok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) {
        writeln!(out, "readyok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `roster` command: one template line per entry, sorted
    /// by name.
    pub fn handle_roster<W: Write>(&self, out: &mut W) {
        for name in self.roster.names() {
            // names() only returns present keys
            if let Ok(t) = self.roster.get(&name) {
                writeln!(
                    out,
                    "template {} str {} agi {} spd {} hp {}",
                    t.name, t.strength, t.agility, t.speed, t.max_health
                )
                .unwrap();
            }
        }
        out.flush().unwrap();
    }

    /// Handles the `tick` command: one machine tick, with its attack
    /// events and (on the tick that ends the battle) the result line.
    pub fn handle_tick<W: Write>(&mut self, out: &mut W) {
        if self.matchup.is_none() {
            eprintln!("tick: no matchup set");
            return;
        }
        self.step(PlayerCommand::None, out);
        out.flush().unwrap();
    }

    /// Handles the `run` command: ticks until the battle is over, up to
    /// the MaxTicks option.
    pub fn handle_run<W: Write>(&mut self, out: &mut W) {
        if self.matchup.is_none() {
            eprintln!("run: no matchup set");
            return;
        }

        // The setup tick assembles teams without resolving combat.
        if self.machine.phase() == BattlePhase::Setup {
            self.step(PlayerCommand::None, out);
        }

        let max_ticks = self.max_ticks();
        let mut ticks = 0u64;
        while self.machine.phase() == BattlePhase::Battle && ticks < max_ticks {
            self.step(PlayerCommand::None, out);
            ticks += 1;
        }

        if self.machine.phase() == BattlePhase::Battle {
            eprintln!("run: battle undecided after {} ticks", max_ticks);
        }
        out.flush().unwrap();
    }

    /// Handles the `restart` command: BattleOver -> Setup.
    pub fn handle_restart<W: Write>(&mut self, out: &mut W) {
        if self.machine.phase() != BattlePhase::BattleOver {
            eprintln!("restart: no finished battle");
            return;
        }
        self.step(PlayerCommand::RestartToSetup, out);
        out.flush().unwrap();
    }

    /// One machine tick: prints attack events as they resolve and the
    /// result line on the transition into BattleOver.
    fn step<W: Write>(&mut self, command: PlayerCommand, out: &mut W) {
        let plan = match &self.matchup {
            Some(m) => m,
            None => return,
        };
        let was_over = self.machine.phase() == BattlePhase::BattleOver;
        let rolled = self
            .options
            .get("RollUpgrades")
            .map(|v| v == "true" || v.is_empty())
            .unwrap_or(false);

        let mut source = MatchupSource {
            roster: &self.roster,
            plan,
            rolled,
        };

        match self.machine.tick(&mut source, command, &mut self.rng) {
            Ok(report) => {
                for event in &report.events {
                    writeln!(out, "{}", format_event(event)).unwrap();
                }
            }
            Err(e) => {
                eprintln!("{}", e);
            }
        }

        if !was_over && self.machine.phase() == BattlePhase::BattleOver {
            if let Some(result) = self.machine.result() {
                writeln!(out, "{}", format_result(result)).unwrap();
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
