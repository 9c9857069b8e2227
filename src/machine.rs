//! Battle lifecycle state machine.
//!
//! Drives one battle through Setup -> Battle -> BattleOver -> Setup. Each
//! external invocation advances exactly one tick: Setup assembles teams
//! from the team-setup collaborator and moves on unconditionally, Battle
//! runs one scheduler+resolver pass, and BattleOver waits for the restart
//! command. There is no fully terminal state.

use rand::Rng;
use serde::Serialize;

use crate::battle::{BattleState, CombatEntity, CombatTeam, SetupError, TeamId};
use crate::resolve::{charge_and_collect, resolve_tick, BattleError, BattleOutcome, TickReport};
use crate::roster::Roster;

/// The three lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattlePhase {
    Setup,
    Battle,
    BattleOver,
}

/// Command values supplied by the external input collaborator. Only the
/// BattleOver phase consumes them; everything else ignores the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerCommand {
    #[default]
    None,
    RestartToSetup,
}

/// How the last battle ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BattleResult {
    Won { team: TeamId, champion: String },
    Draw,
    /// The battle hit a logic-invariant violation and was abandoned.
    Faulted { reason: String },
}

/// The team-setup collaborator: hands the machine its populated teams at
/// the Setup -> Battle transition.
pub trait TeamSource {
    fn assemble<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<CombatTeam>, SetupError>;
}

/// A planned battle: per side, (template name, count) picks from the
/// roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub sides: Vec<Vec<(String, u32)>>,
}

impl Matchup {
    /// Total units on all sides.
    pub fn unit_count(&self) -> u32 {
        self.sides
            .iter()
            .flat_map(|side| side.iter())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Team-setup collaborator backed by a roster and a matchup plan. With
/// `rolled` set, each unit gets a freshly rolled template instead of the
/// pregenerated base stats.
pub struct MatchupSource<'a> {
    pub roster: &'a Roster,
    pub plan: &'a Matchup,
    pub rolled: bool,
}

impl TeamSource for MatchupSource<'_> {
    fn assemble<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<CombatTeam>, SetupError> {
        let mut teams = Vec::new();
        for (index, side) in self.plan.sides.iter().enumerate() {
            let mut team = CombatTeam::new(TeamId(index));
            for (name, count) in side {
                for _ in 0..*count {
                    let template = if self.rolled {
                        self.roster.create_fighter(name, rng)?
                    } else {
                        self.roster.get(name)?
                    };
                    team.add_unit(CombatEntity::from_template(template));
                }
            }
            teams.push(team);
        }
        Ok(teams)
    }
}

/// Errors surfaced by a machine tick. Local to one battle; the machine
/// itself stays usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Battle(#[from] BattleError),
}

#[derive(Debug, Clone)]
enum MachineState {
    Setup,
    Battle(BattleState),
    BattleOver(BattleResult),
}

/// Owns one battle's lifecycle. All battle state is private to the
/// machine and mutated only during its own tick.
#[derive(Debug, Clone)]
pub struct BattleStateMachine {
    state: MachineState,
}

impl Default for BattleStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleStateMachine {
    pub fn new() -> Self {
        BattleStateMachine {
            state: MachineState::Setup,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        match self.state {
            MachineState::Setup => BattlePhase::Setup,
            MachineState::Battle(_) => BattlePhase::Battle,
            MachineState::BattleOver(_) => BattlePhase::BattleOver,
        }
    }

    /// The in-progress battle, while in the Battle phase.
    pub fn battle(&self) -> Option<&BattleState> {
        match &self.state {
            MachineState::Battle(b) => Some(b),
            _ => None,
        }
    }

    /// The finished battle's result, while in the BattleOver phase.
    pub fn result(&self) -> Option<&BattleResult> {
        match &self.state {
            MachineState::BattleOver(r) => Some(r),
            _ => None,
        }
    }

    /// Advances the machine by one tick.
    ///
    /// Setup: assembles teams and transitions to Battle; a setup failure
    /// leaves the machine in Setup and surfaces the error (fatal to this
    /// battle, never retried silently). Battle: one scheduler+resolver
    /// pass; a resolver error transitions to BattleOver with a Faulted
    /// result so the machine is never stuck in Battle. BattleOver:
    /// `RestartToSetup` discards everything and returns to Setup; any
    /// other command is a no-op.
    pub fn tick<S: TeamSource, R: Rng>(
        &mut self,
        source: &mut S,
        command: PlayerCommand,
        rng: &mut R,
    ) -> Result<TickReport, EngineError> {
        let current = std::mem::replace(&mut self.state, MachineState::Setup);
        let (next, result) = Self::transition(current, source, command, rng);
        self.state = next;
        result
    }

    /// The pure-ish transition function: `(state, command) -> (state, report)`.
    fn transition<S: TeamSource, R: Rng>(
        state: MachineState,
        source: &mut S,
        command: PlayerCommand,
        rng: &mut R,
    ) -> (MachineState, Result<TickReport, EngineError>) {
        match state {
            MachineState::Setup => match Self::assemble_battle(source, rng) {
                Ok(battle) => (
                    MachineState::Battle(battle),
                    Ok(TickReport::quiet(BattleOutcome::Ongoing)),
                ),
                Err(e) => (MachineState::Setup, Err(e)),
            },

            MachineState::Battle(mut battle) => {
                battle.clock += 1;
                let ready = charge_and_collect(&mut battle);
                match resolve_tick(&mut battle, &ready, rng) {
                    Ok(report) => {
                        let next = match &report.outcome {
                            BattleOutcome::Ongoing => MachineState::Battle(battle),
                            BattleOutcome::Won { team, champion } => {
                                MachineState::BattleOver(BattleResult::Won {
                                    team: *team,
                                    champion: champion.clone(),
                                })
                            }
                            BattleOutcome::Draw => MachineState::BattleOver(BattleResult::Draw),
                        };
                        (next, Ok(report))
                    }
                    Err(e) => (
                        MachineState::BattleOver(BattleResult::Faulted {
                            reason: e.to_string(),
                        }),
                        Err(e.into()),
                    ),
                }
            }

            MachineState::BattleOver(result) => {
                let next = match command {
                    PlayerCommand::RestartToSetup => MachineState::Setup,
                    PlayerCommand::None => MachineState::BattleOver(result),
                };
                (next, Ok(TickReport::quiet(BattleOutcome::Ongoing)))
            }
        }
    }

    fn assemble_battle<S: TeamSource, R: Rng>(
        source: &mut S,
        rng: &mut R,
    ) -> Result<BattleState, EngineError> {
        let teams = source.assemble(rng)?;
        Ok(BattleState::new(teams)?)
    }
}
