//! Batch battle simulation for balance analysis.
//!
//! Plays many battles of the same matchup to completion and aggregates
//! win rates, draws, faults, and tick counts. Each battle gets its own
//! seeded RNG so a batch replays identically under a fixed base seed.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::machine::{
    BattlePhase, BattleResult, BattleStateMachine, Matchup, MatchupSource, PlayerCommand,
};
use crate::roster::Roster;

/// Configuration for batch simulation.
#[derive(Clone)]
pub struct BatchConfig {
    /// Number of battles to play.
    pub battles: usize,
    /// Tick cap per battle; battles still undecided are flagged, not erred.
    pub max_ticks: u64,
    /// Number of parallel threads for concurrent battles.
    pub threads: usize,
    /// Base random seed (0 = use entropy).
    pub seed: u64,
    /// Roll upgraded fighters at setup instead of base template stats.
    pub rolled: bool,
    /// Suppress per-battle progress output.
    pub quiet: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            battles: 100,
            max_ticks: 100_000,
            threads: 4,
            seed: 0,
            rolled: false,
            quiet: false,
        }
    }
}

/// One completed (or tick-capped) battle.
#[derive(Clone, Serialize)]
pub struct BattleSummary {
    /// Sequential battle ID within the batch.
    pub battle_id: usize,
    /// Ticks the battle ran before its result (or the cap).
    pub ticks: u64,
    /// `None` when the battle was still undecided at the tick cap.
    pub result: Option<BattleResult>,
}

/// Plays a single battle to its result and returns the summary.
pub fn run_battle(
    roster: &Roster,
    plan: &Matchup,
    config: &BatchConfig,
    battle_id: usize,
    rng: &mut SmallRng,
) -> BattleSummary {
    let mut machine = BattleStateMachine::new();
    let mut source = MatchupSource {
        roster,
        plan,
        rolled: config.rolled,
    };

    // Setup tick assembles the teams without resolving combat.
    if let Err(e) = machine.tick(&mut source, PlayerCommand::None, rng) {
        return BattleSummary {
            battle_id,
            ticks: 0,
            result: Some(BattleResult::Faulted {
                reason: e.to_string(),
            }),
        };
    }

    let mut ticks = 0u64;
    while machine.phase() == BattlePhase::Battle && ticks < config.max_ticks {
        ticks += 1;
        if machine.tick(&mut source, PlayerCommand::None, rng).is_err() {
            // The machine already moved to BattleOver with a fault result.
            break;
        }
    }

    BattleSummary {
        battle_id,
        ticks,
        result: machine.result().cloned(),
    }
}

/// Runs a simulation batch, producing one summary per battle.
///
/// When `config.threads > 1`, battles run concurrently using rayon.
pub fn run_batch(roster: &Roster, plan: &Matchup, config: &BatchConfig) -> Vec<BattleSummary> {
    let mut summaries = Vec::with_capacity(config.battles);
    run_batch_with_callback(roster, plan, config, |summary| {
        summaries.push(summary);
    });
    summaries.sort_by_key(|s| s.battle_id);
    summaries
}

/// Runs a simulation batch, calling `on_battle` with each completed
/// summary. Delivery order is unspecified in the parallel case.
pub fn run_batch_with_callback<F>(roster: &Roster, plan: &Matchup, config: &BatchConfig, on_battle: F)
where
    F: FnMut(BattleSummary) + Send,
{
    if config.threads > 1 {
        run_batch_parallel(roster, plan, config, on_battle);
    } else {
        run_batch_sequential(roster, plan, config, on_battle);
    }
}

/// Per-battle RNG: derived from the base seed and the battle ID so each
/// battle is independent yet the whole batch is reproducible.
fn battle_rng(seed: u64, battle_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(battle_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn run_batch_sequential<F>(roster: &Roster, plan: &Matchup, config: &BatchConfig, mut on_battle: F)
where
    F: FnMut(BattleSummary),
{
    for i in 0..config.battles {
        let start = Instant::now();
        let mut rng = battle_rng(config.seed, i);
        let summary = run_battle(roster, plan, config, i, &mut rng);
        if !config.quiet {
            let elapsed = start.elapsed().as_secs_f64();
            eprintln!(
                "Battle {}/{}: {} in {} ticks ({:.3}s)",
                i + 1,
                config.battles,
                describe_result(&summary.result),
                summary.ticks,
                elapsed,
            );
        }
        on_battle(summary);
    }
}

/// Parallel batch: battles run concurrently using rayon, with a channel
/// delivering completed summaries to the callback on the caller's thread.
fn run_batch_parallel<F>(roster: &Roster, plan: &Matchup, config: &BatchConfig, mut on_battle: F)
where
    F: FnMut(BattleSummary) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<BattleSummary>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .expect("failed to build rayon thread pool");

    std::thread::scope(|scope| {
        let config = &*config;
        scope.spawn(move || {
            pool.install(|| {
                (0..config.battles).into_par_iter().for_each_with(tx, |tx, i| {
                    let mut rng = battle_rng(config.seed, i);
                    let summary = run_battle(roster, plan, config, i, &mut rng);
                    if !config.quiet {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        eprintln!(
                            "Battle {}/{}: {} in {} ticks",
                            n,
                            config.battles,
                            describe_result(&summary.result),
                            summary.ticks,
                        );
                    }
                    let _ = tx.send(summary);
                });
            });
        });

        for summary in rx {
            on_battle(summary);
        }
    });
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    pub battles: usize,
    /// Wins indexed by team number.
    pub wins: Vec<usize>,
    pub draws: usize,
    pub faulted: usize,
    /// Battles still undecided at the tick cap.
    pub unresolved: usize,
    pub avg_ticks: f64,
}

/// Aggregates a batch into per-team win counts and tick averages.
pub fn summarize(summaries: &[BattleSummary], team_count: usize) -> BatchStats {
    let mut wins = vec![0usize; team_count];
    let mut draws = 0;
    let mut faulted = 0;
    let mut unresolved = 0;
    let mut total_ticks = 0u64;

    for summary in summaries {
        total_ticks += summary.ticks;
        match &summary.result {
            Some(BattleResult::Won { team, .. }) => {
                if team.0 < wins.len() {
                    wins[team.0] += 1;
                }
            }
            Some(BattleResult::Draw) => draws += 1,
            Some(BattleResult::Faulted { .. }) => faulted += 1,
            None => unresolved += 1,
        }
    }

    BatchStats {
        battles: summaries.len(),
        wins,
        draws,
        faulted,
        unresolved,
        avg_ticks: total_ticks as f64 / summaries.len().max(1) as f64,
    }
}

/// Writes battle summaries as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(summaries: &[BattleSummary], out: &mut W) -> std::io::Result<()> {
    for summary in summaries {
        serde_json::to_writer(&mut *out, summary)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a batch summary to stderr.
pub fn print_summary(stats: &BatchStats) {
    eprintln!("=== Batch Summary ===");
    eprintln!("Battles: {}", stats.battles);
    eprintln!("Avg ticks/battle: {:.1}", stats.avg_ticks);
    for (team, &count) in stats.wins.iter().enumerate() {
        let pct = 100.0 * count as f64 / stats.battles.max(1) as f64;
        eprintln!("  team {}: {} wins ({:.1}%)", team, count, pct);
    }
    eprintln!("Draws: {}", stats.draws);
    eprintln!("Faulted: {}", stats.faulted);
    eprintln!("Unresolved at tick cap: {}", stats.unresolved);
}

fn describe_result(result: &Option<BattleResult>) -> String {
    match result {
        Some(BattleResult::Won { team, champion }) => format!("team {} wins ({})", team, champion),
        Some(BattleResult::Draw) => "draw".to_string(),
        Some(BattleResult::Faulted { reason }) => format!("fault: {}", reason),
        None => "undecided".to_string(),
    }
}
