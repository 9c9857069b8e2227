//! Batch battle simulation CLI.
//!
//! Plays many battles of one matchup and outputs per-battle summaries as
//! JSONL plus an aggregate stats object.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --battles N      Number of battles to play (default: 100)
//!   --matchup SPEC   Matchup spec, e.g. 'Goblin*3 vs Bandit*2,Giant'
//!   --roster FILE    Load templates from a JSON roster file
//!   --rolled         Roll upgraded fighters at setup
//!   --max-ticks N    Tick cap per battle (default: 100000)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress per-battle progress output

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use melee::machine::Matchup;
use melee::protocol::parse_matchup;
use melee::roster::Roster;
use melee::simulate::{self, BatchConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = BatchConfig::default();
    let mut matchup_spec = String::from("Goblin*3 vs Bandit*2");
    let mut roster_path: Option<String> = None;
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--battles" => {
                i += 1;
                config.battles = args[i].parse().expect("invalid --battles value");
            }
            "--matchup" => {
                i += 1;
                matchup_spec = args[i].clone();
            }
            "--roster" => {
                i += 1;
                roster_path = Some(args[i].clone());
            }
            "--rolled" => {
                config.rolled = true;
            }
            "--max-ticks" => {
                i += 1;
                config.max_ticks = args[i].parse().expect("invalid --max-ticks value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--quiet" => {
                config.quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let roster = match roster_path {
        Some(path) => {
            let json = fs::read_to_string(&path).expect("failed to read roster file");
            match Roster::from_json(&json) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("bad roster file {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => Roster::standard(),
    };

    let plan: Matchup = match parse_matchup(&matchup_spec) {
        Some(m) => m,
        None => {
            eprintln!("bad matchup spec: {}", matchup_spec);
            std::process::exit(1);
        }
    };

    if !config.quiet {
        eprintln!(
            "Simulating {} battles of '{}', max {} ticks, {} threads",
            config.battles, matchup_spec, config.max_ticks, config.threads
        );
    }

    let start = Instant::now();
    let summaries = simulate::run_batch(&roster, &plan, &config);
    let elapsed = start.elapsed();

    let stats = simulate::summarize(&summaries, plan.sides.len());
    if !config.quiet {
        eprintln!(
            "Completed {} battles in {:.1}s",
            summaries.len(),
            elapsed.as_secs_f64()
        );
        simulate::print_summary(&stats);
    }

    match output_path {
        Some(path) => {
            let file = File::create(&path).expect("failed to create output file");
            let mut writer = BufWriter::new(file);
            write_output(&summaries, &stats, &mut writer).expect("failed to write output");
            if !config.quiet {
                eprintln!("Wrote {} battles to {}", summaries.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_output(&summaries, &stats, &mut writer).expect("failed to write output");
        }
    }
}

/// Per-battle JSONL followed by one aggregate stats line.
fn write_output<W: Write>(
    summaries: &[simulate::BattleSummary],
    stats: &simulate::BatchStats,
    out: &mut W,
) -> io::Result<()> {
    simulate::write_jsonl(summaries, out)?;
    serde_json::to_writer(&mut *out, stats)?;
    writeln!(out)?;
    out.flush()
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --battles N      Number of battles to play (default: 100)");
    eprintln!("  --matchup SPEC   Matchup spec, e.g. 'Goblin*3 vs Bandit*2,Giant'");
    eprintln!("  --roster FILE    Load templates from a JSON roster file");
    eprintln!("  --rolled         Roll upgraded fighters at setup");
    eprintln!("  --max-ticks N    Tick cap per battle (default: 100000)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress per-battle progress output");
    eprintln!("  --help           Show this help");
}
