use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use melee::battle::{BattleState, CombatEntity, CombatTeam, TeamId};
use melee::machine::{MatchupSource, PlayerCommand, TeamSource};
use melee::protocol::parse_matchup;
use melee::resolve::{charge_and_collect, resolve_tick};
use melee::roster::Roster;
use melee::simulate::{run_battle, BatchConfig};

fn standard_battle() -> BattleState {
    let roster = Roster::standard();
    let plan = parse_matchup("Goblin*3 vs Bandit*2,Giant").unwrap();
    let mut source = MatchupSource {
        roster: &roster,
        plan: &plan,
        rolled: false,
    };
    let mut rng = SmallRng::seed_from_u64(1);
    BattleState::new(source.assemble(&mut rng).unwrap()).unwrap()
}

fn big_battle(per_side: usize) -> BattleState {
    let roster = Roster::standard();
    let goblin = roster.get("Goblin").unwrap();
    let bandit = roster.get("Bandit").unwrap();

    let mut a = CombatTeam::new(TeamId(0));
    let mut b = CombatTeam::new(TeamId(1));
    for _ in 0..per_side {
        a.add_unit(CombatEntity::from_template(goblin.clone()));
        b.add_unit(CombatEntity::from_template(bandit.clone()));
    }
    BattleState::new(vec![a, b]).unwrap()
}

fn bench_charge_and_collect(c: &mut Criterion) {
    c.bench_function("charge_6_units", |b| {
        let mut state = standard_battle();
        b.iter(|| charge_and_collect(black_box(&mut state)))
    });

    c.bench_function("charge_200_units", |b| {
        let mut state = big_battle(100);
        b.iter(|| charge_and_collect(black_box(&mut state)))
    });
}

fn bench_resolve_tick(c: &mut Criterion) {
    c.bench_function("resolve_tick_all_ready", |b| {
        let mut rng = SmallRng::seed_from_u64(7);
        b.iter(|| {
            // Fresh state per iteration so nobody dies out from under the
            // measurement.
            let mut state = big_battle(20);
            for unit in state.teams.iter_mut().flat_map(|t| t.units.iter_mut()) {
                unit.speed_meter = 100.0;
            }
            let ready = charge_and_collect(&mut state);
            resolve_tick(black_box(&mut state), black_box(&ready), &mut rng).unwrap()
        })
    });
}

fn bench_full_battle(c: &mut Criterion) {
    let roster = Roster::standard();
    let plan = parse_matchup("Goblin*3 vs Bandit*2,Giant").unwrap();
    let config = BatchConfig {
        quiet: true,
        ..Default::default()
    };

    let mut group = c.benchmark_group("full_battle");
    group.sample_size(20);
    group.bench_function("goblins_vs_bandits_and_giant", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(3);
            run_battle(
                black_box(&roster),
                black_box(&plan),
                &config,
                0,
                &mut rng,
            )
        })
    });
    group.finish();
}

fn bench_machine_tick_overhead(c: &mut Criterion) {
    use melee::machine::BattleStateMachine;

    let roster = Roster::standard();
    let plan = parse_matchup("Goblin*3 vs Bandit*2").unwrap();

    c.bench_function("machine_100_ticks", |b| {
        b.iter(|| {
            let mut machine = BattleStateMachine::new();
            let mut source = MatchupSource {
                roster: &roster,
                plan: &plan,
                rolled: false,
            };
            let mut rng = SmallRng::seed_from_u64(5);
            for _ in 0..100 {
                machine
                    .tick(&mut source, PlayerCommand::None, &mut rng)
                    .unwrap();
            }
            machine
        })
    });
}

criterion_group!(
    benches,
    bench_charge_and_collect,
    bench_resolve_tick,
    bench_full_battle,
    bench_machine_tick_overhead,
);
criterion_main!(benches);
