//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full MCTS search with varying iteration counts
//! - Rollout policy comparison (uniform vs greedy)
//! - Search at different battle phases (opening hand, low-hp endgame)
//! - Tree operations (selection, backpropagation, best action)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::Game;
use games_cardbattle::{BattleAction, BattleState, CardBattle, Scenario};
use mcts::{MctsConfig, MctsSearch, MctsTree, RolloutKind};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Play `end_turns` turns of nothing but ending the turn.
fn advance_turns(game: &CardBattle, seed: u64, end_turns: usize) -> BattleState {
    let mut state = game.new_battle(seed);
    for _ in 0..end_turns {
        if game.is_terminal(&state) {
            break;
        }
        state = game.apply_action(&state, &BattleAction::EndTurn).unwrap();
    }
    state
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_iterations");
    let game = CardBattle::new(Scenario::Starter);
    let state = game.new_battle(42);

    for iterations in [50, 100, 200, 400, 800] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::new("starter", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::for_testing().with_iterations(iterations);

                b.iter(|| {
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    let mut search = MctsSearch::new(&game, config.clone());
                    black_box(search.run(&state, &mut rng).unwrap())
                });
            },
        );
    }

    group.finish();
}

fn bench_rollout_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_rollout_policies");
    let game = CardBattle::new(Scenario::Challenge);
    let state = game.new_battle(42);

    for kind in [RolloutKind::Random, RolloutKind::Greedy] {
        group.bench_function(kind.to_string(), |b| {
            let config = MctsConfig::for_testing()
                .with_iterations(200)
                .with_rollout(kind);

            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                let mut search = MctsSearch::new(&game, config.clone());
                black_box(search.run(&state, &mut rng).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_mcts_battle_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_battle_phases");
    let game = CardBattle::new(Scenario::Challenge);
    let config = MctsConfig::for_testing().with_iterations(200);

    for (name, turns) in [("opening", 0usize), ("midgame", 2), ("late", 4)] {
        let state = advance_turns(&game, 42, turns);
        if game.is_terminal(&state) {
            continue;
        }
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                let mut search = MctsSearch::new(&game, config.clone());
                black_box(search.run(&state, &mut rng).unwrap())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");

    group.bench_function("allocate_node", |b| {
        b.iter(|| {
            let mut tree = MctsTree::new(0.5);
            let mut parent = tree.root();
            for i in 0..100u32 {
                parent = tree.add_child(parent, i);
            }
            black_box(tree.len())
        });
    });

    group.bench_function("select_child", |b| {
        let mut tree = MctsTree::new(0.5);
        for i in 0..8u32 {
            let child_id = tree.add_child(tree.root(), i);
            for visit in 0..(i + 1) * 10 {
                tree.backpropagate(child_id, ((visit + i) % 3) as f64 / 2.0);
            }
        }

        b.iter(|| black_box(tree.select_child(tree.root())));
    });

    group.bench_function("backpropagate_depth_30", |b| {
        b.iter_batched(
            || {
                let mut tree = MctsTree::new(0.5);
                let mut parent = tree.root();
                for i in 0..30u32 {
                    parent = tree.add_child(parent, i);
                }
                (tree, parent)
            },
            |(mut tree, leaf)| {
                tree.backpropagate(leaf, 1.0);
                black_box(tree)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("best_action", |b| {
        let mut tree = MctsTree::new(0.5);
        let legal: Vec<u32> = (0..8).collect();
        for &action in &legal {
            let child_id = tree.add_child(tree.root(), action);
            for _ in 0..20 {
                tree.backpropagate(child_id, action as f64 / 8.0);
            }
        }

        b.iter(|| black_box(tree.best_action(&legal)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_iterations,
    bench_rollout_policies,
    bench_mcts_battle_phases,
    bench_tree_operations,
);
criterion_main!(benches);
