use std::collections::HashSet;

use blake3::hash;
use picobot::{Grid, SimulationConfig, Simulator, Termination};
use proptest::prelude::*;

use test_helpers::*;

fn trace(seed: u64) -> String {
    let grid = Grid::build(&[
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0],
    ])
    .expect("grid builds");
    let simulator =
        Simulator::new(grid, sweeper(), SimulationConfig::seeded(seed)).expect("bot placed");
    simulator
        .map(|event| serde_json::to_string(&event).expect("event encodes"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn seeded_runs_are_deterministic() {
    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        fingerprints.insert(hash(trace(2024).as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn seeds_spread_over_start_cells() {
    let starts: HashSet<_> = (0..64)
        .map(|seed| {
            Simulator::new(open_room(4, 5), sweeper(), SimulationConfig::seeded(seed))
                .expect("bot placed")
                .bot()
                .position()
        })
        .collect();
    assert!(starts.len() > 1, "every seed picked the same start");
}

proptest! {
    #[test]
    fn sweeper_covers_any_open_room(
        rows in 1usize..7,
        cols in 1usize..7,
        seed in any::<u64>(),
    ) {
        let mut simulator = Simulator::new(open_room(rows, cols), sweeper(), SimulationConfig::seeded(seed))
            .expect("bot placed");
        let summary = simulator.run();
        prop_assert_eq!(summary.termination, Some(Termination::CoverageComplete));
        prop_assert_eq!(simulator.grid().remaining_unvisited(), 0);
    }
}
