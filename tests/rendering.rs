//! Console frames against stored snapshots

mod common;

use common::{assert_snapshot, render_trace};
use picobot::render::frame;
use picobot::Direction;
use test_helpers::*;

#[test]
fn corridor_trace_matches_snapshot() {
    let rules = single_rule("NX*S", go(Direction::East), 0);
    let mut sim = simulator_at(open_room(1, 3), rules, 1, 1);
    assert_snapshot("corridor_trace.txt", &render_trace(&mut sim));
}

#[test]
fn sweeper_final_frame_matches_snapshot() {
    let mut sim = simulator_at(open_room(3, 4), sweeper(), 2, 2);
    sim.run();
    let bot = sim.bot().position();
    assert_snapshot("sweeper_final.txt", &frame(sim.grid(), Some(bot)));
}

#[test]
fn walls_and_unvisited_cells_render() {
    let grid = picobot::Grid::build(&[vec![0, 1, 0], vec![1, 0, 0]]).unwrap();
    let sim = simulator_at(grid, sweeper(), 1, 1);
    assert_eq!(frame(sim.grid(), Some(sim.bot().position())), "@#.\n#..\n");
}
