//! Console frames
//!
//! One character per interior cell: `.` unvisited, `#` wall, `o` visited,
//! `@` the bot.

use crate::grid::{Cell, Grid, Position};
use crate::simulator::StepEvent;

/// Character used for a cell kind
pub fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Wall => '#',
        Cell::Visited => 'o',
        Cell::Bot => '@',
    }
}

/// Grid rows with the bot overlaid, newline-terminated
pub fn frame(grid: &Grid, bot: Option<Position>) -> String {
    let mut out = String::with_capacity((grid.cols() + 1) * grid.rows());
    for row in grid.view(bot) {
        out.extend(row.into_iter().map(glyph));
        out.push('\n');
    }
    out
}

/// Event line followed by the frame it produced
pub fn event_frame(grid: &Grid, event: &StepEvent) -> String {
    format!("{}\n{}", event, frame(grid, Some(event.position)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame() {
        let mut grid = Grid::build(&[vec![0, 1], vec![0, 0]]).unwrap();
        grid.mark_visited(Position::new(1, 1));
        assert_eq!(frame(&grid, Some(Position::new(2, 1))), "o#\n@.\n");
        assert_eq!(frame(&grid, None), "o#\n..\n");
    }
}
