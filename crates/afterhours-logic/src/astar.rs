//! A* search over a room's [`NavGrid`].
//!
//! Ordering is `cost + manhattan`, with ties broken by insertion order so
//! that equal-priority cells come out first-in-first-out. Same grid, same
//! start, same goal: same path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::geometry::Vec2;
use crate::grid::{Cell, NavGrid};

#[derive(Debug, Clone, Copy)]
struct Frontier {
    priority: f32,
    seq: u64,
    cell: Cell,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // BinaryHeap is a max-heap; reverse so the lowest priority pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn manhattan(a: Cell, b: Cell) -> f32 {
    ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f32
}

/// Shortest path from `start` to `goal` as cell-center waypoints.
///
/// The first waypoint is the start cell's center and the last is the goal
/// cell's center. Returns an empty vector when either endpoint is outside
/// the grid or blocked, or when the goal cannot be reached.
pub fn find_path(grid: &NavGrid, start: Vec2, goal: Vec2) -> Vec<Vec2> {
    let start_cell = grid.world_to_cell(start);
    let goal_cell = grid.world_to_cell(goal);
    if !grid.cell_walkable(start_cell.0, start_cell.1)
        || !grid.cell_walkable(goal_cell.0, goal_cell.1)
    {
        return vec![];
    }

    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut cost_so_far: HashMap<Cell, f32> = HashMap::new();
    let mut seq = 0u64;

    cost_so_far.insert(start_cell, 0.0);
    open.push(Frontier {
        priority: manhattan(start_cell, goal_cell),
        seq,
        cell: start_cell,
    });

    let mut reached = false;
    while let Some(Frontier { cell, .. }) = open.pop() {
        if cell == goal_cell {
            reached = true;
            break;
        }
        let current_cost = cost_so_far.get(&cell).copied().unwrap_or(f32::INFINITY);
        for (nx, ny, step) in grid.neighbors(cell.0, cell.1) {
            let next = (nx, ny);
            let new_cost = current_cost + step;
            let improved = cost_so_far.get(&next).map_or(true, |&c| new_cost < c);
            if improved {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, cell);
                seq += 1;
                open.push(Frontier {
                    priority: new_cost + manhattan(next, goal_cell),
                    seq,
                    cell: next,
                });
            }
        }
    }

    if !reached {
        return vec![];
    }

    let mut cells = vec![goal_cell];
    let mut current = goal_cell;
    while let Some(&prev) = came_from.get(&current) {
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    cells
        .into_iter()
        .map(|(cx, cy)| grid.cell_center(cx, cy))
        .collect()
}

/// Total polyline length of a waypoint list.
pub fn path_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
