//! Breadth-first path search used to answer path-to-edge queries.

use std::collections::VecDeque;

use breachline_core::{Coord, ARENA_SIZE};

use crate::arena::{self, Edge};

/// Dense parent table over the bounding square of the arena.
///
/// Each visited cell stores the index of the cell it was reached from, which
/// lets a path be rebuilt by walking back from any visited cell.
#[derive(Clone, Debug, Default)]
pub(crate) struct SearchField {
    parents: Vec<Option<usize>>,
    visited: Vec<bool>,
    order: Vec<Coord>,
}

impl SearchField {
    /// Walks every cell reachable from `start` in breadth-first order.
    pub(crate) fn explore_from<F>(&mut self, start: Coord, mut is_blocked: F)
    where
        F: FnMut(Coord) -> bool,
    {
        let cell_count = usize::try_from(ARENA_SIZE * ARENA_SIZE).unwrap_or(0);
        self.parents.clear();
        self.parents.resize(cell_count, None);
        self.visited.clear();
        self.visited.resize(cell_count, false);
        self.order.clear();

        let Some(start_index) = index(start) else {
            return;
        };
        if !arena::contains(start) || is_blocked(start) {
            return;
        }

        self.visited[start_index] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            self.order.push(cell);
            let Some(current_index) = index(cell) else {
                continue;
            };

            for neighbor in neighbors(cell) {
                if !arena::contains(neighbor) || is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(neighbor) else {
                    continue;
                };

                if self.visited[neighbor_index] {
                    continue;
                }

                self.visited[neighbor_index] = true;
                self.parents[neighbor_index] = Some(current_index);
                queue.push_back(neighbor);
            }
        }
    }

    /// Cells reached by the last exploration, nearest first.
    #[must_use]
    pub(crate) fn reached(&self) -> &[Coord] {
        &self.order
    }

    /// Rebuilds the route from the exploration start to `end`, inclusive.
    #[must_use]
    pub(crate) fn route_to(&self, end: Coord) -> Vec<Coord> {
        let Some(mut current) = index(end) else {
            return Vec::new();
        };
        if !self.visited.get(current).copied().unwrap_or(false) {
            return Vec::new();
        }

        let mut route = vec![end];
        while let Some(parent) = self.parents.get(current).copied().flatten() {
            route.push(coord_at(parent));
            current = parent;
        }
        route.reverse();
        route
    }
}

/// Computes the route a mobile unit spawned at `start` would follow.
///
/// The unit heads for the edge opposite its own quadrant. When every cell of
/// that edge is walled off, the route ends at the reachable cell closest to
/// it. Blocked or out-of-arena starts produce an empty route.
pub(crate) fn path_to_edge<F>(field: &mut SearchField, start: Coord, is_blocked: F) -> Vec<Coord>
where
    F: FnMut(Coord) -> bool,
{
    field.explore_from(start, is_blocked);
    let target = Edge::of_quadrant(start).opposite();

    let destination = field
        .reached()
        .iter()
        .copied()
        .enumerate()
        .min_by_key(|&(order, cell)| (target.gap(cell), order))
        .map(|(_, cell)| cell);

    match destination {
        Some(cell) => field.route_to(cell),
        None => Vec::new(),
    }
}

fn neighbors(cell: Coord) -> [Coord; 4] {
    [
        cell.offset(0, 1),
        cell.offset(1, 0),
        cell.offset(0, -1),
        cell.offset(-1, 0),
    ]
}

fn index(cell: Coord) -> Option<usize> {
    if !(0..ARENA_SIZE).contains(&cell.x()) || !(0..ARENA_SIZE).contains(&cell.y()) {
        return None;
    }
    let column = usize::try_from(cell.x()).ok()?;
    let row = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(ARENA_SIZE).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn coord_at(index: usize) -> Coord {
    let width = ARENA_SIZE as usize;
    Coord::new((index % width) as i32, (index / width) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_arena_route_reaches_opposite_edge() {
        let mut field = SearchField::default();
        let start = Coord::new(13, 0);

        let route = path_to_edge(&mut field, start, |_| false);

        assert_eq!(route.first(), Some(&start));
        let end = *route.last().expect("route should not be empty");
        assert_eq!(arena::edge_of(end), Some(Edge::TopRight));
        assert_eq!(route.len(), 29, "shortest route takes 28 steps");
    }

    #[test]
    fn consecutive_route_cells_are_adjacent() {
        let mut field = SearchField::default();
        let route = path_to_edge(&mut field, Coord::new(20, 6), |_| false);

        for pair in route.windows(2) {
            assert_eq!(pair[0].distance_squared(pair[1]), 1);
        }
    }

    #[test]
    fn blocked_start_produces_empty_route() {
        let mut field = SearchField::default();
        let start = Coord::new(13, 0);

        assert!(path_to_edge(&mut field, start, |cell| cell == start).is_empty());
        assert!(path_to_edge(&mut field, Coord::new(0, 0), |_| false).is_empty());
    }

    #[test]
    fn sealed_edge_routes_to_closest_reachable_cell() {
        let mut field = SearchField::default();
        let wall_row = 10;

        let route = path_to_edge(&mut field, Coord::new(13, 0), |cell| cell.y() == wall_row);

        let end = *route.last().expect("route should not be empty");
        assert_eq!(end, Coord::new(23, wall_row - 1));
        assert_ne!(arena::edge_of(end), Some(Edge::TopRight));
    }
}
