use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::infra::Position;
use crate::state::Map;

#[derive(Clone, Copy)]
struct Node {
    pos: Position,
    f_score: f64,
    g_score: i32,
    // Insertion order, breaks ties between equal f-scores (earliest first).
    seq: u64,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

pub struct AStar;

impl AStar {
    /// Best-first grid search with unit step cost, ordered by `g + heuristic(node)`.
    ///
    /// The returned path starts at the first step after `start` and ends at
    /// `goal`; `start == goal` gives an empty path. `None` means the goal is
    /// blocked, out of bounds or unreachable.
    ///
    /// Optimality only holds when `heuristic` never overestimates the
    /// remaining distance. Nodes are re-queued whenever a strictly lower
    /// g-score is found, so the search terminates on any finite grid even
    /// with a negative or inconsistent heuristic.
    #[tracing::instrument(level = "trace", skip(map, heuristic), fields(start_x = start.x, start_y = start.y, goal_x = goal.x, goal_y = goal.y))]
    pub fn find_path<H>(
        map: &Map,
        start: Position,
        goal: Position,
        heuristic: H,
    ) -> Option<Vec<Position>>
    where
        H: Fn(&Position) -> f64,
    {
        if start == goal {
            return Some(Vec::new());
        }
        if !map.is_walkable(&goal) {
            tracing::trace!("Goal is not walkable");
            return None;
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut g_score: HashMap<Position, i32> = HashMap::new();
        let mut seq = 0u64;

        g_score.insert(start, 0);
        open_set.push(Node {
            pos: start,
            f_score: heuristic(&start),
            g_score: 0,
            seq,
        });

        let mut expansions = 0usize;

        while let Some(Node {
            pos: current,
            g_score: current_g,
            ..
        }) = open_set.pop()
        {
            if current == goal {
                tracing::trace!(expansions, "Path found");
                return Some(reconstruct_path(&came_from, current));
            }

            // Stale entry, a cheaper route to this node was queued later.
            if current_g > g_score.get(&current).copied().unwrap_or(i32::MAX) {
                continue;
            }
            expansions += 1;

            for neighbor in map.neighbors(&current) {
                let tentative_g = current_g + 1;

                if tentative_g < g_score.get(&neighbor).copied().unwrap_or(i32::MAX) {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative_g);
                    seq += 1;
                    open_set.push(Node {
                        pos: neighbor,
                        f_score: f64::from(tentative_g) + heuristic(&neighbor),
                        g_score: tentative_g,
                        seq,
                    });
                }
            }
        }

        tracing::trace!(expansions, "No path found");
        None
    }
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    // Drop the start cell.
    path.pop();
    path.reverse();
    path
}
