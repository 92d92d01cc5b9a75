// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! A* search over boards.
//!
//! Every board is a vertex and every legal single-cell move an edge of unit cost. The frontier is
//! an [`UpdateableMinPq`] ordered by `cost so far + heuristic estimate`, so a board rediscovered
//! along a shorter path has its frontier entry replaced in place instead of being queued twice.

use crate::config::SolverConfig;
use crate::queue::{QueueError, UpdateableMinPq};
use crate::{Board, BoardValue, Move};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, trace};

const PROGRESS_INTERVAL: usize = 10_000;

/// Why no solution was produced.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum SolveError {
    /// Every board reachable from the initial one was explored and none of them is a goal.
    #[error("the board cannot be solved ({expanded} reachable boards explored)")]
    Unsolvable {
        /// The number of boards expanded before the frontier ran dry.
        expanded: usize,
    },
    /// The configured expansion cap was reached before a goal was found.
    #[error("gave up after expanding {limit} boards")]
    ExpansionLimit {
        /// The configured cap.
        limit: usize,
    },
    /// The frontier was misused; this indicates a bug in the solver.
    #[error("frontier corrupted: {0}")]
    Queue(#[from] QueueError),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct NodeId(usize);

struct SearchNode<V> {
    board: Rc<Board<V>>,
    cost: u32,
    predecessor: Option<NodeId>,
}

// Frontier element. Node ids are never reused, so entries are distinct even when estimates tie.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Entry {
    estimate: u32,
    node: NodeId,
}

/// A shortest sequence of boards leading from an initial board to a goal.
#[derive(Clone, Debug)]
pub struct Solution<V = u8> {
    path: Vec<Board<V>>,
    expanded: usize,
}

impl<V> Solution<V>
where
    V: BoardValue,
{
    /// The boards from the initial board to the goal, both inclusive. Consecutive boards differ by
    /// a single move.
    pub fn path(&self) -> &[Board<V>] {
        &self.path
    }

    /// Consumes the solution, returning its path.
    pub fn into_path(self) -> Vec<Board<V>> {
        self.path
    }

    /// The board the search started from.
    pub fn initial(&self) -> &Board<V> {
        &self.path[0]
    }

    /// The goal board the search ended at.
    pub fn goal(&self) -> &Board<V> {
        &self.path[self.path.len() - 1]
    }

    /// The number of moves in the solution.
    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }

    /// The move made at each step of the path.
    pub fn moves(&self) -> Vec<Move<V>> {
        self.path
            .windows(2)
            .filter_map(|pair| pair[0].diff(&pair[1]))
            .collect()
    }

    /// The number of boards expanded while searching.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

/// An A* solver.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// A solver using the provided configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration of this solver.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a shortest sequence of moves bringing the escape vehicle of `initial` to the exit.
    ///
    /// The path is shortest as long as the board heuristic does not overestimate; see
    /// [`Board::heuristic_cost_to_goal`].
    pub fn solve<V: BoardValue>(&self, initial: &Board<V>) -> Result<Solution<V>, SolveError> {
        let started = Instant::now();
        info!(
            event = "solve_start",
            vehicles = initial.vehicles().count(),
            estimate = initial.heuristic_cost_to_goal(),
        );

        let mut frontier = UpdateableMinPq::with_capacity_and_comparator(
            self.config.initial_capacity,
            |a: &Entry, b: &Entry| a.estimate.cmp(&b.estimate),
        );
        let mut nodes: Vec<SearchNode<V>> = Vec::new();
        let mut open: HashMap<Rc<Board<V>>, Entry> = HashMap::new();
        let mut closed: HashSet<Rc<Board<V>>> = HashSet::new();

        let root = Rc::new(initial.clone());
        let entry = push_node(&mut nodes, Rc::clone(&root), 0, None);
        frontier.insert(entry);
        open.insert(root, entry);

        let mut expanded = 0;
        while !frontier.is_empty() {
            let current = frontier.extract_min()?.node;
            let (board, cost) = {
                let node = &nodes[current.0];
                (Rc::clone(&node.board), node.cost)
            };

            if board.is_goal() {
                let solution = reconstruct(&nodes, current, expanded);
                info!(
                    event = "solve_end",
                    solved = true,
                    expanded,
                    moves = solution.steps(),
                    frontier = frontier.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                );
                return Ok(solution);
            }

            if let Some(limit) = self
                .config
                .max_expansions
                .filter(|&limit| expanded >= limit)
            {
                debug!(event = "expansion_limit", limit, frontier = frontier.len());
                return Err(SolveError::ExpansionLimit { limit });
            }

            open.remove(&board);
            debug_assert!(!closed.contains(&board), "a closed board was queued again");
            closed.insert(Rc::clone(&board));
            expanded += 1;
            if expanded % PROGRESS_INTERVAL == 0 {
                debug!(
                    event = "progress",
                    expanded,
                    frontier = frontier.len(),
                    cost,
                );
            }

            let tentative = cost + 1;
            for neighbor in board.neighbors() {
                if closed.contains(&neighbor) {
                    continue;
                }
                let known = open
                    .get_key_value(&neighbor)
                    .map(|(shared, entry)| (Rc::clone(shared), *entry));
                match known {
                    None => {
                        let neighbor = Rc::new(neighbor);
                        let entry =
                            push_node(&mut nodes, Rc::clone(&neighbor), tentative, Some(current));
                        frontier.insert(entry);
                        open.insert(neighbor, entry);
                    }
                    Some((shared, existing)) if tentative < nodes[existing.node.0].cost => {
                        trace!(
                            event = "decrease_key",
                            from = nodes[existing.node.0].cost,
                            to = tentative,
                        );
                        let entry =
                            push_node(&mut nodes, Rc::clone(&shared), tentative, Some(current));
                        frontier.replace_key(&existing, entry)?;
                        open.insert(shared, entry);
                    }
                    Some(_) => {}
                }
            }
        }

        info!(
            event = "solve_end",
            solved = false,
            expanded,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        Err(SolveError::Unsolvable { expanded })
    }
}

/// Solves `initial` with the default configuration. See [`Solver::solve`].
pub fn solve<V: BoardValue>(initial: &Board<V>) -> Result<Solution<V>, SolveError> {
    Solver::default().solve(initial)
}

fn push_node<V: BoardValue>(
    nodes: &mut Vec<SearchNode<V>>,
    board: Rc<Board<V>>,
    cost: u32,
    predecessor: Option<NodeId>,
) -> Entry {
    let node = NodeId(nodes.len());
    let estimate = cost + board.heuristic_cost_to_goal();
    nodes.push(SearchNode {
        board,
        cost,
        predecessor,
    });
    Entry { estimate, node }
}

fn reconstruct<V: BoardValue>(
    nodes: &[SearchNode<V>],
    goal: NodeId,
    expanded: usize,
) -> Solution<V> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        let node = &nodes[id.0];
        path.push(Board::clone(&node.board));
        current = node.predecessor;
    }
    path.reverse();
    Solution { path, expanded }
}
