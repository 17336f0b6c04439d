use crate::io::configuration::{MAX_LAYOUT_CELLS, SOLVER_MAX_CELLS, SOLVER_NODE_BUDGET};
use crate::io::error::{Result, generation_error, invalid_parameter};
use crate::layout::bitset::CandidateSet;
use crate::tileset::model::{EdgePattern, Side, TileSet};
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Why the solver gave up on a constrained assignment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// Every branch of the search was tried without success
    Exhausted,
    /// The node-visit budget ran out first
    BudgetExceeded {
        /// Nodes visited before stopping
        nodes: usize,
    },
    /// The grid exceeds the cell limit and was not searched
    GridTooLarge {
        /// Number of cells requested
        cells: usize,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "no compatible assignment exists"),
            Self::BudgetExceeded { nodes } => write!(f, "search budget of {nodes} nodes exhausted"),
            Self::GridTooLarge { cells } => write!(f, "grid of {cells} cells exceeds the solver limit"),
        }
    }
}

/// Whether a layout honours every edge constraint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// Every shared edge in the grid is compatible
    Solved,
    /// Some cells were filled at random, ignoring adjacency
    Fallback {
        /// Why the search stopped
        reason: FallbackReason,
    },
}

/// Grid of tile indices produced by the solver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutSolution {
    /// Tile index per cell, indexed `[row, col]`
    pub grid: Array2<usize>,
    /// Solved or degraded
    pub outcome: LayoutOutcome,
    /// Search nodes visited
    pub nodes_visited: usize,
}

impl LayoutSolution {
    /// Whether the grid satisfies every adjacency constraint by construction
    pub const fn is_solved(&self) -> bool {
        matches!(self.outcome, LayoutOutcome::Solved)
    }

    /// Whether the grid was completed at random
    pub const fn is_fallback(&self) -> bool {
        !self.is_solved()
    }

    /// Grid width in tiles
    pub fn width(&self) -> usize {
        self.grid.ncols()
    }

    /// Grid height in tiles
    pub fn height(&self) -> usize {
        self.grid.nrows()
    }

    /// Grid as nested rows
    pub fn rows(&self) -> Vec<Vec<usize>> {
        self.grid.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Check every horizontal and vertical neighbour pair against `patterns`
    pub fn satisfies_adjacency(&self, patterns: &[EdgePattern]) -> bool {
        let (height, width) = self.grid.dim();
        for row in 0..height {
            for col in 0..width {
                let Some(here) = self.grid.get((row, col)).and_then(|&t| patterns.get(t)) else {
                    return false;
                };
                let right = self.grid.get((row, col + 1)).and_then(|&t| patterns.get(t));
                if right.is_some_and(|right| !here.matches(right, Side::Right)) {
                    return false;
                }
                let below = self.grid.get((row + 1, col)).and_then(|&t| patterns.get(t));
                if below.is_some_and(|below| !here.matches(below, Side::Bottom)) {
                    return false;
                }
            }
        }
        true
    }
}

/// Candidates of one cell and how many have been tried
struct Frame {
    candidates: Vec<usize>,
    cursor: usize,
}

/// Tiles grouped by the class on their top and left edges
struct PatternIndex {
    tile_count: usize,
    by_top: HashMap<u32, CandidateSet>,
    by_left: HashMap<u32, CandidateSet>,
}

impl PatternIndex {
    fn new(patterns: &[EdgePattern]) -> Self {
        let tile_count = patterns.len();
        let mut by_top: HashMap<u32, CandidateSet> = HashMap::new();
        let mut by_left: HashMap<u32, CandidateSet> = HashMap::new();
        for (index, pattern) in patterns.iter().enumerate() {
            by_top
                .entry(pattern.top)
                .or_insert_with(|| CandidateSet::new(tile_count))
                .insert(index);
            by_left
                .entry(pattern.left)
                .or_insert_with(|| CandidateSet::new(tile_count))
                .insert(index);
        }
        Self {
            tile_count,
            by_top,
            by_left,
        }
    }

    /// Tiles whose top matches `above` and whose left matches `left`
    fn compatible(&self, above: Option<&EdgePattern>, left: Option<&EdgePattern>) -> CandidateSet {
        let mut candidates = CandidateSet::all(self.tile_count);
        if let Some(pattern) = above {
            match self.by_top.get(&pattern.bottom) {
                Some(set) => candidates.intersect_with(set),
                None => return CandidateSet::new(self.tile_count),
            }
        }
        if let Some(pattern) = left {
            match self.by_left.get(&pattern.right) {
                Some(set) => candidates.intersect_with(set),
                None => return CandidateSet::new(self.tile_count),
            }
        }
        candidates
    }
}

/// Depth-first backtracking over a grid in row-major order
///
/// Each cell takes a tile whose top edge matches the bottom of the tile above
/// and whose left edge matches the right of the tile to the left. Candidates
/// are shuffled from the seed, so a given seed always yields the same grid.
/// The search is iterative and bounded by a node budget and a cell limit;
/// hitting either bound, or exhausting the search, completes the grid with
/// random tiles and marks the solution as a fallback.
#[derive(Clone, Copy, Debug)]
pub struct LayoutSolver {
    node_budget: usize,
    max_cells: usize,
}

impl Default for LayoutSolver {
    fn default() -> Self {
        Self::new(SOLVER_NODE_BUDGET, SOLVER_MAX_CELLS)
    }
}

impl LayoutSolver {
    /// Solver with explicit work bounds
    pub const fn new(node_budget: usize, max_cells: usize) -> Self {
        Self {
            node_budget,
            max_cells,
        }
    }

    /// Assign tiles of `tile_set` to a `width`×`height` grid
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has no cells or more than
    /// `MAX_LAYOUT_CELLS`, or if the tile set is empty
    pub fn solve_layout(
        &self,
        tile_set: &TileSet,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<LayoutSolution> {
        self.solve_patterns(&tile_set.edge_patterns, width, height, seed)
    }

    /// Assign pattern indices to a `width`×`height` grid
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has no cells or more than
    /// `MAX_LAYOUT_CELLS`, or if no patterns are given
    pub fn solve_patterns(
        &self,
        patterns: &[EdgePattern],
        width: usize,
        height: usize,
        seed: u64,
    ) -> Result<LayoutSolution> {
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "layout",
                &format!("{width}x{height}"),
                &"grid must have at least one cell",
            ));
        }
        let cells = width
            .checked_mul(height)
            .filter(|&cells| cells <= MAX_LAYOUT_CELLS)
            .ok_or_else(|| {
                invalid_parameter(
                    "layout",
                    &format!("{width}x{height}"),
                    &format!("grid must have at most {MAX_LAYOUT_CELLS} cells"),
                )
            })?;
        if patterns.is_empty() {
            return Err(generation_error("layout", &"tile set has no edge patterns"));
        }

        let mut rng = Pcg32::seed_from_u64(seed);

        if cells > self.max_cells {
            return finish(
                Vec::new(),
                (width, height),
                patterns.len(),
                &mut rng,
                0,
                Some(FallbackReason::GridTooLarge { cells }),
            );
        }

        let index = PatternIndex::new(patterns);
        let mut frames: Vec<Frame> = Vec::with_capacity(cells);
        let mut placed: Vec<usize> = Vec::with_capacity(cells);
        let mut nodes = 0usize;

        let failure = loop {
            let cell = placed.len();
            if cell == cells {
                break None;
            }

            if frames.len() == cell {
                let above = cell
                    .checked_sub(width)
                    .and_then(|i| placed.get(i))
                    .and_then(|&t| patterns.get(t));
                let left = if cell % width == 0 {
                    None
                } else {
                    placed.get(cell - 1).and_then(|&t| patterns.get(t))
                };
                let mut candidates = index.compatible(above, left).to_vec();
                candidates.shuffle(&mut rng);
                frames.push(Frame {
                    candidates,
                    cursor: 0,
                });
            }

            let Some(frame) = frames.last_mut() else {
                break Some(FallbackReason::Exhausted);
            };

            if let Some(&tile) = frame.candidates.get(frame.cursor) {
                frame.cursor += 1;
                placed.push(tile);
                nodes += 1;
                if nodes >= self.node_budget && placed.len() < cells {
                    break Some(FallbackReason::BudgetExceeded { nodes });
                }
            } else {
                frames.pop();
                if placed.pop().is_none() {
                    break Some(FallbackReason::Exhausted);
                }
            }
        };

        finish(placed, (width, height), patterns.len(), &mut rng, nodes, failure)
    }
}

/// Complete a partial assignment and wrap it into a solution
fn finish(
    mut placed: Vec<usize>,
    (width, height): (usize, usize),
    tile_count: usize,
    rng: &mut Pcg32,
    nodes: usize,
    failure: Option<FallbackReason>,
) -> Result<LayoutSolution> {
    let cells = width * height;
    let outcome = failure.map_or(LayoutOutcome::Solved, |reason| {
        debug!(%reason, placed = placed.len(), cells, "layout fallback to random fill");
        LayoutOutcome::Fallback { reason }
    });

    while placed.len() < cells {
        placed.push(rng.random_range(0..tile_count));
    }

    let grid = Array2::from_shape_vec((height, width), placed)
        .map_err(|err| generation_error("layout", &err))?;

    Ok(LayoutSolution {
        grid,
        outcome,
        nodes_visited: nodes,
    })
}
