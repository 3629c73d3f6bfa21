//! Core rules engine for the match-3 board.
//!
//! This module defines the game's fundamental components:
//! - `Color`: the tile colors a board can be populated with.
//! - `Board`: the square grid together with its score, palette, and RNG,
//!   plus all game mechanics (match resolution, gravity and refill, the
//!   swap family, legality scanning, snapshot/restore).
//!
//! The coordinate convention is `(column, row)` with column-major storage:
//! `grid[col][row]`, where row 0 is the top of the column. Rows are scanned
//! by transposition. This convention is used everywhere without exception.

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fmt;

use crate::error::BoardError;
use crate::runs::find_runs;

/// A cell address as `(column, row)`. Row 0 is the top of the column.
pub type Cell = (usize, usize);

/// A candidate move: the two cells to exchange.
pub type Swap = (Cell, Cell);

/// The smallest board that can host a run.
const MIN_SIZE: usize = 3;

/// A tile color.
///
/// Boards draw from a caller-supplied palette of these; there is no "empty"
/// variant because a hole never survives a public operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl Color {
    /// Every color the engine knows about.
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
    ];

    /// The default four-color palette.
    pub const DEFAULT_PALETTE: [Color; 4] =
        [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// Converts the color to its lowercase character code.
    ///
    /// # Examples
    /// ```
    /// use gemfall::engine::Color;
    /// assert_eq!(Color::Red.to_char(), 'r');
    /// assert_eq!(Color::Purple.to_char(), 'p');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Yellow => 'y',
            Color::Purple => 'p',
        }
    }

    /// Parses a character code back into a color.
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'b' => Some(Color::Blue),
            'y' => Some(Color::Yellow),
            'p' => Some(Color::Purple),
            _ => None,
        }
    }
}

/// Enumerates every axis-adjacent cell pair of an `size`-by-`size` grid in
/// the engine's canonical order: all horizontal pairs `((c, r), (c+1, r))`
/// column by column, then all vertical pairs `((c, r), (c, r+1))` column by
/// column.
///
/// This single definition is shared by [`Board::matches_exist`] and both
/// solvers, so their trial orders always agree. Yields `2 * size * (size-1)`
/// pairs.
pub fn adjacent_pairs(size: usize) -> impl Iterator<Item = Swap> {
    let horizontal = (0..size.saturating_sub(1))
        .flat_map(move |col| (0..size).map(move |row| ((col, row), (col + 1, row))));
    let vertical = (0..size)
        .flat_map(move |col| (0..size.saturating_sub(1)).map(move |row| ((col, row), (col, row + 1))));
    horizontal.chain(vertical)
}

/// A captured board state for speculative evaluation.
///
/// Holds the grid and score only. The RNG is deliberately not captured:
/// restoring it would make every refill after a restore identical, which
/// would collapse the simulated solver's repeated sampling into one sample.
#[derive(Clone, Debug)]
pub struct Snapshot {
    grid: Vec<Vec<Color>>,
    score: i32,
}

impl Snapshot {
    /// The score at the time the snapshot was taken.
    pub fn score(&self) -> i32 {
        self.score
    }
}

/// The match-3 board: a square grid of colors, the accumulated score, the
/// color palette, and the board's own random source.
///
/// A board is quiescent (no run of three or more anywhere) and has at least
/// one legal move after construction and after every committing swap.
/// Positions passed to the swap family are bounds-checked; adjacency is the
/// caller's responsibility.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    palette: Vec<Color>,
    /// Column-major: `grid[col][row]`, row 0 at the top.
    grid: Vec<Vec<Color>>,
    score: i32,
    rng: SmallRng,
}

impl Board {
    /// Constructs and fully initializes a board with an entropy-seeded RNG.
    ///
    /// The grid is filled uniformly at random from `palette`, resolved to
    /// quiescence with the score then reset to 0, and reshuffled until at
    /// least one legal move exists.
    ///
    /// # Arguments
    /// * `size`: board dimension; must be at least 3 (4 or more recommended).
    /// * `palette`: the colors to populate with; duplicates are dropped.
    ///   At least 2 distinct colors are recommended: with too few distinct
    ///   colors for the size, the reshuffle loop may never terminate.
    pub fn new(size: usize, palette: &[Color]) -> Result<Self, BoardError> {
        Self::build(size, palette, SmallRng::from_entropy())
    }

    /// Like [`Board::new`] but seeded, for reproducible boards.
    ///
    /// The same seed, size, and palette always produce the same board.
    pub fn with_seed(size: usize, palette: &[Color], seed: u64) -> Result<Self, BoardError> {
        Self::build(size, palette, SmallRng::seed_from_u64(seed))
    }

    /// Constructs a board from a predefined column-major grid, bypassing
    /// random fill and initialization entirely.
    ///
    /// Useful for tests and fixed scenarios. The grid is taken as-is: it is
    /// not resolved and its legality is not checked. The score starts at 0
    /// and `seed` primes the RNG used by later refills.
    pub fn from_grid(
        grid: Vec<Vec<Color>>,
        palette: &[Color],
        seed: u64,
    ) -> Result<Self, BoardError> {
        let size = grid.len();
        let palette = Self::validate_config(size, palette)?;
        for (col, column) in grid.iter().enumerate() {
            if column.len() != size {
                return Err(BoardError::NotSquare {
                    expected: size,
                    col,
                    found: column.len(),
                });
            }
            for (row, color) in column.iter().enumerate() {
                if !palette.contains(color) {
                    return Err(BoardError::ForeignColor { col, row });
                }
            }
        }
        Ok(Board {
            size,
            palette,
            grid,
            score: 0,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn build(size: usize, palette: &[Color], mut rng: SmallRng) -> Result<Self, BoardError> {
        let palette = Self::validate_config(size, palette)?;
        let mut grid = Vec::with_capacity(size);
        for _ in 0..size {
            let mut column = Vec::with_capacity(size);
            for _ in 0..size {
                column.push(*palette.choose(&mut rng).expect("palette is non-empty"));
            }
            grid.push(column);
        }
        let mut board = Board {
            size,
            palette,
            grid,
            score: 0,
            rng,
        };
        board.resolve();
        board.score = 0;
        while !board.matches_exist() {
            debug!("fresh {}x{} board has no legal move, reshuffling", size, size);
            board.reshuffle();
            board.score = 0;
        }
        Ok(board)
    }

    fn validate_config(size: usize, palette: &[Color]) -> Result<Vec<Color>, BoardError> {
        if size < MIN_SIZE {
            return Err(BoardError::SizeTooSmall { size });
        }
        if palette.is_empty() {
            return Err(BoardError::EmptyPalette);
        }
        let mut deduped = Vec::with_capacity(palette.len());
        for &color in palette {
            if !deduped.contains(&color) {
                deduped.push(color);
            }
        }
        Ok(deduped)
    }

    /// The board dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The accumulated score.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// The deduplicated color palette the board draws refills from.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// A read view of the grid, column-major: `grid()[col][row]`, row 0 at
    /// the top of the column.
    pub fn grid(&self) -> &[Vec<Color>] {
        &self.grid
    }

    /// Captures the grid and score for later [`Board::restore`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            score: self.score,
        }
    }

    /// Restores a snapshot previously taken from this board.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        debug_assert_eq!(snapshot.grid.len(), self.size, "snapshot from another board");
        self.grid.clone_from(&snapshot.grid);
        self.score = snapshot.score;
    }

    fn check_bounds(&self, (col, row): Cell) -> Result<(), BoardError> {
        if col >= self.size || row >= self.size {
            return Err(BoardError::OutOfBounds {
                col,
                row,
                size: self.size,
            });
        }
        Ok(())
    }

    fn exchange(&mut self, (c1, r1): Cell, (c2, r2): Cell) {
        let tmp = self.grid[c1][r1];
        self.grid[c1][r1] = self.grid[c2][r2];
        self.grid[c2][r2] = tmp;
    }

    /// Committing swap: exchanges the colors at `a` and `b` and resolves all
    /// resulting cascades.
    ///
    /// If the resolution did not change the score, the exchange is undone
    /// and `Ok(false)` is returned: a useless move leaves the board exactly
    /// as it was. Otherwise the move is kept; if the settled board then has
    /// no legal move left, its tiles are reshuffled (and re-resolved) until
    /// one exists, and `Ok(true)` is returned. Points scored by reshuffle
    /// cascades count toward the total.
    ///
    /// Positions need not be adjacent; the presentation layer checks
    /// adjacency before calling. Out-of-range positions are an error.
    pub fn swap(&mut self, a: Cell, b: Cell) -> Result<bool, BoardError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        let before = self.score;
        self.exchange(a, b);
        self.resolve();
        if self.score == before {
            self.exchange(a, b);
            return Ok(false);
        }
        while !self.matches_exist() {
            debug!("board deadlocked after swap, reshuffling");
            self.reshuffle();
        }
        Ok(true)
    }

    /// Probing swap: exchanges and resolves, with no revert and no deadlock
    /// handling.
    ///
    /// For speculative evaluation only; the caller is expected to restore
    /// the prior state from a [`Snapshot`] afterwards.
    pub fn probe_swap(&mut self, a: Cell, b: Cell) -> Result<(), BoardError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        self.probe(a, b);
        Ok(())
    }

    /// Committing score-only swap: exchanges and runs a single non-cascading
    /// match scan, adding any run points to the score without removing
    /// tiles.
    ///
    /// Reverts the exchange and returns `Ok(false)` if nothing scored. Since
    /// no tile is removed, no deadlock reshuffle applies here.
    pub fn swap_no_refill(&mut self, a: Cell, b: Cell) -> Result<bool, BoardError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        let before = self.score;
        self.exchange(a, b);
        let (_, points) = self.match_scan();
        self.score += points;
        if self.score == before {
            self.exchange(a, b);
            return Ok(false);
        }
        Ok(true)
    }

    /// Probing score-only swap: exchanges and runs a single scoring scan,
    /// leaving the grid (runs included) in place.
    ///
    /// This measures the immediate yield of a swap without the noise of
    /// random refills; the exhaustive solver is built on it.
    pub fn probe_swap_no_refill(&mut self, a: Cell, b: Cell) -> Result<(), BoardError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        self.probe_no_refill(a, b);
        Ok(())
    }

    pub(crate) fn probe(&mut self, a: Cell, b: Cell) {
        self.exchange(a, b);
        self.resolve();
    }

    pub(crate) fn probe_no_refill(&mut self, a: Cell, b: Cell) {
        self.exchange(a, b);
        let (_, points) = self.match_scan();
        self.score += points;
    }

    /// Returns true if at least one axis-adjacent swap would score.
    ///
    /// Tries every pair from [`adjacent_pairs`] with a probing swap and
    /// restores the pre-trial state after each attempt, so the grid and
    /// score are identical before and after this call (only the RNG
    /// advances). O(size³) overall.
    pub fn matches_exist(&mut self) -> bool {
        let snapshot = self.snapshot();
        for (a, b) in adjacent_pairs(self.size) {
            self.probe(a, b);
            let improved = self.score > snapshot.score;
            self.restore(&snapshot);
            if improved {
                return true;
            }
        }
        false
    }

    /// One scoring scan over every column and every row.
    ///
    /// Returns the distinct cells claimed by at least one run together with
    /// the points for the pass: `2*len - 5` per run, plus a +2 bonus each
    /// time a row run claims a cell a column run already marked. A cell is
    /// marked at most once no matter how many runs cover it.
    fn match_scan(&self) -> (HashSet<Cell>, i32) {
        let mut marked: HashSet<Cell> = HashSet::new();
        let mut points = 0;
        for col in 0..self.size {
            for run in find_runs(&self.grid[col]) {
                points += 2 * run.len() as i32 - 5;
                for row in run {
                    marked.insert((col, row));
                }
            }
        }
        let mut line = Vec::with_capacity(self.size);
        for row in 0..self.size {
            line.clear();
            line.extend((0..self.size).map(|col| self.grid[col][row]));
            for run in find_runs(&line) {
                points += 2 * run.len() as i32 - 5;
                for col in run {
                    if !marked.insert((col, row)) {
                        points += 2;
                    }
                }
            }
        }
        (marked, points)
    }

    /// Removes the marked cells column by column and refills from the top.
    ///
    /// Within each column the surviving cells keep their order and settle
    /// toward the bottom; one fresh random palette color is inserted at the
    /// top per cell removed.
    fn clear_and_refill(&mut self, marked: &HashSet<Cell>) {
        for col in 0..self.size {
            let before = self.grid[col].len();
            let mut row = 0;
            self.grid[col].retain(|_| {
                let keep = !marked.contains(&(col, row));
                row += 1;
                keep
            });
            let removed = before - self.grid[col].len();
            for _ in 0..removed {
                let fresh = *self.palette.choose(&mut self.rng).expect("palette is non-empty");
                self.grid[col].insert(0, fresh);
            }
        }
    }

    /// Runs scan → clear → refill passes until a scan marks nothing.
    ///
    /// New runs created by falling and refilled tiles are scored in later
    /// passes, so the score accumulates monotonically across the cascade.
    fn resolve(&mut self) {
        loop {
            let (marked, points) = self.match_scan();
            if marked.is_empty() {
                break;
            }
            trace!("resolve pass: {} cells cleared for {} points", marked.len(), points);
            self.score += points;
            self.clear_and_refill(&marked);
        }
    }

    /// Uniformly permutes the existing tile multiset in place, then resolves
    /// any matches the permutation created.
    fn reshuffle(&mut self) {
        let mut tiles: Vec<Color> = self.grid.iter().flatten().copied().collect();
        tiles.shuffle(&mut self.rng);
        let mut tiles = tiles.into_iter();
        for column in self.grid.iter_mut() {
            for cell in column.iter_mut() {
                *cell = tiles.next().expect("reshuffle preserves the tile count");
            }
        }
        self.resolve();
    }

    #[cfg(test)]
    fn is_quiescent(&self) -> bool {
        self.match_scan().0.is_empty()
    }
}

impl fmt::Display for Board {
    /// Renders the grid as rows of lowercase color codes, top row first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.grid[col][row].to_char())?;
            }
            if row < self.size - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
