//! # Gemfall
//!
//! The rules engine of a tile-matching ("match-3") puzzle game, plus two
//! move-search solvers built on top of it.
//!
//! The engine owns a square grid of colored tiles, detects runs of three or
//! more equal adjacent tiles along rows and columns, removes them, applies
//! gravity and refill, scores the result, and can decide whether any legal
//! move remains. The solvers search the space of single-tile swaps and
//! recommend the best one.
//!
//! It is used by two binaries:
//! - `play`: interactive text-mode play via the command line.
//! - `solver_eval`: compares the two solvers over a set of seeded boards.
//!
//! ## Modules
//! - `engine`: tile colors (`Color`), the board (`Board`), swap and
//!   resolution mechanics, legality scanning, snapshots.
//! - `runs`: run detection over a single line of values.
//! - `solver`: the exhaustive and simulated move-search strategies.
//! - `error`: the crate's error type (`BoardError`).
//! - `utils`: string-grid parsing for tests, scenarios, and the binaries.

pub mod engine;
pub mod error;
pub mod runs;
pub mod solver;
pub mod utils;
