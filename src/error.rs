/// Errors raised by board construction and position-taking operations.
///
/// The taxonomy is deliberately narrow: once a board is validly constructed,
/// nothing in the engine can fail; the remaining conditions are invariant
/// violations that are asserted in tests rather than surfaced as errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size {size} cannot host a run (minimum is 3)")]
    SizeTooSmall { size: usize },

    #[error("color palette must not be empty")]
    EmptyPalette,

    #[error("position ({col}, {row}) is outside the {size}x{size} grid")]
    OutOfBounds { col: usize, row: usize, size: usize },

    #[error("grid is not square: expected {expected} cells in column {col}, found {found}")]
    NotSquare {
        expected: usize,
        col: usize,
        found: usize,
    },

    #[error("cell ({col}, {row}) holds a color outside the configured palette")]
    ForeignColor { col: usize, row: usize },
}
