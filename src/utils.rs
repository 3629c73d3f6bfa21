use crate::engine::{Board, Color};

/// Parses an array of row strings into a fully populated `Board`.
///
/// Each string is one row of the grid, top row first, one lowercase color
/// code per cell (`r g b y p`, see `Color::from_char`). The input must be
/// square: every row exactly as long as the number of rows. Rows are
/// transposed into the engine's column-major grid, so
/// `board.grid()[col][row]` equals `rows[row][col]`.
///
/// The resulting board is taken as-is (no resolution, score 0) with its RNG
/// seeded from `seed`; every cell must belong to `palette`.
///
/// # Examples
/// ```
/// use gemfall::engine::Color;
/// use gemfall::utils::board_from_rows;
///
/// let board = board_from_rows(&["rgb", "gbr", "brg"], &Color::DEFAULT_PALETTE, 0).unwrap();
/// assert_eq!(board.size(), 3);
/// assert_eq!(board.grid()[0][0], Color::Red);
/// assert_eq!(board.grid()[2][1], Color::Red);
///
/// assert!(board_from_rows(&["rgx", "gbr", "brg"], &Color::DEFAULT_PALETTE, 0).is_err());
/// ```
pub fn board_from_rows(rows: &[&str], palette: &[Color], seed: u64) -> Result<Board, String> {
    let size = rows.len();
    let mut grid: Vec<Vec<Color>> = vec![Vec::with_capacity(size); size];

    for (row, line) in rows.iter().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() != size {
            return Err(format!(
                "row {} has {} cells, expected {} for a square grid",
                row,
                chars.len(),
                size
            ));
        }
        for (col, ch) in chars.iter().enumerate() {
            let color = Color::from_char(*ch).ok_or_else(|| {
                format!("unrecognized color character '{}' in row {} col {}", ch, row, col)
            })?;
            grid[col].push(color);
        }
    }

    Board::from_grid(grid, palette, seed).map_err(|e| e.to_string())
}
