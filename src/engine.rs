use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the (fixed) square board.
pub const SIZE: usize = 4;

/// Largest tile that can appear on a 4x4 board (2^17).
pub const MAX_TILE: Tile = 1 << 17;

type Tile = u32;
type Line = [Tile; SIZE];
type Score = u64;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All directions, in a stable order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Position of this direction within [`Move::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("empty direction")]
    Empty,
    #[error("unknown direction: {0:?} (expected up, down, left or right)")]
    Unknown(String),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Accepts `up`/`down`/`left`/`right` or their first letter, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseMoveError::Empty);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Move::Up),
            "down" | "d" => Ok(Move::Down),
            "left" | "l" => Ok(Move::Left),
            "right" | "r" => Ok(Move::Right),
            _ => Err(ParseMoveError::Unknown(trimmed.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell ({row}, {col}) holds {value}, expected 0 or a power of two up to {MAX_TILE}")]
    InvalidTile { row: usize, col: usize, value: Tile },
}

/// Result of collapsing a single line toward index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCollapse {
    pub line: Line,
    /// Sum of the tiles produced by merges in this line.
    pub score_delta: Score,
}

/// Result of sliding a whole board in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub score_delta: Score,
    /// True if at least one cell changed.
    pub moved: bool,
}

/// 4x4 2048 board. `0` is an empty cell, anything else a power of two.
///
/// `Board` is `Copy`; every transition returns a new value and leaves the
/// input untouched, except [`Board::spawn_random_tile`] which inserts in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[[u32; 4]; 4]")]
pub struct Board([[Tile; SIZE]; SIZE]);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// A new empty board.
    #[inline]
    pub fn new() -> Self { Board::EMPTY }

    /// Construct a `Board` from row-major tile values.
    ///
    /// Every value must be 0 or a power of two no larger than [`MAX_TILE`];
    /// this is only checked in debug builds. Use [`Board::try_from_rows`]
    /// for untrusted input.
    #[inline]
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Self {
        debug_assert!(
            rows.iter().flatten().all(|&v| is_valid_tile(v)),
            "board holds a value that is not 0 or a power of two up to {MAX_TILE}: {rows:?}"
        );
        Board(rows)
    }

    /// Checked form of [`Board::from_rows`].
    ///
    /// ```
    /// use twenty48::engine::Board;
    /// assert!(Board::try_from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]).is_ok());
    /// assert!(Board::try_from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn try_from_rows(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, BoardError> {
        for (row, line) in rows.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Board(rows))
    }

    /// Borrow the rows of this board.
    #[inline]
    pub fn rows(&self) -> &[[Tile; SIZE]; SIZE] { &self.0 }

    /// Consume this `Board`, returning its rows.
    #[inline]
    pub fn into_rows(self) -> [[Tile; SIZE]; SIZE] { self.0 }

    /// Tile value at (`row`, `col`), 0 if empty.
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Tile { self.0[row][col] }

    /// All 16 cells, row-major.
    pub fn cells(&self) -> [Tile; SIZE * SIZE] {
        std::array::from_fn(|idx| self.0[idx / SIZE][idx % SIZE])
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// assert_eq!(b.shift(Move::Left).rows()[0], [4, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Self { apply_move(&self, dir).board }

    /// Slide/merge in `dir`, reporting the score gained and whether anything moved.
    #[inline]
    pub fn apply(&self, dir: Move) -> MoveOutcome { apply_move(self, dir) }

    /// Insert a 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
    ///
    /// A full board is left unchanged.
    ///
    /// ```
    /// use twenty48::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut b = Board::EMPTY;
    /// b.spawn_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 15);
    /// ```
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let empty: Vec<(usize, usize)> = self.empty_cells().collect();
        if empty.is_empty() {
            return;
        }
        let (row, col) = empty[rng.gen_range(0..empty.len())];
        self.0[row][col] = generate_random_tile(rng);
    }

    /// Value-returning form of [`Board::spawn_random_tile`].
    ///
    /// ```
    /// use twenty48::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.spawn_random_tile(rng);
        self
    }

    /// Return true if no move can change the board.
    #[inline]
    pub fn is_terminal(&self) -> bool { is_terminal(self) }

    /// True if sliding in `dir` would change the board.
    #[inline]
    pub fn can_move(&self, dir: Move) -> bool { apply_move(self, dir).moved }

    /// Directions that would change the board, in [`Move::ALL`] order.
    pub fn legal_moves(&self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&dir| self.can_move(dir)).collect()
    }

    /// Count the number of empty cells on the board.
    pub fn count_empty(&self) -> usize { self.empty_cells().count() }

    /// Return the highest tile value present on the board (0 if empty).
    pub fn highest_tile(&self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values.
    pub fn tile_sum(&self) -> u64 {
        self.0.iter().flatten().map(|&v| v as u64).sum()
    }

    fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.0[row][col] == 0)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f, "{}", "-".repeat(SIZE * 8 - 1))?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<[[Tile; SIZE]; SIZE]> for Board {
    type Error = BoardError;
    fn try_from(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, Self::Error> { Board::try_from_rows(rows) }
}
impl From<Board> for [[Tile; SIZE]; SIZE] { fn from(b: Board) -> Self { b.into_rows() } }

/// Collapse one line toward index 0.
///
/// Zeros are squeezed out, then a single greedy left-to-right pass merges
/// each adjacent equal pair. A tile produced by a merge is never merged
/// again in the same pass: `[2, 2, 4, 0]` becomes `[4, 4, 0, 0]`.
///
/// ```
/// use twenty48::engine::collapse_line;
/// let c = collapse_line([2, 2, 2, 2]);
/// assert_eq!(c.line, [4, 4, 0, 0]);
/// assert_eq!(c.score_delta, 8);
/// ```
pub fn collapse_line(line: Line) -> LineCollapse {
    let mut out = [0; SIZE];
    let mut score_delta = 0;
    let mut len = 0;
    let mut tiles = line.into_iter().filter(|&v| v != 0).peekable();
    while let Some(tile) = tiles.next() {
        // A pair whose double would not fit in a tile is left unmerged.
        let merged = tiles.peek().filter(|&&next| next == tile).and_then(|_| tile.checked_mul(2));
        if let Some(merged) = merged {
            tiles.next();
            score_delta += merged as Score;
            out[len] = merged;
        } else {
            out[len] = tile;
        }
        len += 1;
    }
    LineCollapse { line: out, score_delta }
}

/// Slide/merge every row or column of `board` in `direction`. No randomness.
pub fn apply_move(board: &Board, direction: Move) -> MoveOutcome {
    let mut next = *board;
    let mut score_delta = 0;
    for idx in 0..SIZE {
        let line: Line = std::array::from_fn(|k| {
            let (row, col) = line_coords(direction, idx, k);
            board.0[row][col]
        });
        let collapsed = collapse_line(line);
        score_delta += collapsed.score_delta;
        for (k, &val) in collapsed.line.iter().enumerate() {
            let (row, col) = line_coords(direction, idx, k);
            next.0[row][col] = val;
        }
    }
    MoveOutcome { board: next, score_delta, moved: next != *board }
}

/// True iff the board has no empty cell and no two orthogonal neighbours are equal.
pub fn is_terminal(board: &Board) -> bool {
    let grid = &board.0;
    for row in 0..SIZE {
        for col in 0..SIZE {
            let val = grid[row][col];
            if val == 0 {
                return false;
            }
            if col + 1 < SIZE && val == grid[row][col + 1] {
                return false;
            }
            if row + 1 < SIZE && val == grid[row + 1][col] {
                return false;
            }
        }
    }
    true
}

// Maps position `k` of line `idx` (oriented so sliding goes toward k = 0)
// back to board coordinates.
#[inline(always)]
fn line_coords(direction: Move, idx: usize, k: usize) -> (usize, usize) {
    match direction {
        Move::Left => (idx, k),
        Move::Right => (idx, SIZE - 1 - k),
        Move::Up => (k, idx),
        Move::Down => (SIZE - 1 - k, idx),
    }
}

#[inline]
fn is_valid_tile(value: Tile) -> bool { value == 0 || (value.is_power_of_two() && value <= MAX_TILE) }

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_range(0..10) < 9 { 2 } else { 4 } }

fn format_val(val: Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
