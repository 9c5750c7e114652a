//! The 6x7 grid and its rules: legality, gravity, wins and the static
//! evaluation used by the search-based bots.
//!
//! Row 0 is the top row, row 5 the bottom; discs settle at the largest free
//! row index of a column.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, GameErrorKind, ValidationKind};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CONNECT: usize = 4;
pub const CENTER_COLUMN: usize = COLS / 2;

/// A player seat in a session. Serialized as the plain number 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::One, Slot::Two];

    pub fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }

    /// Zero-based index into per-slot arrays.
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl TryFrom<u8> for Slot {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            n => Err(DomainError::validation(
                ValidationKind::Slot,
                format!("Invalid slot {n}, expected 1 or 2"),
            )),
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.number()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

pub type Cell = Option<Slot>;

/// Four coordinates `(row, col)` in line.
pub type Window = [(usize, usize); CONNECT];

/// Every horizontal, vertical and diagonal run of four cells.
///
/// Order: horizontals row-major, verticals column-major, then the
/// down-right diagonals followed by the up-right diagonals, each scanned
/// from the top-left.
static WINDOWS: Lazy<Vec<Window>> = Lazy::new(|| {
    let mut windows = Vec::with_capacity(69);
    for row in 0..ROWS {
        for col in 0..=COLS - CONNECT {
            windows.push(std::array::from_fn(|i| (row, col + i)));
        }
    }
    for col in 0..COLS {
        for row in 0..=ROWS - CONNECT {
            windows.push(std::array::from_fn(|i| (row + i, col)));
        }
    }
    for row in 0..=ROWS - CONNECT {
        for col in 0..=COLS - CONNECT {
            windows.push(std::array::from_fn(|i| (row + i, col + i)));
        }
    }
    for row in CONNECT - 1..ROWS {
        for col in 0..=COLS - CONNECT {
            windows.push(std::array::from_fn(|i| (row - i, col + i)));
        }
    }
    windows
});

pub fn windows() -> &'static [Window] {
    &WINDOWS
}

/// Grid of discs. Serializes as 6 rows of 7 entries, each `null`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from text rows, top row first. `.` is empty, `1` and
    /// `2` are discs. Gravity is not checked.
    pub fn from_rows(rows: [&str; ROWS]) -> Result<Self, DomainError> {
        let mut board = Board::new();
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != COLS {
                return Err(DomainError::validation(
                    ValidationKind::Malformed,
                    format!("row {r} must have {COLS} cells"),
                ));
            }
            for (c, ch) in line.chars().enumerate() {
                board.cells[r][c] = match ch {
                    '.' => None,
                    '1' => Some(Slot::One),
                    '2' => Some(Slot::Two),
                    other => {
                        return Err(DomainError::validation(
                            ValidationKind::Malformed,
                            format!("unexpected cell '{other}' at row {r}"),
                        ))
                    }
                };
            }
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// A column accepts a disc iff it is in range and its top cell is empty.
    pub fn is_legal(&self, col: usize) -> bool {
        col < COLS && self.cells[0][col].is_none()
    }

    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.is_legal(c)).collect()
    }

    /// Drop a disc into `col`, returning the row it settled in.
    pub fn drop_disc(&mut self, col: usize, slot: Slot) -> Result<usize, DomainError> {
        if col >= COLS {
            return Err(DomainError::game(
                GameErrorKind::ColumnOutOfRange,
                format!("Column {col} is out of range"),
            ));
        }
        let row = (0..ROWS)
            .rev()
            .find(|&r| self.cells[r][col].is_none())
            .ok_or_else(|| DomainError::game(GameErrorKind::ColumnFull, "Column is full"))?;
        self.cells[row][col] = Some(slot);
        Ok(row)
    }

    /// Copy of the board with a disc dropped; `None` if the column is not legal.
    pub fn with_disc(&self, col: usize, slot: Slot) -> Option<Board> {
        let mut next = *self;
        next.drop_disc(col, slot).ok().map(|_| next)
    }

    /// Slot owning the first complete window in scan order, if any.
    pub fn winner(&self) -> Option<Slot> {
        windows().iter().find_map(|w| {
            let first = self.cells[w[0].0][w[0].1]?;
            w[1..]
                .iter()
                .all(|&(r, c)| self.cells[r][c] == Some(first))
                .then_some(first)
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(Option::is_some)
    }

    pub fn disc_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Static score of the position from `me`'s point of view: the sum of
    /// [`score_window`] over every window.
    pub fn evaluate(&self, me: Slot) -> i32 {
        windows()
            .iter()
            .map(|w| score_window(w.map(|(r, c)| self.cells[r][c]), me))
            .sum()
    }
}

/// Score one window for `me`. Mixed windows are worth nothing.
pub fn score_window(cells: [Cell; CONNECT], me: Slot) -> i32 {
    let mine = cells.iter().filter(|&&c| c == Some(me)).count();
    let theirs = cells.iter().filter(|&&c| c == Some(me.other())).count();
    let empty = CONNECT - mine - theirs;

    match (mine, theirs, empty) {
        (4, _, _) => 100,
        (3, 0, 1) => 10,
        (2, 0, 2) => 5,
        (0, 3, 1) => -50,
        (0, 2, 2) => -3,
        _ => 0,
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|c| match c {
                    None => '.',
                    Some(Slot::One) => '1',
                    Some(Slot::Two) => '2',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
