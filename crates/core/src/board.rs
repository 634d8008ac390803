//! Board module - manages the game grid
//!
//! The board is 10 columns by 24 rows: 4 hidden buffer rows on top of the 20
//! visible ones. Cells live in a flat array for cache locality and zero
//! allocation. Coordinates are (x, y) with x in 0..10 (left to right) and y in
//! 0..24 (top to bottom, rows 0..4 are the buffer zone).
//!
//! Clears can be immediate ([`Board::clear_lines`]) or deferred: cells are
//! overwritten with [`CLEAR_MARK`] and a due time is recorded, and
//! [`Board::process_pending_clears_if_due`] commits them once the engine
//! clock has passed it.

use arrayvec::ArrayVec;
use log::debug;

use crate::placement::Placement;
use crate::types::{
    Cell, Row, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_ZONE, CLEAR_MARK, EMPTY, LINE_CLEAR_DELAY_MS,
    TOTAL_HEIGHT,
};

/// Total number of cells on the board
pub(crate) const BOARD_SIZE: usize = BOARD_WIDTH * TOTAL_HEIGHT;

/// Row indices touched by one clear operation
pub type RowList = ArrayVec<usize, TOTAL_HEIGHT>;

/// Anything that can take garbage rows pushed in from the bottom
pub trait GarbageTarget {
    /// Shift every row up by `rows.len()` and write `rows` into the freed
    /// bottom rows, first row topmost. Returns the number of rows spliced.
    fn splice_bottom_rows(&mut self, rows: &[Row]) -> usize;
}

/// The game board - 10 columns x 24 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    /// Engine-clock time at which marked cells are removed
    pending_due_ms: Option<u64>,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY; BOARD_SIZE],
            pending_due_ms: None,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    pub(crate) fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= TOTAL_HEIGHT as i32 {
            return None;
        }
        Some((y as usize) * BOARD_WIDTH + (x as usize))
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    /// Total stored rows, buffer zone included
    pub fn height(&self) -> usize {
        TOTAL_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x.into(), y.into()).map(|idx| self.cells[idx])
    }

    /// Color at (row, col); 0 for anything out of range
    pub fn get_cell_color(&self, row: i32, col: i32) -> Cell {
        Self::index(col, row).map_or(EMPTY, |idx| self.cells[idx])
    }

    /// Write a color at (row, col); out-of-range writes are ignored
    pub fn set_cell_color(&mut self, row: i32, col: i32, color: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = color;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(EMPTY))
    }

    /// Out of bounds or occupied (marked cells count as occupied)
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        !self.is_empty_at(x, y)
    }

    /// True iff every block of the placement maps to an in-bounds empty cell
    pub fn is_valid_position(&self, piece: &Placement) -> bool {
        piece.cells().all(|(x, y)| self.is_empty_at(x, y))
    }

    /// Write the piece color into every block; no validity check
    pub fn place(&mut self, piece: &Placement) {
        let color = piece.color();
        for (x, y) in piece.cells() {
            if let Some(idx) = Self::index(x.into(), y.into()) {
                self.cells[idx] = color;
            }
        }
    }

    /// Borrow one row, `None` when `y` is out of range
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= TOTAL_HEIGHT {
            return None;
        }
        let start = y * BOARD_WIDTH;
        Some(&self.cells[start..start + BOARD_WIDTH])
    }

    /// Every cell non-empty, and the row is not already entirely marked
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).is_some_and(|row| {
            row.iter().all(|&c| c != EMPTY) && !row.iter().all(|&c| c == CLEAR_MARK)
        })
    }

    /// Every cell carries the clear mark
    pub fn is_row_marked(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|&c| c == CLEAR_MARK))
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    /// Uses a two-pointer algorithm with zero-allocation
    pub fn clear_full_rows(&mut self) -> RowList {
        let mut remove = [false; TOTAL_HEIGHT];
        let mut cleared_rows = RowList::new();
        for y in (0..TOTAL_HEIGHT).rev() {
            if self.is_row_full(y) {
                remove[y] = true;
                cleared_rows.push(y);
            }
        }
        compact_rows(&mut self.cells, &remove, EMPTY);
        cleared_rows
    }

    /// Immediate clear: remove full rows, shift the rest down, return the count
    pub fn clear_lines(&mut self) -> usize {
        self.clear_full_rows().len()
    }

    /// Mark a whole row for deferred removal
    pub fn mark_row(&mut self, y: usize, now_ms: u64) -> bool {
        if y >= TOTAL_HEIGHT {
            return false;
        }
        let start = y * BOARD_WIDTH;
        self.cells[start..start + BOARD_WIDTH].fill(CLEAR_MARK);
        self.schedule_pending_clear(now_ms + LINE_CLEAR_DELAY_MS);
        true
    }

    /// Deferred form of [`Board::clear_lines`]: marks every full row and
    /// returns the marked indices bottom to top
    pub fn mark_full_lines(&mut self, now_ms: u64) -> RowList {
        let mut marked = RowList::new();
        for y in (0..TOTAL_HEIGHT).rev() {
            if self.is_row_full(y) {
                self.mark_row(y, now_ms);
                marked.push(y);
            }
        }
        marked
    }

    /// Mark every occupied cell of a column inside the visible area
    pub fn mark_column(&mut self, x: usize, now_ms: u64) -> bool {
        if x >= BOARD_WIDTH {
            return false;
        }
        self.mark_area(x as i32, BUFFER_ZONE as i32, x as i32, TOTAL_HEIGHT as i32 - 1, now_ms);
        true
    }

    /// Mark every occupied cell in the inclusive rectangle, clamped to the
    /// board. Returns the number of cells marked.
    pub fn mark_area(
        &mut self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        now_ms: u64,
    ) -> usize {
        let x0 = min_x.max(0);
        let x1 = max_x.min(BOARD_WIDTH as i32 - 1);
        let y0 = min_y.max(0);
        let y1 = max_y.min(TOTAL_HEIGHT as i32 - 1);

        let mut marked = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(idx) = Self::index(x, y) {
                    if self.cells[idx] != EMPTY && self.cells[idx] != CLEAR_MARK {
                        self.cells[idx] = CLEAR_MARK;
                        marked += 1;
                    }
                }
            }
        }
        if marked > 0 {
            self.schedule_pending_clear(now_ms + LINE_CLEAR_DELAY_MS);
        }
        marked
    }

    /// Record a due time; the earliest scheduled time wins
    pub fn schedule_pending_clear(&mut self, due_ms: u64) {
        self.pending_due_ms = Some(self.pending_due_ms.map_or(due_ms, |d| d.min(due_ms)));
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_due_ms.is_some()
    }

    pub fn pending_clear_due_ms(&self) -> Option<u64> {
        self.pending_due_ms
    }

    /// Commit marked cells once `now_ms` has reached the due time
    ///
    /// Fully marked rows are removed (rows above shift down); any other
    /// marked cell becomes empty. Returns true if a commit happened.
    pub fn process_pending_clears_if_due(&mut self, now_ms: u64) -> bool {
        match self.pending_due_ms {
            Some(due) if now_ms >= due => {
                let removed = self.commit_pending();
                debug!(
                    "committed pending clear: {} rows removed",
                    removed.iter().filter(|r| **r).count()
                );
                true
            }
            _ => false,
        }
    }

    /// Apply every pending mark now and return which rows were removed
    pub(crate) fn commit_pending(&mut self) -> [bool; TOTAL_HEIGHT] {
        let mut remove = [false; TOTAL_HEIGHT];
        for (y, flag) in remove.iter_mut().enumerate() {
            *flag = self.is_row_marked(y);
        }
        compact_rows(&mut self.cells, &remove, EMPTY);
        for cell in self.cells.iter_mut().filter(|c| **c == CLEAR_MARK) {
            *cell = EMPTY;
        }
        self.pending_due_ms = None;
        remove
    }

    /// True iff a settled block sits in the hidden buffer zone
    pub fn is_game_over(&self) -> bool {
        self.cells[..BUFFER_ZONE * BOARD_WIDTH]
            .iter()
            .any(|&c| c != EMPTY && c != CLEAR_MARK)
    }

    /// The 20 visible rows, top to bottom
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells[BUFFER_ZONE * BOARD_WIDTH..].chunks_exact(BOARD_WIDTH)
    }

    /// Visible-area indices (0 = top visible row) of fully marked rows
    pub fn completed_visible_rows(&self) -> ArrayVec<usize, BOARD_HEIGHT> {
        (0..BOARD_HEIGHT)
            .filter(|&v| self.is_row_marked(v + BUFFER_ZONE))
            .collect()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board, pending marks included
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
        self.pending_due_ms = None;
    }
}

impl GarbageTarget for Board {
    fn splice_bottom_rows(&mut self, rows: &[Row]) -> usize {
        let n = rows.len().min(TOTAL_HEIGHT);
        if n == 0 {
            return 0;
        }
        // copy_within handles the overlapping shift
        self.cells.copy_within(n * BOARD_WIDTH.., 0);
        let first = TOTAL_HEIGHT - n;
        for (i, row) in rows[rows.len() - n..].iter().enumerate() {
            let start = (first + i) * BOARD_WIDTH;
            self.cells[start..start + BOARD_WIDTH].copy_from_slice(row);
        }
        n
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop the flagged rows from a row-major grid, shifting rows above down and
/// filling the top with `empty`
pub(crate) fn compact_rows<T: Copy>(cells: &mut [T], remove: &[bool; TOTAL_HEIGHT], empty: T) {
    let width = BOARD_WIDTH;
    let mut write_y = TOTAL_HEIGHT;

    // Scan from bottom to top
    for read_y in (0..TOTAL_HEIGHT).rev() {
        if remove[read_y] {
            continue;
        }
        write_y -= 1;
        if write_y != read_y {
            let src_start = read_y * width;
            cells.copy_within(src_start..src_start + width, write_y * width);
        }
    }

    // Clear the remaining rows at the top
    cells[..write_y * width].fill(empty);
}
