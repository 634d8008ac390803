//! Item board - the board plus a per-cell item overlay
//!
//! Item clears never remove cells directly. They mark cells through the
//! board's deferred protocol and drop the overlay items of every marked cell
//! right away, so an effect resolved later in the same pass cannot fire from
//! a cell that is already going away.

use arrayvec::ArrayVec;
use log::debug;

use crate::board::{compact_rows, Board, GarbageTarget, RowList, BOARD_SIZE};
use crate::pieces::MinoOffset;
use crate::placement::{Placement, WEIGHT_KIND};
use crate::types::{
    Cell, ItemKind, Row, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_ZONE, COLOR_MASK, EMPTY, ITEM_SHIFT,
    TOTAL_HEIGHT,
};

/// Packed visible board: one `(symbol << 16) | color` value per cell
pub type PackedBoard = [[u32; BOARD_WIDTH]; BOARD_HEIGHT];

/// Everything one item-clear pass marked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemClearResult {
    /// Columns cleared by COLUMN_CLEAR items
    pub columns: usize,
    /// CROSS_CLEAR items fired
    pub crosses: usize,
    /// Rows marked by the line pass (full rows plus LINE_CLEAR rows)
    pub lines: usize,
    /// Rows marked only because of a LINE_CLEAR item
    pub item_lines: usize,
    /// Row indices marked by the line pass, bottom to top
    pub line_rows: RowList,
}

impl ItemClearResult {
    /// Clears that feed into scoring
    pub fn total(&self) -> usize {
        self.columns + self.crosses + self.lines
    }

    /// Ordinary full-row clears (what counts toward the next item)
    pub fn normal_lines(&self) -> usize {
        self.lines - self.item_lines
    }
}

/// Board with an item symbol per cell
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBoard {
    board: Board,
    /// Flat array parallel to the board cells
    items: [ItemKind; BOARD_SIZE],
}

impl ItemBoard {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            items: [ItemKind::None; BOARD_SIZE],
        }
    }

    /// The color grid underneath the overlay
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get_cell_color(&self, row: i32, col: i32) -> Cell {
        self.board.get_cell_color(row, col)
    }

    /// Write a color; writing empty also drops the cell's item
    pub fn set_cell_color(&mut self, row: i32, col: i32, color: Cell) -> bool {
        if !self.board.set_cell_color(row, col, color) {
            return false;
        }
        if color == EMPTY {
            self.clear_item_block(row, col);
        }
        true
    }

    /// Attach an item to an occupied cell; `ItemKind::None` clears it
    pub fn set_item_block(&mut self, row: i32, col: i32, item: ItemKind) -> bool {
        let Some(idx) = Board::index(col, row) else {
            return false;
        };
        if item.is_some() && self.board.cells()[idx] == EMPTY {
            return false;
        }
        self.items[idx] = item;
        true
    }

    pub fn get_item_block(&self, row: i32, col: i32) -> ItemKind {
        Board::index(col, row).map_or(ItemKind::None, |idx| self.items[idx])
    }

    pub fn clear_item_block(&mut self, row: i32, col: i32) {
        if let Some(idx) = Board::index(col, row) {
            self.items[idx] = ItemKind::None;
        }
    }

    pub fn is_valid_position(&self, piece: &Placement) -> bool {
        self.board.is_valid_position(piece)
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Write colors and item symbols for every block; no validity check
    pub fn place(&mut self, piece: &Placement) {
        self.board.place(piece);
        for block in piece.blocks() {
            if let Some(idx) = Board::index(block.x.into(), block.y.into()) {
                self.items[idx] = block.item;
            }
        }
    }

    /// Deferred row clear that also drops the row's items
    pub fn mark_row(&mut self, y: usize, now_ms: u64) -> bool {
        if !self.board.mark_row(y, now_ms) {
            return false;
        }
        self.items[y * BOARD_WIDTH..(y + 1) * BOARD_WIDTH].fill(ItemKind::None);
        true
    }

    /// Deferred full-row clear; items in the marked rows are dropped
    pub fn mark_full_lines(&mut self, now_ms: u64) -> RowList {
        let rows = self.board.mark_full_lines(now_ms);
        for &y in &rows {
            self.items[y * BOARD_WIDTH..(y + 1) * BOARD_WIDTH].fill(ItemKind::None);
        }
        rows
    }

    /// Deferred column clear over the visible rows; drops the column's items
    pub fn mark_column(&mut self, x: usize, now_ms: u64) -> bool {
        if !self.board.mark_column(x, now_ms) {
            return false;
        }
        for y in 0..TOTAL_HEIGHT {
            self.items[y * BOARD_WIDTH + x] = ItemKind::None;
        }
        true
    }

    /// [`Board::mark_area`] plus dropping the items inside the rectangle
    pub fn mark_area(
        &mut self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        now_ms: u64,
    ) -> usize {
        let marked = self.board.mark_area(min_x, min_y, max_x, max_y, now_ms);
        for y in min_y.max(0)..=max_y.min(TOTAL_HEIGHT as i32 - 1) {
            for x in min_x.max(0)..=max_x.min(BOARD_WIDTH as i32 - 1) {
                self.clear_item_block(y, x);
            }
        }
        marked
    }

    /// Columns holding a COLUMN_CLEAR item are marked over the visible area.
    /// Returns the number of columns cleared.
    pub fn clear_columns_with_items(&mut self, now_ms: u64) -> usize {
        let columns: ArrayVec<usize, BOARD_WIDTH> = (0..BOARD_WIDTH)
            .filter(|&x| {
                (0..TOTAL_HEIGHT).any(|y| self.items[y * BOARD_WIDTH + x] == ItemKind::ColumnClear)
            })
            .collect();
        for &x in &columns {
            self.mark_column(x, now_ms);
        }
        columns.len()
    }

    /// Every CROSS_CLEAR cell marks its row and its column. Returns the number
    /// of crosses fired.
    pub fn clear_crosses_with_items(&mut self, now_ms: u64) -> usize {
        let mut fired = 0;
        for y in (0..TOTAL_HEIGHT).rev() {
            for x in 0..BOARD_WIDTH {
                // earlier crosses may already have dropped this item
                if self.items[y * BOARD_WIDTH + x] == ItemKind::CrossClear {
                    self.mark_row(y, now_ms);
                    self.mark_column(x, now_ms);
                    fired += 1;
                }
            }
        }
        fired
    }

    /// Row pass: full rows and rows holding a LINE_CLEAR item are marked.
    /// Returns the marked rows and how many of them were item-triggered.
    pub fn mark_lines_with_items(&mut self, now_ms: u64) -> (RowList, usize) {
        let mut rows = RowList::new();
        let mut item_rows = 0;
        for y in (0..TOTAL_HEIGHT).rev() {
            let full = self.board.is_row_full(y);
            let has_item = !self.board.is_row_marked(y)
                && self.items[y * BOARD_WIDTH..(y + 1) * BOARD_WIDTH]
                    .contains(&ItemKind::LineClear);
            if full || has_item {
                self.mark_row(y, now_ms);
                rows.push(y);
                if !full {
                    item_rows += 1;
                }
            }
        }
        (rows, item_rows)
    }

    /// Returns (total rows cleared, rows cleared only because of an item)
    pub fn clear_lines_with_items(&mut self, now_ms: u64) -> (usize, usize) {
        let (rows, item_rows) = self.mark_lines_with_items(now_ms);
        (rows.len(), item_rows)
    }

    /// Full item pass in the fixed order: columns, crosses, lines
    pub fn resolve_item_clears(&mut self, now_ms: u64) -> ItemClearResult {
        let columns = self.clear_columns_with_items(now_ms);
        let crosses = self.clear_crosses_with_items(now_ms);
        let (line_rows, item_lines) = self.mark_lines_with_items(now_ms);
        let result = ItemClearResult {
            columns,
            crosses,
            lines: line_rows.len(),
            item_lines,
            line_rows,
        };
        if result.total() > 0 {
            debug!(
                "item clears: {} columns, {} crosses, {} lines ({} by item)",
                result.columns, result.crosses, result.lines, result.item_lines
            );
        }
        result
    }

    /// Crush everything under a weight and rest it on the floor
    ///
    /// `row`/`col` are the top-left of the weight's bounding box and `shape`
    /// its block offsets. Every cell from `row` down to the floor inside the
    /// weight's column span is emptied, then the footprint is written on the
    /// bottom rows with the WEIGHT item. Returns the number of cells crushed.
    pub fn trigger_weight_effect(&mut self, row: i32, col: i32, shape: &[MinoOffset]) -> usize {
        let (width, height) = footprint_size(shape);
        let mut crushed = 0;
        for y in row.max(0)..TOTAL_HEIGHT as i32 {
            for x in col..col + width {
                if self.get_cell_color(y, x) != EMPTY {
                    crushed += 1;
                }
                self.set_cell_color(y, x, EMPTY);
            }
        }

        let base = TOTAL_HEIGHT as i32 - height;
        let color = WEIGHT_KIND.color_index();
        for &(dx, dy) in shape {
            let (y, x) = (base + i32::from(dy), col + i32::from(dx));
            self.set_cell_color(y, x, color);
            self.set_item_block(y, x, ItemKind::Weight);
        }
        debug!("weight crushed {crushed} cells in columns {col}..{}", col + width);
        crushed
    }

    /// Remove the weight blocks in one row of the footprint
    pub fn clear_weight_step(&mut self, row: i32, col: i32, width: i32) -> usize {
        let mut removed = 0;
        for x in col..col + width {
            if self.get_item_block(row, x) == ItemKind::Weight {
                self.set_cell_color(row, x, EMPTY);
                removed += 1;
            }
        }
        removed
    }

    /// Remove a floor-resting weight footprint entirely
    pub fn clear_weight(&mut self, col: i32, shape: &[MinoOffset]) -> usize {
        let (width, height) = footprint_size(shape);
        let base = TOTAL_HEIGHT as i32 - height;
        (base..base + height)
            .map(|y| self.clear_weight_step(y, col, width))
            .sum()
    }

    /// Mark the 6x6 window from (row-2, col-2) to (row+3, col+3), clamped to
    /// the board bounds. The buffer rows are included, so a bomb resting up
    /// there still takes its own blocks with it. Returns the number of cells
    /// marked.
    pub fn trigger_bomb_at(&mut self, row: i32, col: i32, now_ms: u64) -> usize {
        let marked = self.mark_area(col - 2, row - 2, col + 3, row + 3, now_ms);
        debug!("bomb at ({row}, {col}) marked {marked} cells");
        marked
    }

    /// Commit due marks, moving items with their rows
    pub fn process_pending_clears_if_due(&mut self, now_ms: u64) -> bool {
        match self.board.pending_clear_due_ms() {
            Some(due) if now_ms >= due => {
                let removed = self.board.commit_pending();
                compact_rows(&mut self.items, &removed, ItemKind::None);
                // marked cells that were not part of a removed row are now empty
                for (item, &cell) in self.items.iter_mut().zip(self.board.cells()) {
                    if cell == EMPTY {
                        *item = ItemKind::None;
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Packed value of one cell: `(symbol << 16) | color`
    pub fn packed_cell(&self, row: i32, col: i32) -> u32 {
        pack(self.get_cell_color(row, col), self.get_item_block(row, col))
    }

    /// Visible rows packed for rendering or transmission
    pub fn get_compressed_board(&self) -> PackedBoard {
        let mut packed = [[0u32; BOARD_WIDTH]; BOARD_HEIGHT];
        for (v, out_row) in packed.iter_mut().enumerate() {
            let y = (v + BUFFER_ZONE) as i32;
            for (x, out) in out_row.iter_mut().enumerate() {
                *out = self.packed_cell(y, x as i32);
            }
        }
        packed
    }

    pub fn clear(&mut self) {
        self.board.clear();
        self.items.fill(ItemKind::None);
    }
}

impl GarbageTarget for ItemBoard {
    fn splice_bottom_rows(&mut self, rows: &[Row]) -> usize {
        let n = self.board.splice_bottom_rows(rows);
        if n > 0 {
            self.items.copy_within(n * BOARD_WIDTH.., 0);
            self.items[(TOTAL_HEIGHT - n) * BOARD_WIDTH..].fill(ItemKind::None);
        }
        n
    }
}

impl Default for ItemBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// `(symbol << 16) | color`
pub fn pack(color: Cell, item: ItemKind) -> u32 {
    ((item.symbol() as u32) << ITEM_SHIFT) | u32::from(color)
}

/// Inverse of [`pack`]; unknown symbols decode as no item
pub fn unpack(value: u32) -> (Cell, ItemKind) {
    let color = (value & COLOR_MASK) as Cell;
    let item = char::from_u32(value >> ITEM_SHIFT)
        .and_then(ItemKind::from_symbol)
        .unwrap_or(ItemKind::None);
    (color, item)
}

fn footprint_size(shape: &[MinoOffset]) -> (i32, i32) {
    let width = shape.iter().map(|&(dx, _)| i32::from(dx) + 1).max().unwrap_or(0);
    let height = shape.iter().map(|&(_, dy)| i32::from(dy) + 1).max().unwrap_or(0);
    (width, height)
}
