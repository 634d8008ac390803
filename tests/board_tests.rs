//! Board tests - cells, placement, immediate and deferred clears

use duel_tetris::core::{Board, GarbageTarget, ItemBoard, Placement};
use duel_tetris::types::{
    ItemKind, PieceKind, Rotation, BOARD_WIDTH, CLEAR_MARK, GARBAGE_COLOR, LINE_CLEAR_DELAY_MS,
    TOTAL_HEIGHT,
};

const BOTTOM: i32 = TOTAL_HEIGHT as i32 - 1;

fn fill_row(board: &mut Board, row: i32, color: u8) {
    for col in 0..BOARD_WIDTH as i32 {
        board.set_cell_color(row, col, color);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), TOTAL_HEIGHT);
    assert!(board.cells().iter().all(|&c| c == 0));
    assert!(!board.is_game_over());
}

#[test]
fn test_out_of_range_reads_are_empty() {
    let mut board = Board::new();
    assert_eq!(board.get_cell_color(-1, 0), 0);
    assert_eq!(board.get_cell_color(0, -1), 0);
    assert_eq!(board.get_cell_color(TOTAL_HEIGHT as i32, 0), 0);
    assert_eq!(board.get_cell_color(0, BOARD_WIDTH as i32), 0);
    assert!(!board.set_cell_color(0, 10, 3));
    assert_eq!(board.get(-1, 0), None);
}

#[test]
fn test_place_o_piece_cells() {
    let mut board = Board::new();
    let piece = Placement::new(PieceKind::O, 4, 22, Rotation::North);
    assert!(board.is_valid_position(&piece));
    board.place(&piece);

    let color = PieceKind::O.color_index();
    let filled: Vec<(i32, i32)> = (0..TOTAL_HEIGHT as i32)
        .flat_map(|r| (0..BOARD_WIDTH as i32).map(move |c| (r, c)))
        .filter(|&(r, c)| board.get_cell_color(r, c) != 0)
        .collect();
    assert_eq!(filled, vec![(22, 5), (22, 6), (23, 5), (23, 6)]);
    assert!(filled.iter().all(|&(r, c)| board.get_cell_color(r, c) == color));
    assert!(!board.is_valid_position(&piece));
}

#[test]
fn test_invalid_positions() {
    let board = Board::new();
    assert!(!board.is_valid_position(&Placement::new(PieceKind::I, -1, 10, Rotation::North)));
    assert!(!board.is_valid_position(&Placement::new(PieceKind::I, 7, 10, Rotation::North)));
    assert!(!board.is_valid_position(&Placement::new(PieceKind::O, 0, 23, Rotation::North)));
    assert!(board.is_valid_position(&Placement::new(PieceKind::I, 6, 10, Rotation::North)));
}

#[test]
fn test_clear_lines_shifts_rows_down() {
    let mut board = Board::new();
    fill_row(&mut board, BOTTOM, 1);
    board.set_cell_color(BOTTOM - 1, 2, 5);

    assert_eq!(board.clear_lines(), 1);
    assert_eq!(board.get_cell_color(BOTTOM, 2), 5);
    assert_eq!(board.get_cell_color(BOTTOM, 0), 0);
    assert_eq!(board.get_cell_color(BOTTOM - 1, 2), 0);
    assert_eq!(board.clear_lines(), 0);
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::new();
    fill_row(&mut board, BOTTOM, 1);
    board.set_cell_color(BOTTOM - 1, 0, 4);
    fill_row(&mut board, BOTTOM - 2, 2);

    let rows = board.clear_full_rows();
    assert_eq!(rows.as_slice(), &[BOTTOM as usize, BOTTOM as usize - 2]);
    assert_eq!(board.get_cell_color(BOTTOM, 0), 4);
    assert_eq!(board.get_cell_color(BOTTOM, 1), 0);
}

#[test]
fn test_deferred_clear_waits_for_due_time() {
    let mut board = Board::new();
    fill_row(&mut board, BOTTOM, 1);
    board.set_cell_color(BOTTOM - 1, 7, 6);

    let marked = board.mark_full_lines(1000);
    assert_eq!(marked.as_slice(), &[BOTTOM as usize]);
    assert!(board.is_row_marked(BOTTOM as usize));
    assert!(!board.is_row_full(BOTTOM as usize));
    assert_eq!(board.pending_clear_due_ms(), Some(1000 + LINE_CLEAR_DELAY_MS));

    assert!(!board.process_pending_clears_if_due(1000 + LINE_CLEAR_DELAY_MS - 1));
    assert!(board.is_row_marked(BOTTOM as usize));

    assert!(board.process_pending_clears_if_due(1000 + LINE_CLEAR_DELAY_MS));
    assert!(!board.has_pending_clear());
    assert_eq!(board.get_cell_color(BOTTOM, 7), 6);
}

#[test]
fn test_earliest_due_time_wins() {
    let mut board = Board::new();
    board.set_cell_color(BOTTOM, 0, 1);
    board.set_cell_color(BOTTOM, 5, 1);
    board.mark_area(0, BOTTOM, 0, BOTTOM, 100);
    board.mark_area(5, BOTTOM, 5, BOTTOM, 50);
    assert_eq!(board.pending_clear_due_ms(), Some(50 + LINE_CLEAR_DELAY_MS));
}

#[test]
fn test_partial_marks_become_empty() {
    let mut board = Board::new();
    board.set_cell_color(BOTTOM, 0, 3);
    board.set_cell_color(BOTTOM - 1, 0, 3);
    assert_eq!(board.mark_area(0, BOTTOM, 3, BOTTOM, 0), 1);
    assert_eq!(board.get_cell_color(BOTTOM, 0), CLEAR_MARK);

    board.process_pending_clears_if_due(LINE_CLEAR_DELAY_MS);
    // a partly marked row is not removed, the mark just empties
    assert_eq!(board.get_cell_color(BOTTOM, 0), 0);
    assert_eq!(board.get_cell_color(BOTTOM - 1, 0), 3);
}

#[test]
fn test_mark_column_skips_buffer_zone() {
    let mut board = Board::new();
    board.set_cell_color(2, 4, 1);
    board.set_cell_color(10, 4, 1);
    board.set_cell_color(BOTTOM, 4, 1);
    assert!(board.mark_column(4, 0));
    assert_eq!(board.get_cell_color(2, 4), 1);
    assert_eq!(board.get_cell_color(10, 4), CLEAR_MARK);
    assert_eq!(board.get_cell_color(BOTTOM, 4), CLEAR_MARK);
    assert!(!board.mark_column(BOARD_WIDTH, 0));
}

#[test]
fn test_game_over_when_buffer_occupied() {
    let mut board = Board::new();
    board.set_cell_color(3, 0, 2);
    assert!(board.is_game_over());

    let mut board = Board::new();
    board.set_cell_color(3, 0, CLEAR_MARK);
    assert!(!board.is_game_over());
}

#[test]
fn test_garbage_splice_pushes_rows_up() {
    let mut board = Board::new();
    board.set_cell_color(BOTTOM, 3, 5);
    let mut row = [GARBAGE_COLOR; BOARD_WIDTH];
    row[1] = 0;

    assert_eq!(board.splice_bottom_rows(&[row, row]), 2);
    assert_eq!(board.get_cell_color(BOTTOM - 2, 3), 5);
    assert_eq!(board.get_cell_color(BOTTOM, 0), GARBAGE_COLOR);
    assert_eq!(board.get_cell_color(BOTTOM, 1), 0);
    assert_eq!(board.get_cell_color(BOTTOM - 1, 1), 0);
}

#[test]
fn test_item_board_items_move_with_rows() {
    let mut board = ItemBoard::new();
    board.set_cell_color(BOTTOM - 1, 2, 3);
    assert!(board.set_item_block(BOTTOM - 1, 2, ItemKind::LineClear));
    for col in 0..BOARD_WIDTH as i32 {
        board.set_cell_color(BOTTOM, col, 1);
    }

    board.mark_full_lines(0);
    board.process_pending_clears_if_due(LINE_CLEAR_DELAY_MS);
    assert_eq!(board.get_item_block(BOTTOM, 2), ItemKind::LineClear);
    assert_eq!(board.get_item_block(BOTTOM - 1, 2), ItemKind::None);
}

#[test]
fn test_item_needs_an_occupied_cell() {
    let mut board = ItemBoard::new();
    assert!(!board.set_item_block(BOTTOM, 0, ItemKind::ColumnClear));
    board.set_cell_color(BOTTOM, 0, 2);
    assert!(board.set_item_block(BOTTOM, 0, ItemKind::ColumnClear));
    board.set_cell_color(BOTTOM, 0, 0);
    assert_eq!(board.get_item_block(BOTTOM, 0), ItemKind::None);
}
