//! Rotation system - stateless movement, drop and rotation helpers
//!
//! Every function takes a placement and a board and returns a new placement
//! (or `None` when the move is blocked). Nothing here mutates the board.

use crate::board::Board;
use crate::pieces::{get_kick_index, get_kick_table};
use crate::placement::Placement;
use crate::types::{PieceKind, Rotation};

/// Outcome of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationResult {
    pub placement: Placement,
    /// T piece with at least three blocked diagonal corners after rotating
    pub is_tspin: bool,
    /// Index into the kick table of the offset that succeeded (0 = no kick)
    pub kick_index: usize,
}

fn shifted(piece: &Placement, board: &Board, dx: i8, dy: i8) -> Option<Placement> {
    let moved = piece.translated(dx, dy);
    board.is_valid_position(&moved).then_some(moved)
}

pub fn move_left(piece: &Placement, board: &Board) -> Option<Placement> {
    shifted(piece, board, -1, 0)
}

pub fn move_right(piece: &Placement, board: &Board) -> Option<Placement> {
    shifted(piece, board, 1, 0)
}

pub fn move_down(piece: &Placement, board: &Board) -> Option<Placement> {
    shifted(piece, board, 0, 1)
}

/// Number of rows the piece can fall before one further step is blocked
pub fn drop_distance(piece: &Placement, board: &Board) -> i8 {
    let mut distance = 0;
    while board.is_valid_position(&piece.translated(0, distance + 1)) {
        distance += 1;
    }
    distance
}

/// Projection of the piece onto its landing row
pub fn hard_drop(piece: &Placement, board: &Board) -> Placement {
    piece.translated(0, drop_distance(piece, board))
}

/// Rotate with SRS wall kicks
pub fn attempt_rotation(piece: &Placement, board: &Board, clockwise: bool) -> Option<Placement> {
    rotate_with_kicks(piece, board, clockwise).map(|(placement, _)| placement)
}

/// Rotate with SRS wall kicks and classify the result as a T-spin
pub fn attempt_rotation_with_tspin_check(
    piece: &Placement,
    board: &Board,
    clockwise: bool,
) -> Option<RotationResult> {
    let (placement, kick_index) = rotate_with_kicks(piece, board, clockwise)?;
    Some(RotationResult {
        placement,
        is_tspin: is_tspin_rotation(&placement, board),
        kick_index,
    })
}

/// Three-corner rule for a T piece at its current position
///
/// Out-of-bounds corners count as blocked.
pub fn is_tspin_rotation(piece: &Placement, board: &Board) -> bool {
    if piece.kind != PieceKind::T || piece.is_rotation_locked() {
        return false;
    }
    // T center is (1, 1) in its bounding box in every rotation state
    const CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];
    CORNERS
        .iter()
        .filter(|&&(cx, cy)| board.is_blocked(piece.x + cx, piece.y + cy))
        .count()
        >= 3
}

/// Try each kick offset in order; the first valid position wins
fn rotate_with_kicks(
    piece: &Placement,
    board: &Board,
    clockwise: bool,
) -> Option<(Placement, usize)> {
    if piece.is_rotation_locked() {
        return None;
    }
    let rotated = piece.rotated(clockwise);
    let kicks = &get_kick_table(piece.kind)[get_kick_index(piece.rotation, clockwise)];
    if piece.kind == PieceKind::O {
        return board.is_valid_position(&rotated).then_some((rotated, 0));
    }

    kicks.iter().enumerate().find_map(|(i, &(dx, dy))| {
        // table y points up, board rows grow downward
        let candidate = rotated.translated(dx, -dy);
        board.is_valid_position(&candidate).then_some((candidate, i))
    })
}

/// Rotation state reached after `quarter_turns` clockwise turns
pub fn rotation_after(start: Rotation, quarter_turns: usize) -> Rotation {
    (0..quarter_turns % 4).fold(start, |r, _| r.rotate_cw())
}
