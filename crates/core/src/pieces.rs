//! Pieces module - Tetromino catalog and SRS kick data
//!
//! Shapes are stored as mino offsets inside a 4x4 bounding box whose top-left
//! corner is the piece position. Only the North shapes are written out; the
//! other three states are produced by rotating those offsets about each
//! piece's SRS center, so offset `i` is the same physical block in every
//! rotation state. Item attachment relies on that.
//!
//! Reference: https://tetris.wiki/SRS

use crate::types::{Cell, PieceKind, Rotation, BUFFER_ZONE};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// North shapes, indexed by [`PieceKind::index`]
const SPAWN_SHAPES: [PieceShape; 7] = [
    // I
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    // O
    [(1, 0), (2, 0), (1, 1), (2, 1)],
    // T
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    // S
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    // Z
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    // J
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    // L
    [(2, 0), (0, 1), (1, 1), (2, 1)],
];

/// Rotation centers in doubled coordinates (so the I and O half-cell
/// centers stay integral)
const PIVOTS: [(i8, i8); 7] = [(3, 3), (3, 1), (2, 2), (2, 2), (2, 2), (2, 2), (2, 2)];

const fn build_shapes() -> [[PieceShape; 4]; 7] {
    let mut out = [[[(0, 0); 4]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let (px, py) = PIVOTS[k];
        out[k][0] = SPAWN_SHAPES[k];
        let mut r = 1;
        while r < 4 {
            let mut i = 0;
            while i < 4 {
                let (x, y) = out[k][r - 1][i];
                // (dx, dy) -> (-dy, dx) around the doubled pivot
                out[k][r][i] = ((px + py - 2 * y) / 2, (py - px + 2 * x) / 2);
                i += 1;
            }
            r += 1;
        }
        k += 1;
    }
    out
}

static SHAPES: [[PieceShape; 4]; 7] = build_shapes();

/// Get the shape (mino offsets) for a piece kind and rotation
///
/// The offset order is stable across rotations: index `i` always denotes the
/// same block of the piece.
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index()]
}

/// 4x4 occupancy matrix for a piece kind and rotation (row-major, 1 = occupied)
pub fn shape_matrix(kind: PieceKind, rotation: Rotation) -> [[u8; 4]; 4] {
    let mut matrix = [[0u8; 4]; 4];
    for (x, y) in get_shape(kind, rotation) {
        matrix[y as usize][x as usize] = 1;
    }
    matrix
}

/// Board color for a piece kind
pub fn color_of(kind: PieceKind) -> Cell {
    kind.color_index()
}

/// SRS wall kick data
/// Each entry is (dx, dy) offset to try when rotation fails
/// Order: 0=initial rotation, 1-4=wall kicks
///
/// Offsets use the published convention where +y points up; callers
/// subtract dy on the board, whose rows grow downward.
pub type KickTable = [[(i8, i8); 5]; 8];

/// Get kick table for a piece kind
/// Returns table indexed by [`get_kick_index`]
pub fn get_kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// O piece has no kicks (always returns 0,0)
const O_KICKS: KickTable = [[(0, 0); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Get the kick index for a rotation transition
pub fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // N->E
        (Rotation::North, false) => 1, // N->W
        (Rotation::East, false) => 2,  // E->N
        (Rotation::East, true) => 3,   // E->S
        (Rotation::South, false) => 4, // S->E
        (Rotation::South, true) => 5,  // S->W
        (Rotation::West, false) => 6,  // W->S
        (Rotation::West, true) => 7,   // W->N
    }
}

/// Spawn column for the 4x4 bounding box (centered on a 10-wide board)
pub const SPAWN_X: i8 = 3;

/// Spawn row for an arbitrary set of offsets: the lowest block rests on the
/// last buffer-zone row, so a fresh piece is fully hidden.
pub fn spawn_y_for(offsets: &[MinoOffset]) -> i8 {
    let bottom = offsets.iter().map(|&(_, dy)| dy).max().unwrap_or(0);
    BUFFER_ZONE as i8 - 1 - bottom
}

/// Spawn row for a catalog piece in its North state
pub fn spawn_y(kind: PieceKind) -> i8 {
    spawn_y_for(&get_shape(kind, Rotation::North))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut shape: PieceShape) -> PieceShape {
        shape.sort_by_key(|&(x, y)| (y, x));
        shape
    }

    #[test]
    fn generated_shapes_match_srs_states() {
        // Reference cell sets for the three generated states of T and I.
        let t = [
            [(1, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (1, 1), (2, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (1, 2)],
            [(1, 0), (0, 1), (1, 1), (1, 2)],
        ];
        let i = [
            [(0, 1), (1, 1), (2, 1), (3, 1)],
            [(2, 0), (2, 1), (2, 2), (2, 3)],
            [(0, 2), (1, 2), (2, 2), (3, 2)],
            [(1, 0), (1, 1), (1, 2), (1, 3)],
        ];
        let rotations = [Rotation::North, Rotation::East, Rotation::South, Rotation::West];
        for (r, rotation) in rotations.iter().enumerate() {
            assert_eq!(sorted(get_shape(PieceKind::T, *rotation)), sorted(t[r]));
            assert_eq!(sorted(get_shape(PieceKind::I, *rotation)), sorted(i[r]));
        }
    }

    #[test]
    fn o_piece_is_rotation_invariant() {
        let north = sorted(get_shape(PieceKind::O, Rotation::North));
        for rotation in [Rotation::East, Rotation::South, Rotation::West] {
            assert_eq!(sorted(get_shape(PieceKind::O, rotation)), north);
        }
    }

    #[test]
    fn all_shapes_fit_the_bounding_box() {
        for kind in PieceKind::ALL {
            for rotation in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
                for (x, y) in get_shape(kind, rotation) {
                    assert!((0..4).contains(&x) && (0..4).contains(&y), "{kind:?} {rotation:?}");
                }
                let filled: u8 = shape_matrix(kind, rotation).iter().flatten().sum();
                assert_eq!(filled, 4);
            }
        }
    }

    #[test]
    fn spawn_row_hides_piece_in_buffer() {
        assert_eq!(spawn_y(PieceKind::I), 2);
        assert_eq!(spawn_y(PieceKind::T), 2);
        assert_eq!(spawn_y(PieceKind::O), 2);
    }
}
