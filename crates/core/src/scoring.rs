//! Scoring module - line-clear points, drop bonuses, leveling and gravity
//!
//! Line clears: a base value for the number of simultaneous lines, times the
//! current level, times the difficulty factor. Difficulty factors are kept
//! in tenths so everything stays in integer math.

use crate::types::{
    Difficulty, BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_INTERVAL_STEP_MS, EXTRA_LINE_SCORE,
    HARD_DROP_SCORE, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL, SOFT_DROP_SCORE,
};

/// Base points for clearing `lines` at once, before level and difficulty
pub fn base_line_score(lines: usize) -> u32 {
    match lines {
        0..=4 => LINE_SCORES[lines],
        n => LINE_SCORES[4] + EXTRA_LINE_SCORE * (n as u32 - 4),
    }
}

/// Points for a clear of `lines` at `level` (1-based) and `difficulty`
pub fn calculate_line_score(lines: usize, level: u32, difficulty: Difficulty) -> u32 {
    base_line_score(lines)
        .saturating_mul(level.max(1))
        .saturating_mul(difficulty.score_factor_tenths())
        / 10
}

/// Calculate score for soft/hard drop
pub fn calculate_drop_score(cells: u32, hard_drop: bool) -> u32 {
    let per_cell = if hard_drop {
        HARD_DROP_SCORE
    } else {
        SOFT_DROP_SCORE
    };
    cells.saturating_mul(per_cell)
}

/// Level for a total line count: min(20, lines / 10 + 1)
pub fn level_for_lines(lines: u32) -> u32 {
    (lines / LINES_PER_LEVEL + 1).min(MAX_LEVEL)
}

/// Milliseconds between automatic drop steps at `level`
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(DROP_INTERVAL_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(reduction)
        .clamp(DROP_INTERVAL_MIN_MS, BASE_DROP_MS)
}
