//! Engine module - one player's game session
//!
//! Ties together the board, the rotation helpers, the piece queue, scoring
//! and the mode rules. The engine is driven from a single game-loop thread:
//! input calls mutate it directly and [`Engine::update`] advances its clock.
//! Nothing here blocks, sleeps or reads the wall clock.

use std::fmt;

use log::{debug, info};

use crate::board::{Board, GarbageTarget};
use crate::item_board::{pack, ItemBoard, PackedBoard};
use crate::mode::{ClearOutcome, ModeRules, TimeLimit};
use crate::placement::Placement;
use crate::rng::PieceQueue;
use crate::scoring::{calculate_drop_score, calculate_line_score, get_drop_interval_ms, level_for_lines};
use crate::snapshot::{visible_row, ActiveSnapshot, BoardSnapshot, GameSnapshot};
use crate::srs;
use crate::types::{
    Difficulty, GameAction, GameMode, PieceKind, Row, SpecialKind, BOARD_WIDTH, GHOST_MARK,
    NEXT_QUEUE_SIZE,
};

/// Construction parameters for an [`Engine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub seed: u32,
}

/// Emitted after every lock, before the next piece spawns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    /// The piece as it was written to the board
    pub piece: Placement,
    /// Rows, columns and crosses cleared by this lock
    pub lines_cleared: u32,
    /// Line-clear points awarded (drop bonuses excluded)
    pub score_gained: u32,
    pub is_tspin: bool,
    /// Cleared rows as gray garbage, taken from the pre-lock board
    pub garbage: Vec<Row>,
    /// This lock ended the game
    pub game_over: bool,
}

/// Lock observer; `Send` so an engine can move to its own thread
pub type LockCallback = Box<dyn FnMut(&LockEvent) + Send>;

/// Complete single-player state
pub struct Engine {
    config: EngineConfig,
    board: ItemBoard,
    rules: ModeRules,
    queue: PieceQueue,
    current: Option<Placement>,
    hold: Option<Placement>,
    can_hold: bool,
    /// Board as it was at the most recent lock
    snapshot: Option<BoardSnapshot>,
    score: u32,
    lines: u32,
    level: u32,
    game_over: bool,
    /// Milliseconds advanced through `update`
    clock_ms: u64,
    drop_timer_ms: u32,
    /// Last successful action was a rotation into a T-spin position
    tspin_armed: bool,
    pieces_locked: u32,
    on_piece_locked: Option<LockCallback>,
}

impl Engine {
    /// Create an engine and spawn its first piece
    pub fn new(config: EngineConfig) -> Self {
        let mut engine = Self {
            config,
            board: ItemBoard::new(),
            rules: ModeRules::new(config.mode),
            queue: PieceQueue::new(config.seed, config.difficulty),
            current: None,
            hold: None,
            can_hold: true,
            snapshot: None,
            score: 0,
            lines: 0,
            level: 1,
            game_over: false,
            clock_ms: 0,
            drop_timer_ms: 0,
            tspin_armed: false,
            pieces_locked: 0,
            on_piece_locked: None,
        };
        engine.spawn_next();
        engine
    }

    /// Time-limited engine with a custom countdown length
    pub fn with_time_limit(config: EngineConfig, duration_ms: u64) -> Self {
        let mut engine = Self::new(EngineConfig {
            mode: GameMode::TimeLimited,
            ..config
        });
        engine.rules = ModeRules::time_limited(duration_ms);
        engine
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn board(&self) -> &ItemBoard {
        &self.board
    }

    pub fn current(&self) -> Option<Placement> {
        self.current
    }

    pub fn hold_piece(&self) -> Option<Placement> {
        self.hold
    }

    pub fn next_queue(&self) -> [PieceKind; NEXT_QUEUE_SIZE] {
        self.queue.peek_5()
    }

    /// Upcoming pieces, front first
    pub fn next_pieces(&self) -> impl Iterator<Item = &Placement> + '_ {
        self.queue.iter()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    /// Board captured at the most recent lock
    pub fn last_snapshot(&self) -> Option<&BoardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn rules(&self) -> &ModeRules {
        &self.rules
    }

    /// A weight is being removed and no piece is active
    pub fn is_weight_active(&self) -> bool {
        self.rules.weight_active()
    }

    /// Countdown left in a time-limited game, `None` in other modes
    pub fn remaining_time_ms(&self) -> Option<u64> {
        self.rules.time_limit().map(TimeLimit::remaining_ms)
    }

    pub fn is_time_up(&self) -> bool {
        self.rules.time_limit().is_some_and(TimeLimit::is_time_up)
    }

    /// Stop the countdown; gravity and clears keep running on `update`
    pub fn pause_timer(&mut self) {
        if let Some(limit) = self.rules.time_limit_mut() {
            limit.pause();
        }
    }

    pub fn resume_timer(&mut self) {
        if let Some(limit) = self.rules.time_limit_mut() {
            limit.resume();
        }
    }

    /// Current drop interval based on level
    pub fn drop_interval_ms(&self) -> u32 {
        get_drop_interval_ms(self.level)
    }

    /// Hard-drop projection of the active piece
    pub fn ghost(&self) -> Option<Placement> {
        self.current
            .map(|piece| srs::hard_drop(&piece, self.board.board()))
    }

    pub fn set_on_piece_locked(&mut self, callback: impl FnMut(&LockEvent) + Send + 'static) {
        self.on_piece_locked = Some(Box::new(callback));
    }

    pub fn clear_on_piece_locked(&mut self) {
        self.on_piece_locked = None;
    }

    fn spawn_next(&mut self) -> bool {
        let piece = self.rules.take_next_piece(&mut self.queue);
        self.activate(piece)
    }

    fn activate(&mut self, piece: Placement) -> bool {
        self.tspin_armed = false;
        self.drop_timer_ms = 0;
        if !self.board.is_valid_position(&piece) {
            self.current = None;
            self.game_over = true;
            info!("game over: {:?} cannot spawn", piece.kind);
            return false;
        }
        self.current = Some(piece);
        true
    }

    fn try_step(&mut self, step: fn(&Placement, &Board) -> Option<Placement>) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        match step(&piece, self.board.board()) {
            Some(moved) => {
                self.current = Some(moved);
                self.tspin_armed = false;
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_step(srs::move_left)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_step(srs::move_right)
    }

    /// Soft drop by one row; a blocked piece stays put until the next drop tick
    pub fn move_down(&mut self) -> bool {
        let moved = self.try_step(srs::move_down);
        if moved {
            self.score = self.score.saturating_add(calculate_drop_score(1, false));
        }
        moved
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        match srs::attempt_rotation_with_tspin_check(&piece, self.board.board(), clockwise) {
            Some(result) => {
                self.current = Some(result.placement);
                self.tspin_armed = result.is_tspin;
                true
            }
            None => false,
        }
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.rotate(true)
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.rotate(false)
    }

    /// Drop to the landing row and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        let landed = srs::hard_drop(&piece, self.board.board());
        let distance = (landed.y - piece.y) as u32;
        if distance > 0 {
            self.tspin_armed = false;
        }
        self.score = self
            .score
            .saturating_add(calculate_drop_score(distance, true));
        self.current = Some(landed);
        self.lock_current();
        true
    }

    /// Swap the active piece with the hold slot
    ///
    /// Allowed once per lock; special pieces cannot be held.
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        if !piece.is_holdable() {
            return false;
        }
        self.can_hold = false;
        self.current = None;
        match self.hold.replace(piece.at_spawn()) {
            Some(held) => self.activate(held.at_spawn()),
            None => self.spawn_next(),
        }
    }

    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::MoveDown => self.move_down(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate_clockwise(),
            GameAction::RotateCcw => self.rotate_counter_clockwise(),
            GameAction::Hold => self.hold(),
        }
    }

    /// Advance the clock by `dt_ms`
    ///
    /// Pending clears are committed first, then a time-limited game runs its
    /// countdown and ends if it reaches zero. When the drop timer elapses the
    /// active piece falls one row, or locks if it cannot; while a weight is
    /// being removed the tick removes one of its rows instead. Returns true if
    /// a drop tick happened.
    pub fn update(&mut self, dt_ms: u32) -> bool {
        if self.game_over {
            return false;
        }
        self.clock_ms += u64::from(dt_ms);
        self.board.process_pending_clears_if_due(self.clock_ms);

        if self.rules.advance_clock(u64::from(dt_ms)) {
            self.current = None;
            self.game_over = true;
            info!("game over: time is up after {}ms", self.clock_ms);
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(dt_ms);
        if self.drop_timer_ms < self.drop_interval_ms() {
            return false;
        }
        self.drop_timer_ms = 0;

        if self.rules.weight_active() {
            self.step_weight();
            return true;
        }

        let Some(piece) = self.current else {
            return false;
        };
        match srs::move_down(&piece, self.board.board()) {
            Some(moved) => {
                self.current = Some(moved);
                self.tspin_armed = false;
            }
            None => self.lock_current(),
        }
        true
    }

    fn step_weight(&mut self) {
        if self.rules.step_weight(&mut self.board) != Some(true) {
            return;
        }
        // the footprint is gone; anything it completed still scores
        let outcome = self.rules.resolve_clears(&mut self.board, self.clock_ms);
        self.award_clears(&outcome);
        if self.board.is_game_over() {
            self.game_over = true;
            info!("game over after weight");
            return;
        }
        self.spawn_next();
    }

    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        let before = BoardSnapshot::capture(self.board.board());
        let now = self.clock_ms;
        let is_tspin = self.tspin_armed && piece.kind == PieceKind::T;

        let outcome = match piece.special() {
            SpecialKind::Weight => {
                // rows still marked from the previous lock were already scored;
                // they collapse now instead of being crushed
                self.board.process_pending_clears_if_due(u64::MAX);
                self.board.trigger_weight_effect(
                    piece.y.into(),
                    piece.x.into(),
                    &piece.offsets(),
                );
                let height = piece.offsets().iter().map(|&(_, dy)| dy + 1).max().unwrap_or(1);
                self.rules.begin_weight(piece.x.into(), height as u8);
                ClearOutcome::default()
            }
            SpecialKind::Bomb => {
                self.board.place(&piece);
                self.board
                    .trigger_bomb_at(piece.y.into(), piece.x.into(), now);
                self.rules.resolve_clears(&mut self.board, now)
            }
            SpecialKind::None => {
                self.board.place(&piece);
                self.rules.resolve_clears(&mut self.board, now)
            }
        };

        let score_gained = self.award_clears(&outcome);
        let garbage = before.lines(&outcome.visible_line_rows());
        self.snapshot = Some(before);
        self.can_hold = true;
        self.tspin_armed = false;
        self.pieces_locked = self.pieces_locked.wrapping_add(1);
        if self.board.is_game_over() {
            self.game_over = true;
            info!("game over: {:?} locked in the buffer zone", piece.kind);
        }

        let event = LockEvent {
            piece,
            lines_cleared: outcome.total() as u32,
            score_gained,
            is_tspin,
            garbage,
            game_over: self.game_over,
        };
        debug!(
            "locked {:?} at ({}, {}): {} cleared, {} garbage rows{}",
            piece.kind,
            piece.x,
            piece.y,
            event.lines_cleared,
            event.garbage.len(),
            if is_tspin { ", t-spin" } else { "" }
        );
        if let Some(callback) = self.on_piece_locked.as_mut() {
            callback(&event);
        }

        if !self.game_over && !self.rules.weight_active() {
            self.spawn_next();
        }
    }

    /// Score, line and level bookkeeping for one resolution; returns points
    fn award_clears(&mut self, outcome: &ClearOutcome) -> u32 {
        let cleared = outcome.total();
        if cleared == 0 {
            return 0;
        }
        let points = calculate_line_score(cleared, self.level, self.config.difficulty);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = level_for_lines(self.lines);
        self.rules.record_clears(outcome, self.queue.rng_mut());
        points
    }

    /// Start over with the same configuration; the lock callback is kept
    pub fn reset(&mut self) {
        self.board.clear();
        self.rules.reset();
        self.queue = PieceQueue::new(self.config.seed, self.config.difficulty);
        self.current = None;
        self.hold = None;
        self.can_hold = true;
        self.snapshot = None;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.game_over = false;
        self.clock_ms = 0;
        self.drop_timer_ms = 0;
        self.tspin_armed = false;
        self.pieces_locked = 0;
        info!("engine reset ({} mode, seed {})", self.config.mode.as_str(), self.config.seed);
        self.spawn_next();
    }

    /// Packed visible board with the ghost projection and active piece drawn in
    pub fn get_compressed_board_data(&self) -> PackedBoard {
        let mut packed = self.board.get_compressed_board();
        let Some(piece) = self.current else {
            return packed;
        };
        if let Some(ghost) = self.ghost() {
            for (x, y) in ghost.cells() {
                if let Some(cell) = packed_slot(&mut packed, x, y) {
                    if *cell == 0 {
                        *cell = GHOST_MARK;
                    }
                }
            }
        }
        for block in piece.blocks() {
            if let Some(cell) = packed_slot(&mut packed, block.x, block.y) {
                *cell = pack(piece.color(), block.item);
            }
        }
        packed
    }

    /// Plain-data view for rendering or transmission
    pub fn game_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.get_compressed_board_data(),
            active: self.current.map(ActiveSnapshot::from),
            ghost_y: self.ghost().map(|g| g.y),
            hold: self.hold.map(ActiveSnapshot::from),
            next_queue: self.next_queue(),
            can_hold: self.can_hold,
            game_over: self.game_over,
            score: self.score,
            level: self.level,
            lines: self.lines,
            pieces_locked: self.pieces_locked,
            seed: self.queue.seed(),
            remaining_time_ms: self.remaining_time_ms(),
        }
    }
}

fn packed_slot(packed: &mut PackedBoard, x: i8, y: i8) -> Option<&mut u32> {
    let row = visible_row(y.into())?;
    let col = usize::try_from(x).ok().filter(|&c| c < BOARD_WIDTH)?;
    Some(&mut packed[row][col])
}

impl GarbageTarget for Engine {
    /// Splice garbage under the stack; the active piece is pushed up if it
    /// now overlaps, and the game ends if no position within reach is free
    fn splice_bottom_rows(&mut self, rows: &[Row]) -> usize {
        if self.game_over {
            return 0;
        }
        let n = self.board.splice_bottom_rows(rows);
        if n == 0 {
            return 0;
        }
        self.rules.shift_weight(n);

        if let Some(piece) = self.current {
            if !self.board.is_valid_position(&piece) {
                let lifted = (1..=n as i8)
                    .map(|dy| piece.translated(0, -dy))
                    .find(|p| self.board.is_valid_position(p));
                match lifted {
                    Some(p) => self.current = Some(p),
                    None => {
                        self.current = None;
                        self.game_over = true;
                        info!("game over: garbage crushed the active piece");
                    }
                }
            }
        }
        if self.board.is_game_over() {
            self.game_over = true;
            info!("game over: garbage pushed the stack into the buffer zone");
        }
        debug!("spliced {n} garbage rows");
        n
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("current", &self.current)
            .field("hold", &self.hold)
            .field("score", &self.score)
            .field("lines", &self.lines)
            .field("level", &self.level)
            .field("game_over", &self.game_over)
            .field("clock_ms", &self.clock_ms)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::types::{
        ItemKind, Rotation, CLEAR_MARK, LINE_CLEAR_DELAY_MS, TICK_MS, TIME_LIMIT_MS, TOTAL_HEIGHT,
    };

    fn engine() -> Engine {
        Engine::new(EngineConfig {
            seed: 12345,
            ..EngineConfig::default()
        })
    }

    /// Fill the bottom row except columns 3..=6, where a flat I can land
    fn prepare_i_slot(engine: &mut Engine) {
        for x in 0..BOARD_WIDTH as i32 {
            if !(3..=6).contains(&x) {
                engine.board.set_cell_color(TOTAL_HEIGHT as i32 - 1, x, 2);
            }
        }
    }

    #[test]
    fn test_new_engine_spawns_a_piece() {
        let engine = engine();
        let piece = engine.current().unwrap();
        assert_eq!(piece.x, 3);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.score(), 0);
        assert!(engine.can_hold());
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_hard_drop_scores_two_per_cell() {
        let mut engine = engine();
        let piece = engine.current().unwrap();
        let ghost = engine.ghost().unwrap();
        let distance = (ghost.y - piece.y) as u32;
        assert!(engine.hard_drop());
        assert_eq!(engine.score(), distance * 2);
        assert_eq!(engine.pieces_locked(), 1);
        assert!(engine.last_snapshot().is_some());
    }

    #[test]
    fn test_soft_drop_scores_one_per_cell() {
        let mut engine = engine();
        assert!(engine.move_down());
        assert!(engine.move_down());
        assert_eq!(engine.score(), 2);
    }

    #[test]
    fn test_line_clear_marks_then_commits() {
        let mut engine = engine();
        prepare_i_slot(&mut engine);
        engine.current = Some(Placement::spawn(PieceKind::I));
        let distance = (engine.ghost().unwrap().y - engine.current().unwrap().y) as u32;

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        engine.set_on_piece_locked(move |event| sink.lock().unwrap().push(event.clone()));

        assert!(engine.hard_drop());
        assert_eq!(engine.lines(), 1);
        assert_eq!(engine.score(), 100 + distance * 2);
        assert!(engine.board().board().is_row_marked(TOTAL_HEIGHT - 1));

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].lines_cleared, 1);
        // the garbage row has a hole where the I piece landed
        assert_eq!(events[0].garbage.len(), 1);
        assert_eq!(events[0].garbage[0][0], 8);
        assert_eq!(events[0].garbage[0][4], 0);
        drop(events);

        engine.update(LINE_CLEAR_DELAY_MS as u32);
        assert!(!engine.board().board().has_pending_clear());
        assert_eq!(engine.board().get_cell_color(TOTAL_HEIGHT as i32 - 1, 0), 0);
    }

    #[test]
    fn test_hold_once_per_lock() {
        let mut engine = engine();
        let first = engine.current().unwrap();
        assert!(engine.hold());
        assert_eq!(engine.hold_piece().map(|p| p.kind), Some(first.kind));
        assert!(!engine.hold());
        assert!(!engine.can_hold());

        engine.hard_drop();
        assert!(engine.can_hold());
        assert!(engine.hold());
        assert_eq!(engine.current().map(|p| p.kind), Some(first.kind));
    }

    #[test]
    fn test_special_pieces_cannot_be_held() {
        let mut engine = Engine::new(EngineConfig {
            mode: GameMode::Item,
            ..EngineConfig::default()
        });
        engine.current = Placement::spawn_special(ItemKind::Bomb);
        assert!(!engine.hold());
        assert!(!engine.rotate_clockwise());
    }

    #[test]
    fn test_gravity_steps_and_locks() {
        let mut engine = engine();
        let start = engine.current().unwrap().y;
        assert!(!engine.update(500));
        assert!(engine.update(500));
        assert_eq!(engine.current().unwrap().y, start + 1);

        // enough ticks to land and lock
        for _ in 0..30 {
            engine.update(1000);
        }
        assert!(engine.pieces_locked() >= 1);
    }

    #[test]
    fn test_blocked_move_down_does_not_lock() {
        let mut engine = engine();
        let landed = engine.ghost().unwrap();
        engine.current = Some(landed);
        assert!(!engine.move_down());
        assert_eq!(engine.current(), Some(landed));
        assert_eq!(engine.pieces_locked(), 0);
    }

    #[test]
    fn test_spawn_blocked_is_game_over() {
        let mut engine = engine();
        // leave a gap so nothing up there counts as a full line
        for y in 0..4 {
            for x in 0..BOARD_WIDTH as i32 - 1 {
                engine.board.set_cell_color(y, x, 1);
            }
        }
        engine.current = Some(Placement::new(PieceKind::O, 0, 20, Rotation::North));
        engine.hard_drop();
        assert!(engine.is_game_over());
        assert!(!engine.move_left());
        assert!(!engine.update(5000));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = engine();
        engine.hard_drop();
        engine.hold();
        engine.reset();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.lines(), 0);
        assert_eq!(engine.pieces_locked(), 0);
        assert!(engine.hold_piece().is_none());
        assert!(engine.last_snapshot().is_none());
        assert!(engine.current().is_some());
        assert_eq!(engine.next_queue(), Engine::new(engine.config()).next_queue());
    }

    #[test]
    fn test_compressed_board_has_ghost_and_piece() {
        let mut engine = engine();
        // bring the piece into the visible area
        for _ in 0..4 {
            engine.move_down();
        }
        let packed = engine.get_compressed_board_data();
        let flat: Vec<u32> = packed.iter().flatten().copied().collect();
        assert_eq!(flat.iter().filter(|&&v| v == GHOST_MARK).count(), 4);
        let color = u32::from(engine.current().unwrap().color());
        assert!(flat.iter().filter(|&&v| v == color).count() >= 1);
    }

    #[test]
    fn test_time_limit_counts_down_on_update() {
        let mut engine = Engine::new(EngineConfig {
            mode: GameMode::TimeLimited,
            ..EngineConfig::default()
        });
        assert_eq!(engine.remaining_time_ms(), Some(TIME_LIMIT_MS));
        engine.update(1000);
        engine.update(TICK_MS);
        assert_eq!(
            engine.remaining_time_ms(),
            Some(TIME_LIMIT_MS - 1000 - u64::from(TICK_MS))
        );
        assert!(!engine.is_time_up());
        assert_eq!(engine.game_snapshot().remaining_time_ms, engine.remaining_time_ms());
        assert_eq!(Engine::default().remaining_time_ms(), None);
    }

    #[test]
    fn test_time_up_ends_the_game() {
        let mut engine = Engine::with_time_limit(EngineConfig::default(), 3_000);
        assert_eq!(engine.mode(), GameMode::TimeLimited);
        engine.update(2_000);
        assert!(!engine.is_game_over());
        assert!(!engine.update(1_000));
        assert!(engine.is_time_up());
        assert!(engine.is_game_over());
        assert!(engine.current().is_none());
        assert!(!engine.hard_drop());

        engine.reset();
        assert!(!engine.is_game_over());
        assert_eq!(engine.remaining_time_ms(), Some(3_000));
    }

    #[test]
    fn test_paused_timer_keeps_the_game_alive() {
        let mut engine = Engine::with_time_limit(EngineConfig::default(), 1_000);
        engine.pause_timer();
        engine.update(5_000);
        assert!(!engine.is_game_over());
        assert_eq!(engine.remaining_time_ms(), Some(1_000));
        engine.resume_timer();
        engine.update(1_000);
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_weight_collapses_marked_rows_before_crushing() {
        let mut engine = Engine::new(EngineConfig {
            mode: GameMode::Item,
            ..EngineConfig::default()
        });
        let bottom = TOTAL_HEIGHT as i32 - 1;
        for x in 0..BOARD_WIDTH as i32 {
            engine.board.set_cell_color(bottom, x, 2);
        }
        engine.board.set_cell_color(bottom - 1, 0, 5);
        assert_eq!(engine.board.mark_full_lines(0).len(), 1);

        engine.current = Placement::spawn_special(ItemKind::Weight);
        assert!(engine.hard_drop());
        assert!(engine.is_weight_active());
        assert!(!engine.board().board().has_pending_clear());
        assert_eq!(engine.board().get_cell_color(bottom, 0), 5);
        assert_eq!(engine.board().get_item_block(bottom, 3), ItemKind::Weight);
        assert!((0..TOTAL_HEIGHT as i32)
            .all(|y| (0..BOARD_WIDTH as i32).all(|x| engine.board().get_cell_color(y, x) != CLEAR_MARK)));
    }

    #[test]
    fn test_garbage_lifts_the_active_piece() {
        let mut engine = engine();
        let landed = engine.ghost().unwrap();
        engine.current = Some(landed);
        let rows = [[8; BOARD_WIDTH]; 1];
        assert_eq!(engine.splice_bottom_rows(&rows), 1);
        assert!(!engine.is_game_over());
        assert_eq!(engine.current().unwrap().y, landed.y - 1);
    }
}
