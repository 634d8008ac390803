//! Garbage line sync - inbound versus lines for one player
//!
//! Bridges a network receiver thread with the sync game loop. The receiver
//! holds a cloneable [`GarbageSender`] and pushes batches of rows whenever
//! the opponent clears lines; the game thread owns the [`GarbageSync`] and,
//! once per tick, drains the channel into a small fixed store and splices the
//! stored rows under its stack.
//!
//! The channel is a bounded `tokio::sync::mpsc` queue used through its
//! non-blocking `try_send`/`try_recv` halves, so neither side needs a runtime.

use arrayvec::ArrayVec;
use log::{debug, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

use duel_tetris_core::GarbageTarget;
use duel_tetris_types::{Row, BOARD_WIDTH, EMPTY, GARBAGE_COLOR};

/// Rows held between consume and apply
pub const GARBAGE_CAPACITY: usize = 10;

/// Batches the channel buffers before `enqueue_lines` starts failing
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Normalize a raw integer grid from the transport
///
/// Rows that are not exactly [`BOARD_WIDTH`] wide are skipped. Values at or
/// below zero become empty; anything else is clamped to the garbage color.
pub fn rows_from_raw(raw: &[Vec<i32>]) -> Vec<Row> {
    raw.iter()
        .filter(|row| row.len() == BOARD_WIDTH)
        .map(|row| {
            let mut out = [EMPTY; BOARD_WIDTH];
            for (cell, &value) in out.iter_mut().zip(row.iter()) {
                *cell = value.clamp(0, i32::from(GARBAGE_COLOR)) as u8;
            }
            out
        })
        .collect()
}

/// Producer half; safe to clone into receiver threads
#[derive(Debug, Clone)]
pub struct GarbageSender {
    tx: mpsc::Sender<Vec<Row>>,
}

impl GarbageSender {
    /// Queue one batch of rows for the game thread
    ///
    /// Returns false if the channel is full or the game side is gone; the
    /// batch is dropped in that case.
    pub fn enqueue_lines(&self, batch: Vec<Row>) -> bool {
        if batch.is_empty() {
            return true;
        }
        match self.tx.try_send(batch) {
            Ok(()) => true,
            Err(TrySendError::Full(batch)) => {
                warn!("garbage queue full, dropping {} rows", batch.len());
                false
            }
            Err(TrySendError::Closed(batch)) => {
                warn!("garbage receiver gone, dropping {} rows", batch.len());
                false
            }
        }
    }

    /// Whether the game side has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the game thread
#[derive(Debug)]
pub struct GarbageSync {
    sender: GarbageSender,
    rx: mpsc::Receiver<Vec<Row>>,
    lines: ArrayVec<Row, GARBAGE_CAPACITY>,
    draw_buffer: [Row; GARBAGE_CAPACITY],
    draw_dirty: bool,
}

impl GarbageSync {
    pub fn new() -> Self {
        Self::with_channel_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_channel_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            sender: GarbageSender { tx },
            rx,
            lines: ArrayVec::new(),
            draw_buffer: [[EMPTY; BOARD_WIDTH]; GARBAGE_CAPACITY],
            draw_dirty: false,
        }
    }

    /// A producer handle for another thread
    pub fn sender(&self) -> GarbageSender {
        self.sender.clone()
    }

    /// Same as [`GarbageSender::enqueue_lines`], from the owning side
    pub fn enqueue_lines(&self, batch: Vec<Row>) -> bool {
        self.sender.enqueue_lines(batch)
    }

    /// Drain every queued batch into the store
    ///
    /// Rows are kept in arrival order until the store holds
    /// [`GARBAGE_CAPACITY`]; anything past that is dropped. Returns the number
    /// of rows stored by this call.
    pub fn consume_if_exists(&mut self) -> usize {
        let mut stored = 0;
        let mut dropped = 0;
        while let Ok(batch) = self.rx.try_recv() {
            for row in batch {
                if self.lines.try_push(row).is_ok() {
                    stored += 1;
                } else {
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            warn!("garbage store full, dropped {dropped} rows");
        }
        if stored > 0 {
            self.draw_dirty = true;
            debug!("consumed {stored} garbage rows ({} stored)", self.lines.len());
        }
        stored
    }

    /// Splice the stored rows under the target's stack and empty the store
    ///
    /// Returns the number of rows the target accepted.
    pub fn apply_to_board<T: GarbageTarget + ?Sized>(&mut self, target: &mut T) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        let applied = target.splice_bottom_rows(&self.lines);
        self.lines.clear();
        self.draw_dirty = true;
        applied
    }

    /// Stored rows, bottom-aligned in a 10-row buffer for rendering
    ///
    /// Only rebuilt after the store changes.
    pub fn draw_buffer(&mut self) -> &[Row; GARBAGE_CAPACITY] {
        if self.draw_dirty {
            let start = GARBAGE_CAPACITY - self.lines.len();
            for row in &mut self.draw_buffer[..start] {
                *row = [EMPTY; BOARD_WIDTH];
            }
            self.draw_buffer[start..].copy_from_slice(&self.lines);
            self.draw_dirty = false;
        }
        &self.draw_buffer
    }

    pub fn lines(&self) -> &[Row] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop everything stored and anything still in the channel
    pub fn clear(&mut self) {
        while self.rx.try_recv().is_ok() {}
        self.lines.clear();
        self.draw_dirty = true;
    }
}

impl Default for GarbageSync {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_row(hole: usize) -> Row {
        let mut row = [GARBAGE_COLOR; BOARD_WIDTH];
        row[hole] = EMPTY;
        row
    }

    /// Records what it was asked to splice
    #[derive(Default)]
    struct Recorder {
        rows: Vec<Row>,
    }

    impl GarbageTarget for Recorder {
        fn splice_bottom_rows(&mut self, rows: &[Row]) -> usize {
            self.rows.extend_from_slice(rows);
            rows.len()
        }
    }

    #[test]
    fn rows_from_raw_normalizes() {
        let raw = vec![
            vec![-1, 0, 1, 8, 9, 100, 0, 0, 0, 0],
            vec![1, 2, 3],
        ];
        let rows = rows_from_raw(&raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][..6], &[0, 0, 1, 8, 8, 8]);
    }

    #[test]
    fn consume_moves_batches_into_store() {
        let mut sync = GarbageSync::new();
        assert_eq!(sync.consume_if_exists(), 0);

        assert!(sync.enqueue_lines(vec![gray_row(0), gray_row(1)]));
        assert!(sync.enqueue_lines(vec![gray_row(2)]));
        assert_eq!(sync.consume_if_exists(), 3);
        assert_eq!(sync.len(), 3);
        assert_eq!(sync.lines()[2], gray_row(2));
    }

    #[test]
    fn store_never_exceeds_capacity() {
        let mut sync = GarbageSync::new();
        sync.enqueue_lines(vec![gray_row(0); 8]);
        sync.enqueue_lines(vec![gray_row(1); 4]);
        assert_eq!(sync.consume_if_exists(), GARBAGE_CAPACITY);
        assert_eq!(sync.len(), GARBAGE_CAPACITY);
        // the earliest rows are the ones kept
        assert_eq!(sync.lines()[7], gray_row(0));
        assert_eq!(sync.lines()[9], gray_row(1));

        sync.enqueue_lines(vec![gray_row(5)]);
        assert_eq!(sync.consume_if_exists(), 0);
        assert_eq!(sync.len(), GARBAGE_CAPACITY);
    }

    #[test]
    fn full_channel_rejects_batches() {
        let sync = GarbageSync::with_channel_capacity(1);
        assert!(sync.enqueue_lines(vec![gray_row(0)]));
        assert!(!sync.enqueue_lines(vec![gray_row(1)]));
        assert!(sync.enqueue_lines(Vec::new()));
    }

    #[test]
    fn closed_channel_rejects_batches() {
        let sender = GarbageSync::new().sender();
        assert!(sender.is_closed());
        assert!(!sender.enqueue_lines(vec![gray_row(0)]));
    }

    #[test]
    fn apply_empties_the_store() {
        let mut sync = GarbageSync::new();
        let mut target = Recorder::default();
        assert_eq!(sync.apply_to_board(&mut target), 0);

        sync.enqueue_lines(vec![gray_row(3), gray_row(4)]);
        sync.consume_if_exists();
        assert_eq!(sync.apply_to_board(&mut target), 2);
        assert_eq!(target.rows, vec![gray_row(3), gray_row(4)]);
        assert!(sync.is_empty());
    }

    #[test]
    fn draw_buffer_is_bottom_aligned() {
        let mut sync = GarbageSync::new();
        assert!(sync.draw_buffer().iter().all(|r| *r == [EMPTY; BOARD_WIDTH]));

        sync.enqueue_lines(vec![gray_row(6)]);
        sync.consume_if_exists();
        let first = sync.draw_buffer() as *const _;
        assert_eq!(sync.draw_buffer()[GARBAGE_CAPACITY - 1], gray_row(6));
        assert_eq!(sync.draw_buffer()[0], [EMPTY; BOARD_WIDTH]);
        assert_eq!(sync.draw_buffer() as *const _, first);

        sync.apply_to_board(&mut Recorder::default());
        assert_eq!(sync.draw_buffer()[GARBAGE_CAPACITY - 1], [EMPTY; BOARD_WIDTH]);
    }

    #[test]
    fn clear_drains_the_channel() {
        let mut sync = GarbageSync::new();
        sync.enqueue_lines(vec![gray_row(0)]);
        sync.clear();
        assert_eq!(sync.consume_if_exists(), 0);
        assert!(sync.is_empty());
    }

    #[test]
    fn sender_works_from_another_thread() {
        let mut sync = GarbageSync::new();
        let sender = sync.sender();
        let handle = std::thread::spawn(move || {
            for hole in 0..3 {
                assert!(sender.enqueue_lines(vec![gray_row(hole)]));
            }
        });
        handle.join().unwrap();
        assert_eq!(sync.consume_if_exists(), 3);
        assert_eq!(sync.lines()[0], gray_row(0));
    }
}
