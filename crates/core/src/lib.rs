//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of a single player's game: the board, piece
//! movement and rotation, the item layer, scoring, and the engine that ties
//! them together. It performs no I/O and never reads the wall clock, so the
//! same seed and the same sequence of calls always produce the same game.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 board with a 4-row hidden buffer, line marking and
//!   deferred clears
//! - [`item_board`]: board plus a parallel item layer; item clears, weight and bomb
//! - [`pieces`]: tetromino shapes and SRS kick tables
//! - [`placement`]: a piece at a position, including item and special pieces
//! - [`srs`]: movement, wall-kick rotation and T-spin detection
//! - [`rng`]: weighted piece generation and the preview queue
//! - [`scoring`]: line-clear points, drop bonuses, level and gravity
//! - [`mode`]: what differs between normal, item and time-limited games
//! - [`engine`]: one player's session
//! - [`snapshot`]: plain-data views for rendering and garbage extraction
//!
//! # Game Rules
//!
//! - **Weighted generation**: independent draws; the I piece is more common on
//!   easy and rarer on hard
//! - **SRS rotation**: wall kicks for every piece except O
//! - **Deferred clears**: completed rows are marked and removed 500ms later
//! - **Hold**: once per lock; item pieces cannot be held
//! - **Items**: every 10 ordinary lines in item mode, the next spawn carries an item
//! - **Time limit**: time-limited games end when a two-minute countdown runs out
//!
//! # Example
//!
//! ```
//! use duel_tetris_core::{Engine, EngineConfig};
//! use duel_tetris_types::GameAction;
//!
//! let mut engine = Engine::new(EngineConfig {
//!     seed: 12345,
//!     ..EngineConfig::default()
//! });
//!
//! engine.apply_action(GameAction::MoveRight);
//! engine.apply_action(GameAction::RotateCw);
//! engine.apply_action(GameAction::HardDrop);
//!
//! assert!(engine.score() > 0); // hard drop awards points
//! ```
//!
//! # Timing
//!
//! Call [`Engine::update`](engine::Engine::update) every frame with the
//! elapsed milliseconds. The drop interval starts at 1000ms and shrinks by
//! 50ms per level down to 50ms.

pub mod board;
pub mod engine;
pub mod item_board;
pub mod mode;
pub mod pieces;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod srs;

pub use duel_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, GarbageTarget};
pub use engine::{Engine, EngineConfig, LockCallback, LockEvent};
pub use item_board::{ItemBoard, PackedBoard};
pub use mode::{ClearOutcome, ModeRules, TimeLimit};
pub use pieces::{get_kick_index, get_shape};
pub use placement::Placement;
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_line_score};
pub use snapshot::{ActiveSnapshot, BoardSnapshot, GameSnapshot};
