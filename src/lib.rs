//! Duel Tetris (workspace facade crate).
//!
//! Re-exports the member crates under short names so the binary, tests and
//! benches can use `duel_tetris::{core,garbage,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use duel_tetris_core as core;
pub use duel_tetris_garbage as garbage;
pub use duel_tetris_types as types;
