//! Headless versus runner (default binary).
//!
//! Plays two engines against each other with a random bot on each side.
//! Every lock that clears lines sends its garbage rows over a wire channel;
//! a relay thread stands in for the network receiver and feeds the
//! opponent's garbage queue. At the end both final snapshots are printed as
//! JSON.
//!
//! Configuration comes from the environment:
//! `DUEL_MODE` (normal|item|time_limited), `DUEL_DIFFICULTY` (1-3),
//! `DUEL_SEED`, `DUEL_TICKS`. `RUST_LOG` controls log output.

use std::env;
use std::thread;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

use duel_tetris::core::{Engine, EngineConfig, SimpleRng};
use duel_tetris::garbage::{GarbageSender, GarbageSync, DEFAULT_CHANNEL_CAPACITY};
use duel_tetris::types::{Difficulty, GameAction, GameMode, Row, TICK_MS};

/// Runner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DuelConfig {
    mode: GameMode,
    difficulty: Difficulty,
    seed: u32,
    ticks: u32,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            difficulty: Difficulty::Normal,
            seed: 1,
            ticks: 20_000,
        }
    }
}

impl DuelConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let mode = match env::var("DUEL_MODE") {
            Ok(s) => GameMode::from_str(s.trim())
                .ok_or_else(|| anyhow!("DUEL_MODE must be normal, item or time_limited, got {s:?}"))?,
            Err(_) => defaults.mode,
        };

        let difficulty = match env::var("DUEL_DIFFICULTY") {
            Ok(s) => s
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(Difficulty::from_level)
                .ok_or_else(|| anyhow!("DUEL_DIFFICULTY must be 1, 2 or 3, got {s:?}"))?,
            Err(_) => defaults.difficulty,
        };

        let seed = match env::var("DUEL_SEED") {
            Ok(s) => s
                .trim()
                .parse()
                .with_context(|| format!("DUEL_SEED is not a number: {s:?}"))?,
            Err(_) => defaults.seed,
        };

        let ticks = match env::var("DUEL_TICKS") {
            Ok(s) => s
                .trim()
                .parse()
                .with_context(|| format!("DUEL_TICKS is not a number: {s:?}"))?,
            Err(_) => defaults.ticks,
        };

        Ok(Self {
            mode,
            difficulty,
            seed,
            ticks,
        })
    }

    fn engine_config(&self, player: usize) -> EngineConfig {
        EngineConfig {
            mode: self.mode,
            difficulty: self.difficulty,
            seed: self.seed.wrapping_add(player as u32),
        }
    }
}

/// Garbage leaving one side: sender id and rows
type WireBatch = (usize, Vec<Row>);

/// One side of the match
struct Player {
    engine: Engine,
    garbage: GarbageSync,
    bot: SimpleRng,
    locks_seen: u32,
}

impl Player {
    fn new(config: &DuelConfig, id: usize, wire: mpsc::Sender<WireBatch>) -> Self {
        let mut engine = Engine::new(config.engine_config(id));
        engine.set_on_piece_locked(move |event| {
            if event.garbage.is_empty() {
                return;
            }
            match wire.try_send((id, event.garbage.clone())) {
                Ok(()) => {}
                Err(TrySendError::Full((_, rows))) => {
                    warn!("player {id}: garbage wire full, dropping {} rows", rows.len());
                }
                Err(TrySendError::Closed((_, rows))) => {
                    warn!("player {id}: garbage relay gone, dropping {} rows", rows.len());
                }
            }
        });
        Self {
            engine,
            garbage: GarbageSync::new(),
            bot: SimpleRng::new(config.seed.wrapping_mul(31).wrapping_add(id as u32)),
            locks_seen: 0,
        }
    }

    fn tick(&mut self) {
        // the bot presses one key about every fourth frame
        if self.bot.next_range(4) == 0 {
            let action = GameAction::ALL[self.bot.next_range(GameAction::ALL.len() as u32) as usize];
            self.engine.apply_action(action);
        }
        self.engine.update(TICK_MS);

        self.garbage.consume_if_exists();
        if self.engine.pieces_locked() != self.locks_seen {
            self.locks_seen = self.engine.pieces_locked();
            self.garbage.apply_to_board(&mut self.engine);
        }
    }
}

/// Forward each side's garbage to the other until both engines hang up
fn spawn_relay(
    mut wire: mpsc::Receiver<WireBatch>,
    targets: [GarbageSender; 2],
) -> thread::JoinHandle<usize> {
    thread::spawn(move || {
        let mut forwarded = 0;
        while let Some((from, rows)) = wire.blocking_recv() {
            let count = rows.len();
            if targets[1 - from].enqueue_lines(rows) {
                forwarded += count;
            }
        }
        forwarded
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let config = DuelConfig::from_env()?;
    info!("starting duel: {config:?}");

    let (wire_tx, wire_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
    let mut players = [
        Player::new(&config, 0, wire_tx.clone()),
        Player::new(&config, 1, wire_tx),
    ];
    let relay = spawn_relay(
        wire_rx,
        [players[0].garbage.sender(), players[1].garbage.sender()],
    );

    let mut ticks = 0;
    while ticks < config.ticks && players.iter().all(|p| !p.engine.is_game_over()) {
        for player in players.iter_mut() {
            player.tick();
        }
        ticks += 1;
    }

    let snapshots = players.map(|mut p| {
        p.engine.clear_on_piece_locked();
        p.engine.game_snapshot()
    });
    let forwarded = relay
        .join()
        .map_err(|_| anyhow!("garbage relay thread panicked"))?;
    info!("duel finished after {ticks} ticks, {forwarded} garbage rows forwarded");

    for (id, snapshot) in snapshots.iter().enumerate() {
        let json = serde_json::to_string(snapshot)
            .with_context(|| format!("serializing player {id} snapshot"))?;
        println!("{json}");
    }
    Ok(())
}
