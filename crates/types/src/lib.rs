//! Shared types and constants for the duel engine
//!
//! Everything here is plain data: piece kinds, rotation states, item symbols,
//! game modes, difficulty and the board/timing constants the other crates
//! build on. Nothing in this crate knows about the board or the engine.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible height**: 20 rows
//! - **Buffer zone**: 4 hidden rows above the visible area
//! - **Total rows**: 24 (indexed 0-23, row 0 is the top of the buffer zone)
//!
//! # Cell Values
//!
//! | Value | Meaning |
//! |-------|---------|
//! | 0 | Empty |
//! | 1-7 | Piece color (see [`PieceKind::color_index`]) |
//! | 8 | Garbage received from an opponent |
//! | 255 | Row/cell marked for a pending clear |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Suggested fixed timestep (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Drop interval at level 1 |
//! | `DROP_INTERVAL_STEP_MS` | 50 | Interval reduction per level |
//! | `DROP_INTERVAL_MIN_MS` | 50 | Fastest drop interval |
//! | `LINE_CLEAR_DELAY_MS` | 500 | Mark-to-commit delay for pending clears |
//! | `TIME_LIMIT_MS` | 120000 | Length of a time-limited game |
//!
//! # Examples
//!
//! ```
//! use duel_tetris_types::{Difficulty, GameAction, ItemKind, PieceKind, Rotation};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!(ItemKind::CrossClear.symbol(), 'X');
//! assert_eq!(Difficulty::from_level(3), Some(Difficulty::Hard));
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Visible board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Hidden rows above the visible area where pieces spawn
pub const BUFFER_ZONE: usize = 4;

/// Total rows stored by the board (buffer zone + visible rows)
pub const TOTAL_HEIGHT: usize = BOARD_HEIGHT + BUFFER_ZONE;

/// A single board cell: 0 = empty, otherwise a color index or [`CLEAR_MARK`]
pub type Cell = u8;

/// Empty cell value
pub const EMPTY: Cell = 0;

/// Sentinel for cells waiting on a deferred clear
pub const CLEAR_MARK: Cell = u8::MAX;

/// Color index used for garbage rows received from an opponent
pub const GARBAGE_COLOR: Cell = 8;

/// One full board row
pub type Row = [Cell; BOARD_WIDTH];

/// Packed-board value for the ghost piece projection
pub const GHOST_MARK: u32 = 0xFE;

/// Bit offset of the item symbol inside a packed board value
pub const ITEM_SHIFT: u32 = 16;

/// Mask for the color part of a packed board value
pub const COLOR_MASK: u32 = 0xFFFF;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Drop interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Drop interval reduction per level
pub const DROP_INTERVAL_STEP_MS: u32 = 50;

/// Fastest drop interval
pub const DROP_INTERVAL_MIN_MS: u32 = 50;

/// Delay between marking rows for a clear and removing them
pub const LINE_CLEAR_DELAY_MS: u64 = 500;

/// Length of a time-limited game (two minutes)
pub const TIME_LIMIT_MS: u64 = 2 * 60 * 1000;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 20;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Ordinary line clears needed before an item piece is generated
pub const LINES_PER_ITEM: u32 = 10;

/// Number of upcoming pieces kept in the preview queue
pub const NEXT_QUEUE_SIZE: usize = 5;

/// Base points for clearing N lines at once (index = line count)
///
/// Each line beyond four adds [`EXTRA_LINE_SCORE`].
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points for every simultaneous line beyond four
pub const EXTRA_LINE_SCORE: u32 = 100;

/// Points per cell for a soft drop
pub const SOFT_DROP_SCORE: u32 = 1;

/// Points per cell for a hard drop
pub const HARD_DROP_SCORE: u32 = 2;

/// The seven tetromino piece kinds
///
/// Each piece has a fixed color index 1-7:
/// - **I**: 1, horizontal bar
/// - **O**: 2, 2x2 square
/// - **T**: 3, T-shaped
/// - **S**: 4, S-shaped
/// - **Z**: 5, Z-shaped (mirror of S)
/// - **J**: 6, J-shaped
/// - **L**: 7, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in color-index order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use duel_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Board color written for this piece (1-7)
    pub fn color_index(&self) -> Cell {
        self.index() as Cell + 1
    }

    /// Inverse of [`PieceKind::color_index`]
    pub fn from_color_index(color: Cell) -> Option<Self> {
        match color {
            1..=7 => Some(Self::ALL[usize::from(color) - 1]),
            _ => None,
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise (270° clockwise)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use duel_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation state as 0-3 (North = 0, clockwise)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Item symbol carried by a single board cell or piece block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    None,
    /// Clears the whole row the block rests in
    LineClear,
    /// Clears the whole column the block rests in
    ColumnClear,
    /// Clears both the row and the column
    CrossClear,
    /// Block of a weight piece
    Weight,
    /// Block of a bomb piece
    Bomb,
}

impl ItemKind {
    /// Item kinds an item piece can be generated with
    pub const GENERATED: [ItemKind; 5] = [
        ItemKind::LineClear,
        ItemKind::ColumnClear,
        ItemKind::CrossClear,
        ItemKind::Weight,
        ItemKind::Bomb,
    ];

    /// Display/packing symbol, `'\0'` for [`ItemKind::None`]
    pub fn symbol(&self) -> char {
        match self {
            ItemKind::None => '\0',
            ItemKind::LineClear => 'L',
            ItemKind::ColumnClear => 'I',
            ItemKind::CrossClear => 'X',
            ItemKind::Weight => 'W',
            ItemKind::Bomb => 'B',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '\0' => Some(ItemKind::None),
            'L' => Some(ItemKind::LineClear),
            'I' => Some(ItemKind::ColumnClear),
            'X' => Some(ItemKind::CrossClear),
            'W' => Some(ItemKind::Weight),
            'B' => Some(ItemKind::Bomb),
            _ => None,
        }
    }

    pub fn is_some(&self) -> bool {
        *self != ItemKind::None
    }

    /// Whether this item is attached to one block of an ordinary piece
    pub fn is_block_item(&self) -> bool {
        matches!(
            self,
            ItemKind::LineClear | ItemKind::ColumnClear | ItemKind::CrossClear
        )
    }
}

/// Whole-piece special behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    #[default]
    None,
    Weight,
    Bomb,
}

impl SpecialKind {
    /// Special pieces neither rotate nor go into the hold slot
    pub fn is_rotation_locked(&self) -> bool {
        !matches!(self, SpecialKind::None)
    }

    /// Item symbol written into every block of the piece
    pub fn item(&self) -> ItemKind {
        match self {
            SpecialKind::None => ItemKind::None,
            SpecialKind::Weight => ItemKind::Weight,
            SpecialKind::Bomb => ItemKind::Bomb,
        }
    }
}

/// Rule set an engine runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Normal,
    Item,
    /// Normal rules against a countdown; the game ends when it reaches zero
    TimeLimited,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "item" => Some(GameMode::Item),
            "time_limited" | "timelimited" | "time" => Some(GameMode::TimeLimited),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Item => "item",
            GameMode::TimeLimited => "time_limited",
        }
    }
}

/// Difficulty setting (1-3)
///
/// Scales line-clear points and biases how often I pieces show up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Map the numeric setting (1 = easy, 2 = normal, 3 = hard)
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Normal),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Line-clear score multiplier in tenths (0.8 / 1.0 / 1.2)
    pub fn score_factor_tenths(&self) -> u32 {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Normal => 10,
            Difficulty::Hard => 12,
        }
    }

    /// Relative I-piece weight in tenths (1.2 / 1.0 / 0.8)
    pub fn i_piece_weight_tenths(&self) -> u32 {
        match self {
            Difficulty::Easy => 12,
            Difficulty::Normal => 10,
            Difficulty::Hard => 8,
        }
    }
}

/// Game actions a player (or bot) can issue
///
/// Each action maps to one engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    MoveDown,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hold current piece (if available)
    Hold,
}

impl GameAction {
    pub const ALL: [GameAction; 7] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::MoveDown,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Hold,
    ];

    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use duel_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateClockwise"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::MoveDown));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "movedown" | "softdrop" => Some(GameAction::MoveDown),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" | "rotateclockwise" => Some(GameAction::RotateCw),
            "rotateccw" | "rotatecounterclockwise" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
        }
    }
}
