//! RNG module - weighted random piece generation
//!
//! Pieces are drawn independently with per-kind weights. Every kind weighs
//! 1.0 except the I piece, whose weight depends on difficulty, so easy games
//! see more I pieces and hard games fewer.
//!
//! Also provides a simple LCG for deterministic games and tests.

use std::collections::VecDeque;

use crate::placement::Placement;
use crate::types::{Difficulty, PieceKind, NEXT_QUEUE_SIZE};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // high bits of an LCG are the well-mixed ones
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Weighted piece source
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    /// Weights in tenths, indexed by [`PieceKind::index`]
    weights: [u32; 7],
}

impl PieceGenerator {
    pub fn new(seed: u32, difficulty: Difficulty) -> Self {
        let mut weights = [10; 7];
        weights[PieceKind::I.index()] = difficulty.i_piece_weight_tenths();
        Self {
            rng: SimpleRng::new(seed),
            weights,
        }
    }

    pub fn weights(&self) -> &[u32; 7] {
        &self.weights
    }

    /// Draw one kind proportionally to its weight
    pub fn next_kind(&mut self) -> PieceKind {
        let total: u32 = self.weights.iter().sum();
        let mut roll = self.rng.next_range(total);
        for kind in PieceKind::ALL {
            let weight = self.weights[kind.index()];
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PieceKind::L
    }

    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }
}

/// Preview queue kept at a fixed depth
#[derive(Debug, Clone)]
pub struct PieceQueue {
    generator: PieceGenerator,
    queue: VecDeque<Placement>,
    seed: u32,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32, difficulty: Difficulty) -> Self {
        let mut queue = Self {
            generator: PieceGenerator::new(seed, difficulty),
            queue: VecDeque::with_capacity(NEXT_QUEUE_SIZE + 1),
            seed,
        };
        queue.refill();
        queue
    }

    fn refill(&mut self) {
        while self.queue.len() < NEXT_QUEUE_SIZE {
            let kind = self.generator.next_kind();
            self.queue.push_back(Placement::spawn(kind));
        }
    }

    /// Take the front piece and top the queue back up
    pub fn draw(&mut self) -> Placement {
        let piece = self
            .queue
            .pop_front()
            .unwrap_or_else(|| Placement::spawn(self.generator.next_kind()));
        self.refill();
        piece
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<&Placement> {
        self.queue.front()
    }

    /// Upcoming pieces, front first
    pub fn iter(&self) -> impl Iterator<Item = &Placement> + '_ {
        self.queue.iter()
    }

    /// Kinds of the five upcoming pieces
    pub fn peek_5(&self) -> [PieceKind; NEXT_QUEUE_SIZE] {
        let mut kinds = [PieceKind::I; NEXT_QUEUE_SIZE];
        for (slot, piece) in kinds.iter_mut().zip(self.queue.iter()) {
            *slot = piece.kind;
        }
        kinds
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Randomness shared with item generation
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        self.generator.rng_mut()
    }

    /// Seed the queue was created with (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(5) < 5);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_difficulty_biases_i_piece() {
        let easy = PieceGenerator::new(1, Difficulty::Easy);
        let hard = PieceGenerator::new(1, Difficulty::Hard);
        assert_eq!(easy.weights()[PieceKind::I.index()], 12);
        assert_eq!(hard.weights()[PieceKind::I.index()], 8);
        assert_eq!(hard.weights()[PieceKind::T.index()], 10);
    }

    #[test]
    fn test_generator_produces_every_kind() {
        let mut generator = PieceGenerator::new(99, Difficulty::Normal);
        let mut seen = [false; 7];
        for _ in 0..500 {
            seen[generator.next_kind().index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_piece_queue_stays_full() {
        let mut queue = PieceQueue::new(1, Difficulty::Normal);
        assert_eq!(queue.len(), NEXT_QUEUE_SIZE);

        let peeked = *queue.peek().unwrap();
        let drawn = queue.draw();
        assert_eq!(peeked, drawn);
        assert_eq!(queue.len(), NEXT_QUEUE_SIZE);
    }

    #[test]
    fn test_piece_queue_deterministic() {
        let mut a = PieceQueue::new(42, Difficulty::Hard);
        let mut b = PieceQueue::new(42, Difficulty::Hard);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
        assert_eq!(a.peek_5(), b.peek_5());
    }
}
