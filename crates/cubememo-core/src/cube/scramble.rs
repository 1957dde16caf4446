//! Random-move scramble generation

use rand::seq::IndexedRandom;
use rand::Rng;

use super::{Face, Move, Turn};

/// Default number of moves in a generated scramble
pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

/// Generates scrambles without redundant consecutive moves.
///
/// A face is never repeated within the last two moves, which also rules out
/// `R L R` style sequences that collapse to fewer moves.
#[derive(Debug, Clone)]
pub struct ScrambleGenerator {
    length: usize,
}

impl Default for ScrambleGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_SCRAMBLE_LENGTH,
        }
    }
}

impl ScrambleGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Scramble of the configured length
    pub fn generate(&self) -> Vec<Move> {
        self.generate_with_rng(self.length, &mut rand::rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Vec<Move> {
        let mut moves: Vec<Move> = Vec::with_capacity(length);

        while moves.len() < length {
            let Some(&face) = Face::ALL.choose(rng) else {
                break;
            };
            let last = moves.last().map(|m| m.face);
            let second_last = moves.len().checked_sub(2).map(|i| moves[i].face);

            if is_redundant(face, last, second_last) {
                continue;
            }

            let turn = Turn::ALL.choose(rng).copied().unwrap_or_default();
            moves.push(Move::new(face, turn));
        }

        moves
    }
}

fn is_redundant(face: Face, last: Option<Face>, second_last: Option<Face>) -> bool {
    Some(face) == last || Some(face) == second_last
}

/// Space-separated notation for a move sequence
pub fn format_scramble(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
