//! Cube Module
//!
//! Facelet-level model of a 3x3x3 cube:
//! - `Face` / `Color` identities and the rendering palette
//! - Outer-turn notation (`Move`, `Turn`) with a strict parser
//! - `FaceletState`: 54 stickers, face order U R F D L B, row-major per face
//! - Permutation-table engine (`CubeEngine`) with asynchronous table build
//! - Sticker geometry (`sticker_index`) and piece positions
//! - Random-state scramble generation

mod engine;
mod geometry;
mod pieces;
mod scramble;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use engine::{CubeEngine, MoveTables};
pub use geometry::{cubie_colors, facelet_location, sticker_index, FaceDirection};
pub use pieces::{CornerPosition, EdgePosition, Piece, PieceKind, Position};
pub use scramble::{format_scramble, ScrambleGenerator, DEFAULT_SCRAMBLE_LENGTH};

/// Number of stickers on a 3x3x3 cube
pub const FACELET_COUNT: usize = 54;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Notation parse error
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Token does not match `Face [' | 2]?`
    #[error("Invalid move token '{token}' at position {position}")]
    InvalidToken { token: String, position: usize },
    /// Unknown face letter
    #[error("Invalid face: {0}")]
    InvalidFace(String),
    /// Unknown piece name
    #[error("Invalid piece: {0}")]
    InvalidPiece(String),
    /// Facelet string of the wrong length or alphabet
    #[error("Invalid facelet string: {0}")]
    InvalidFacelets(String),
}

// ============================================================================
// FACES AND COLORS
// ============================================================================

/// One of the six faces, listed in facelet order.
///
/// A sticker's "color" is identified with the face it belongs to when solved,
/// so the same enum is used for both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    /// All faces in facelet order
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    /// Position of this face in facelet order (0..6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-letter name
    pub fn as_str(self) -> &'static str {
        match self {
            Face::U => "U",
            Face::R => "R",
            Face::F => "F",
            Face::D => "D",
            Face::L => "L",
            Face::B => "B",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::R => Face::L,
            Face::L => Face::R,
            Face::F => Face::B,
            Face::B => Face::F,
        }
    }

    /// Outward direction of this face in cube coordinates
    pub fn direction(self) -> FaceDirection {
        match self {
            Face::U => FaceDirection::PosY,
            Face::D => FaceDirection::NegY,
            Face::F => FaceDirection::PosZ,
            Face::B => FaceDirection::NegZ,
            Face::R => FaceDirection::PosX,
            Face::L => FaceDirection::NegX,
        }
    }

    /// Sticker color under the rendering convention
    pub fn color(self) -> Color {
        match self {
            Face::U => Color::Yellow,
            Face::D => Color::White,
            Face::F => Color::Red,
            Face::B => Color::Orange,
            Face::R => Color::Green,
            Face::L => Color::Blue,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Face {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(Face::from_char), chars.next()) {
            (Some(face), None) => Ok(face),
            _ => Err(ParseError::InvalidFace(s.to_string())),
        }
    }
}

/// Rendered sticker color
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    White,
    Red,
    Orange,
    Green,
    Blue,
}

impl Color {
    /// Hex color used by renderers
    pub fn hex(self) -> &'static str {
        match self {
            Color::Yellow => "#FFD500",
            Color::White => "#FFFFFF",
            Color::Red => "#C41E3A",
            Color::Orange => "#FF5800",
            Color::Green => "#00D800",
            Color::Blue => "#0046AD",
        }
    }
}

/// Hex color of cubie faces that point inward
pub const INTERNAL_COLOR_HEX: &str = "#1a1a1a";

// ============================================================================
// MOVES
// ============================================================================

/// Turn amount of an outer-face move
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    /// Quarter turn, clockwise when looking at the face
    #[default]
    Clockwise,
    /// Quarter turn counter-clockwise (`'`)
    CounterClockwise,
    /// Half turn (`2`)
    Half,
}

impl Turn {
    pub const ALL: [Turn; 3] = [Turn::Clockwise, Turn::CounterClockwise, Turn::Half];

    /// Notation suffix
    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Half => "2",
        }
    }

    /// Number of clockwise quarter turns this amounts to
    pub fn quarter_turns(self) -> usize {
        match self {
            Turn::Clockwise => 1,
            Turn::Half => 2,
            Turn::CounterClockwise => 3,
        }
    }

    pub fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::CounterClockwise => Turn::Clockwise,
            Turn::Half => Turn::Half,
        }
    }
}

/// A single outer-face turn such as `R`, `U'` or `F2`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    pub fn inverse(self) -> Move {
        Move::new(self.face, self.turn.inverse())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_token(s, 0)
    }
}

fn parse_token(token: &str, position: usize) -> Result<Move, ParseError> {
    let invalid = || ParseError::InvalidToken {
        token: token.to_string(),
        position,
    };

    let mut chars = token.chars();
    let face = chars.next().and_then(Face::from_char).ok_or_else(invalid)?;
    let turn = match (chars.next(), chars.next()) {
        (None, _) => Turn::Clockwise,
        (Some('\''), None) => Turn::CounterClockwise,
        (Some('2'), None) => Turn::Half,
        _ => return Err(invalid()),
    };

    Ok(Move::new(face, turn))
}

/// Parse whitespace-separated move notation.
///
/// An empty string yields an empty sequence. The first malformed token fails
/// the whole parse; `position` is the zero-based token index.
pub fn parse_scramble(text: &str) -> Result<Vec<Move>, ParseError> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| parse_token(token, position))
        .collect()
}

/// Sequence that undoes `moves`
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.inverse()).collect()
}

// ============================================================================
// FACELET STATE
// ============================================================================

/// Sticker-level cube state.
///
/// Index `f * 9 + r * 3 + c` holds the sticker at row `r`, column `c` of face
/// `f` (face order U R F D L B), as seen when looking straight at that face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceletState {
    facelets: [Face; FACELET_COUNT],
}

impl FaceletState {
    pub fn solved() -> Self {
        let mut facelets = [Face::U; FACELET_COUNT];
        for (i, slot) in facelets.iter_mut().enumerate() {
            *slot = Face::ALL[i / 9];
        }
        Self { facelets }
    }

    pub(crate) fn from_facelets(facelets: [Face; FACELET_COUNT]) -> Self {
        Self { facelets }
    }

    pub fn facelets(&self) -> &[Face; FACELET_COUNT] {
        &self.facelets
    }

    pub fn get(&self, index: usize) -> Option<Face> {
        self.facelets.get(index).copied()
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// Sticker count per color, indexed by `Face::index`
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for face in &self.facelets {
            counts[face.index()] += 1;
        }
        counts
    }

    /// Center sticker of each face, in facelet order
    pub fn centers(&self) -> [Face; 6] {
        let mut centers = [Face::U; 6];
        for (i, slot) in centers.iter_mut().enumerate() {
            *slot = self.facelets[i * 9 + 4];
        }
        centers
    }
}

impl Default for FaceletState {
    fn default() -> Self {
        Self::solved()
    }
}

impl std::ops::Index<usize> for FaceletState {
    type Output = Face;

    fn index(&self, index: usize) -> &Face {
        &self.facelets[index]
    }
}

impl fmt::Display for FaceletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for face in &self.facelets {
            f.write_str(face.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for FaceletState {
    type Err = ParseError;

    /// Parse a 54-letter string such as `UUUUUUUUURRRRRRRRR...`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut facelets = [Face::U; FACELET_COUNT];
        let mut count = 0;
        for c in s.chars() {
            if count >= FACELET_COUNT {
                return Err(ParseError::InvalidFacelets(format!(
                    "expected {} stickers, got more",
                    FACELET_COUNT
                )));
            }
            facelets[count] = Face::from_char(c)
                .ok_or_else(|| ParseError::InvalidFacelets(format!("unknown sticker '{}'", c)))?;
            count += 1;
        }
        if count != FACELET_COUNT {
            return Err(ParseError::InvalidFacelets(format!(
                "expected {} stickers, got {}",
                FACELET_COUNT, count
            )));
        }
        Ok(Self { facelets })
    }
}

// ============================================================================
// TESTS
// ============================================================================
