//! Piece positions
//!
//! The 12 edge and 8 corner slots, each with a grid coordinate and its faces
//! in a fixed order. The first face of a piece is its "primary" sticker.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::sticker_index;
use super::{Face, ParseError};

/// Corner or edge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Corner,
    Edge,
}

impl PieceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Corner => "corner",
            PieceKind::Edge => "edge",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "corner" | "corners" => Some(PieceKind::Corner),
            "edge" | "edges" => Some(PieceKind::Edge),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece slot of one kind (implemented by `EdgePosition` and `CornerPosition`)
pub trait Position: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    const KIND: PieceKind;
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Faces of this slot, primary face first
    fn faces(self) -> &'static [Face];

    /// Grid coordinate of the slot
    fn coords(self) -> [usize; 3];

    fn piece(self) -> Piece;

    /// Facelet index of this slot's sticker on `face`
    fn sticker(self, face: Face) -> Option<usize> {
        if !self.faces().contains(&face) {
            return None;
        }
        let [x, y, z] = self.coords();
        sticker_index(x, y, z, face.direction())
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

// ============================================================================
// EDGES
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgePosition {
    UB,
    UR,
    UF,
    UL,
    BL,
    BR,
    FR,
    FL,
    DB,
    DR,
    DF,
    DL,
}

impl Position for EdgePosition {
    const KIND: PieceKind = PieceKind::Edge;
    const ALL: &'static [Self] = &[
        EdgePosition::UB,
        EdgePosition::UR,
        EdgePosition::UF,
        EdgePosition::UL,
        EdgePosition::BL,
        EdgePosition::BR,
        EdgePosition::FR,
        EdgePosition::FL,
        EdgePosition::DB,
        EdgePosition::DR,
        EdgePosition::DF,
        EdgePosition::DL,
    ];

    fn name(self) -> &'static str {
        match self {
            EdgePosition::UB => "UB",
            EdgePosition::UR => "UR",
            EdgePosition::UF => "UF",
            EdgePosition::UL => "UL",
            EdgePosition::BL => "BL",
            EdgePosition::BR => "BR",
            EdgePosition::FR => "FR",
            EdgePosition::FL => "FL",
            EdgePosition::DB => "DB",
            EdgePosition::DR => "DR",
            EdgePosition::DF => "DF",
            EdgePosition::DL => "DL",
        }
    }

    fn faces(self) -> &'static [Face] {
        use Face::*;
        match self {
            EdgePosition::UB => &[U, B],
            EdgePosition::UR => &[U, R],
            EdgePosition::UF => &[U, F],
            EdgePosition::UL => &[U, L],
            EdgePosition::BL => &[B, L],
            EdgePosition::BR => &[B, R],
            EdgePosition::FR => &[F, R],
            EdgePosition::FL => &[F, L],
            EdgePosition::DB => &[D, B],
            EdgePosition::DR => &[D, R],
            EdgePosition::DF => &[D, F],
            EdgePosition::DL => &[D, L],
        }
    }

    fn coords(self) -> [usize; 3] {
        match self {
            EdgePosition::UB => [1, 2, 0],
            EdgePosition::UR => [2, 2, 1],
            EdgePosition::UF => [1, 2, 2],
            EdgePosition::UL => [0, 2, 1],
            EdgePosition::BL => [0, 1, 0],
            EdgePosition::BR => [2, 1, 0],
            EdgePosition::FR => [2, 1, 2],
            EdgePosition::FL => [0, 1, 2],
            EdgePosition::DB => [1, 0, 0],
            EdgePosition::DR => [2, 0, 1],
            EdgePosition::DF => [1, 0, 2],
            EdgePosition::DL => [0, 0, 1],
        }
    }

    fn piece(self) -> Piece {
        Piece::Edge(self)
    }
}

// ============================================================================
// CORNERS
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CornerPosition {
    UBL,
    UBR,
    UFR,
    UFL,
    DBL,
    DBR,
    DFR,
    DFL,
}

impl Position for CornerPosition {
    const KIND: PieceKind = PieceKind::Corner;
    const ALL: &'static [Self] = &[
        CornerPosition::UBL,
        CornerPosition::UBR,
        CornerPosition::UFR,
        CornerPosition::UFL,
        CornerPosition::DBL,
        CornerPosition::DBR,
        CornerPosition::DFR,
        CornerPosition::DFL,
    ];

    fn name(self) -> &'static str {
        match self {
            CornerPosition::UBL => "UBL",
            CornerPosition::UBR => "UBR",
            CornerPosition::UFR => "UFR",
            CornerPosition::UFL => "UFL",
            CornerPosition::DBL => "DBL",
            CornerPosition::DBR => "DBR",
            CornerPosition::DFR => "DFR",
            CornerPosition::DFL => "DFL",
        }
    }

    fn faces(self) -> &'static [Face] {
        use Face::*;
        match self {
            CornerPosition::UBL => &[U, B, L],
            CornerPosition::UBR => &[U, R, B],
            CornerPosition::UFR => &[U, F, R],
            CornerPosition::UFL => &[U, L, F],
            CornerPosition::DBL => &[D, L, B],
            CornerPosition::DBR => &[D, B, R],
            CornerPosition::DFR => &[D, R, F],
            CornerPosition::DFL => &[D, F, L],
        }
    }

    fn coords(self) -> [usize; 3] {
        match self {
            CornerPosition::UBL => [0, 2, 0],
            CornerPosition::UBR => [2, 2, 0],
            CornerPosition::UFR => [2, 2, 2],
            CornerPosition::UFL => [0, 2, 2],
            CornerPosition::DBL => [0, 0, 0],
            CornerPosition::DBR => [2, 0, 0],
            CornerPosition::DFR => [2, 0, 2],
            CornerPosition::DFL => [0, 0, 2],
        }
    }

    fn piece(self) -> Piece {
        Piece::Corner(self)
    }
}

// ============================================================================
// PIECE
// ============================================================================

/// Any piece slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Piece {
    Corner(CornerPosition),
    Edge(EdgePosition),
}

impl Piece {
    pub fn kind(self) -> PieceKind {
        match self {
            Piece::Corner(_) => PieceKind::Corner,
            Piece::Edge(_) => PieceKind::Edge,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Piece::Corner(c) => c.name(),
            Piece::Edge(e) => e.name(),
        }
    }

    pub fn faces(self) -> &'static [Face] {
        match self {
            Piece::Corner(c) => c.faces(),
            Piece::Edge(e) => e.faces(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Piece {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CornerPosition::from_name(s)
            .map(Piece::Corner)
            .or_else(|| EdgePosition::from_name(s).map(Piece::Edge))
            .ok_or_else(|| ParseError::InvalidPiece(s.to_string()))
    }
}
