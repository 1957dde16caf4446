//! Shipped label conventions

use crate::cube::CornerPosition::{self, *};
use crate::cube::EdgePosition::{self, *};
use crate::cube::Face;

/// Speffz: letters A-X, four per face, clockwise from the top-left of each face
pub(super) const SPEFFZ_CORNERS: [(CornerPosition, Face, &str); 24] = [
    (UBL, Face::U, "A"),
    (UBR, Face::U, "B"),
    (UFR, Face::U, "C"),
    (UFL, Face::U, "D"),
    (UBL, Face::L, "E"),
    (UFL, Face::L, "F"),
    (DFL, Face::L, "G"),
    (DBL, Face::L, "H"),
    (UFL, Face::F, "I"),
    (UFR, Face::F, "J"),
    (DFR, Face::F, "K"),
    (DFL, Face::F, "L"),
    (UFR, Face::R, "M"),
    (UBR, Face::R, "N"),
    (DBR, Face::R, "O"),
    (DFR, Face::R, "P"),
    (UBR, Face::B, "Q"),
    (UBL, Face::B, "R"),
    (DBL, Face::B, "S"),
    (DBR, Face::B, "T"),
    (DFL, Face::D, "U"),
    (DFR, Face::D, "V"),
    (DBR, Face::D, "W"),
    (DBL, Face::D, "X"),
];

pub(super) const SPEFFZ_EDGES: [(EdgePosition, Face, &str); 24] = [
    (UB, Face::U, "A"),
    (UR, Face::U, "B"),
    (UF, Face::U, "C"),
    (UL, Face::U, "D"),
    (UL, Face::L, "E"),
    (FL, Face::L, "F"),
    (DL, Face::L, "G"),
    (BL, Face::L, "H"),
    (UF, Face::F, "I"),
    (FR, Face::F, "J"),
    (DF, Face::F, "K"),
    (FL, Face::F, "L"),
    (UR, Face::R, "M"),
    (BR, Face::R, "N"),
    (DR, Face::R, "O"),
    (FR, Face::R, "P"),
    (UB, Face::B, "Q"),
    (BL, Face::B, "R"),
    (DB, Face::B, "S"),
    (BR, Face::B, "T"),
    (DF, Face::D, "U"),
    (DR, Face::D, "V"),
    (DB, Face::D, "W"),
    (DL, Face::D, "X"),
];

/// Zhuyin convention
pub(super) const PRIMARY_CORNERS: [(CornerPosition, Face, &str); 24] = [
    (UBR, Face::U, "ㄍ"),
    (UFR, Face::U, "ㄎ"),
    (UFL, Face::U, "ㄏ"),
    (DFL, Face::D, "ㄅ"),
    (DFR, Face::D, "ㄆ"),
    (DBL, Face::D, "ㄇ"),
    (DBR, Face::D, "ㄈ"),
    (UBL, Face::U, "ㄉ"),
    (UBL, Face::B, "ㄊ"),
    (UBL, Face::L, "ㄋ"),
    (UBR, Face::R, "ㄌ"),
    (UBR, Face::B, "ㄐ"),
    (UFR, Face::F, "ㄑ"),
    (UFR, Face::R, "ㄒ"),
    (UFL, Face::L, "ㄓ"),
    (UFL, Face::F, "ㄔ"),
    (DBL, Face::L, "ㄕ"),
    (DBL, Face::B, "ㄖ"),
    (DBR, Face::B, "ㄗ"),
    (DBR, Face::R, "ㄘ"),
    (DFR, Face::R, "ㄙ"),
    (DFR, Face::F, "ㄧ"),
    (DFL, Face::F, "ㄨ"),
    (DFL, Face::L, "ㄩ"),
];

pub(super) const PRIMARY_EDGES: [(EdgePosition, Face, &str); 24] = [
    (UB, Face::U, "ㄍ"),
    (UL, Face::U, "ㄎ"),
    (UF, Face::U, "ㄏ"),
    (BL, Face::B, "ㄓ"),
    (FL, Face::F, "ㄔ"),
    (FR, Face::F, "ㄕ"),
    (BR, Face::B, "ㄖ"),
    (DF, Face::D, "ㄅ"),
    (DL, Face::D, "ㄆ"),
    (DB, Face::D, "ㄇ"),
    (DR, Face::D, "ㄈ"),
    (UR, Face::U, "ㄉ"),
    (UB, Face::B, "ㄊ"),
    (UL, Face::L, "ㄋ"),
    (UF, Face::F, "ㄌ"),
    (BL, Face::L, "ㄐ"),
    (FL, Face::L, "ㄑ"),
    (FR, Face::R, "ㄒ"),
    (BR, Face::R, "ㄗ"),
    (DF, Face::F, "ㄘ"),
    (DL, Face::L, "ㄙ"),
    (DB, Face::B, "ㄧ"),
    (DR, Face::R, "ㄨ"),
    (UR, Face::R, "ㄩ"),
];

/// Symbols of the primary convention, in alphabet order
pub const PRIMARY_ALPHABET: [&str; 24] = [
    "ㄅ", "ㄆ", "ㄇ", "ㄈ", "ㄉ", "ㄊ", "ㄋ", "ㄌ", "ㄍ", "ㄎ", "ㄏ", "ㄐ", "ㄑ", "ㄒ", "ㄓ",
    "ㄔ", "ㄕ", "ㄖ", "ㄗ", "ㄘ", "ㄙ", "ㄧ", "ㄨ", "ㄩ",
];
