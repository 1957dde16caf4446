//! Sticker geometry
//!
//! Maps between a cubie grid position `(x, y, z)` in `{0,1,2}^3` plus an
//! outward direction and the flat facelet index. The same convention is used
//! by the move-table builder, the blindsolve analyzer and renderers.
//!
//! Axes: `+x` points to R, `+y` to U, `+z` to F.

use serde::{Deserialize, Serialize};

use super::{Color, Face, FaceletState};

/// Outward direction of a sticker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl FaceDirection {
    /// Renderer order: +x, -x, +y, -y, +z, -z
    pub const ALL: [FaceDirection; 6] = [
        FaceDirection::PosX,
        FaceDirection::NegX,
        FaceDirection::PosY,
        FaceDirection::NegY,
        FaceDirection::PosZ,
        FaceDirection::NegZ,
    ];

    pub fn vector(self) -> [i32; 3] {
        match self {
            FaceDirection::PosX => [1, 0, 0],
            FaceDirection::NegX => [-1, 0, 0],
            FaceDirection::PosY => [0, 1, 0],
            FaceDirection::NegY => [0, -1, 0],
            FaceDirection::PosZ => [0, 0, 1],
            FaceDirection::NegZ => [0, 0, -1],
        }
    }

    pub fn from_vector(v: [i32; 3]) -> Option<Self> {
        FaceDirection::ALL.into_iter().find(|d| d.vector() == v)
    }

    /// Face whose stickers point this way
    pub fn face(self) -> Face {
        match self {
            FaceDirection::PosX => Face::R,
            FaceDirection::NegX => Face::L,
            FaceDirection::PosY => Face::U,
            FaceDirection::NegY => Face::D,
            FaceDirection::PosZ => Face::F,
            FaceDirection::NegZ => Face::B,
        }
    }
}

/// Facelet index of the sticker on cubie `(x, y, z)` facing `dir`.
///
/// Returns `None` when the cubie has no sticker in that direction (the face
/// points into the cube) or the coordinates are off the grid.
pub fn sticker_index(x: usize, y: usize, z: usize, dir: FaceDirection) -> Option<usize> {
    if x > 2 || y > 2 || z > 2 {
        return None;
    }

    match dir {
        FaceDirection::PosY if y == 2 => Some(z * 3 + x),
        FaceDirection::NegY if y == 0 => Some(27 + (2 - z) * 3 + x),
        FaceDirection::PosZ if z == 2 => Some(18 + (2 - y) * 3 + x),
        FaceDirection::NegZ if z == 0 => Some(45 + (2 - y) * 3 + (2 - x)),
        FaceDirection::PosX if x == 2 => Some(9 + (2 - y) * 3 + (2 - z)),
        FaceDirection::NegX if x == 0 => Some(36 + (2 - y) * 3 + z),
        _ => None,
    }
}

/// Cubie coordinates and direction of a facelet index (inverse of `sticker_index`)
pub fn facelet_location(index: usize) -> Option<([usize; 3], FaceDirection)> {
    for x in 0..3 {
        for y in 0..3 {
            for z in 0..3 {
                for dir in FaceDirection::ALL {
                    if sticker_index(x, y, z, dir) == Some(index) {
                        return Some(([x, y, z], dir));
                    }
                }
            }
        }
    }
    None
}

/// Colors of one cubie's six faces in `FaceDirection::ALL` order.
///
/// Internal faces are `None`; renderers paint them `INTERNAL_COLOR_HEX`.
pub fn cubie_colors(state: &FaceletState, x: usize, y: usize, z: usize) -> [Option<Color>; 6] {
    FaceDirection::ALL.map(|dir| {
        sticker_index(x, y, z, dir)
            .and_then(|idx| state.get(idx))
            .map(Face::color)
    })
}
