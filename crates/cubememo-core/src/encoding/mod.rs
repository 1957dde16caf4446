//! Encoding Tables
//!
//! Per-sticker label tables for corners and edges:
//! - Sticker keys with the grammar `<PIECE>-<FACE>` (e.g. `UR-U`, `DFR-F`)
//! - Two shipped conventions: Speffz letters and the Zhuyin primary set
//! - Immutable updates; user tables are not required to stay bijective

mod defaults;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cube::{Face, Piece, PieceKind, Position};

pub use defaults::PRIMARY_ALPHABET;

/// Longest label accepted by `EncodingTable::set`, in characters
pub const MAX_LABEL_CHARS: usize = 3;

// ============================================================================
// ERROR TYPES
// ============================================================================

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// Key does not follow `<PIECE>-<FACE>` or names a face the piece lacks
    #[error("Invalid sticker key: {0}")]
    InvalidKey(String),
    /// Corner key used with the edge table or vice versa
    #[error("Sticker {key} is not a {kind} sticker")]
    KindMismatch { key: String, kind: PieceKind },
    #[error("Label '{0}' is longer than 3 characters")]
    LabelTooLong(String),
}

// ============================================================================
// STICKER KEY
// ============================================================================

/// One sticker of one piece slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StickerKey {
    piece: Piece,
    face: Face,
}

impl StickerKey {
    pub fn new(piece: Piece, face: Face) -> Result<Self, EncodingError> {
        if !piece.faces().contains(&face) {
            return Err(EncodingError::InvalidKey(format!("{}-{}", piece, face)));
        }
        Ok(Self { piece, face })
    }

    /// Key for a typed position; `None` if `face` is not one of its faces
    pub fn of<P: Position>(position: P, face: Face) -> Option<Self> {
        position
            .faces()
            .contains(&face)
            .then(|| Self {
                piece: position.piece(),
                face,
            })
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind()
    }
}

impl fmt::Display for StickerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.piece, self.face)
    }
}

impl FromStr for StickerKey {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EncodingError::InvalidKey(s.to_string());
        let (piece, face) = s.split_once('-').ok_or_else(invalid)?;
        let piece: Piece = piece.parse().map_err(|_| invalid())?;
        let face: Face = face.parse().map_err(|_| invalid())?;
        Self::new(piece, face)
    }
}

impl Serialize for StickerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StickerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// CONVENTIONS
// ============================================================================

/// Built-in label set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncodingConvention {
    /// Zhuyin symbols, matching the default memory-word alphabet
    #[default]
    Primary,
    /// Letters A-X
    Speffz,
}

impl EncodingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingConvention::Primary => "primary",
            EncodingConvention::Speffz => "speffz",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "primary" | "zhuyin" => Some(EncodingConvention::Primary),
            "speffz" => Some(EncodingConvention::Speffz),
            _ => None,
        }
    }
}

impl fmt::Display for EncodingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ENCODING TABLE
// ============================================================================

/// Sticker → label maps for both piece kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingTable {
    pub corners: BTreeMap<StickerKey, String>,
    pub edges: BTreeMap<StickerKey, String>,
}

impl Default for EncodingTable {
    fn default() -> Self {
        Self::primary()
    }
}

impl EncodingTable {
    pub fn speffz() -> Self {
        Self::from_rows(&defaults::SPEFFZ_CORNERS, &defaults::SPEFFZ_EDGES)
    }

    pub fn primary() -> Self {
        Self::from_rows(&defaults::PRIMARY_CORNERS, &defaults::PRIMARY_EDGES)
    }

    pub fn for_convention(convention: EncodingConvention) -> Self {
        match convention {
            EncodingConvention::Primary => Self::primary(),
            EncodingConvention::Speffz => Self::speffz(),
        }
    }

    fn from_rows<C: Position, E: Position>(
        corners: &[(C, Face, &str)],
        edges: &[(E, Face, &str)],
    ) -> Self {
        fn collect<P: Position>(rows: &[(P, Face, &str)]) -> BTreeMap<StickerKey, String> {
            rows.iter()
                .filter_map(|&(pos, face, label)| {
                    StickerKey::of(pos, face).map(|key| (key, label.to_string()))
                })
                .collect()
        }

        Self {
            corners: collect(corners),
            edges: collect(edges),
        }
    }

    pub fn labels(&self, kind: PieceKind) -> &BTreeMap<StickerKey, String> {
        match kind {
            PieceKind::Corner => &self.corners,
            PieceKind::Edge => &self.edges,
        }
    }

    pub fn get(&self, kind: PieceKind, key: &StickerKey) -> Option<&str> {
        self.labels(kind).get(key).map(String::as_str)
    }

    /// Label of a typed position's sticker
    pub fn label_of<P: Position>(&self, position: P, face: Face) -> Option<&str> {
        StickerKey::of(position, face).and_then(|key| self.get(P::KIND, &key))
    }

    /// Copy of this table with one label changed.
    ///
    /// An empty (or all-whitespace) label removes the entry.
    pub fn set(
        &self,
        kind: PieceKind,
        key: StickerKey,
        label: &str,
    ) -> Result<EncodingTable, EncodingError> {
        if key.kind() != kind {
            return Err(EncodingError::KindMismatch {
                key: key.to_string(),
                kind,
            });
        }

        let label = label.trim();
        if label.chars().count() > MAX_LABEL_CHARS {
            return Err(EncodingError::LabelTooLong(label.to_string()));
        }

        let mut updated = self.clone();
        let map = match kind {
            PieceKind::Corner => &mut updated.corners,
            PieceKind::Edge => &mut updated.edges,
        };
        if label.is_empty() {
            map.remove(&key);
        } else {
            map.insert(key, label.to_string());
        }
        Ok(updated)
    }

    /// First sticker carrying `label`
    pub fn find_key(&self, kind: PieceKind, label: &str) -> Option<StickerKey> {
        self.labels(kind)
            .iter()
            .find(|(_, l)| l.as_str() == label)
            .map(|(key, _)| *key)
    }

    /// The convention this table matches exactly, if any
    pub fn convention(&self) -> Option<EncodingConvention> {
        [EncodingConvention::Primary, EncodingConvention::Speffz]
            .into_iter()
            .find(|&c| *self == Self::for_convention(c))
    }
}

// ============================================================================
// TESTS
// ============================================================================
