//! Blindsolve Memo Analysis
//!
//! Turns a scrambled `FaceletState` into the label sequence a blindfolded
//! solver memorizes, separately for edges and corners.
//!
//! ## Convention
//!
//! | Piece  | Buffer | Target | Cycle-break order                  |
//! |--------|--------|--------|------------------------------------|
//! | Edge   | UR     | UL     | UB UL UF BL FL FR BR DF DL DB DR   |
//! | Corner | UBL    | DFR    | UBR UFR UFL DFL DFR DBL DBR        |
//!
//! Tracing starts at the buffer (or the target when the buffer is solved) and
//! follows the piece sitting in each slot to its home sticker, emitting that
//! sticker's label. When a cycle closes, the next unvisited unsolved slot in
//! the cycle-break order starts a new one; every cycle after the first is
//! prefixed with the label of its start slot's first face.
//!
//! Missing labels truncate the current cycle. Stickers whose colors match no
//! piece end the current cycle.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cube::{CornerPosition, EdgePosition, Face, FaceletState, PieceKind, Position};
use crate::encoding::EncodingTable;

/// Step cap for a single cycle
const MAX_CYCLE_STEPS: usize = 24;

pub const EDGE_BUFFER: EdgePosition = EdgePosition::UR;
pub const EDGE_TARGET: EdgePosition = EdgePosition::UL;
pub const CORNER_BUFFER: CornerPosition = CornerPosition::UBL;
pub const CORNER_TARGET: CornerPosition = CornerPosition::DFR;

pub const EDGE_CYCLE_ORDER: [EdgePosition; 11] = [
    EdgePosition::UB,
    EdgePosition::UL,
    EdgePosition::UF,
    EdgePosition::BL,
    EdgePosition::FL,
    EdgePosition::FR,
    EdgePosition::BR,
    EdgePosition::DF,
    EdgePosition::DL,
    EdgePosition::DB,
    EdgePosition::DR,
];

pub const CORNER_CYCLE_ORDER: [CornerPosition; 7] = [
    CornerPosition::UBR,
    CornerPosition::UFR,
    CornerPosition::UFL,
    CornerPosition::DFL,
    CornerPosition::DFR,
    CornerPosition::DBL,
    CornerPosition::DBR,
];

struct TraceConvention<P: 'static> {
    buffer: P,
    target: P,
    order: &'static [P],
    max_cycles: usize,
}

const EDGES: TraceConvention<EdgePosition> = TraceConvention {
    buffer: EDGE_BUFFER,
    target: EDGE_TARGET,
    order: &EDGE_CYCLE_ORDER,
    max_cycles: 12,
};

const CORNERS: TraceConvention<CornerPosition> = TraceConvention {
    buffer: CORNER_BUFFER,
    target: CORNER_TARGET,
    order: &CORNER_CYCLE_ORDER,
    max_cycles: 8,
};

// ============================================================================
// MEMO
// ============================================================================

/// Space-separated memo strings for one scramble
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindsolveMemo {
    pub edges: String,
    pub corners: String,
}

impl BlindsolveMemo {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.corners.is_empty()
    }

    pub fn memo(&self, kind: PieceKind) -> &str {
        match kind {
            PieceKind::Corner => &self.corners,
            PieceKind::Edge => &self.edges,
        }
    }

    pub fn labels(&self, kind: PieceKind) -> Vec<&str> {
        self.memo(kind).split_whitespace().collect()
    }

    /// Consecutive labels joined two at a time (the last one may be alone)
    pub fn letter_pairs(&self, kind: PieceKind) -> Vec<String> {
        self.labels(kind)
            .chunks(2)
            .map(|pair| pair.concat())
            .collect()
    }
}

/// Memo for both piece kinds
pub fn analyze(state: &FaceletState, encoding: &EncodingTable) -> BlindsolveMemo {
    BlindsolveMemo {
        edges: trace(state, encoding, &EDGES).join(" "),
        corners: trace(state, encoding, &CORNERS).join(" "),
    }
}

// ============================================================================
// TRACING
// ============================================================================

fn sticker_color<P: Position>(state: &FaceletState, position: P, face: Face) -> Option<Face> {
    position.sticker(face).and_then(|idx| state.get(idx))
}

fn piece_colors<P: Position>(state: &FaceletState, position: P) -> Option<Vec<Face>> {
    position
        .faces()
        .iter()
        .map(|&face| sticker_color(state, position, face))
        .collect()
}

fn is_solved<P: Position>(state: &FaceletState, position: P) -> bool {
    position
        .faces()
        .iter()
        .all(|&face| sticker_color(state, position, face) == Some(face))
}

/// Home slot of the piece with these colors
fn home_of<P: Position>(colors: &[Face]) -> Option<P> {
    P::ALL.iter().copied().find(|candidate| {
        let faces = candidate.faces();
        faces.len() == colors.len()
            && colors.iter().all(|c| faces.contains(c))
            && faces.iter().all(|f| colors.contains(f))
    })
}

fn trace<P: Position>(
    state: &FaceletState,
    encoding: &EncodingTable,
    convention: &TraceConvention<P>,
) -> Vec<String> {
    let mut labels = Vec::new();
    let mut visited: BTreeSet<P> = BTreeSet::new();

    let start = if !is_solved(state, convention.buffer) {
        Some(convention.buffer)
    } else if !is_solved(state, convention.target) {
        Some(convention.target)
    } else {
        convention
            .order
            .iter()
            .copied()
            .find(|&p| !is_solved(state, p))
    };
    let Some(mut current) = start else {
        return labels;
    };

    let mut cycle_count = 0;
    while cycle_count < convention.max_cycles && visited.len() < P::ALL.len() {
        cycle_count += 1;
        let cycle_start = current;
        let mut tracked_face: Option<Face> = None;

        if cycle_count > 1 {
            if let Some(label) = encoding.label_of(current, current.faces()[0]) {
                labels.push(label.to_string());
            }
        }

        for _ in 0..MAX_CYCLE_STEPS {
            let Some(colors) = piece_colors(state, current) else {
                break;
            };
            let face = tracked_face.unwrap_or(current.faces()[0]);
            let Some(primary_color) = sticker_color(state, current, face) else {
                break;
            };
            let Some(home) = home_of::<P>(&colors) else {
                break;
            };

            visited.insert(current);

            let Some(label) = encoding.label_of(home, primary_color) else {
                break;
            };
            labels.push(label.to_string());

            if home == cycle_start || home == convention.buffer || visited.contains(&home) {
                break;
            }
            current = home;
            tracked_face = Some(primary_color);
        }

        match convention
            .order
            .iter()
            .copied()
            .find(|&p| !visited.contains(&p) && !is_solved(state, p))
        {
            Some(next) => current = next,
            None => break,
        }
    }

    labels
}

// ============================================================================
// TESTS
// ============================================================================
