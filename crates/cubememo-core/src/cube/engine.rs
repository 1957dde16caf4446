//! Move engine
//!
//! One facelet permutation per face quarter-turn, derived from the sticker
//! geometry by rotating each sticker's position and outward direction about
//! the face axis. Half and counter-clockwise turns are compositions.
//!
//! Table construction is asynchronous (`CubeEngine::initialize`). Until it has
//! completed, applying moves yields the solved state.

use tokio::sync::OnceCell;

use super::geometry::{facelet_location, sticker_index, FaceDirection};
use super::{parse_scramble, Face, FaceletState, Move, ParseError, Turn, FACELET_COUNT};

type Permutation = [usize; FACELET_COUNT];

/// Facelet permutations for all 18 outer-face moves.
///
/// Permutations are stored as `new[j] = old[perm[j]]`.
#[derive(Debug, Clone)]
pub struct MoveTables {
    perms: [Permutation; 18],
}

impl MoveTables {
    pub fn build() -> Self {
        let mut perms = [identity(); 18];
        for face in Face::ALL {
            let quarter = quarter_turn(face);
            let half = compose(&quarter, &quarter);
            let three = compose(&half, &quarter);
            perms[slot(Move::new(face, Turn::Clockwise))] = quarter;
            perms[slot(Move::new(face, Turn::Half))] = half;
            perms[slot(Move::new(face, Turn::CounterClockwise))] = three;
        }
        Self { perms }
    }

    pub fn apply(&self, state: &FaceletState, m: Move) -> FaceletState {
        let perm = &self.perms[slot(m)];
        FaceletState::from_facelets(std::array::from_fn(|j| state[perm[j]]))
    }

    pub fn apply_all(&self, state: &FaceletState, moves: &[Move]) -> FaceletState {
        moves.iter().fold(*state, |acc, &m| self.apply(&acc, m))
    }
}

fn slot(m: Move) -> usize {
    let turn = match m.turn {
        Turn::Clockwise => 0,
        Turn::CounterClockwise => 1,
        Turn::Half => 2,
    };
    m.face.index() * 3 + turn
}

fn identity() -> Permutation {
    std::array::from_fn(|i| i)
}

/// Apply `first`, then `second`
fn compose(first: &Permutation, second: &Permutation) -> Permutation {
    std::array::from_fn(|j| first[second[j]])
}

fn dot(a: [i32; 3], b: [i32; 3]) -> i32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Quarter turn of `v` about unit axis `a`, clockwise seen from the `+a` side
fn rotate(v: [i32; 3], a: [i32; 3]) -> [i32; 3] {
    let c = cross(a, v);
    let d = dot(a, v);
    [a[0] * d - c[0], a[1] * d - c[1], a[2] * d - c[2]]
}

fn quarter_turn(face: Face) -> Permutation {
    let axis = face.direction().vector();
    let mut perm = identity();

    for index in 0..FACELET_COUNT {
        let Some((grid, dir)) = facelet_location(index) else {
            continue;
        };
        let pos = grid.map(|c| c as i32 - 1);
        if dot(pos, axis) != 1 {
            continue;
        }

        let moved = rotate(pos, axis).map(|c| (c + 1) as usize);
        let Some(moved_dir) = FaceDirection::from_vector(rotate(dir.vector(), axis)) else {
            continue;
        };
        if let Some(target) = sticker_index(moved[0], moved[1], moved[2], moved_dir) {
            perm[target] = index;
        }
    }

    perm
}

// ============================================================================
// ENGINE
// ============================================================================

/// Lazily-initialised move engine.
///
/// Owns the move tables; there is no process-wide cache.
#[derive(Debug, Default)]
pub struct CubeEngine {
    tables: OnceCell<MoveTables>,
}

impl CubeEngine {
    /// Engine whose tables are not built yet
    pub fn new() -> Self {
        Self {
            tables: OnceCell::new(),
        }
    }

    /// Engine with tables built eagerly
    pub fn initialized() -> Self {
        Self {
            tables: OnceCell::new_with(Some(MoveTables::build())),
        }
    }

    /// Build the move tables. Idempotent; concurrent callers share one build.
    pub async fn initialize(&self) -> &MoveTables {
        self.tables
            .get_or_init(|| async {
                let tables = MoveTables::build();
                tracing::info!("Move tables ready");
                tables
            })
            .await
    }

    pub fn is_ready(&self) -> bool {
        self.tables.initialized()
    }

    /// Apply `moves` to `state`.
    ///
    /// Before initialisation this returns the solved state.
    pub fn apply_moves(&self, state: &FaceletState, moves: &[Move]) -> FaceletState {
        match self.tables.get() {
            Some(tables) => tables.apply_all(state, moves),
            None => {
                tracing::warn!("Cube engine not initialized, returning solved state");
                FaceletState::solved()
            }
        }
    }

    /// State reached by applying `moves` to a solved cube
    pub fn scramble_state(&self, moves: &[Move]) -> FaceletState {
        self.apply_moves(&FaceletState::solved(), moves)
    }

    /// Parse `text`, then apply it to a solved cube. Parse errors leave nothing applied.
    pub fn apply_scramble(&self, text: &str) -> Result<FaceletState, ParseError> {
        let moves = parse_scramble(text)?;
        Ok(self.scramble_state(&moves))
    }
}
