//! Journey: scramble -> cube state -> memo
//!
//! A user asks for a scramble, reads its memo, edits a label and checks
//! that the memo follows the edit.

use cubememo_core::{
    analyze, format_scramble, invert_sequence, parse_scramble, CubeEngine, EncodingConvention,
    EncodingTable, FaceletState, PieceKind, ScrambleGenerator,
};
use cubememo_e2e_tests::harness::TestStoreManager;
use cubememo_e2e_tests::mocks::TestClock;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[tokio::test]
async fn test_generated_scrambles_produce_consistent_memo() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer.initialize().await;

    for _ in 0..10 {
        let result = trainer.new_scramble().expect("scramble");
        let moves = parse_scramble(&result.scramble).expect("generated scramble parses");
        assert_eq!(moves.len(), 20);
        for window in moves.windows(2) {
            assert_ne!(window[0].face, window[1].face);
        }

        assert_eq!(trainer.memo_for(&result.scramble).unwrap(), result.memo);
        for label in result.memo.labels(PieceKind::Edge) {
            assert!(label.chars().count() <= 3);
        }
    }
}

#[test]
fn test_single_r_memo_in_both_conventions() {
    let engine = CubeEngine::initialized();
    let state = engine.apply_scramble("R").unwrap();

    let speffz = analyze(&state, &EncodingTable::speffz());
    assert_eq!(speffz.edges, "J V T B");
    assert_eq!(speffz.corners, "T B J V");
    assert_eq!(speffz.letter_pairs(PieceKind::Edge), vec!["JV", "TB"]);

    let primary = analyze(&state, &EncodingTable::for_convention(EncodingConvention::Primary));
    assert_eq!(primary.edges, "ㄕ ㄈ ㄖ ㄉ");
}

#[test]
fn test_scramble_and_inverse_restore_solved() {
    let engine = CubeEngine::initialized();
    let generator = ScrambleGenerator::default();
    let mut rng = StdRng::seed_from_u64(2026);

    for length in [1, 5, 20, 30] {
        let moves = generator.generate_with_rng(length, &mut rng);
        let scrambled = engine.scramble_state(&moves);
        assert_eq!(scrambled.color_counts(), [9; 6]);
        let restored = engine.apply_moves(&scrambled, &invert_sequence(&moves));
        assert!(restored.is_solved());

        let text = format_scramble(&moves);
        assert_eq!(engine.apply_scramble(&text).unwrap(), scrambled);
    }

    let solved = analyze(&FaceletState::solved(), &EncodingTable::default());
    assert!(solved.is_empty());
}

#[tokio::test]
async fn test_label_edit_changes_memo() {
    let store = TestStoreManager::new_temp();
    let clock = TestClock::default();
    let mut trainer = store.open(clock.now());
    trainer.initialize().await;
    trainer.set_encoding(EncodingConvention::Speffz).unwrap();

    assert_eq!(trainer.memo_for("R").unwrap().edges, "J V T B");
    trainer.set_label(PieceKind::Edge, "DR-D", "Z").unwrap();
    assert_eq!(trainer.memo_for("R").unwrap().edges, "J Z T B");

    trainer.set_label(PieceKind::Edge, "FR-F", "").unwrap();
    assert_eq!(trainer.memo_for("R").unwrap().edges, "Z T B");

    assert!(trainer.memo_for("R Q").is_err());
}
