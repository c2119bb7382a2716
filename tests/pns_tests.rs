//! Proof-number search: verifies against positions whose outcome is
//! decidable by inspection, and that the board is left exactly as found.

use std::time::{Duration, Instant};

use chess_engine::board::{Board, Variant};
use chess_engine::pns::{self, PnsParams, PnsVerdict};

#[test]
fn stuck_side_is_a_proven_win() {
    // Black's only piece is a pawn on h2, blocked by White's king on h1 and
    // with no diagonal capture available: Black to move has no legal move,
    // which in antichess is a win for the side to move.
    let mut board =
        Board::try_from_fen_with_variant("8/8/8/8/8/8/7p/7K b - - 0 1", Variant::Antichess).unwrap();
    let params = PnsParams { max_nodes: 1_000, quiet: true };
    let result = pns::search(&mut board, None, &params, Instant::now() + Duration::from_secs(5));
    assert_eq!(result.verdict, PnsVerdict::Win);
}

#[test]
fn search_restores_board_position_exactly() {
    let mut board = Board::try_from_fen_with_variant(
        "8/8/8/8/8/3k4/3p4/3K4 b - - 0 1",
        Variant::Antichess,
    )
    .unwrap();
    let before = board.to_fen();
    let params = PnsParams { max_nodes: 2_000, quiet: true };
    let _ = pns::search(&mut board, None, &params, Instant::now() + Duration::from_secs(5));
    assert_eq!(board.to_fen(), before);
}

#[test]
fn driver_search_returns_root_moves_or_none() {
    let mut board =
        Board::try_from_fen_with_variant("8/8/8/8/8/3k4/3p4/3K4 b - - 0 1", Variant::Antichess)
            .unwrap();
    // A short budget: either it proves something and hands back an ordered
    // move list, or it times out and returns None — both are valid, the
    // driver must not panic or hang.
    let moves = pns::driver_search(&mut board, None, Duration::from_millis(50));
    if let Some(moves) = moves {
        assert!(!moves.is_empty());
    }
}

#[test]
fn node_budget_bounds_the_search() {
    let mut board =
        Board::try_from_fen_with_variant("8/8/8/8/8/3k4/3p4/3K4 b - - 0 1", Variant::Antichess)
            .unwrap();
    let params = PnsParams { max_nodes: 50, quiet: true };
    let result = pns::search(&mut board, None, &params, Instant::now() + Duration::from_secs(30));
    assert!(result.tree_size <= 50 + 8, "tree grew well past the node budget: {}", result.tree_size);
}
