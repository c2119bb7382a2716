use chess_engine::board::Board;
use chess_engine::tt::{NodeType, TranspositionTable};

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(usize, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Initial Position",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depths: &[(1, 20), (2, 400), (3, 8902), (4, 197281)],
    },
    TestPosition {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039), (3, 97862)],
    },
];

#[test]
fn perft_positions() {
    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let nodes = board.perft(depth);
            assert_eq!(nodes, expected, "Perft failed for {} at depth {}", position.name, depth);
        }
    }
}

#[test]
fn draw_detection_fifty_move_rule() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 99 1");
    assert!(!board.is_draw(), "99 halfmoves is not yet a draw");

    let board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 100 1");
    assert!(board.is_draw(), "100 halfmoves is a draw");
}

#[test]
fn unmake_restores_position_exactly() {
    let mut board = Board::new();
    let before = board.to_fen();
    let mv = board.parse_move("e2e4").unwrap();
    let info = board.make_move(mv);
    assert_ne!(board.to_fen(), before);
    board.unmake_move(mv, info);
    assert_eq!(board.to_fen(), before);
}

#[test]
fn transposition_table_store_probe() {
    let tt = TranspositionTable::new(1);
    let hash = 0xdead_beef_u64;
    let epoch = 0;

    tt.store(hash, 100, NodeType::Exact, 1, None, epoch);
    let entry = tt.probe(hash, epoch).expect("entry missing");
    assert_eq!(entry.depth, 1);
    assert_eq!(entry.score, 100);

    // Same-key slot is reused and simply overwritten by the newer search.
    tt.store(hash, 200, NodeType::Exact, 5, None, epoch);
    let entry = tt.probe(hash, epoch).expect("entry missing after deeper store");
    assert_eq!(entry.depth, 5);
    assert_eq!(entry.score, 200);
}

#[test]
fn transposition_table_probe_misses_unstored_key() {
    let tt = TranspositionTable::new(1);
    assert!(tt.probe(0x1234, 0).is_none());
}
