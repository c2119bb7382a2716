#[cfg(test)]
mod perft_tests {
    use super::super::*;
    use std::time::Instant;

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
        TestPosition {
            name: "Position 3",
            fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            depths: &[(1, 14), (2, 191), (3, 2812)],
        },
        TestPosition {
            name: "En Passant Capture",
            fen: "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            depths: &[(1, 31), (2, 707), (3, 21637)],
        },
        TestPosition {
            name: "Castling",
            fen: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            depths: &[(1, 26), (2, 568), (3, 13744)],
        },
    ];

    #[test]
    fn test_all_perft_positions() {
        for position in TEST_POSITIONS {
            let mut board = Board::from_fen(position.fen);

            for &(depth, expected) in position.depths {
                let start = Instant::now();
                let nodes = board.perft(depth);
                let duration = start.elapsed();

                println!("  Depth {}: {} nodes in {:?}", depth, nodes, duration);

                assert_eq!(
                    nodes, expected,
                    "Perft failed for position '{}' at depth {}. Expected: {}, Got: {}",
                    position.name, depth, expected, nodes
                );
            }
        }
    }
}

#[cfg(test)]
mod draw_tests {
    use super::super::*;

    fn apply_uci(board: &mut Board, uci: &str) {
        let mv = board.parse_move(uci).expect("uci move not legal");
        board.make_move(mv);
    }

    #[test]
    fn test_fen_halfmove_parsing() {
        let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 1");
        assert_eq!(board.halfmove_clock(), 57);
    }

    #[test]
    fn test_fifty_move_rule_draw() {
        let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1");
        assert!(board.is_draw());
        assert!(board.is_theoretical_draw());
    }

    #[test]
    fn test_halfmove_resets_on_pawn_move() {
        let mut board = Board::from_fen("8/8/8/8/8/8/4P3/K1k5 w - - 99 1");
        apply_uci(&mut board, "e2e4");
        assert_eq!(board.halfmove_clock(), 0);
        assert!(!board.is_draw());
        assert!(!board.is_theoretical_draw());
    }

    #[test]
    fn test_threefold_repetition() {
        let mut board = Board::new();
        for _ in 0..2 {
            apply_uci(&mut board, "g1f3");
            apply_uci(&mut board, "g8f6");
            apply_uci(&mut board, "f3g1");
            apply_uci(&mut board, "f6g8");
        }
        assert!(board.is_draw());
        assert!(board.is_theoretical_draw());
    }

    #[test]
    fn test_insufficient_material_draw() {
        let board = Board::from_fen("8/8/8/8/8/8/6N1/K1k5 w - - 0 1");
        assert!(!board.is_draw());
        assert!(board.is_theoretical_draw());
    }

    #[test]
    fn test_unmake_restores_state() {
        let mut board = Board::new();
        let original_hash = board.hash();
        let original_castling = board.castling_rights;
        let original_ep = board.en_passant_target;
        let original_halfmove = board.halfmove_clock();

        let mv = Move::from_lan("e2e4").unwrap();
        let info = board.make_move(mv);
        board.unmake_move(mv, info);

        assert_eq!(board.hash(), original_hash);
        assert_eq!(board.castling_rights, original_castling);
        assert_eq!(board.en_passant_target, original_ep);
        assert_eq!(board.halfmove_clock(), original_halfmove);
    }

    #[test]
    fn test_fen_round_trip_normalized() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let board = Board::from_fen(fen);
        let out = board.to_fen();
        let in_parts: Vec<&str> = fen.split_whitespace().collect();
        let out_parts: Vec<&str> = out.split_whitespace().collect();
        assert_eq!(&in_parts[..5], &out_parts[..5]);
    }
}

#[cfg(test)]
mod engine_tests {
    use super::super::*;

    #[test]
    fn test_en_passant_make_unmake() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let original_hash = board.hash();
        let original_ep = board.en_passant_target;
        let mv = Move::from_lan("e5f6").unwrap();
        let info = board.make_move(mv);
        board.unmake_move(mv, info);
        assert_eq!(board.hash(), original_hash);
        assert_eq!(board.en_passant_target, original_ep);
    }

    #[test]
    fn test_promotion_make_unmake() {
        let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
        let original_hash = board.hash();
        let mv = Move::from_lan("a7a8q").unwrap();
        let info = board.make_move(mv);
        board.unmake_move(mv, info);
        assert_eq!(board.hash(), original_hash);
        assert_eq!(
            board.piece_at(Square::new(6, 0)),
            Some((Color::White, Piece::Pawn))
        );
    }

    #[test]
    fn test_null_move_make_unmake_restores_hash_and_ep() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let original_hash = board.hash();
        let original_ep = board.en_passant_target;
        let original_side = board.white_to_move;

        let info = board.make_null_move();
        assert_eq!(board.en_passant_target, None);
        assert_ne!(board.hash(), original_hash);
        assert_ne!(board.white_to_move, original_side);

        board.unmake_null_move(info);
        assert_eq!(board.hash(), original_hash);
        assert_eq!(board.en_passant_target, original_ep);
        assert_eq!(board.white_to_move, original_side);
    }

    #[test]
    fn test_null_move_preserves_castling_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let original_castling = board.castling_rights;
        let info = board.make_null_move();
        assert_eq!(board.castling_rights, original_castling);
        board.unmake_null_move(info);
        assert_eq!(board.castling_rights, original_castling);
    }

    #[test]
    fn test_legal_moves_stable_after_make_unmake() {
        let mut board = Board::new();
        let initial_moves = board.generate_moves();
        let mut initial_list: Vec<String> = initial_moves.iter().map(|m| m.to_lan()).collect();
        initial_list.sort();

        for mv in initial_moves.iter().copied() {
            let info = board.make_move(mv);
            board.unmake_move(mv, info);
        }

        let after_moves = board.generate_moves();
        let mut after_list: Vec<String> = after_moves.iter().map(|m| m.to_lan()).collect();
        after_list.sort();

        assert_eq!(initial_list, after_list);
    }

    #[test]
    fn test_hash_matches_recompute_after_random_moves() {
        use rand::prelude::*;

        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut history: Vec<(Move, UnmakeInfo)> = Vec::new();

        for _ in 0..50 {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..moves.len());
            let mv = moves.as_slice()[idx];
            let info = board.make_move(mv);
            history.push((mv, info));

            let recomputed = board.calculate_initial_hash();
            assert_eq!(board.hash(), recomputed);
        }

        while let Some((mv, info)) = history.pop() {
            board.unmake_move(mv, info);
            let recomputed = board.calculate_initial_hash();
            assert_eq!(board.hash(), recomputed);
        }
    }

    #[test]
    fn test_random_playout_round_trip_state() {
        use rand::prelude::*;

        let mut board = Board::new();
        let initial_hash = board.hash();
        let initial_halfmove = board.halfmove_clock();
        let initial_castling = board.castling_rights;
        let initial_ep = board.en_passant_target;

        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut history: Vec<(Move, UnmakeInfo)> = Vec::new();

        for _ in 0..200 {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..moves.len());
            let mv = moves.as_slice()[idx];
            let info = board.make_move(mv);
            history.push((mv, info));
            let recomputed = board.calculate_initial_hash();
            assert_eq!(board.hash(), recomputed);
        }

        while let Some((mv, info)) = history.pop() {
            board.unmake_move(mv, info);
        }

        assert_eq!(board.hash(), initial_hash);
        assert_eq!(board.halfmove_clock(), initial_halfmove);
        assert_eq!(board.castling_rights, initial_castling);
        assert_eq!(board.en_passant_target, initial_ep);
    }
}
