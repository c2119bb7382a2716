use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chess_engine::board::Board;
use chess_engine::search::{self, DriverParams, SearchState};

#[test]
fn depth_limited_search_returns_move() {
    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = Arc::new(AtomicBool::new(false));
    let params = DriverParams { max_depth: Some(1), info_callback: None };

    let result = search::search(&mut board, &mut state, None, 10_000, &stop, params);
    // At depth 1 we should always have at least one legal move from the starting position
    assert!(result.best_move.is_some());
}

#[test]
fn time_limited_search_returns_move_within_budget() {
    use std::time::Instant;

    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = Arc::new(AtomicBool::new(false));
    let params = DriverParams::default();

    let start = Instant::now();
    // 5 centiseconds: a short budget that should still complete promptly.
    let result = search::search(&mut board, &mut state, None, 5, &stop, params);
    let elapsed = start.elapsed();

    assert!(result.best_move.is_some(), "should find a move within a short budget");
    assert!(elapsed.as_secs() < 5, "search overran its time budget: {:?}", elapsed);
}

#[test]
fn stop_flag_aborts_search_promptly() {
    use std::thread;
    use std::time::{Duration, Instant};

    let mut board = Board::new();
    let mut state = SearchState::new(16);
    let stop = Arc::new(AtomicBool::new(false));
    let stop_setter = Arc::clone(&stop);
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        stop_setter.store(true, std::sync::atomic::Ordering::Relaxed);
    });

    let params = DriverParams::default();
    let start = Instant::now();
    // A generous budget the stop flag should preempt well before expiry.
    let result = search::search(&mut board, &mut state, None, 100_000, &stop, params);
    let elapsed = start.elapsed();

    assert!(result.best_move.is_some());
    assert!(elapsed.as_secs() < 10, "stop flag did not abort the search promptly: {:?}", elapsed);
}
