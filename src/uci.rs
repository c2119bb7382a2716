//! Universal Chess Interface (UCI) protocol front end.
//!
//! Parses the handful of UCI commands GUIs actually send, translates `go`'s
//! time controls into a budget for [`crate::search`], and prints `info`/
//! `bestmove` lines as the search progresses.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::{Board, FenError, Move, MoveParseError, Variant};
use crate::egtb::Egtb;
use crate::search::{self, DriverParams, IterationInfo, SearchState, DEFAULT_TT_MB};
use crate::tt::TranspositionTable;

/// Error parsing a `position` command.
#[derive(Debug, Clone)]
pub enum UciError {
    InvalidFen(FenError),
    InvalidMove { move_str: String, error: MoveParseError },
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing required parts in position command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

#[must_use]
pub fn format_uci_move(mv: &Move) -> String {
    mv.to_lan()
}

fn try_parse_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;
    if i >= parts.len() {
        return Err(UciError::MissingParts);
    }

    if parts[i] == "startpos" {
        *board = Board::new_with_variant(board.variant());
        i += 1;
    } else if parts[i] == "fen" {
        if i + 6 >= parts.len() {
            return Err(UciError::MissingParts);
        }
        let fen = parts[i + 1..i + 7].join(" ");
        *board = Board::try_from_fen_with_variant(&fen, board.variant())?;
        i += 7;
    } else {
        return Err(UciError::MissingParts);
    }

    if i < parts.len() && parts[i] == "moves" {
        i += 1;
        while i < parts.len() {
            let mv = board.parse_move(parts[i]).map_err(|e| UciError::InvalidMove {
                move_str: parts[i].to_string(),
                error: e,
            })?;
            board.make_move(mv);
            i += 1;
        }
    }

    Ok(())
}

/// Parsed `go` parameters.
#[derive(Default, Debug, Clone)]
struct GoParams {
    wtime: Option<u64>,
    btime: Option<u64>,
    winc: Option<u64>,
    binc: Option<u64>,
    movetime: Option<u64>,
    movestogo: Option<u64>,
    depth: Option<u32>,
}

fn parse_next<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse::<T>().ok())
}

fn parse_go_params(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;
    while i < parts.len() {
        let consumed = match parts[i] {
            "wtime" => { params.wtime = parse_next(parts, i); 2 }
            "btime" => { params.btime = parse_next(parts, i); 2 }
            "winc" => { params.winc = parse_next(parts, i); 2 }
            "binc" => { params.binc = parse_next(parts, i); 2 }
            "movetime" => { params.movetime = parse_next(parts, i); 2 }
            "movestogo" => { params.movestogo = parse_next(parts, i); 2 }
            "depth" => { params.depth = parse_next(parts, i); 2 }
            _ => 1,
        };
        i += consumed;
    }
    params
}

enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(Vec<String>),
    Go(Vec<String>),
    SetOption(Vec<String>),
    Stop,
    Quit,
    Unknown(String),
}

fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let owned = || parts.iter().map(|p| (*p).to_string()).collect::<Vec<_>>();

    Some(match parts[0] {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(owned()),
        "go" => UciCommand::Go(owned()),
        "setoption" => UciCommand::SetOption(owned()),
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(trimmed.to_string()),
    })
}

/// `setoption name <name> value <value>` handling. `multipv`/`threads`/
/// `uci_elo` are accepted and echoed back but don't change search behavior:
/// this engine reports one PV, runs single-threaded, and plays at its one
/// native strength.
struct UciOptions {
    hash_mb: usize,
    ponder: bool,
    multipv: u32,
    threads: u32,
    elo: u32,
}

impl UciOptions {
    fn new(hash_mb: usize) -> Self {
        UciOptions { hash_mb, ponder: false, multipv: 1, threads: 1, elo: 2800 }
    }

    fn print(&self) {
        println!("id name chess_engine");
        println!("id author the original author");
        println!("option name Hash type spin default {} min 1 max 65536", self.hash_mb);
        println!(
            "option name UCI_Variant type combo default standard var standard var antichess var suicide"
        );
        println!("option name EGTBPath type string default <empty>");
        println!("option name Ponder type check default false");
        println!("option name PNS type check default true");
        println!("option name MultiPV type spin default 1 min 1 max 1");
        println!("option name Threads type spin default 1 min 1 max 1");
        println!("option name UCI_Elo type spin default 2800 min 1 max 3200");
        println!("uciok");
    }

    fn apply(&mut self, name: &str, value: Option<&str>, state: &mut SearchState, egtb: &mut Egtb) {
        match name.trim().to_ascii_lowercase().as_str() {
            "hash" => {
                if let Some(mb) = value.and_then(|v| v.parse::<usize>().ok()) {
                    let mb = mb.max(1);
                    if mb != self.hash_mb {
                        self.hash_mb = mb;
                        state.tt = TranspositionTable::new(mb);
                    }
                }
            }
            "pns" => {
                if let Some(v) = value {
                    state.params.enable_pns = matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1");
                }
            }
            "ponder" => {
                if let Some(v) = value {
                    self.ponder = matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1");
                }
            }
            "multipv" => {
                if let Some(n) = value.and_then(|v| v.parse::<u32>().ok()) {
                    self.multipv = n.max(1);
                }
            }
            "threads" => {
                if let Some(n) = value.and_then(|v| v.parse::<u32>().ok()) {
                    self.threads = n.max(1);
                }
            }
            "uci_elo" => {
                if let Some(n) = value.and_then(|v| v.parse::<u32>().ok()) {
                    self.elo = n;
                }
            }
            "egtbpath" => {
                if let Some(dir) = value {
                    *egtb = Egtb::load_dir(dir);
                }
            }
            _ => {}
        }
    }
}

fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.is_empty() || parts[0] != "setoption" {
        return None;
    }
    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";
    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }
    if name_parts.is_empty() {
        return None;
    }
    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() { None } else { Some(value_parts.join(" ")) };
    Some((name, value))
}

fn print_info(info: &IterationInfo, board: &Board) {
    let mut pv_board = board.clone();
    let mut pv_str = String::new();
    for mv in &info.pv {
        pv_str.push_str(&format_uci_move(mv));
        pv_str.push(' ');
        pv_board.make_move(*mv);
    }
    println!(
        "info depth {} score cp {} time {} nodes {} pv {}",
        info.depth,
        info.score,
        info.elapsed_centis * 10,
        info.nodes,
        pv_str.trim_end()
    );
}

/// Runs one `go` to completion, printing `info`/`bestmove` lines. This
/// engine searches on the same thread that reads stdin, so a `stop` sent
/// mid-search is only noticed on the next depth boundary (or by the search's
/// own hard time limit) rather than instantly.
fn handle_go(board: &mut Board, state: &mut SearchState, egtb: &Egtb, go_params: &GoParams, stop: &Arc<AtomicBool>) {
    stop.store(false, Ordering::Relaxed);

    let time_centis: u64 = if let Some(mt) = go_params.movetime {
        search::TimeAllocation::fixed(mt).soft_ms / 10
    } else {
        let (time_left, inc) = if board.white_to_move() {
            (go_params.wtime.unwrap_or(0), go_params.winc.unwrap_or(0))
        } else {
            (go_params.btime.unwrap_or(0), go_params.binc.unwrap_or(0))
        };
        let alloc = search::TimeAllocation::compute(time_left, inc, go_params.movestogo.map(|v| v as u32));
        alloc.soft_ms / 10
    };

    let board_for_pv = board.clone();
    let params = DriverParams {
        max_depth: go_params.depth,
        info_callback: Some(Box::new(move |info: &IterationInfo| print_info(info, &board_for_pv))),
    };

    let result = search::search(board, state, Some(egtb), time_centis.max(1), stop, params);

    match result.best_move {
        Some(mv) => println!("bestmove {}", format_uci_move(&mv)),
        None => println!("bestmove 0000"),
    }
}

/// Runs the UCI protocol main loop over stdin/stdout.
pub fn run_uci() {
    let stdin = io::stdin();
    run_uci_on(stdin.lock().lines());
}

/// Drives the UCI loop over an arbitrary line source, so the front-end
/// dialect can be detected from the first stdin line before dispatch
/// without losing it.
pub fn run_uci_on(lines: impl Iterator<Item = io::Result<String>>) {
    let mut board = Board::new();
    let mut state = SearchState::new(DEFAULT_TT_MB);
    let mut egtb = Egtb::empty();
    let mut options = UciOptions::new(DEFAULT_TT_MB);
    let stop = Arc::new(AtomicBool::new(false));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in lines {
        let Ok(line) = line else { break };
        let Some(cmd) = parse_uci_command(&line) else { continue };

        match cmd {
            UciCommand::Uci => {
                options.print();
                out.flush().ok();
            }
            UciCommand::IsReady => {
                println!("readyok");
                out.flush().ok();
            }
            UciCommand::UciNewGame => {
                state.new_search();
                state.tt.clear();
            }
            UciCommand::Position(parts) => {
                let parts_ref: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Err(e) = try_parse_position_command(&mut board, &parts_ref) {
                    eprintln!("Error: {e}");
                }
            }
            UciCommand::Go(parts) => {
                let parts_ref: Vec<&str> = parts.iter().map(String::as_str).collect();
                let go_params = parse_go_params(&parts_ref);
                handle_go(&mut board, &mut state, &egtb, &go_params, &stop);
            }
            UciCommand::SetOption(parts) => {
                let parts_ref: Vec<&str> = parts.iter().map(String::as_str).collect();
                if let Some((name, value)) = parse_setoption(&parts_ref) {
                    options.apply(&name, value.as_deref(), &mut state, &mut egtb);
                }
            }
            UciCommand::Stop => stop.store(true, Ordering::Relaxed),
            UciCommand::Quit => break,
            UciCommand::Unknown(_) => {}
        }
    }
}

/// Parses a `UCI_Variant` value, defaulting to standard chess for an
/// unrecognized or absent name.
#[must_use]
pub fn variant_from_uci_name(name: Option<&str>) -> Variant {
    name.and_then(Variant::from_name).unwrap_or(Variant::Standard)
}
