//! XBoard/WinBoard protocol front end.
//!
//! Implements the subset of the protocol the core engine actually needs:
//! position setup (`new`/`variant`/`setboard`/`usermove`), time controls
//! (`level`/`st`/`time`/`otim`), search control (`go`/`force`/`sd`/`?`),
//! thinking output toggles (`post`/`nopost`), pondering toggles
//! (`easy`/`hard`), `ping`/`pong` keepalive, `unmake`, and `quit`. Unlike
//! UCI's single-shot `position`, XBoard positions are built incrementally
//! from `new`/`setboard` plus a stream of `usermove`s.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::{Board, Color, Move, UnmakeInfo, Variant};
use crate::egtb::Egtb;
use crate::eval::{self, TerminalResult};
use crate::search::{self, DriverParams, IterationInfo, SearchState, DEFAULT_TT_MB};

/// Prints the GUI-facing result line once the position the engine just
/// moved into (or the opponent's move landed on) is terminal. A silent
/// no-op otherwise — the game continues.
fn announce_result(board: &mut Board) {
    match eval::terminal_result(board) {
        TerminalResult::Loss => match board.side_to_move() {
            Color::White => println!("0-1 {{Black Wins}}"),
            Color::Black => println!("1-0 {{White Wins}}"),
        },
        TerminalResult::Draw => println!("1/2-1/2 {{Draw}}"),
        TerminalResult::Win | TerminalResult::Unknown => {}
    }
}

enum XBoardCommand {
    XBoard,
    Variant(String),
    Protover(u32),
    New,
    SetBoard(String),
    UserMove(String),
    Go,
    Force,
    Time(u64),
    OTime(u64),
    Level { moves_per_session: u32, base_seconds: u32, increment_seconds: u32 },
    St(u32),
    Sd(u32),
    MoveNow,
    Ping(u32),
    Unmake,
    Post,
    NoPost,
    Hard,
    Easy,
    Quit,
    Unknown(String),
}

fn parse_level(parts: &[&str]) -> Option<XBoardCommand> {
    let mps = parts.get(1)?.parse().ok()?;
    let base = parse_base_time(parts.get(2)?)?;
    let inc = parts.get(3)?.parse().ok()?;
    Some(XBoardCommand::Level { moves_per_session: mps, base_seconds: base, increment_seconds: inc })
}

/// `level`'s base time is minutes, or `mins:secs`.
fn parse_base_time(s: &str) -> Option<u32> {
    if let Some((mins, secs)) = s.split_once(':') {
        Some(mins.parse::<u32>().ok()? * 60 + secs.parse::<u32>().ok()?)
    } else {
        Some(s.parse::<u32>().ok()? * 60)
    }
}

fn parse_xboard_command(line: &str) -> Option<XBoardCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split_whitespace().collect();

    Some(match parts[0] {
        "xboard" => XBoardCommand::XBoard,
        "variant" => XBoardCommand::Variant(parts.get(1).map_or(String::new(), |s| (*s).to_string())),
        "protover" => XBoardCommand::Protover(parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(1)),
        "new" => XBoardCommand::New,
        "setboard" => XBoardCommand::SetBoard(parts[1..].join(" ")),
        "usermove" => XBoardCommand::UserMove(parts.get(1).map_or(String::new(), |s| (*s).to_string())),
        "go" => XBoardCommand::Go,
        "force" => XBoardCommand::Force,
        "time" => XBoardCommand::Time(parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(0)),
        "otim" => XBoardCommand::OTime(parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(0)),
        "level" => return parse_level(&parts),
        "st" => XBoardCommand::St(parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(0)),
        "sd" => XBoardCommand::Sd(parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(64)),
        "?" => XBoardCommand::MoveNow,
        "ping" => XBoardCommand::Ping(parts.get(1).and_then(|v| v.parse().ok()).unwrap_or(0)),
        "remove" | "undo" => XBoardCommand::Unmake,
        "post" => XBoardCommand::Post,
        "nopost" => XBoardCommand::NoPost,
        "hard" => XBoardCommand::Hard,
        "easy" => XBoardCommand::Easy,
        "quit" => XBoardCommand::Quit,
        // Accepted and silently ignored: not in the driven subset, but GUIs
        // send them unconditionally once `xboard`/`protover` negotiate.
        "accepted" | "rejected" | "random" | "computer" | "name" | "result" | "draw" => {
            XBoardCommand::Unknown(trimmed.to_string())
        }
        _ => {
            if is_likely_move(parts[0]) {
                XBoardCommand::UserMove(parts[0].to_string())
            } else {
                XBoardCommand::Unknown(trimmed.to_string())
            }
        }
    })
}

fn is_likely_move(s: &str) -> bool {
    match s.chars().next() {
        Some(c) => c.is_ascii_lowercase() || "NBRQKO".contains(c),
        None => false,
    }
}

fn format_features() -> String {
    [
        "feature myname=\"chess_engine\"",
        "feature setboard=1",
        "feature ping=1",
        "feature usermove=1",
        "feature time=1",
        "feature draw=0",
        "feature sigint=0",
        "feature sigterm=0",
        "feature reuse=1",
        "feature variants=\"normal,suicide,giveaway\"",
        "feature colors=0",
        "feature done=1",
    ]
    .join("\n")
}

fn format_pv_san(board: &Board, pv: &[Move]) -> String {
    let mut temp = board.clone();
    pv.iter()
        .map(|mv| {
            let san = temp.move_to_san(mv);
            temp.make_move(*mv);
            san
        })
        .collect::<Vec<_>>()
        .join(" ")
}

struct XBoardState {
    board: Board,
    search_state: SearchState,
    egtb: Egtb,
    force_mode: bool,
    engine_color: Option<Color>,
    post_thinking: bool,
    pondering_enabled: bool,
    max_depth: u32,
    time_per_move_cs: Option<u32>,
    engine_time_cs: u64,
    moves_to_go: Option<u32>,
    increment_cs: u32,
    history: Vec<(Move, UnmakeInfo)>,
    stop: Arc<AtomicBool>,
}

impl XBoardState {
    fn new() -> Self {
        XBoardState {
            board: Board::new(),
            search_state: SearchState::new(DEFAULT_TT_MB),
            egtb: Egtb::empty(),
            force_mode: false,
            engine_color: Some(Color::Black),
            post_thinking: false,
            pondering_enabled: false,
            max_depth: 64,
            time_per_move_cs: None,
            engine_time_cs: 0,
            moves_to_go: None,
            increment_cs: 0,
            history: Vec::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    fn should_think(&self) -> bool {
        !self.force_mode && self.engine_color == Some(self.board.side_to_move())
    }

    fn think_and_report(&mut self) {
        self.stop.store(false, Ordering::Relaxed);

        let time_centis = self.time_per_move_cs.map(u64::from).unwrap_or_else(|| {
            let alloc = search::TimeAllocation::compute(self.engine_time_cs * 10, u64::from(self.increment_cs) * 10, self.moves_to_go);
            alloc.soft_ms / 10
        });

        let board_for_pv = self.board.clone();
        let post = self.post_thinking;
        let params = DriverParams {
            max_depth: Some(self.max_depth),
            info_callback: if post {
                Some(Box::new(move |info: &IterationInfo| {
                    let pv = format_pv_san(&board_for_pv, &info.pv);
                    println!("{} {} {} {} {}", info.depth, info.score, info.elapsed_centis, info.nodes, pv);
                }))
            } else {
                None
            },
        };

        let result = search::search(&mut self.board, &mut self.search_state, Some(&self.egtb), time_centis.max(1), &self.stop, params);

        if let Some(mv) = result.best_move {
            println!("move {}", self.board.move_to_san(&mv));
            let info = self.board.make_move(mv);
            self.history.push((mv, info));
            announce_result(&mut self.board);
        }
    }

    fn handle(&mut self, cmd: &XBoardCommand) {
        match cmd {
            XBoardCommand::XBoard => {}
            XBoardCommand::Variant(name) => {
                let variant = name.as_str().parse_variant_or_standard();
                self.board = Board::new_with_variant(variant);
                self.history.clear();
            }
            XBoardCommand::Protover(v) => {
                if *v >= 2 {
                    println!("{}", format_features());
                }
            }
            XBoardCommand::New => {
                self.board = Board::new_with_variant(self.board.variant());
                self.force_mode = false;
                self.engine_color = Some(Color::Black);
                self.history.clear();
                self.search_state.new_search();
            }
            XBoardCommand::SetBoard(fen) => match Board::try_from_fen_with_variant(fen, self.board.variant()) {
                Ok(board) => {
                    self.board = board;
                    self.history.clear();
                }
                Err(e) => println!("Error ({e}): setboard {fen}"),
            },
            XBoardCommand::UserMove(mv_str) => {
                let parsed = self.board.parse_san(mv_str).or_else(|_| self.board.parse_move(mv_str));
                match parsed {
                    Ok(mv) => {
                        let info = self.board.make_move(mv);
                        self.history.push((mv, info));
                        announce_result(&mut self.board);
                    }
                    Err(_) => println!("Illegal move: {mv_str}"),
                }
            }
            XBoardCommand::Go => {
                self.force_mode = false;
                self.engine_color = Some(self.board.side_to_move());
            }
            XBoardCommand::Force => {
                self.force_mode = true;
                self.engine_color = None;
            }
            XBoardCommand::Time(cs) => self.engine_time_cs = *cs,
            XBoardCommand::OTime(_) => {}
            XBoardCommand::Level { moves_per_session, base_seconds, increment_seconds } => {
                self.moves_to_go = if *moves_per_session > 0 { Some(*moves_per_session) } else { None };
                self.engine_time_cs = u64::from(*base_seconds) * 100;
                self.increment_cs = increment_seconds * 100;
                self.time_per_move_cs = None;
            }
            XBoardCommand::St(secs) => self.time_per_move_cs = Some(secs * 100),
            XBoardCommand::Sd(depth) => self.max_depth = *depth,
            XBoardCommand::MoveNow => self.stop.store(true, Ordering::Relaxed),
            XBoardCommand::Ping(n) => println!("pong {n}"),
            XBoardCommand::Unmake => {
                if let Some((mv, info)) = self.history.pop() {
                    self.board.unmake_move(mv, info);
                }
            }
            XBoardCommand::Post => self.post_thinking = true,
            XBoardCommand::NoPost => self.post_thinking = false,
            XBoardCommand::Hard => self.pondering_enabled = true,
            XBoardCommand::Easy => self.pondering_enabled = false,
            XBoardCommand::Quit => {}
            XBoardCommand::Unknown(_) => {}
        }
    }
}

trait ParseVariant {
    fn parse_variant_or_standard(self) -> Variant;
}

impl ParseVariant for &str {
    fn parse_variant_or_standard(self) -> Variant {
        Variant::from_name(self).unwrap_or(Variant::Standard)
    }
}

/// Runs the XBoard protocol main loop over stdin/stdout.
pub fn run_xboard() {
    let stdin = io::stdin();
    run_xboard_on(stdin.lock().lines());
}

/// Drives the XBoard loop over an arbitrary line source, so the front-end
/// dialect can be detected from the first stdin line before dispatch
/// without losing it.
pub fn run_xboard_on(lines: impl Iterator<Item = io::Result<String>>) {
    let mut state = XBoardState::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in lines {
        let Ok(line) = line else { break };
        let Some(cmd) = parse_xboard_command(&line) else { continue };
        let is_quit = matches!(cmd, XBoardCommand::Quit);

        state.handle(&cmd);
        out.flush().ok();

        if is_quit {
            break;
        }
        if state.should_think() {
            state.think_and_report();
            out.flush().ok();
        }
    }
}
