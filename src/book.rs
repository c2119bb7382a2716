//! Opening book: a line-oriented SAN file of known-good lines, queried by
//! FEN. Peripheral to the engine's correctness surface — a missing or
//! unparsable book is simply an empty one, never a fatal error.
//!
//! The book file's grammar nests variations in parentheses, e.g.
//! `e4 e5 (c5 Nf3) Nf3`, read depth-first: every move played extends the
//! current line and is recorded against the FEN it was played from; a `(`
//! branches from the current position, a `)` rewinds to where that branch
//! started. A move suffixed with `^` is played (so later moves in the line
//! still reach the right position) but not recorded as a book move itself —
//! used for transpositional filler that shouldn't be offered as a choice.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;

use crate::board::{Board, Move, Variant};

/// Moves known for each FEN reached while reading the book file.
pub struct Book {
    entries: HashMap<String, Vec<Move>>,
}

impl Book {
    /// An empty book: every lookup misses. Used when no book file is
    /// configured or the file can't be read.
    #[must_use]
    pub fn empty() -> Self {
        Book { entries: HashMap::new() }
    }

    /// Loads a book file for `variant`. Any read or parse failure yields an
    /// empty book rather than propagating an error — the book is optional.
    #[must_use]
    pub fn load(path: impl AsRef<Path>, variant: Variant) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents, variant),
            Err(_) => Self::empty(),
        }
    }

    fn parse(contents: &str, variant: Variant) -> Self {
        let mut entries: HashMap<String, Vec<Move>> = HashMap::new();
        let mut board = Board::new_with_variant(variant);
        // Variation stack: `Branch` marks a `(` boundary, `Played` a move
        // and the `UnmakeInfo` needed to undo it when rewinding past it.
        enum Frame {
            Branch,
            Played(Move, crate::board::UnmakeInfo),
        }
        let mut stack: Vec<Frame> = Vec::new();

        let chars: Vec<char> = contents.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '(' => {
                    stack.push(Frame::Branch);
                    i += 1;
                }
                ')' => {
                    while let Some(Frame::Played(mv, info)) = stack.pop() {
                        board.unmake_move(mv, info);
                    }
                    i += 1;
                }
                c if c.is_alphanumeric() => {
                    let start = i;
                    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '-' || chars[i] == '=' || chars[i] == '+' || chars[i] == '#') {
                        i += 1;
                    }
                    let mut token: String = chars[start..i].iter().collect();
                    let hidden = token.ends_with('^');
                    if hidden {
                        token.pop();
                    }

                    let Ok(mv) = board.parse_san(&token) else { break };
                    if !hidden {
                        entries.entry(fen_key(&board)).or_default().push(mv);
                    }
                    let info = board.make_move(mv);
                    stack.push(Frame::Played(mv, info));
                }
                _ => i += 1,
            }
        }

        Book { entries }
    }

    /// Returns a uniformly random move from the book entries for `board`'s
    /// current position, or `None` if the book has nothing for it.
    #[must_use]
    pub fn lookup(&self, board: &Board, rng: &mut impl rand::Rng) -> Option<Move> {
        self.entries.get(&fen_key(board))?.choose(rng).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Placement/side-to-move/castling/en-passant only: the book keys on
/// reachable positions, not move-count bookkeeping.
fn fen_key(board: &Board) -> String {
    let full = board.to_fen();
    full.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_book_has_no_moves() {
        let book = Book::empty();
        let board = Board::new();
        let mut rng = rand::thread_rng();
        assert!(book.lookup(&board, &mut rng).is_none());
    }

    #[test]
    fn simple_line_is_recorded() {
        let book = Book::parse("e4 e5 Nf3", Variant::Standard);
        assert!(!book.is_empty());
        let board = Board::new();
        let mut rng = rand::thread_rng();
        assert!(book.lookup(&board, &mut rng).is_some());
    }

    #[test]
    fn variation_branches_and_rewinds() {
        let book = Book::parse("e4 e5 (c5 Nf3) Nf3", Variant::Standard);
        let mut after_e4 = Board::new();
        after_e4.make_move(after_e4.parse_san("e4").unwrap());
        let mut rng = rand::thread_rng();
        // Both e5 and c5 should be recorded as replies to 1. e4.
        let mut saw = std::collections::HashSet::new();
        for _ in 0..20 {
            if let Some(mv) = book.lookup(&after_e4, &mut rng) {
                saw.insert(mv);
            }
        }
        assert_eq!(saw.len(), 2);
    }
}
