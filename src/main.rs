//! Binary entry point: detects which line protocol the GUI speaks from the
//! first stdin line and hands the rest of the stream to that front end.
//!
//! XBoard GUIs open with a bare `xboard` line (then `protover N`); UCI GUIs
//! open with `uci`. Anything else is treated as UCI, since a GUI that skips
//! the handshake and goes straight to `position`/`go` is still speaking UCI.

use std::io::{self, BufRead};

use chess_engine::{uci, xboard};

fn main() {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let Some(Ok(first)) = lines.next() else { return };

    if first.trim() == "xboard" {
        xboard::run_xboard_on(std::iter::once(Ok(first)).chain(lines));
    } else {
        uci::run_uci_on(std::iter::once(Ok(first)).chain(lines));
    }
}
