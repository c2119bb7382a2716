//! Proof-number search for the giveaway variants (antichess, suicide).
//!
//! Best-first search over a tree of proof/disproof numbers: the root is the
//! current position from the side-to-move's view, a proof of 0 means the
//! root is won, a disproof of 0 means it is lost. Nodes live in a flat arena
//! indexed by `usize` rather than a pointer tree, which keeps the borrow
//! checker out of the way during move/unmove while walking the tree. A
//! single `path` stack of `UnmakeInfo` tracks the moves played between the
//! root and whichever node is currently being visited, since `make_move`'s
//! returned `UnmakeInfo` can't be reconstructed after the fact.

use std::time::{Duration, Instant};

use crate::board::{Board, Move, UnmakeInfo, EMPTY_MOVE};
use crate::egtb::Egtb;
use crate::eval::{self, TerminalResult};

const INF: u32 = u32::MAX;

struct PnsNode {
    proof: u32,
    disproof: u32,
    mv: Move,
    parent: Option<usize>,
    children: Vec<usize>,
    tree_size: u32,
}

impl PnsNode {
    fn root() -> Self {
        PnsNode {
            proof: 1,
            disproof: 1,
            mv: EMPTY_MOVE,
            parent: None,
            children: Vec::new(),
            tree_size: 1,
        }
    }
}

/// Knobs for a single proof-number search run.
pub struct PnsParams {
    pub max_nodes: u32,
    pub quiet: bool,
}

impl Default for PnsParams {
    fn default() -> Self {
        PnsParams {
            max_nodes: 10_000_000,
            quiet: true,
        }
    }
}

/// Verdict the search reached for the root, from the side-to-move's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PnsVerdict {
    Win,
    Loss,
    Draw,
    Unknown,
}

/// A root move annotated with the subtree the search spent on it.
pub struct MoveStat {
    pub mv: Move,
    pub score: f64,
    pub tree_size: u32,
    pub verdict: PnsVerdict,
}

pub struct PnsResult {
    pub verdict: PnsVerdict,
    pub tree_size: u32,
    /// Root moves sorted by `disproof / proof` ascending (best first).
    pub ordered_moves: Vec<MoveStat>,
}

/// Run proof-number search on `board` until the root is proved, disproved,
/// the node budget is exhausted, or `deadline` passes. `board` is returned
/// to its original position before this function returns.
pub fn search(board: &mut Board, egtb: Option<&Egtb>, params: &PnsParams, deadline: Instant) -> PnsResult {
    let mut arena: Vec<PnsNode> = vec![PnsNode::root()];
    let mut path: Vec<UnmakeInfo> = Vec::new();
    let mut num_nodes: u32 = 0;
    let mut cur = 0usize;

    while arena[0].proof != 0 && arena[0].disproof != 0 && num_nodes < params.max_nodes && Instant::now() < deadline {
        let mpn = find_mpn(&arena, board, &mut path);
        let added = expand(&mut arena, board, egtb, mpn, path.len());
        num_nodes += added;
        cur = update_ancestors(&mut arena, board, &mut path, mpn, params);
    }

    while cur != 0 {
        let info = path.pop().expect("path shorter than tree depth");
        board.unmake_move(arena[cur].mv, info);
        cur = arena[cur].parent.unwrap();
        update_tree_size(&mut arena, cur);
    }
    debug_assert!(path.is_empty());

    let root_verdict = root_verdict(&arena, 0);
    let mut ordered_moves: Vec<MoveStat> = arena[0]
        .children
        .iter()
        .map(|&idx| {
            let node = &arena[idx];
            let (score, verdict) = if node.proof == 0 {
                (f64::MAX, PnsVerdict::Loss)
            } else {
                let score = node.disproof as f64 / node.proof as f64;
                let verdict = if node.proof == INF && node.disproof == 0 {
                    PnsVerdict::Win
                } else if node.proof == INF && node.disproof == INF {
                    PnsVerdict::Draw
                } else {
                    PnsVerdict::Unknown
                };
                (score, verdict)
            };
            MoveStat {
                mv: node.mv,
                score,
                tree_size: node.tree_size,
                verdict,
            }
        })
        .collect();
    ordered_moves.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap());

    PnsResult {
        verdict: root_verdict,
        tree_size: arena[0].tree_size,
        ordered_moves,
    }
}

/// Root-relative verdict: a root proof of 0 means this side wins, a
/// disproof of 0 means it loses, both infinite means a forced draw.
fn root_verdict(arena: &[PnsNode], root: usize) -> PnsVerdict {
    let node = &arena[root];
    if node.proof == 0 {
        PnsVerdict::Win
    } else if node.disproof == 0 {
        PnsVerdict::Loss
    } else if node.proof == INF && node.disproof == INF {
        PnsVerdict::Draw
    } else {
        PnsVerdict::Unknown
    }
}

/// Descend from the root to the most-proving node: pick the child whose
/// disproof equals the parent's proof (closing it reduces the parent's
/// proof), or, if the parent's proof is already infinite, any child with a
/// nonzero proof so the search keeps making progress instead of getting
/// stuck on an already-settled leaf. Pushes the `UnmakeInfo` for every move
/// played onto `path`.
fn find_mpn(arena: &[PnsNode], board: &mut Board, path: &mut Vec<UnmakeInfo>) -> usize {
    let mut mpn = 0usize;
    while !arena[mpn].children.is_empty() {
        let parent_proof = arena[mpn].proof;
        let mut next = None;
        for &child in &arena[mpn].children {
            if parent_proof == INF {
                if arena[child].proof != 0 {
                    next = Some(child);
                    break;
                }
            } else if arena[child].disproof == parent_proof {
                next = Some(child);
                break;
            }
        }
        let next = next.expect("internal node has no eligible child");
        path.push(board.make_move(arena[next].mv));
        mpn = next;
    }
    mpn
}

/// Expand `node` into children for every legal move, scoring terminal
/// children immediately (by rule or EGTB) and giving the rest initial
/// proof=1, disproof=legal-move-count. Returns the number of children added.
fn expand(arena: &mut Vec<PnsNode>, board: &mut Board, egtb: Option<&Egtb>, node: usize, depth: usize) -> u32 {
    if is_redundant(arena, node) || depth >= 600 {
        arena[node].proof = INF;
        arena[node].disproof = INF;
        return 0;
    }

    let moves = board.generate_variant_moves();
    for mv in moves.iter() {
        let info = board.make_move(*mv);
        let (proof, disproof) = score_child(board, egtb);
        board.unmake_move(*mv, info);

        let child_idx = arena.len();
        arena.push(PnsNode {
            proof,
            disproof,
            mv: *mv,
            parent: Some(node),
            children: Vec::new(),
            tree_size: 1,
        });
        arena[node].children.push(child_idx);
    }
    arena[node].tree_size = 1 + arena[node].children.len() as u32;
    arena[node].children.len() as u32
}

/// `proof`/`disproof` for a position reached after playing a candidate move,
/// from that child's own side-to-move perspective.
fn score_child(board: &mut Board, egtb: Option<&Egtb>) -> (u32, u32) {
    let mut result = eval::terminal_result(board);
    if result == TerminalResult::Unknown {
        if let Some(egtb) = egtb {
            if board.piece_count(crate::board::Color::White) == 1
                && board.piece_count(crate::board::Color::Black) == 1
            {
                if let Some(entry) = egtb.probe(board) {
                    result = match entry.outcome {
                        crate::egtb::EgtbOutcome::Win => TerminalResult::Win,
                        crate::egtb::EgtbOutcome::Loss => TerminalResult::Loss,
                        crate::egtb::EgtbOutcome::Draw => TerminalResult::Draw,
                    };
                }
            }
        }
    }
    match result {
        TerminalResult::Draw => (INF, INF),
        TerminalResult::Loss => (INF, 0),
        TerminalResult::Win => (0, INF),
        TerminalResult::Unknown => (1, board.generate_variant_moves().len() as u32),
    }
}

/// If the last four moves on the path form an immediately reversible 2-ply
/// cycle (move 1 undoes move 3, move 2 undoes move 4), the position repeats
/// without progress; mark it settled rather than let the search loop on it.
fn is_redundant(arena: &[PnsNode], node: usize) -> bool {
    let p1 = node;
    let Some(p2) = arena[p1].parent else { return false };
    let Some(p3) = arena[p2].parent else { return false };
    let Some(p4) = arena[p3].parent else { return false };
    let m1 = arena[p1].mv;
    let m2 = arena[p2].mv;
    let m3 = arena[p3].mv;
    let m4 = arena[p4].mv;
    m1.from() == m3.to() && m1.to() == m3.from() && m2.from() == m4.to() && m2.to() == m4.from()
}

/// Recompute proof/disproof walking up from `mpn` to the root, stopping
/// early once a node's numbers stop changing. Returns the node where the
/// walk stopped, so the caller can resume descending from there next round.
/// Pops `path` as it unmakes moves on the way up.
fn update_ancestors(
    arena: &mut Vec<PnsNode>,
    board: &mut Board,
    path: &mut Vec<UnmakeInfo>,
    mpn: usize,
    _params: &PnsParams,
) -> usize {
    let mut node = mpn;
    loop {
        if !arena[node].children.is_empty() {
            let mut proof = INF;
            let mut disproof = 0u32;
            let mut tree_size = 1u32;
            for &child in &arena[node].children {
                proof = proof.min(arena[child].disproof);
                disproof = if arena[child].proof == INF || disproof == INF {
                    INF
                } else {
                    disproof.saturating_add(arena[child].proof)
                };
                tree_size += arena[child].tree_size;
            }
            arena[node].tree_size = tree_size;
            if arena[node].proof == proof && arena[node].disproof == disproof {
                return node;
            }
            arena[node].proof = proof;
            arena[node].disproof = disproof;
        }
        match arena[node].parent {
            None => return node,
            Some(parent) => {
                let info = path.pop().expect("path shorter than tree depth");
                board.unmake_move(arena[node].mv, info);
                node = parent;
            }
        }
    }
}

fn update_tree_size(arena: &mut [PnsNode], node: usize) {
    if !arena[node].children.is_empty() {
        let mut tree_size = 1u32;
        for &child in &arena[node].children {
            tree_size += arena[child].tree_size;
        }
        arena[node].tree_size = tree_size;
    }
}

/// Run PNS with a timer of `budget`, returning a pruned root move order for
/// the main search driver per the win/loss/otherwise rule: a proven win is
/// returned alone, a proven loss is left unpruned (let PVS fight it out),
/// anything else yields every non-losing move in best-first order.
pub fn driver_search(board: &mut Board, egtb: Option<&Egtb>, budget: Duration) -> Option<Vec<Move>> {
    let params = PnsParams::default();
    let deadline = Instant::now() + budget;
    let result = search(board, egtb, &params, deadline);

    match result.verdict {
        PnsVerdict::Win => result.ordered_moves.first().map(|m| vec![m.mv]),
        PnsVerdict::Loss => None,
        _ => {
            let pruned: Vec<Move> = result
                .ordered_moves
                .iter()
                .filter(|m| m.verdict != PnsVerdict::Loss)
                .map(|m| m.mv)
                .collect();
            if pruned.is_empty() {
                None
            } else {
                Some(pruned)
            }
        }
    }
}
