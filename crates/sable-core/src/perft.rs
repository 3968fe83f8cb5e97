//! Perft (performance test) for move generation correctness verification.

use crate::board::Board;
use crate::movegen::generate_legal_moves;

/// Count the leaf nodes of the legal move tree at the given depth.
///
/// Depth 0 returns 1. The last ply is bulk-counted from the move list.
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .as_slice()
        .iter()
        .map(|&mv| perft(&board.make_move(mv), depth - 1))
        .sum()
}

/// Per-move perft breakdown as `(uci_move, node_count)`, sorted by move text.
pub fn divide(board: &Board, depth: usize) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = generate_legal_moves(board)
        .as_slice()
        .iter()
        .map(|&mv| (mv.to_uci(), perft(&board.make_move(mv), depth.saturating_sub(1))))
        .collect();
    results.sort();
    results
}
