//! Perft reference counts for the standard test positions.

use sable_core::{Board, perft};

fn check(fen: &str, expected: &[u64]) {
    let board: Board = fen.parse().unwrap();
    for (depth, &nodes) in expected.iter().enumerate() {
        assert_eq!(perft(&board, depth + 1), nodes, "{fen} at depth {}", depth + 1);
    }
}

#[test]
fn startpos() {
    check(sable_core::STARTING_FEN, &[20, 400, 8_902, 197_281]);
}

#[test]
fn kiwipete() {
    check(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2_039, 97_862],
    );
}

#[test]
fn rook_endgame() {
    check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2_812, 43_238]);
}

#[test]
fn promotions_and_checks() {
    check(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        &[6, 264, 9_467],
    );
}

#[test]
fn discovered_checks() {
    check("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", &[44, 1_486, 62_379]);
}

#[test]
#[ignore] // slow
fn kiwipete_deep() {
    check(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &[48, 2_039, 97_862, 4_085_603],
    );
}
