//! Piece-square tables.
//!
//! Tables are laid out as a board diagram from White's side: the first row
//! is rank 8, the last row rank 1. A white piece on square `sq` reads entry
//! `sq ^ 56`; a black piece reads entry `sq`, which mirrors the board
//! vertically.

use sable_core::{Color, PieceKind, Square};

use crate::eval::score::{S, Score};

#[rustfmt::skip]
const PAWN: [Score; 64] = [
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
    S( 85,150), S( 90,150), S( 90,145), S( 95,140), S( 95,140), S( 90,145), S( 90,150), S( 85,150),
    S( 15, 75), S( 20, 75), S( 25, 65), S( 35, 55), S( 35, 55), S( 25, 65), S( 20, 75), S( 15, 75),
    S(  0, 35), S(  5, 30), S( 10, 25), S( 25, 20), S( 25, 20), S( 10, 25), S(  5, 30), S(  0, 35),
    S( -5, 15), S(  0, 12), S(  5, 10), S( 20,  8), S( 20,  8), S(  5, 10), S(  0, 12), S( -5, 15),
    S( -5,  5), S( -5,  5), S( -5,  0), S(  5,  0), S(  5,  0), S( -5,  0), S( -5,  5), S( -5,  5),
    S( -5,  5), S(  5,  5), S(  5,  0), S(-15,  0), S(-15,  0), S(  5,  0), S(  5,  5), S( -5,  5),
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
];

#[rustfmt::skip]
const KNIGHT: [Score; 64] = [
    S(-60,-45), S(-35,-30), S(-25,-20), S(-20,-15), S(-20,-15), S(-25,-20), S(-35,-30), S(-60,-45),
    S(-30,-25), S(-10,-10), S( 10,  0), S( 15,  5), S( 15,  5), S( 10,  0), S(-10,-10), S(-30,-25),
    S(-20,-20), S( 10,  0), S( 20, 10), S( 25, 15), S( 25, 15), S( 20, 10), S( 10,  0), S(-20,-20),
    S(-15,-15), S(  5,  5), S( 20, 15), S( 30, 20), S( 30, 20), S( 20, 15), S(  5,  5), S(-15,-15),
    S(-15,-15), S(  0,  5), S( 15, 15), S( 20, 20), S( 20, 20), S( 15, 15), S(  0,  5), S(-15,-15),
    S(-25,-20), S(  0,  0), S( 10,  5), S( 10, 10), S( 10, 10), S( 10,  5), S(  0,  0), S(-25,-20),
    S(-35,-30), S(-15,-15), S( -5, -5), S(  5,  0), S(  5,  0), S( -5, -5), S(-15,-15), S(-35,-30),
    S(-55,-45), S(-25,-30), S(-25,-20), S(-20,-15), S(-20,-15), S(-25,-20), S(-25,-30), S(-55,-45),
];

#[rustfmt::skip]
const BISHOP: [Score; 64] = [
    S(-20,-15), S(-10,-10), S(-10, -5), S(-10, -5), S(-10, -5), S(-10, -5), S(-10,-10), S(-20,-15),
    S(-10,-10), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(-10,-10),
    S( -5, -5), S(  5,  0), S( 10,  5), S( 10,  5), S( 10,  5), S( 10,  5), S(  5,  0), S( -5, -5),
    S( -5, -5), S( 10,  0), S( 10,  5), S( 15, 10), S( 15, 10), S( 10,  5), S( 10,  0), S( -5, -5),
    S( -5, -5), S(  5,  0), S( 15,  5), S( 15, 10), S( 15, 10), S( 15,  5), S(  5,  0), S( -5, -5),
    S( -5, -5), S( 10,  0), S( 10,  5), S( 10,  5), S( 10,  5), S( 10,  5), S( 10,  0), S( -5, -5),
    S( -5,-10), S( 15, -5), S(  5,  0), S(  5,  0), S(  5,  0), S(  5,  0), S( 15, -5), S( -5,-10),
    S(-20,-15), S(-10,-10), S(-15,-10), S(-10, -5), S(-10, -5), S(-15,-10), S(-10,-10), S(-20,-15),
];

#[rustfmt::skip]
const ROOK: [Score; 64] = [
    S(  5, 10), S( 10, 10), S( 10, 10), S( 15, 10), S( 15, 10), S( 10, 10), S( 10, 10), S(  5, 10),
    S( 15, 15), S( 20, 15), S( 20, 15), S( 25, 15), S( 25, 15), S( 20, 15), S( 20, 15), S( 15, 15),
    S( -5,  5), S(  0,  5), S(  5,  5), S(  5,  5), S(  5,  5), S(  5,  5), S(  0,  5), S( -5,  5),
    S(-10,  0), S(  0,  0), S(  0,  0), S(  5,  0), S(  5,  0), S(  0,  0), S(  0,  0), S(-10,  0),
    S(-10,  0), S(  0,  0), S(  0,  0), S(  5,  0), S(  5,  0), S(  0,  0), S(  0,  0), S(-10,  0),
    S(-10, -5), S(  0, -5), S(  0, -5), S(  5, -5), S(  5, -5), S(  0, -5), S(  0, -5), S(-10, -5),
    S(-15, -5), S( -5, -5), S(  0, -5), S(  5, -5), S(  5, -5), S(  0, -5), S( -5, -5), S(-15, -5),
    S( -5,-10), S( -5, -5), S(  5, -5), S( 10, -5), S( 10, -5), S(  5, -5), S( -5, -5), S( -5,-10),
];

#[rustfmt::skip]
const QUEEN: [Score; 64] = [
    S(-20,-15), S(-10,-10), S(-10, -5), S( -5,  0), S( -5,  0), S(-10, -5), S(-10,-10), S(-20,-15),
    S(-10,-10), S(-15,  0), S( -5,  5), S(  0, 10), S(  0, 10), S( -5,  5), S(-15,  0), S(-10,-10),
    S(-10, -5), S( -5,  5), S(  5, 10), S(  5, 15), S(  5, 15), S(  5, 10), S( -5,  5), S(-10, -5),
    S( -5,  0), S( -5, 10), S(  5, 15), S(  5, 20), S(  5, 20), S(  5, 15), S( -5, 10), S( -5,  0),
    S( -5,  0), S(  0, 10), S(  5, 15), S(  5, 20), S(  5, 20), S(  5, 15), S(  0, 10), S( -5,  0),
    S(-10, -5), S(  5,  5), S(  5, 10), S(  5, 10), S(  5, 10), S(  5, 10), S(  5,  5), S(-10, -5),
    S(-10,-10), S(  0, -5), S(  5,  0), S(  5,  0), S(  5,  0), S(  5,  0), S(  0, -5), S(-10,-10),
    S(-20,-15), S(-10,-10), S(-10,-10), S(  0, -5), S(  0, -5), S(-10,-10), S(-10,-10), S(-20,-15),
];

#[rustfmt::skip]
const KING: [Score; 64] = [
    S(-60,-70), S(-60,-40), S(-60,-30), S(-70,-25), S(-70,-25), S(-60,-30), S(-60,-40), S(-60,-70),
    S(-55,-30), S(-55,-10), S(-60,  0), S(-65,  5), S(-65,  5), S(-60,  0), S(-55,-10), S(-55,-30),
    S(-50,-25), S(-50,  0), S(-55, 15), S(-60, 25), S(-60, 25), S(-55, 15), S(-50,  0), S(-50,-25),
    S(-45,-25), S(-45,  0), S(-50, 20), S(-55, 30), S(-55, 30), S(-50, 20), S(-45,  0), S(-45,-25),
    S(-35,-30), S(-40, -5), S(-40, 15), S(-50, 25), S(-50, 25), S(-40, 15), S(-40, -5), S(-35,-30),
    S(-20,-30), S(-25,-10), S(-25,  5), S(-30, 10), S(-30, 10), S(-25,  5), S(-25,-10), S(-20,-30),
    S( 15,-35), S( 15,-20), S( -5,-10), S(-15, -5), S(-15, -5), S( -5,-10), S( 15,-20), S( 15,-35),
    S( 20,-55), S( 35,-35), S( 10,-30), S(-10,-30), S(  0,-30), S(-10,-30), S( 40,-35), S( 20,-55),
];

const TABLES: [&[Score; 64]; PieceKind::COUNT] = [&PAWN, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING];

/// Positional value of `kind` of `color` standing on `sq`, from that color's side.
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> Score {
    let index = match color {
        Color::White => sq.flip().index(),
        Color::Black => sq.index(),
    };
    TABLES[kind.index()][index]
}
