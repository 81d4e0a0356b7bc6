//! KoggeChess - Bitboard Module
//!
//! This module provides bitboard utilities for set-wise move generation.
//! A bitboard is a 64-bit integer where each bit represents a square on the board
//! (little-endian rank-file mapping: bit 0 = a1, bit 63 = h8).
//!
//! Compass rose of shift amounts:
//!
//! ```text
//!   noWe         nort         noEa
//!           +7    +8    +9
//!               \  |  /
//!   west    -1 <-  0 -> +1    east
//!               /  |  \
//!           -9    -8    -7
//!   soWe         sout         soEa
//! ```

// ============================================================================
// CONSTANTS - Files and Ranks
// ============================================================================

pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_H: u64 = 0x8080808080808080;

pub const RANK_1: u64 = 0x00000000000000FF;
pub const RANK_3: u64 = 0x0000000000FF0000;
pub const RANK_6: u64 = 0x0000FF0000000000;
pub const RANK_8: u64 = 0xFF00000000000000;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;

// ============================================================================
// ONE-STEP SHIFTS
// ============================================================================

/// Shift a bitboard north (up) by one rank
#[inline]
pub const fn shift_north(bb: u64) -> u64 {
    bb << 8
}

/// Shift a bitboard south (down) by one rank
#[inline]
pub const fn shift_south(bb: u64) -> u64 {
    bb >> 8
}

/// Shift a bitboard east (right) by one file
#[inline]
pub const fn shift_east(bb: u64) -> u64 {
    (bb << 1) & NOT_FILE_A
}

/// Shift a bitboard west (left) by one file
#[inline]
pub const fn shift_west(bb: u64) -> u64 {
    (bb >> 1) & NOT_FILE_H
}

#[inline]
pub const fn shift_north_east(bb: u64) -> u64 {
    (bb << 9) & NOT_FILE_A
}

#[inline]
pub const fn shift_north_west(bb: u64) -> u64 {
    (bb << 7) & NOT_FILE_H
}

#[inline]
pub const fn shift_south_east(bb: u64) -> u64 {
    (bb >> 7) & NOT_FILE_A
}

#[inline]
pub const fn shift_south_west(bb: u64) -> u64 {
    (bb >> 9) & NOT_FILE_H
}

// ============================================================================
// KOGGE-STONE OCCLUDED FILLS
// ============================================================================
//
// Each fill floods `generator` along one direction through the `propagator`
// set (empty squares), doubling the step three times. The result holds the
// generator squares plus every empty square reached before the first blocker.
// The blocker itself is picked up by one further shift of the fill.

#[inline]
pub const fn north_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    generator |= propagator & (generator << 8);
    propagator &= propagator << 8;
    generator |= propagator & (generator << 16);
    propagator &= propagator << 16;
    generator |= propagator & (generator << 32);
    generator
}

#[inline]
pub const fn south_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    generator |= propagator & (generator >> 8);
    propagator &= propagator >> 8;
    generator |= propagator & (generator >> 16);
    propagator &= propagator >> 16;
    generator |= propagator & (generator >> 32);
    generator
}

#[inline]
pub const fn east_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    propagator &= NOT_FILE_A;
    generator |= propagator & (generator << 1);
    propagator &= propagator << 1;
    generator |= propagator & (generator << 2);
    propagator &= propagator << 2;
    generator |= propagator & (generator << 4);
    generator
}

#[inline]
pub const fn west_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    propagator &= NOT_FILE_H;
    generator |= propagator & (generator >> 1);
    propagator &= propagator >> 1;
    generator |= propagator & (generator >> 2);
    propagator &= propagator >> 2;
    generator |= propagator & (generator >> 4);
    generator
}

#[inline]
pub const fn north_east_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    propagator &= NOT_FILE_A;
    generator |= propagator & (generator << 9);
    propagator &= propagator << 9;
    generator |= propagator & (generator << 18);
    propagator &= propagator << 18;
    generator |= propagator & (generator << 36);
    generator
}

#[inline]
pub const fn north_west_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    propagator &= NOT_FILE_H;
    generator |= propagator & (generator << 7);
    propagator &= propagator << 7;
    generator |= propagator & (generator << 14);
    propagator &= propagator << 14;
    generator |= propagator & (generator << 28);
    generator
}

#[inline]
pub const fn south_east_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    propagator &= NOT_FILE_A;
    generator |= propagator & (generator >> 7);
    propagator &= propagator >> 7;
    generator |= propagator & (generator >> 14);
    propagator &= propagator >> 14;
    generator |= propagator & (generator >> 28);
    generator
}

#[inline]
pub const fn south_west_occluded(mut generator: u64, mut propagator: u64) -> u64 {
    propagator &= NOT_FILE_H;
    generator |= propagator & (generator >> 9);
    propagator &= propagator >> 9;
    generator |= propagator & (generator >> 18);
    propagator &= propagator >> 18;
    generator |= propagator & (generator >> 36);
    generator
}

// ============================================================================
// BITBOARD UTILITIES
// ============================================================================

/// Extract and clear the least significant bit, returning its index
#[inline]
pub fn pop_lsb(bb: &mut u64) -> usize {
    let idx = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    idx
}

/// Count the number of set bits in a bitboard
#[inline]
pub fn popcount(bb: u64) -> u32 {
    bb.count_ones()
}

/// Get the index of the least significant bit
#[inline]
pub fn lsb(bb: u64) -> usize {
    bb.trailing_zeros() as usize
}

/// Create a bitboard with a single bit set at the given square
#[inline]
pub const fn square_bb(sq: usize) -> u64 {
    1u64 << sq
}

// ============================================================================
// DEBUG / DISPLAY
// ============================================================================

/// Render a bitboard as an 8x8 grid, rank 8 on top
pub fn bitboard_to_string(bb: u64) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        out.push_str(&format!("{}  ", rank + 1));
        for file in 0..8 {
            let sq = rank * 8 + file;
            out.push_str(if bb & square_bb(sq) != 0 { "1 " } else { ". " });
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out.push_str(&format!("   Bitboard: 0x{:016X}", bb));
    out
}

/// Print a bitboard in a human-readable format
pub fn print_bitboard(bb: u64) {
    println!();
    println!("{}", bitboard_to_string(bb));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_shifts_from_c2() {
        let c2 = 0x400;
        assert_eq!(shift_north(c2), 0x40000);
        assert_eq!(shift_north_east(c2), 0x80000);
        assert_eq!(shift_east(c2), 0x800);
        assert_eq!(shift_south_east(c2), 0x08);
        assert_eq!(shift_south(c2), 0x04);
        assert_eq!(shift_south_west(c2), 0x02);
        assert_eq!(shift_west(c2), 0x200);
        assert_eq!(shift_north_west(c2), 0x20000);
    }

    #[test]
    fn horizontal_shifts_do_not_wrap() {
        let h1 = square_bb(7);
        let a2 = square_bb(8);
        assert_eq!(shift_east(h1), 0);
        assert_eq!(shift_north_east(h1), 0);
        assert_eq!(shift_west(a2), 0);
        assert_eq!(shift_south_west(a2), 0);
        assert_eq!(shift_north_west(a2), 0);
    }

    #[test]
    fn occluded_fill_on_empty_board_covers_the_ray() {
        let a1 = square_bb(0);
        assert_eq!(north_occluded(a1, !a1), FILE_A);
        assert_eq!(east_occluded(a1, !a1), RANK_1);
        assert_eq!(north_east_occluded(a1, !a1), 0x8040201008040201);
        assert_eq!(west_occluded(a1, !a1), a1);
    }

    #[test]
    fn occluded_fill_stops_before_blocker() {
        // Rook on a1, blocker on a4
        let a1 = square_bb(0);
        let empty = !(a1 | square_bb(24));
        let fill = north_occluded(a1, empty);
        assert_eq!(fill, a1 | square_bb(8) | square_bb(16));
        // One more step reaches the blocker
        assert_eq!(shift_north(fill) & square_bb(24), square_bb(24));
    }

    #[test]
    fn east_fill_does_not_wrap_from_h_file() {
        let h1 = square_bb(7);
        assert_eq!(east_occluded(h1, !h1), h1);
        assert_eq!(shift_east(east_occluded(h1, !h1)), 0);
    }

    #[test]
    fn lsb_helpers() {
        let mut bb = 0b1010_0000u64;
        assert_eq!(lsb(bb), 5);
        assert_eq!(popcount(bb), 2);
        assert_eq!(pop_lsb(&mut bb), 5);
        assert_eq!(pop_lsb(&mut bb), 7);
        assert_eq!(bb, 0);
    }

    #[test]
    fn bitboard_string_marks_set_squares() {
        let text = bitboard_to_string(square_bb(63));
        assert!(text.starts_with("8  . . . . . . . 1"));
        assert!(text.ends_with("0x8000000000000000"));
    }
}
