// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Query strings. Every query ends with BEL, which all terminals that answer at all
//! accept. Replies may end with either BEL or ST.

use crate::{BEL, OSC};
use std::ops::RangeInclusive;

/// OSC codes of the special (dynamic) colors.
pub const SPECIAL_COLOR_CODES: RangeInclusive<u8> = 10..=19;

/// `ESC ] 4 ; <index> ; ? BEL`
#[must_use]
pub fn palette_query(index: u8) -> String { format!("{OSC}4;{index};?{BEL}") }

/// `ESC ] <code> ; ? BEL`
#[must_use]
pub fn special_query(code: u8) -> String { format!("{OSC}{code};?{BEL}") }

/// Queries for palette slots `0..size`, concatenated so they go out in one write.
#[must_use]
pub fn palette_queries(size: usize) -> String {
    (0..=u8::MAX).take(size).map(palette_query).collect()
}

/// Queries for every code in [`SPECIAL_COLOR_CODES`], concatenated.
#[must_use]
pub fn special_queries() -> String { SPECIAL_COLOR_CODES.map(special_query).collect() }

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_queries() {
        assert_eq!(palette_query(0), "\x1b]4;0;?\x07");
        assert_eq!(palette_query(255), "\x1b]4;255;?\x07");
        assert_eq!(special_query(11), "\x1b]11;?\x07");
    }

    #[test]
    fn test_batches() {
        assert_eq!(palette_queries(2), "\x1b]4;0;?\x07\x1b]4;1;?\x07");
        assert_eq!(palette_queries(0), "");
        assert_eq!(palette_queries(1000).matches("\x1b]4;").count(), 256);
        assert_eq!(special_queries().matches('\x07').count(), 10);
        assert!(special_queries().starts_with("\x1b]10;?\x07"));
    }
}
