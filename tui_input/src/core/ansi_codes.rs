// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Wire constants shared by the scanner and the parsers.

pub const ANSI_ESC: u8 = 0x1b;
pub const ANSI_ESC_CHAR: char = '\x1b';
pub const BEL_CHAR: char = '\x07';

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";
/// Single Shift 3, used by some terminals for arrows and F1..F4.
pub const SS3: &str = "\x1bO";
/// Operating System Command introducer.
pub const OSC: &str = "\x1b]";
/// Device Control String introducer.
pub const DCS: &str = "\x1bP";
/// Application Program Command introducer.
pub const APC: &str = "\x1b_";
/// String Terminator.
pub const ST: &str = "\x1b\\";
pub const BEL: &str = "\x07";

pub const PASTE_START: &str = "\x1b[200~";
pub const PASTE_END: &str = "\x1b[201~";

/// Prefix of an SGR mouse report.
pub const SGR_MOUSE_PREFIX: &str = "\x1b[<";
/// Prefix of a legacy X10 mouse report.
pub const X10_MOUSE_PREFIX: &str = "\x1b[M";
