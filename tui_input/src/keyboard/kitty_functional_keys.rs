// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Names for the Kitty keyboard protocol's private use area key codes. More info:
//! <https://sw.kovidgoyal.net/kitty/keyboard-protocol/#functional-key-definitions>

/// First code point of the functional key block (`CAPS_LOCK`).
pub const KITTY_FUNCTIONAL_KEY_FIRST: u32 = 57358;

/// Last code point of the functional key block (`ISO_LEVEL5_SHIFT`).
pub const KITTY_FUNCTIONAL_KEY_LAST: u32 = 57454;

const F13: u32 = 57376;
const F35: u32 = 57398;

const KEYPAD_AND_MEDIA: [&str; 56] = [
    // 57399..=57427
    "kp_0", "kp_1", "kp_2", "kp_3", "kp_4", "kp_5", "kp_6", "kp_7", "kp_8", "kp_9",
    "kp_decimal", "kp_divide", "kp_multiply", "kp_subtract", "kp_add", "kp_enter",
    "kp_equal", "kp_separator", "kp_left", "kp_right", "kp_up", "kp_down",
    "kp_pageup", "kp_pagedown", "kp_home", "kp_end", "kp_insert", "kp_delete",
    "kp_begin",
    // 57428..=57440
    "media_play", "media_pause", "media_play_pause", "media_reverse", "media_stop",
    "media_fast_forward", "media_rewind", "media_track_next", "media_track_previous",
    "media_record", "volume_down", "volume_up", "volume_mute",
    // 57441..=57454
    "left_shift", "left_ctrl", "left_alt", "left_super", "left_hyper", "left_meta",
    "right_shift", "right_ctrl", "right_alt", "right_super", "right_hyper",
    "right_meta", "iso_level3_shift", "iso_level5_shift",
];

const KEYPAD_AND_MEDIA_FIRST: u32 = 57399;

/// Name of a Kitty functional key code point, or [`None`] if `code` is not one.
#[must_use]
pub fn kitty_functional_key_name(code: u32) -> Option<String> {
    let it = match code {
        57358 => "caps_lock".to_string(),
        57359 => "scroll_lock".to_string(),
        57360 => "num_lock".to_string(),
        57361 => "print_screen".to_string(),
        57362 => "pause".to_string(),
        57363 => "menu".to_string(),
        F13..=F35 => format!("f{}", code - F13 + 13),
        KEYPAD_AND_MEDIA_FIRST..=KITTY_FUNCTIONAL_KEY_LAST => {
            KEYPAD_AND_MEDIA[(code - KEYPAD_AND_MEDIA_FIRST) as usize].to_string()
        }
        _ => return None,
    };
    Some(it)
}

/// Whether `code` is in the private use block that Kitty reserves for functional keys.
#[must_use]
pub fn is_kitty_functional_key(code: u32) -> bool {
    (KITTY_FUNCTIONAL_KEY_FIRST..=KITTY_FUNCTIONAL_KEY_LAST).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(57358, "caps_lock" ; "first")]
    #[test_case(57363, "menu" ; "menu")]
    #[test_case(57376, "f13" ; "f13")]
    #[test_case(57398, "f35" ; "f35")]
    #[test_case(57399, "kp_0" ; "kp 0")]
    #[test_case(57414, "kp_enter" ; "kp enter")]
    #[test_case(57427, "kp_begin" ; "kp begin")]
    #[test_case(57428, "media_play" ; "media play")]
    #[test_case(57440, "volume_mute" ; "mute")]
    #[test_case(57441, "left_shift" ; "left shift")]
    #[test_case(57454, "iso_level5_shift" ; "last")]
    fn test_name(code: u32, name: &str) {
        assert_eq!(kitty_functional_key_name(code).as_deref(), Some(name));
        assert!(is_kitty_functional_key(code));
    }

    #[test]
    fn test_gaps_and_outside() {
        assert_eq!(kitty_functional_key_name(57364), None);
        assert_eq!(kitty_functional_key_name(97), None);
        assert_eq!(kitty_functional_key_name(57455), None);
    }
}
