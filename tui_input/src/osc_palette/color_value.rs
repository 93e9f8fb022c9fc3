// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Max hex digits per component in the X11 `rgb:` form.
const MAX_COMPONENT_DIGITS: usize = 4;

/// Normalizes a color from an OSC reply to lower case `#rrggbb`.
///
/// Accepts `#RRGGBB` and the X11 form `rgb:R/G/B`, where each component has 1 to 4 hex
/// digits and is scaled to 8 bits on its own: `round(value / (16^digits - 1) * 255)`.
/// So `rgb:ffff/0000/aaaa` is `#ff00aa` and `rgb:f/8/0` is `#ff8800`.
#[must_use]
pub fn parse_color_value(value: &str) -> Option<String> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return Some(format!("#{}", hex.to_ascii_lowercase()));
    }

    let components = value.strip_prefix("rgb:")?;
    let mut parts = components.split('/');
    let r = scale_component(parts.next()?)?;
    let g = scale_component(parts.next()?)?;
    let b = scale_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_component(hex: &str) -> Option<u8> {
    if hex.is_empty() || hex.len() > MAX_COMPONENT_DIGITS {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    let max = (1_u32 << (4 * hex.len())) - 1;
    let scaled = (f64::from(value) / f64::from(max) * 255.0).round();
    Some(scaled as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("rgb:ffff/0000/aaaa", "#ff00aa" ; "four digits")]
    #[test_case("rgb:ff/80/00", "#ff8000" ; "two digits")]
    #[test_case("rgb:f/8/0", "#ff8800" ; "one digit")]
    #[test_case("rgb:fff/800/000", "#ff8000" ; "three digits")]
    #[test_case("rgb:8080/0000/FFFF", "#8000ff" ; "upper case four digits")]
    #[test_case("#FF00AA", "#ff00aa" ; "hash upper")]
    #[test_case("#1e1e2e", "#1e1e2e" ; "hash lower")]
    fn test_parse(input: &str, expected: &str) {
        assert_eq!(parse_color_value(input).as_deref(), Some(expected));
    }

    #[test_case("" ; "empty")]
    #[test_case("?" ; "query marker")]
    #[test_case("#fff" ; "short hash")]
    #[test_case("#gggggg" ; "bad hex")]
    #[test_case("rgb:ffff/0000" ; "two components")]
    #[test_case("rgb:fffff/0/0" ; "five digits")]
    #[test_case("rgb:/0/0" ; "empty component")]
    #[test_case("rgba:ffff/0/0/0" ; "rgba")]
    fn test_reject(input: &str) {
        assert_eq!(parse_color_value(input), None);
    }
}
