//! Section-sign serialization for the game server host

use std::sync::LazyLock;

use regex::Regex;

use super::{Component, Style, TextColor};

pub const SECTION: char = '§';

/// Flatten a component to a `§`-coded string.
///
/// With `hex` set, RGB colors use the `§x§r§r§g§g§b§b` form; otherwise they
/// degrade to the nearest named color.
pub fn serialize(component: &Component, hex: bool) -> String {
    let mut out = String::new();
    let mut last = Style::default();

    for span in component.spans() {
        if span.style != last {
            match span.style.color {
                Some(color) => push_color(&mut out, color, hex),
                None => push_code(&mut out, 'r'),
            }
            for code in span.style.decoration_codes() {
                push_code(&mut out, code);
            }
            last = span.style;
        }
        out.push_str(&span.text);
    }
    out
}

/// `§x§r§r§g§g§b§b` hex sequences and single `§` codes
static LEGACY_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)§x(§[0-9a-f]){6}|§[0-9a-fk-or]").expect("legacy code pattern is valid"));

/// Remove every legacy code from an already-serialized string
pub fn strip(serialized: &str) -> String {
    LEGACY_CODE_PATTERN.replace_all(serialized, "").into_owned()
}

fn push_code(out: &mut String, code: char) {
    out.push(SECTION);
    out.push(code);
}

fn push_color(out: &mut String, color: TextColor, hex: bool) {
    match color {
        TextColor::Named(named) => push_code(out, named.code()),
        TextColor::Rgb(..) if hex => {
            push_code(out, 'x');
            let hex_digits = format!("{}", color);
            for digit in hex_digits.trim_start_matches('#').chars() {
                push_code(out, digit);
            }
        }
        TextColor::Rgb(..) => push_code(out, color.nearest_named().code()),
    }
}
