//! Markup parser
//!
//! Accepts legacy codes (`&c`, `§c`, `&#ff8800`) and tags (`<red>`,
//! `<#ff8800>`, `<bold>`, `</bold>`, `<reset>`) in the same string. A legacy
//! color code clears decorations, as on the game server. A closing tag
//! restores the style that was active before the matching opening tag.
//! Unknown tags are kept as literal text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Component, NamedColor, Style, TextColor};

/// Legacy codes (`&c`, `§l`, `&#rrggbb`) and tags (`<red>`, `</b>`, `<#rrggbb>`)
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[&§](#[0-9a-f]{6}|[0-9a-fk-or])|<(/?)(#[0-9a-f]{6}|[a-z_]+)>")
        .expect("markup token pattern is valid")
});

/// Tag or code effect on the current style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Color(TextColor),
    Bold,
    Italic,
    Underlined,
    Strikethrough,
    Obfuscated,
    Reset,
}

impl Directive {
    fn from_tag(name: &str) -> Option<Directive> {
        if name.starts_with('#') {
            return TextColor::from_hex(name).map(Directive::Color);
        }
        match name {
            "bold" | "b" => Some(Directive::Bold),
            "italic" | "i" | "em" => Some(Directive::Italic),
            "underlined" | "u" => Some(Directive::Underlined),
            "strikethrough" | "st" => Some(Directive::Strikethrough),
            "obfuscated" | "obf" => Some(Directive::Obfuscated),
            "reset" => Some(Directive::Reset),
            other => NamedColor::from_name(other).map(|c| Directive::Color(TextColor::Named(c))),
        }
    }

    fn from_code(code: &str) -> Option<Directive> {
        if code.starts_with('#') {
            return TextColor::from_hex(code).map(Directive::Color);
        }
        let code = code.chars().next()?.to_ascii_lowercase();
        match code {
            'k' => Some(Directive::Obfuscated),
            'l' => Some(Directive::Bold),
            'm' => Some(Directive::Strikethrough),
            'n' => Some(Directive::Underlined),
            'o' => Some(Directive::Italic),
            'r' => Some(Directive::Reset),
            other => NamedColor::from_code(other).map(|c| Directive::Color(TextColor::Named(c))),
        }
    }

    fn apply(self, style: &mut Style) {
        match self {
            Directive::Color(color) => style.color = Some(color),
            Directive::Bold => style.bold = true,
            Directive::Italic => style.italic = true,
            Directive::Underlined => style.underlined = true,
            Directive::Strikethrough => style.strikethrough = true,
            Directive::Obfuscated => style.obfuscated = true,
            Directive::Reset => *style = Style::default(),
        }
    }
}

/// Parse markup into a [`Component`]
pub fn parse(input: &str) -> Component {
    let mut component = Component::new();
    let mut style = Style::default();
    let mut stack: Vec<Style> = Vec::new();
    let mut pending = String::new();
    let mut cursor = 0;

    for caps in TOKEN_PATTERN.captures_iter(input) {
        let Some(token) = caps.get(0) else { continue };
        pending.push_str(&input[cursor..token.start()]);
        cursor = token.end();

        let previous = style;
        if !apply_token(&caps, &mut style, &mut stack) {
            pending.push_str(token.as_str());
            continue;
        }
        if style != previous {
            component.push(std::mem::take(&mut pending), previous);
        }
    }
    pending.push_str(&input[cursor..]);
    component.push(pending, style);
    component
}

/// Apply one matched token; false when it is not a known directive
fn apply_token(caps: &Captures<'_>, style: &mut Style, stack: &mut Vec<Style>) -> bool {
    if let Some(code) = caps.get(1) {
        let Some(directive) = Directive::from_code(code.as_str()) else {
            return false;
        };
        match directive {
            Directive::Color(color) => *style = Style::colored(color),
            Directive::Reset => {
                *style = Style::default();
                stack.clear();
            }
            other => other.apply(style),
        }
        return true;
    }

    let closing = caps.get(2).map(|m| !m.as_str().is_empty()).unwrap_or(false);
    let name = caps
        .get(3)
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default();
    let Some(directive) = Directive::from_tag(&name) else {
        return false;
    };

    if directive == Directive::Reset {
        *style = Style::default();
        stack.clear();
    } else if closing {
        *style = stack.pop().unwrap_or_default();
    } else {
        stack.push(*style);
        directive.apply(style);
    }
    true
}
