//! Styled text shared by both hosts
//!
//! Markup is parsed once into a [`Component`]. The game server receives it
//! flattened to a section-sign string (see [`legacy`]); the proxy receives the
//! component itself and can serialize it as JSON text.

pub mod legacy;
pub mod markup;

use std::fmt;

use serde::{Serialize, Serializer};

pub use markup::parse;

/// The sixteen named chat colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// All colors in legacy code order (`0` to `f`)
    pub fn all() -> &'static [NamedColor] {
        &[
            NamedColor::Black,
            NamedColor::DarkBlue,
            NamedColor::DarkGreen,
            NamedColor::DarkAqua,
            NamedColor::DarkRed,
            NamedColor::DarkPurple,
            NamedColor::Gold,
            NamedColor::Gray,
            NamedColor::DarkGray,
            NamedColor::Blue,
            NamedColor::Green,
            NamedColor::Aqua,
            NamedColor::Red,
            NamedColor::LightPurple,
            NamedColor::Yellow,
            NamedColor::White,
        ]
    }

    /// Legacy format code character
    pub fn code(&self) -> char {
        match self {
            NamedColor::Black => '0',
            NamedColor::DarkBlue => '1',
            NamedColor::DarkGreen => '2',
            NamedColor::DarkAqua => '3',
            NamedColor::DarkRed => '4',
            NamedColor::DarkPurple => '5',
            NamedColor::Gold => '6',
            NamedColor::Gray => '7',
            NamedColor::DarkGray => '8',
            NamedColor::Blue => '9',
            NamedColor::Green => 'a',
            NamedColor::Aqua => 'b',
            NamedColor::Red => 'c',
            NamedColor::LightPurple => 'd',
            NamedColor::Yellow => 'e',
            NamedColor::White => 'f',
        }
    }

    pub fn from_code(code: char) -> Option<NamedColor> {
        let code = code.to_ascii_lowercase();
        Self::all().iter().copied().find(|color| color.code() == code)
    }

    /// Tag / JSON name, e.g. `dark_blue`
    pub fn name(&self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::DarkBlue => "dark_blue",
            NamedColor::DarkGreen => "dark_green",
            NamedColor::DarkAqua => "dark_aqua",
            NamedColor::DarkRed => "dark_red",
            NamedColor::DarkPurple => "dark_purple",
            NamedColor::Gold => "gold",
            NamedColor::Gray => "gray",
            NamedColor::DarkGray => "dark_gray",
            NamedColor::Blue => "blue",
            NamedColor::Green => "green",
            NamedColor::Aqua => "aqua",
            NamedColor::Red => "red",
            NamedColor::LightPurple => "light_purple",
            NamedColor::Yellow => "yellow",
            NamedColor::White => "white",
        }
    }

    /// Parse a color name, accepting the `grey` spellings
    pub fn from_name(name: &str) -> Option<NamedColor> {
        let name = name.to_lowercase();
        let name = match name.as_str() {
            "grey" => "gray",
            "dark_grey" => "dark_gray",
            other => other,
        };
        Self::all().iter().copied().find(|color| color.name() == name)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0x00, 0x00, 0x00),
            NamedColor::DarkBlue => (0x00, 0x00, 0xAA),
            NamedColor::DarkGreen => (0x00, 0xAA, 0x00),
            NamedColor::DarkAqua => (0x00, 0xAA, 0xAA),
            NamedColor::DarkRed => (0xAA, 0x00, 0x00),
            NamedColor::DarkPurple => (0xAA, 0x00, 0xAA),
            NamedColor::Gold => (0xFF, 0xAA, 0x00),
            NamedColor::Gray => (0xAA, 0xAA, 0xAA),
            NamedColor::DarkGray => (0x55, 0x55, 0x55),
            NamedColor::Blue => (0x55, 0x55, 0xFF),
            NamedColor::Green => (0x55, 0xFF, 0x55),
            NamedColor::Aqua => (0x55, 0xFF, 0xFF),
            NamedColor::Red => (0xFF, 0x55, 0x55),
            NamedColor::LightPurple => (0xFF, 0x55, 0xFF),
            NamedColor::Yellow => (0xFF, 0xFF, 0x55),
            NamedColor::White => (0xFF, 0xFF, 0xFF),
        }
    }
}

/// A span color: one of the named colors or an arbitrary RGB value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

impl TextColor {
    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<TextColor> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(TextColor::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            TextColor::Named(named) => named.rgb(),
            TextColor::Rgb(r, g, b) => (*r, *g, *b),
        }
    }

    /// Closest named color by squared RGB distance
    pub fn nearest_named(&self) -> NamedColor {
        if let TextColor::Named(named) = self {
            return *named;
        }
        let (r, g, b) = self.rgb();
        let distance = |color: &NamedColor| {
            let (nr, ng, nb) = color.rgb();
            let dr = i32::from(r) - i32::from(nr);
            let dg = i32::from(g) - i32::from(ng);
            let db = i32::from(b) - i32::from(nb);
            dr * dr + dg * dg + db * db
        };
        NamedColor::all()
            .iter()
            .copied()
            .min_by_key(distance)
            .unwrap_or(NamedColor::White)
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextColor::Named(named) => write!(f, "{}", named.name()),
            TextColor::Rgb(r, g, b) => write!(f, "#{:02x}{:02x}{:02x}", r, g, b),
        }
    }
}

impl Serialize for TextColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color plus decorations of a span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub color: Option<TextColor>,
    pub bold: bool,
    pub italic: bool,
    pub underlined: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl Style {
    pub fn colored(color: TextColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Legacy codes of the active decorations, in `l m n o k` order
    pub fn decoration_codes(&self) -> Vec<char> {
        [
            (self.bold, 'l'),
            (self.strikethrough, 'm'),
            (self.underlined, 'n'),
            (self.italic, 'o'),
            (self.obfuscated, 'k'),
        ]
        .iter()
        .filter(|(active, _)| *active)
        .map(|(_, code)| *code)
        .collect()
    }
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// Rendered rich text: an ordered list of styled spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    spans: Vec<Span>,
}

impl Component {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text
    pub fn plain(text: impl Into<String>) -> Self {
        let mut component = Self::new();
        component.push(text, Style::default());
        component
    }

    /// Append text, merging with the previous span when the style matches
    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.spans.push(Span { text, style }),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Text content without any styling
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    /// JSON chat component: an empty root with one `extra` entry per span
    pub fn to_json(&self) -> serde_json::Value {
        let root = JsonText {
            text: String::new(),
            style: JsonStyle::default(),
            extra: self.spans.iter().map(JsonText::from_span).collect(),
        };
        serde_json::to_value(root).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plain_text())
    }
}

#[derive(Debug, Serialize)]
struct JsonText {
    text: String,
    #[serde(flatten)]
    style: JsonStyle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra: Vec<JsonText>,
}

#[derive(Debug, Default, Serialize)]
struct JsonStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<TextColor>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    underlined: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    strikethrough: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    obfuscated: bool,
}

impl JsonText {
    fn from_span(span: &Span) -> Self {
        Self {
            text: span.text.clone(),
            style: JsonStyle {
                color: span.style.color,
                bold: span.style.bold,
                italic: span.style.italic,
                underlined: span.style.underlined,
                strikethrough: span.style.strikethrough,
                obfuscated: span.style.obfuscated,
            },
            extra: Vec::new(),
        }
    }
}
