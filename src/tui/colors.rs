//! Colour constants and hex parsing for the timeline grid.

use ratatui::style::Color;

/// Fallback cell colour for events without an explicit colour.
pub const NEUTRAL_GRAY: Color = Color::Rgb(107, 114, 128);
/// Current-week column highlight.
pub const CURRENT_WEEK: Color = Color::Rgb(30, 64, 120);
/// Category header rows.
pub const CATEGORY_BAR: Color = Color::Rgb(40, 40, 48);
/// Past-week column headers.
pub const PAST_WEEK: Color = Color::DarkGray;

/// Colour choices offered by the event editor, as (name, hex) pairs.
pub const PALETTE: &[(&str, &str)] = &[
    ("Red", "#ef4444"),
    ("Amber", "#f59e0b"),
    ("Green", "#22c55e"),
    ("Blue", "#3b82f6"),
    ("Purple", "#8b5cf6"),
];

/// Parse a "#rrggbb" hex string into a terminal colour.
pub fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Resolve an optional stored colour, falling back to neutral gray for absent
/// or malformed values.
pub fn event_color(color: Option<&str>) -> Color {
    color.and_then(parse_hex).unwrap_or(NEUTRAL_GRAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex("#22c55e"), Some(Color::Rgb(34, 197, 94)));
        assert_eq!(parse_hex("ff0000"), None);
        assert_eq!(parse_hex("#ff00"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_event_color_fallback() {
        assert_eq!(event_color(None), NEUTRAL_GRAY);
        assert_eq!(event_color(Some("nope")), NEUTRAL_GRAY);
        assert_eq!(event_color(Some("#ff0000")), Color::Rgb(255, 0, 0));
    }
}
