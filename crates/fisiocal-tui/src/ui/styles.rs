use ratatui::style::{Color, Modifier, Style};

// Clinic palette, built around the default event green
pub const PRIMARY: Color = Color::Rgb(46, 139, 87);
pub const ACTIVE: Color = Color::Rgb(120, 200, 140);
pub const ACCENT: Color = Color::Rgb(230, 180, 80);
pub const ERROR: Color = Color::Rgb(210, 80, 70);
pub const MUTED: Color = Color::Rgb(120, 126, 130);
pub const SELECTION: Color = Color::Rgb(36, 56, 48);
pub const STATUS_BAR: Color = Color::Rgb(26, 34, 30);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(SELECTION).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(STATUS_BAR).fg(Color::White)
}

pub fn help_key_style() -> Style {
    highlight_style().add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    list_item_style()
}

/// Style for an event's count column, tinted with its color hint.
pub fn event_style(color_hint: Option<&str>) -> Style {
    match color_hint.and_then(parse_hex_color) {
        Some(color) => Style::default().fg(color).add_modifier(Modifier::BOLD),
        None => list_item_style(),
    }
}

/// Active students in green, inactive ones muted.
pub fn student_status_style(active: bool) -> Style {
    if active {
        Style::default().fg(ACTIVE)
    } else {
        muted_style()
    }
}

/// Parse `#RRGGBB` into a terminal color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
