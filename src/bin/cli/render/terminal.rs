use studylog_lib::study::{Performance, ReviewStatus};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn status_color(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Overdue => Color::RED,
        ReviewStatus::DueToday => Color::YELLOW,
        ReviewStatus::Upcoming => Color::GREEN,
    }
}

pub fn performance_color(performance: Performance) -> &'static str {
    match performance {
        Performance::Excellent => Color::GREEN,
        Performance::Good => Color::CYAN,
        Performance::Regular => Color::YELLOW,
        Performance::Weak => Color::RED,
    }
}

pub fn status_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Overdue => "overdue",
        ReviewStatus::DueToday => "today",
        ReviewStatus::Upcoming => "upcoming",
    }
}

/// Horizontal rule of `width` box-drawing characters
pub fn rule(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Cut `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Left-align `text` in `width` columns, counting characters rather than bytes
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Column width for a set of values, clamped to `[min, max]`
pub fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize, max: usize) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(min)
        .clamp(min, max)
}
