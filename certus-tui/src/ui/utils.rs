use ratatui::layout::{Constraint, Direction, Layout, Rect};
use time::{OffsetDateTime, UtcOffset};

/// Helper function to create a centered rectangle
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((r.width.saturating_sub(width)) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// `HH:MM:SS` at the given offset.
pub fn clock_time(dt: OffsetDateTime, offset: UtcOffset) -> String {
    let t = dt.to_offset(offset);
    format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
}

/// e.g. `Friday, 15 March 2024`.
pub fn long_date(dt: OffsetDateTime, offset: UtcOffset) -> String {
    let d = dt.to_offset(offset).date();
    format!("{}, {} {} {}", d.weekday(), d.day(), d.month(), d.year())
}
