use super::utils::{clock_time, long_date};
use super::*;
use crate::domain::SessionState;

pub fn render_clock_view(frame: &mut Frame, app: &App, body: Rect) {
    let now = time::OffsetDateTime::now_utc();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Date and time
            Constraint::Length(5), // Elapsed
            Constraint::Length(4), // Actions
            Constraint::Min(0),    // Last clock in/out
        ])
        .split(body);

    let date_lines = vec![
        Line::from(Span::styled(
            long_date(now, app.offset),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            clock_time(now, app.offset),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(
        Paragraph::new(date_lines)
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::vertical(1))),
        chunks[0],
    );

    let (state_label, state_color) = match app.session_state {
        SessionState::NoSession => ("Not clocked in", Color::DarkGray),
        SessionState::ClockingIn => ("Clocking in…", Color::Yellow),
        SessionState::Active(_) => ("Clocked in", Color::Green),
        SessionState::ClockingOut(_) => ("Clocking out…", Color::Yellow),
    };
    let elapsed_lines = vec![
        Line::from(Span::styled(
            app.elapsed.as_str(),
            Style::default()
                .fg(state_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(state_label, Style::default().fg(state_color))),
    ];
    frame.render_widget(
        Paragraph::new(elapsed_lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(state_color))
                .title(" Elapsed "),
        ),
        chunks[1],
    );

    let enabled = Style::default().fg(Color::Yellow);
    let disabled = Style::default().fg(Color::DarkGray);
    let actions = Line::from(vec![
        Span::styled(
            "[i] Clock in",
            if app.session_state.can_clock_in() {
                enabled
            } else {
                disabled
            },
        ),
        Span::raw("    "),
        Span::styled(
            "[o] Clock out",
            if app.session_state.can_clock_out() {
                enabled
            } else {
                disabled
            },
        ),
    ]);
    frame.render_widget(
        Paragraph::new(actions)
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::vertical(1))),
        chunks[2],
    );

    let last = |label: &'static str, at: Option<time::OffsetDateTime>| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::raw(
                at.map(|t| clock_time(t, app.offset))
                    .unwrap_or_else(|| "--:--:--".to_string()),
            ),
        ])
    };
    let active_since = app
        .session_state
        .active()
        .map(|s| clock_time(s.clock_in, app.offset));

    let mut info = vec![
        last("Last clock-in:  ", app.last_clock_in),
        last("Last clock-out: ", app.last_clock_out),
    ];
    if let Some(since) = active_since {
        info.push(Line::from(vec![
            Span::styled("Clocked in at:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(since),
        ]));
    }
    frame.render_widget(Paragraph::new(info).alignment(Alignment::Center), chunks[3]);
}
