use super::*;
use crate::domain::{format_duration, format_entry_date, format_time_of_day};
use ratatui::widgets::{Cell, Row, Table};

pub fn render_history_view(frame: &mut Frame, app: &mut App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Month selector
            Constraint::Min(0),    // Entries
            Constraint::Length(1), // Controls
        ])
        .split(body);

    let months = app.history.months();
    let idx = app.history.selected_index();
    let older = if idx + 1 < months.len() { "◀ " } else { "  " };
    let newer = if idx > 0 { " ▶" } else { "  " };
    let selector = Paragraph::new(Line::from(vec![
        Span::styled(older, Style::default().fg(Color::Yellow)),
        Span::styled(
            app.history.selected_month().label.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(newer, Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Month "));
    frame.render_widget(selector, chunks[0]);

    let offset = app.history.offset();
    let entries = app.history.filtered();

    if entries.is_empty() {
        let message = if app.is_loading {
            "Loading…"
        } else {
            "No entries this month"
        };
        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" History ")),
            chunks[1],
        );
    } else {
        // Borders plus the header row
        app.history_view_height = chunks[1].height.saturating_sub(3) as usize;

        let rows: Vec<Row> = app
            .history
            .filtered()
            .iter()
            .skip(app.history_scroll)
            .map(|entry| {
                let open = entry.is_open();
                let style = if open {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(format_entry_date(entry.clock_in, offset)),
                    Cell::from(format_time_of_day(Some(entry.clock_in), offset)),
                    Cell::from(format_time_of_day(entry.clock_out, offset)),
                    Cell::from(format_duration(entry.clock_in, entry.clock_out)),
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec!["Date", "In", "Out", "Duration"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" History ({}) ", app.history.filtered().len()))
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(table, chunks[1]);
    }

    let controls = Line::from(vec![
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(": Month  "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(": Scroll  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(": Reload"),
    ]);
    frame.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        chunks[2],
    );
}
