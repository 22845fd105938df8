use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Tabs},
    Frame,
};

mod clock_view;
mod confirm_dialog;
mod history_view;
mod login_view;
mod settings_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    if app.current_view == View::Login {
        let area = frame.area();
        login_view::render_login_view(frame, app, area);
        return;
    }

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tabs(frame, app, root[0]);

    let body = root[1];
    match app.current_view {
        View::Clock => clock_view::render_clock_view(frame, app, body),
        View::History => history_view::render_history_view(frame, app, body),
        View::Settings => settings_view::render_settings_view(frame, app, body),
        View::Login => {}
    }

    render_status_line(frame, app, root[2]);

    // Confirmation prompt renders on top of any tab
    if app.confirm.is_visible() {
        confirm_dialog::render_confirm_dialog(frame, app);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::TABS
        .iter()
        .enumerate()
        .map(|(idx, view)| Line::from(format!(" {} {} ", idx + 1, view.title())))
        .collect();
    let selected = View::TABS
        .iter()
        .position(|v| *v == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Certus ", Style::default().fg(Color::Cyan))),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Switch  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(": Quit"),
    ];
    if app.is_loading {
        spans.push(Span::styled("  Loading…", Style::default().fg(Color::DarkGray)));
    }
    if let Some(status) = &app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.as_str(), Style::default().fg(Color::Cyan)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
